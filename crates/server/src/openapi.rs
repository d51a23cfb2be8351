use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Body of a save; omit `id` to create.
#[derive(ToSchema)]
pub struct PromotionDraftDoc {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub active: bool,
    /// `NORMAL` or `HIGH`
    pub priority: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::promotions::list,
        crate::routes::promotions::save,
        crate::routes::promotions::latest,
        crate::routes::promotions::get,
        crate::routes::promotions::notify,
    ),
    components(
        schemas(
            HealthResponse,
            PromotionDraftDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "promotions")
    )
)]
pub struct ApiDoc;
