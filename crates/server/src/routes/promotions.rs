use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use tracing::info;

use common::pagination::Page;
use models::promotion::Model;
use service::promotion::PromotionDraft;

use crate::{errors::JsonApiError, routes::AppState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    /// 1-based page index; 0 is treated as the first page
    #[serde(default)]
    pub page: u32,
}

#[utoipa::path(
    get, path = "/api/v1/promotions", tag = "promotions",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of promotions, newest first"),
        (status = 400, description = "Invalid Query"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(
    State(state): State<AppState>,
    WithRejection(Query(q), _): WithRejection<Query<PageQuery>, JsonApiError>,
) -> Result<Json<Page<Model>>, JsonApiError> {
    let page = state.promotions.list_page(q.page).await?;
    info!(page = page.page, count = page.items.len(), total = page.total_items, "list promotions");
    Ok(Json(page))
}

#[utoipa::path(
    post, path = "/api/v1/promotions", tag = "promotions",
    request_body = crate::openapi::PromotionDraftDoc,
    responses(
        (status = 200, description = "Saved"),
        (status = 400, description = "Invalid Argument / Validation Error / Invalid Request Body"),
        (status = 415, description = "Body is not JSON"),
        (status = 404, description = "Not Found (update of unknown id)")
    )
)]
pub async fn save(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<Option<PromotionDraft>>, JsonApiError>,
) -> Result<Json<Model>, JsonApiError> {
    let saved = state.promotions.save(input).await?;
    Ok(Json(saved))
}

#[utoipa::path(
    get, path = "/api/v1/promotions/latest", tag = "promotions",
    responses((status = 200, description = "Active promotions, newest first"))
)]
pub async fn latest(State(state): State<AppState>) -> Result<Json<Vec<Model>>, JsonApiError> {
    Ok(Json(state.promotions.latest_promotions().await?))
}

#[utoipa::path(
    get, path = "/api/v1/promotions/{id}", tag = "promotions",
    params(("id" = i64, Path, description = "Promotion ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, JsonApiError>,
) -> Result<Json<Model>, JsonApiError> {
    Ok(Json(state.promotions.find_one(id).await?))
}

#[utoipa::path(
    post, path = "/api/v1/promotions/{id}/notify", tag = "promotions",
    params(("id" = i64, Path, description = "Promotion ID")),
    responses(
        (status = 202, description = "Notification handed to the dispatcher"),
        (status = 403, description = "Promotion is not active"),
        (status = 404, description = "Not Found"),
        (status = 502, description = "Notification Failed")
    )
)]
pub async fn notify(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, JsonApiError>,
) -> Result<StatusCode, JsonApiError> {
    state.promotions.notify_users(id).await?;
    Ok(StatusCode::ACCEPTED)
}
