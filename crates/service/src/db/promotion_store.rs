use sea_orm::{DatabaseConnection, EntityTrait, ActiveModelTrait, Set, QueryFilter, QueryOrder, ColumnTrait, PaginatorTrait};
use chrono::Utc;
use common::pagination::{Page, Pagination};
use models::promotion::{self, Entity as PromotionEntity};
use crate::errors::ServiceError;
use crate::promotion::PromotionDraft;

/// Insert a new promotion; the store assigns the id.
pub async fn create_promotion(db: &DatabaseConnection, draft: &PromotionDraft) -> Result<promotion::Model, ServiceError> {
    let title = draft.title.as_deref().unwrap_or_default();
    let created = promotion::create(db, title, draft.description.as_deref(), draft.active, &draft.priority).await?;
    Ok(created)
}

/// Overwrite every mutable field of an existing promotion.
pub async fn update_promotion(db: &DatabaseConnection, id: i64, draft: &PromotionDraft) -> Result<promotion::Model, ServiceError> {
    let current = PromotionEntity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let Some(existing) = current else {
        return Err(ServiceError::NotFound(format!("could not find promotion with id {id}")));
    };
    let title = promotion::validate_title(draft.title.as_deref())?;
    let mut am: promotion::ActiveModel = existing.into();
    am.title = Set(title.to_string());
    am.description = Set(draft.description.clone());
    am.active = Set(draft.active);
    am.priority = Set(draft.priority.clone());
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Get a promotion by id.
pub async fn get_promotion(db: &DatabaseConnection, id: i64) -> Result<Option<promotion::Model>, ServiceError> {
    let found = PromotionEntity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// One page of promotions, newest first.
pub async fn list_promotions_paginated(db: &DatabaseConnection, opts: Pagination) -> Result<Page<promotion::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let paginator = PromotionEntity::find()
        .order_by_desc(promotion::Column::Id)
        .paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let rows = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(Page::new(rows, opts, total))
}

/// All promotions with the given `active` flag, ordered by id descending.
pub async fn list_by_active_desc(db: &DatabaseConnection, active: bool) -> Result<Vec<promotion::Model>, ServiceError> {
    let rows = PromotionEntity::find()
        .filter(promotion::Column::Active.eq(active))
        .order_by_desc(promotion::Column::Id)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}
