use async_trait::async_trait;
use common::pagination::{Page, Pagination};
use models::promotion::Model;
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;
use super::PromotionDraft;

/// Persistence abstraction for promotions.
#[async_trait]
pub trait PromotionRepository: Send + Sync {
    /// One page of promotions, newest first.
    async fn find_all(&self, opts: Pagination) -> Result<Page<Model>, ServiceError>;
    /// Create when `draft.id` is absent, otherwise update that promotion.
    async fn save(&self, draft: PromotionDraft) -> Result<Model, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Model>, ServiceError>;
    async fn find_by_active_order_by_id_desc(&self, active: bool) -> Result<Vec<Model>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmPromotionRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl PromotionRepository for SeaOrmPromotionRepository {
    async fn find_all(&self, opts: Pagination) -> Result<Page<Model>, ServiceError> {
        crate::db::promotion_store::list_promotions_paginated(&self.db, opts).await
    }

    async fn save(&self, draft: PromotionDraft) -> Result<Model, ServiceError> {
        match draft.id {
            Some(id) => crate::db::promotion_store::update_promotion(&self.db, id, &draft).await,
            None => crate::db::promotion_store::create_promotion(&self.db, &draft).await,
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Model>, ServiceError> {
        crate::db::promotion_store::get_promotion(&self.db, id).await
    }

    async fn find_by_active_order_by_id_desc(&self, active: bool) -> Result<Vec<Model>, ServiceError> {
        crate::db::promotion_store::list_by_active_desc(&self.db, active).await
    }
}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryPromotionRepository {
        rows: Mutex<BTreeMap<i64, Model>>,  // key: id
        last_id: Mutex<i64>,
        saved: Mutex<Vec<PromotionDraft>>,  // every draft handed to `save`
    }

    impl InMemoryPromotionRepository {
        /// Seed a row with a caller-chosen id; later creates continue past the highest id.
        pub fn insert(&self, model: Model) {
            let mut rows = self.rows.lock().unwrap();
            let mut last = self.last_id.lock().unwrap();
            *last = (*last).max(model.id);
            rows.insert(model.id, model);
        }

        pub fn saved_drafts(&self) -> Vec<PromotionDraft> {
            self.saved.lock().unwrap().clone()
        }

        pub fn save_calls(&self) -> usize {
            self.saved.lock().unwrap().len()
        }
    }

    /// Build a stored promotion for seeding.
    pub fn promotion(id: i64, title: &str, active: bool) -> Model {
        let now = Utc::now().into();
        Model {
            id,
            title: title.to_string(),
            description: None,
            active,
            priority: models::promotion::Priority::Normal.code().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[async_trait]
    impl PromotionRepository for InMemoryPromotionRepository {
        async fn find_all(&self, opts: Pagination) -> Result<Page<Model>, ServiceError> {
            let rows = self.rows.lock().unwrap();
            let newest_first: Vec<Model> = rows.values().rev().cloned().collect();
            Ok(Page::from_slice(&newest_first, opts))
        }

        async fn save(&self, draft: PromotionDraft) -> Result<Model, ServiceError> {
            self.saved.lock().unwrap().push(draft.clone());
            let now = Utc::now().into();
            let mut rows = self.rows.lock().unwrap();
            let (id, created_at) = match draft.id {
                Some(id) => {
                    let existing = rows
                        .get(&id)
                        .ok_or_else(|| ServiceError::NotFound(format!("could not find promotion with id {id}")))?;
                    (id, existing.created_at)
                }
                None => {
                    let mut last = self.last_id.lock().unwrap();
                    *last += 1;
                    (*last, now)
                }
            };
            let model = Model {
                id,
                title: draft.title.unwrap_or_default(),
                description: draft.description,
                active: draft.active,
                priority: draft.priority,
                created_at,
                updated_at: now,
            };
            rows.insert(id, model.clone());
            Ok(model)
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_active_order_by_id_desc(&self, active: bool) -> Result<Vec<Model>, ServiceError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.values().rev().filter(|p| p.active == active).cloned().collect())
        }
    }
}
