use std::sync::Arc;

use common::pagination::{Page, Pagination};
use models::promotion::{Model, Priority};
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::metrics;
use crate::notification::payload::{brief, NotificationData, NotificationType, PushNotification};
use crate::notification::NotificationDispatcher;
use crate::upload::FileUploadService;
use super::repository::PromotionRepository;
use super::PromotionDraft;

/// Application service encapsulating promotion business rules.
/// Validates input, delegates storage and pushes notifications for active promotions.
pub struct PromotionService {
    repo: Arc<dyn PromotionRepository>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    uploads: Arc<dyn FileUploadService>,
    page_size: u32,
}

impl PromotionService {
    pub fn new(
        repo: Arc<dyn PromotionRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        uploads: Arc<dyn FileUploadService>,
    ) -> Self {
        Self { repo, dispatcher, uploads, page_size: Pagination::default().per_page }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Upload storage available to callers composing promotion assets.
    pub fn uploads(&self) -> &Arc<dyn FileUploadService> { &self.uploads }

    /// One page of promotions, newest first. `page` is 1-based; 0 means the first page.
    pub async fn list_page(&self, page: u32) -> Result<Page<Model>, ServiceError> {
        self.repo.find_all(Pagination::new(page, self.page_size)).await
    }

    /// Persist a promotion.
    ///
    /// # Examples
    /// ```
    /// use service::promotion::{PromotionDraft, PromotionService, repository::mock::InMemoryPromotionRepository};
    /// use service::notification::dispatcher::mock::RecordingDispatcher;
    /// use service::upload::LocalFileUploadService;
    /// use std::sync::Arc;
    /// let svc = PromotionService::new(
    ///     Arc::new(InMemoryPromotionRepository::default()),
    ///     Arc::new(RecordingDispatcher::default()),
    ///     Arc::new(LocalFileUploadService::new("data/uploads")),
    /// );
    /// let saved = tokio_test::block_on(svc.save(Some(PromotionDraft::new("Summer sale")))).unwrap();
    /// assert_eq!(saved.id, 1);
    /// assert!(tokio_test::block_on(svc.save(None)).is_err());
    /// ```
    #[instrument(skip(self, promotion), fields(id = ?promotion.as_ref().and_then(|p| p.id)))]
    pub async fn save(&self, promotion: Option<PromotionDraft>) -> Result<Model, ServiceError> {
        let Some(draft) = promotion else {
            return Err(ServiceError::InvalidArgument("promotion can not be empty".into()));
        };
        if draft.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
            return Err(ServiceError::Validation("title can not be null or empty".into()));
        }
        let saved = self.repo.save(draft).await?;
        metrics::PROMOTIONS_SAVED_TOTAL.inc();
        info!(id = saved.id, active = saved.active, priority = %saved.priority, "promotion_saved");
        Ok(saved)
    }

    pub async fn find_one(&self, id: i64) -> Result<Model, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("could not find promotion with id {id}")))
    }

    /// Active promotions, newest first.
    pub async fn latest_promotions(&self) -> Result<Vec<Model>, ServiceError> {
        self.repo.find_by_active_order_by_id_desc(true).await
    }

    /// Push an active promotion to every subscribed user. Dispatch failures are returned as-is.
    #[instrument(skip(self))]
    pub async fn notify_users(&self, promotion_id: i64) -> Result<(), ServiceError> {
        let promotion = self.find_one(promotion_id).await?;
        if !promotion.active {
            return Err(ServiceError::Forbidden("can not notify users, promotion is not active".into()));
        }

        let kind = match promotion.priority_kind() {
            Some(Priority::Normal) => NotificationType::Promotion,
            Some(Priority::High) => NotificationType::Alert,
            None => {
                warn!(id = promotion.id, priority = %promotion.priority, "unrecognized priority code; sending as PROMOTION");
                NotificationType::Promotion
            }
        };
        let data = NotificationData {
            title: promotion.title.clone(),
            message: brief(promotion.description.as_deref()),
            kind,
        };
        let notification = PushNotification::broadcast(data);

        if let Err(e) = self.dispatcher.send_notification(&notification).await {
            metrics::NOTIFICATION_FAILURES_TOTAL.inc();
            warn!(id = promotion.id, error = %e, "promotion_notification_failed");
            return Err(e.into());
        }
        metrics::NOTIFICATIONS_SENT_TOTAL.inc();
        info!(id = promotion.id, kind = kind.as_str(), to = %notification.to, "promotion_notification_sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::dispatcher::mock::RecordingDispatcher;
    use crate::notification::BROADCAST_TOPIC;
    use crate::promotion::repository::mock::{promotion, InMemoryPromotionRepository};
    use crate::upload::LocalFileUploadService;

    struct Fixture {
        repo: Arc<InMemoryPromotionRepository>,
        dispatcher: Arc<RecordingDispatcher>,
        svc: PromotionService,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryPromotionRepository::default());
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let svc = PromotionService::new(
            repo.clone(),
            dispatcher.clone(),
            Arc::new(LocalFileUploadService::new(std::env::temp_dir().join("promo-service-tests"))),
        );
        Fixture { repo, dispatcher, svc }
    }

    fn seeded(id: i64, active: bool, description: Option<String>, priority: &str) -> Model {
        let mut p = promotion(id, &format!("promo {id}"), active);
        p.description = description;
        p.priority = priority.to_string();
        p
    }

    #[tokio::test]
    async fn save_none_is_invalid_argument_and_skips_store() {
        let f = fixture();
        let err = f.svc.save(None).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
        assert_eq!(f.repo.save_calls(), 0);
    }

    #[tokio::test]
    async fn save_without_title_is_validation_error_and_skips_store() {
        let f = fixture();
        for title in [None, Some(String::new()), Some("   ".to_string())] {
            let draft = PromotionDraft { title, ..PromotionDraft::new("x") };
            let err = f.svc.save(Some(draft)).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));
        }
        assert_eq!(f.repo.save_calls(), 0);
    }

    #[tokio::test]
    async fn save_passes_draft_through_unchanged() {
        let f = fixture();
        let draft = PromotionDraft {
            id: None,
            title: Some("Winter".into()),
            description: Some("cold deals".into()),
            active: true,
            priority: "SOMETHING_ELSE".into(),
        };
        let saved = f.svc.save(Some(draft.clone())).await.unwrap();
        assert_eq!(f.repo.saved_drafts(), vec![draft]);
        let stored = f.repo.find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(saved, stored);
        assert_eq!(saved.priority, "SOMETHING_ELSE");
    }

    #[tokio::test]
    async fn save_then_find_one_round_trips() {
        let f = fixture();
        let draft = PromotionDraft {
            id: None,
            title: Some("Round trip".into()),
            description: None,
            active: false,
            priority: "HIGH".into(),
        };
        let saved = f.svc.save(Some(draft.clone())).await.unwrap();
        let found = f.svc.find_one(saved.id).await.unwrap();
        assert_eq!(found, saved);
        assert_eq!(PromotionDraft { id: None, ..PromotionDraft::from(found) }, draft);
    }

    #[tokio::test]
    async fn save_with_id_updates_existing() {
        let f = fixture();
        let created = f.svc.save(Some(PromotionDraft::new("v1"))).await.unwrap();
        let mut draft = PromotionDraft::from(created.clone());
        draft.title = Some("v2".into());
        draft.active = true;
        let updated = f.svc.save(Some(draft)).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "v2");
        assert!(updated.active);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn find_one_unknown_id_mentions_id() {
        let f = fixture();
        let err = f.svc.find_one(4242).await.unwrap_err();
        match err {
            ServiceError::NotFound(msg) => assert!(msg.contains("4242")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn latest_promotions_are_active_and_newest_first() {
        let f = fixture();
        for (id, active) in [(5, true), (2, true), (9, true), (7, false)] {
            f.repo.insert(seeded(id, active, None, "NORMAL"));
        }
        let ids: Vec<i64> = f.svc.latest_promotions().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![9, 5, 2]);
    }

    #[tokio::test]
    async fn list_page_uses_configured_page_size() {
        let f = fixture();
        for id in 1..=5 {
            f.repo.insert(seeded(id, id % 2 == 0, None, "NORMAL"));
        }
        let svc = f.svc.with_page_size(2);
        let first = svc.list_page(0).await.unwrap();
        assert_eq!(first.items.iter().map(|p| p.id).collect::<Vec<_>>(), vec![5, 4]);
        assert_eq!(first.total_items, 5);
        assert_eq!(first.total_pages, 3);
        let last = svc.list_page(3).await.unwrap();
        assert_eq!(last.items.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);
    }

    #[tokio::test]
    async fn notify_inactive_is_forbidden_and_skips_dispatch() {
        let f = fixture();
        f.repo.insert(seeded(1, false, Some("x".into()), "NORMAL"));
        let err = f.svc.notify_users(1).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        assert!(f.dispatcher.sent().is_empty());
    }

    #[tokio::test]
    async fn notify_unknown_is_not_found() {
        let f = fixture();
        let err = f.svc.notify_users(77).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m.contains("77")));
        assert!(f.dispatcher.sent().is_empty());
    }

    #[tokio::test]
    async fn notify_truncates_description_to_100_chars() {
        let f = fixture();
        let description: String = ('a'..='z').cycle().take(250).collect();
        f.repo.insert(seeded(1, true, Some(description.clone()), "NORMAL"));
        f.svc.notify_users(1).await.unwrap();

        let sent = f.dispatcher.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].data.message.chars().count(), 100);
        assert_eq!(sent[0].data.message, description[..100]);
        assert_eq!(sent[0].data.title, "promo 1");
    }

    #[tokio::test]
    async fn notify_without_description_sends_empty_message() {
        let f = fixture();
        f.repo.insert(seeded(1, true, None, "NORMAL"));
        f.svc.notify_users(1).await.unwrap();
        assert_eq!(f.dispatcher.sent()[0].data.message, "");
    }

    #[tokio::test]
    async fn notify_maps_priority_to_type_and_broadcasts() {
        let f = fixture();
        f.repo.insert(seeded(1, true, None, "NORMAL"));
        f.repo.insert(seeded(2, true, None, "HIGH"));
        f.repo.insert(seeded(3, true, None, "bogus"));
        for id in 1..=3 {
            f.svc.notify_users(id).await.unwrap();
        }
        let sent = f.dispatcher.sent();
        let kinds: Vec<NotificationType> = sent.iter().map(|n| n.data.kind).collect();
        assert_eq!(kinds, vec![NotificationType::Promotion, NotificationType::Alert, NotificationType::Promotion]);
        assert!(sent.iter().all(|n| n.to == BROADCAST_TOPIC));
    }

    #[tokio::test]
    async fn notify_propagates_dispatch_failure() {
        let f = fixture();
        f.repo.insert(seeded(1, true, None, "HIGH"));
        f.dispatcher.fail_with("fcm unreachable");
        let err = f.svc.notify_users(1).await.unwrap_err();
        match err {
            ServiceError::Dispatch(e) => assert!(e.to_string().contains("fcm unreachable")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn held_upload_service_is_usable() {
        let f = fixture();
        let stored = f.svc.uploads().upload("promotions", "banner.txt", b"hello").await.unwrap();
        assert!(stored.path.starts_with("promotions/"));
        assert!(f.svc.uploads().remove(&stored.path).await.unwrap());
    }
}
