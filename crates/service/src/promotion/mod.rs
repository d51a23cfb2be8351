//! Promotion management: persistence abstraction and the application service.

pub mod repository;
pub mod service;

use serde::{Deserialize, Serialize};

pub use repository::{PromotionRepository, SeaOrmPromotionRepository};
pub use service::PromotionService;

fn default_priority() -> String { models::promotion::Priority::Normal.code().to_string() }

/// Input of a save: no `id` creates a promotion, an `id` overwrites that promotion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionDraft {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub active: bool,
    /// Priority code; not validated on save.
    #[serde(default = "default_priority")]
    pub priority: String,
}

impl PromotionDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self { id: None, title: Some(title.into()), description: None, active: false, priority: default_priority() }
    }
}

impl From<models::promotion::Model> for PromotionDraft {
    fn from(m: models::promotion::Model) -> Self {
        Self { id: Some(m.id), title: Some(m.title), description: m.description, active: m.active, priority: m.priority }
    }
}

#[cfg(test)]
mod tests {
    use super::PromotionDraft;

    #[test]
    fn deserialize_fills_defaults() {
        let d: PromotionDraft = serde_json::from_str(r#"{"title":"Sale"}"#).unwrap();
        assert_eq!(d, PromotionDraft::new("Sale"));
        assert_eq!(d.priority, "NORMAL");
        assert!(!d.active);
    }

    #[test]
    fn deserialize_keeps_unknown_priority_codes() {
        let d: PromotionDraft = serde_json::from_str(r#"{"id":3,"title":"x","priority":"URGENT","active":true}"#).unwrap();
        assert_eq!(d.id, Some(3));
        assert_eq!(d.priority, "URGENT");
        assert!(d.active);
    }
}
