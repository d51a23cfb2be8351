use sea_orm::{entity::prelude::*, Set, DatabaseConnection, ActiveModelTrait};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

/// Marketing message shown to users and optionally pushed to them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "promotion")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub active: bool,
    /// Stored priority code, see [`Priority`].
    #[sea_orm(column_type = "Text")]
    pub priority: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

/// Known priority codes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    #[default]
    Normal,
    High,
}

impl Priority {
    pub const fn code(self) -> &'static str {
        match self {
            Priority::Normal => "NORMAL",
            Priority::High => "HIGH",
        }
    }

    /// Exact match on the stored code; anything else is unrecognized.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "NORMAL" => Some(Priority::Normal),
            "HIGH" => Some(Priority::High),
            _ => None,
        }
    }
}

impl Model {
    pub fn priority_kind(&self) -> Option<Priority> { Priority::from_code(&self.priority) }
}

pub fn validate_title(title: Option<&str>) -> Result<&str, errors::ModelError> {
    match title {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(errors::ModelError::Validation("title can not be null or empty".into())),
    }
}

pub async fn create(
    db: &DatabaseConnection,
    title: &str,
    description: Option<&str>,
    active: bool,
    priority: &str,
) -> Result<Model, errors::ModelError> {
    let title = validate_title(Some(title))?;
    let now = Utc::now().into();
    let am = ActiveModel {
        title: Set(title.to_string()),
        description: Set(description.map(str::to_string)),
        active: Set(active),
        priority: Set(priority.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
