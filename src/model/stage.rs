use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use super::product::ProductStatus;
use super::project::ProjectStatus;

/// Reserved id prefix for synthetic rows the server emits so that an empty
/// product or project still occupies a row on the board.
pub const PLACEHOLDER_PREFIX: &str = "placeholder-";

/// A single denormalized row from the board endpoint: one work stage plus
/// the identity, status and ordering fields of its owning product and
/// project. The server is the source of truth for every order index here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRecord {
    /// Stage id; empty for stages not yet persisted
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "today", deserialize_with = "date_or_today")]
    pub start_date: NaiveDate,
    #[serde(default = "today", deserialize_with = "date_or_today")]
    pub end_date: NaiveDate,
    /// Position within the owning product's stage list
    #[serde(default)]
    pub order: Option<i64>,

    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    /// Position of the owning product within its project
    #[serde(default)]
    pub product_order: Option<i64>,
    #[serde(default)]
    pub product_status: ProductStatus,
    /// Concurrency-control version the server requires on product updates
    #[serde(default)]
    pub product_version: i64,

    pub project_id: String,
    #[serde(default)]
    pub project_name: String,
    /// Position of the owning project on the board
    #[serde(default)]
    pub project_order: Option<i64>,
    #[serde(default)]
    pub project_status: ProjectStatus,
    #[serde(default)]
    pub project_manager: Option<String>,
}

impl StageRecord {
    /// Placeholder rows represent "no real stages here" and are excluded
    /// from ordering, display and editing.
    pub fn is_placeholder(&self) -> bool {
        self.name.trim().is_empty() || self.id.starts_with(PLACEHOLDER_PREFIX)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Placeholder rows carry missing or junk dates; decode what parses and
/// substitute the current date as a non-displayed sentinel otherwise.
fn date_or_today<'de, D>(de: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    Ok(raw.as_deref().and_then(parse_wire_date).unwrap_or_else(today))
}

/// Accepts bare `YYYY-MM-DD` dates and timestamp strings with a date prefix.
fn parse_wire_date(s: &str) -> Option<NaiveDate> {
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
