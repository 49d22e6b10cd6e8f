// database/models/bug_report.rs - model for the bug_reports collection
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::index::IndexSpec;

pub const COLLECTION: &str = "bug_reports";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugReportModel {
    pub user_id: i64,
    pub username: String,
    pub description: String,
    pub guild_id: i64,
    pub status: String,
    pub timestamp: DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

pub fn indexes() -> Vec<IndexSpec> {
    vec![
        IndexSpec::ascending("user_id"),
        IndexSpec::ascending("guild_id"),
        IndexSpec::ascending("status"),
        IndexSpec::descending("timestamp"),
    ]
}
