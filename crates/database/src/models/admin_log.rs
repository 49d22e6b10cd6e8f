// database/models/admin_log.rs - model for the admin_logs collection
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::index::IndexSpec;

pub const COLLECTION: &str = "admin_logs";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLogModel {
    pub admin_id: i64,
    pub admin_username: String,
    pub action: String,
    pub target_id: Option<i64>,
    pub target_username: Option<String>,
    pub reason: Option<String>,
    pub guild_id: Option<i64>,
    pub timestamp: DateTime,
}

pub fn indexes() -> Vec<IndexSpec> {
    vec![
        IndexSpec::ascending("admin_id"),
        IndexSpec::ascending("guild_id"),
        IndexSpec::descending("timestamp"),
        IndexSpec::ascending("action"),
    ]
}
