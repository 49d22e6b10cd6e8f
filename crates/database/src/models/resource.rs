// database/models/resource.rs - model for the resources collection
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::index::IndexSpec;

pub const COLLECTION: &str = "resources";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceModel {
    pub user_id: i64,
    pub username: String,
    pub title: String,
    pub content: String,
    pub url: Option<String>,
    pub guild_id: Option<i64>,
    pub timestamp: DateTime,
}

pub fn indexes() -> Vec<IndexSpec> {
    vec![
        IndexSpec::ascending("user_id"),
        IndexSpec::ascending("guild_id"),
        IndexSpec::descending("timestamp"),
        // Backs `$text` searches over shared resources
        IndexSpec::text(&["title", "content"]),
    ]
}
