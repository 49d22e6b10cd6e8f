// database/models/role_request.rs - model for the role_requests collection
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::index::IndexSpec;

pub const COLLECTION: &str = "role_requests";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRequestModel {
    pub user_id: i64,
    pub username: String,
    pub role_name: String,
    pub guild_id: i64,
    // pending, approved or denied
    pub status: String,
    pub timestamp: DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

// A user may request several roles in the same guild, so the pair is not unique
pub fn indexes() -> Vec<IndexSpec> {
    vec![
        IndexSpec::compound(&["user_id", "guild_id"]),
        IndexSpec::ascending("status"),
        IndexSpec::descending("timestamp"),
    ]
}
