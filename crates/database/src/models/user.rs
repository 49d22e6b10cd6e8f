// database/models/user.rs - model for the users collection
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::index::IndexSpec;

pub const COLLECTION: &str = "users";

/// Membership record of a user in a guild.
///
/// There is at most one document per `(user_id, guild_id)` pair; the unique
/// index declared in [`indexes`] enforces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserModel {
    pub user_id: i64,
    pub username: String,
    pub guild_id: i64,
    pub join_date: DateTime,
    #[serde(default)]
    pub roles: Vec<String>,
    pub last_activity: DateTime,
}

pub fn indexes() -> Vec<IndexSpec> {
    vec![
        IndexSpec::compound(&["user_id", "guild_id"]).unique(),
        IndexSpec::descending("join_date"),
        IndexSpec::descending("last_activity"),
    ]
}
