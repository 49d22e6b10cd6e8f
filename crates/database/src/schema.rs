// database/schema.rs - the full collection and index manifest of the bot database

use serde::Serialize;

use crate::index::IndexSpec;
use crate::models::{admin_log, bug_report, resource, role_request, user};

/// Database every bot component reads and writes.
pub const DATABASE_NAME: &str = "discord_bot";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub indexes: Vec<IndexSpec>,
}

/// Collections in creation order, each with the indexes declared on it.
pub fn manifest() -> Vec<CollectionSpec> {
    vec![
        CollectionSpec {
            name: role_request::COLLECTION,
            indexes: role_request::indexes(),
        },
        CollectionSpec {
            name: admin_log::COLLECTION,
            indexes: admin_log::indexes(),
        },
        CollectionSpec {
            name: user::COLLECTION,
            indexes: user::indexes(),
        },
        CollectionSpec {
            name: bug_report::COLLECTION,
            indexes: bug_report::indexes(),
        },
        CollectionSpec {
            name: resource::COLLECTION,
            indexes: resource::indexes(),
        },
    ]
}

pub fn collection_names() -> Vec<&'static str> {
    manifest().iter().map(|spec| spec.name).collect()
}
