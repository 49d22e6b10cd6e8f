// database/error.rs - errors raised while creating or checking the schema

use mongodb::error::{Error as MongoError, ErrorKind};
use thiserror::Error;

// Server error codes the initializer reacts to
pub(crate) const NAMESPACE_EXISTS: i32 = 48;
pub(crate) const INDEX_OPTIONS_CONFLICT: i32 = 85;
pub(crate) const INDEX_KEY_SPECS_CONFLICT: i32 = 86;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to create collection {collection}: {source}")]
    CreateCollection {
        collection: String,
        #[source]
        source: MongoError,
    },

    #[error("index {index} on {collection} conflicts with an existing index: {source}")]
    IndexConflict {
        collection: String,
        index: String,
        #[source]
        source: MongoError,
    },

    #[error("failed to create index {index} on {collection}: {source}")]
    CreateIndex {
        collection: String,
        index: String,
        #[source]
        source: MongoError,
    },

    #[error("failed to drop database {database}: {source}")]
    DropDatabase {
        database: String,
        #[source]
        source: MongoError,
    },

    #[error("failed to inspect database: {0}")]
    Inspect(#[from] MongoError),

    #[error("schema drift detected: {0}")]
    Drift(String),
}

/// Server error code of a failed command, if the failure came from the server.
pub(crate) fn command_code(error: &MongoError) -> Option<i32> {
    match error.kind.as_ref() {
        ErrorKind::Command(command) => Some(command.code),
        _ => None,
    }
}
