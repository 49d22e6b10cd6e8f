// database/lib.rs - schema manifest, models and initialization for the discord_bot database

pub mod error;
pub mod index;
pub mod init;
pub mod models;
pub mod schema;
pub mod verify;

pub use error::SchemaError;
pub use init::{initialize, InitOptions, InitReport};
pub use schema::{manifest, CollectionSpec, DATABASE_NAME};
pub use verify::{verify, SchemaReport};
