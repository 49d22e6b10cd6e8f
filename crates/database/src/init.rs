// database/init.rs - creates the bot collections and their indexes

use mongodb::{bson::Document, Database};
use tracing::{debug, info};

use crate::error::{
    command_code, SchemaError, INDEX_KEY_SPECS_CONFLICT, INDEX_OPTIONS_CONFLICT, NAMESPACE_EXISTS,
};
use crate::schema::{collection_names, manifest, CollectionSpec};

#[derive(Debug, Clone, Copy, Default)]
pub struct InitOptions {
    /// Ask the server for background index builds. Servers from 4.2 on
    /// ignore the flag and always use their optimized build process.
    pub background: bool,
}

/// Outcome of a successful [`initialize`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    /// Collections that did not exist before this run.
    pub created: Vec<String>,
    /// Collections that were already present.
    pub existing: Vec<String>,
    /// Declared indexes as `collection.index`.
    pub indexes: Vec<String>,
}

/// Creates a collection, returning `false` if it already existed.
pub async fn create_collection(database: &Database, name: &str) -> Result<bool, SchemaError> {
    match database.create_collection(name, None).await {
        Ok(()) => {
            debug!("Created collection {}", name);
            Ok(true)
        }
        Err(e) if command_code(&e) == Some(NAMESPACE_EXISTS) => {
            debug!("Collection {} already exists", name);
            Ok(false)
        }
        Err(source) => Err(SchemaError::CreateCollection {
            collection: name.to_string(),
            source,
        }),
    }
}

/// Declares every index of `spec`. Re-declaring an identical index is a
/// no-op on the server; a declaration that clashes with an existing index
/// of the same name or keys is returned as [`SchemaError::IndexConflict`].
pub async fn create_indexes(
    database: &Database,
    spec: &CollectionSpec,
    options: &InitOptions,
) -> Result<Vec<String>, SchemaError> {
    let collection = database.collection::<Document>(spec.name);
    let mut names = Vec::with_capacity(spec.indexes.len());

    for index in &spec.indexes {
        let name = index.name();
        match collection.create_index(index.to_model(options), None).await {
            Ok(result) => {
                debug!("Declared index {} on {}", result.index_name, spec.name);
                names.push(result.index_name);
            }
            Err(source)
                if matches!(
                    command_code(&source),
                    Some(INDEX_OPTIONS_CONFLICT | INDEX_KEY_SPECS_CONFLICT)
                ) =>
            {
                return Err(SchemaError::IndexConflict {
                    collection: spec.name.to_string(),
                    index: name,
                    source,
                });
            }
            Err(source) => {
                return Err(SchemaError::CreateIndex {
                    collection: spec.name.to_string(),
                    index: name,
                    source,
                });
            }
        }
    }

    Ok(names)
}

/// Brings `database` up to the bot schema. Each collection is created
/// before its indexes; running it again against an initialized database
/// changes nothing.
pub async fn initialize(
    database: &Database,
    options: &InitOptions,
) -> Result<InitReport, SchemaError> {
    let mut report = InitReport::default();

    for spec in manifest() {
        if create_collection(database, spec.name).await? {
            report.created.push(spec.name.to_string());
        } else {
            report.existing.push(spec.name.to_string());
        }

        for index in create_indexes(database, &spec, options).await? {
            report.indexes.push(format!("{}.{}", spec.name, index));
        }
    }

    info!("Database initialization completed successfully!");
    info!("Collections created: {}", collection_names().join(", "));
    info!("Indexes created for optimal performance");

    Ok(report)
}

/// Drops the whole database, used to reset a development volume.
pub async fn drop_database(database: &Database) -> Result<(), SchemaError> {
    database
        .drop(None)
        .await
        .map_err(|source| SchemaError::DropDatabase {
            database: database.name().to_string(),
            source,
        })
}
