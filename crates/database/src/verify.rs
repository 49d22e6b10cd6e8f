// database/verify.rs - compares a live database against the schema manifest

use std::collections::HashSet;
use std::fmt;

use futures::TryStreamExt;
use mongodb::{
    bson::{Bson, Document},
    Database, IndexModel,
};
use tracing::{debug, warn};

use crate::error::SchemaError;
use crate::index::IndexSpec;
use crate::schema::{manifest, CollectionSpec};

// Created by the server on every collection
const ID_INDEX: &str = "_id_";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexRef {
    pub collection: String,
    pub index: String,
}

impl IndexRef {
    fn new(collection: &str, index: impl Into<String>) -> Self {
        Self {
            collection: collection.to_string(),
            index: index.into(),
        }
    }
}

impl fmt::Display for IndexRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.collection, self.index)
    }
}

/// Differences between a live database and the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub missing_collections: Vec<String>,
    pub missing_indexes: Vec<IndexRef>,
    pub unexpected_indexes: Vec<IndexRef>,
    /// Indexes present under the declared name whose keys differ.
    pub key_mismatches: Vec<IndexRef>,
    /// Indexes present under the declared name whose uniqueness differs.
    pub uniqueness_mismatches: Vec<IndexRef>,
}

impl SchemaReport {
    pub fn is_clean(&self) -> bool {
        self.missing_collections.is_empty()
            && self.missing_indexes.is_empty()
            && self.unexpected_indexes.is_empty()
            && self.key_mismatches.is_empty()
            && self.uniqueness_mismatches.is_empty()
    }

    pub fn ensure_clean(self) -> Result<(), SchemaError> {
        if self.is_clean() {
            Ok(())
        } else {
            Err(SchemaError::Drift(self.to_string()))
        }
    }

    fn compare_indexes(&mut self, spec: &CollectionSpec, live: &[IndexModel]) {
        let mut named: Vec<LiveIndex<'_>> = Vec::with_capacity(live.len());
        for model in live {
            match model.options.as_ref().and_then(|o| o.name.clone()) {
                Some(name) if name == ID_INDEX => {}
                Some(name) => named.push(LiveIndex { name, model }),
                None => {
                    warn!("Index on {} without a name: {}", spec.name, model.keys);
                    self.unexpected_indexes
                        .push(IndexRef::new(spec.name, model.keys.to_string()));
                }
            }
        }

        let declared: HashSet<String> = spec.indexes.iter().map(|index| index.name()).collect();

        for index in &spec.indexes {
            let name = index.name();
            let Some(found) = named.iter().find(|live| live.name == name) else {
                self.missing_indexes.push(IndexRef::new(spec.name, name));
                continue;
            };
            if !found.keys_match(index) {
                self.key_mismatches.push(IndexRef::new(spec.name, name.clone()));
            }
            if found.unique() != index.unique {
                self.uniqueness_mismatches.push(IndexRef::new(spec.name, name));
            }
        }

        for live in named {
            if !declared.contains(&live.name) {
                self.unexpected_indexes.push(IndexRef::new(spec.name, live.name));
            }
        }
    }
}

struct LiveIndex<'a> {
    name: String,
    model: &'a IndexModel,
}

impl LiveIndex<'_> {
    fn unique(&self) -> bool {
        self.model
            .options
            .as_ref()
            .and_then(|o| o.unique)
            .unwrap_or(false)
    }

    // The server stores text indexes under `_fts`/`_ftsx` keys and lists the
    // indexed fields in `weights`, so those are compared by field set.
    fn keys_match(&self, index: &IndexSpec) -> bool {
        if index.is_text() {
            let weighted: HashSet<&str> = self
                .model
                .options
                .as_ref()
                .and_then(|o| o.weights.as_ref())
                .map(|weights| weights.keys().map(String::as_str).collect())
                .unwrap_or_default();
            let declared: HashSet<&str> = index.fields.iter().map(|field| field.name).collect();
            return weighted == declared;
        }

        let declared = index.keys();
        self.model.keys.len() == declared.len()
            && self
                .model
                .keys
                .iter()
                .zip(declared.iter())
                .all(|((live_field, live), (field, value))| {
                    live_field == field && same_key_value(live, value)
                })
    }
}

// Shells may store directions as doubles or longs
fn same_key_value(live: &Bson, declared: &Bson) -> bool {
    fn direction(value: &Bson) -> Option<f64> {
        match value {
            Bson::Int32(v) => Some(f64::from(*v)),
            Bson::Int64(v) => Some(*v as f64),
            Bson::Double(v) => Some(*v),
            _ => None,
        }
    }

    match (direction(live), direction(declared)) {
        (Some(live), Some(declared)) => live == declared,
        _ => live == declared,
    }
}

impl fmt::Display for SchemaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "schema matches");
        }

        let mut parts = Vec::new();
        if !self.missing_collections.is_empty() {
            parts.push(format!(
                "missing collections [{}]",
                self.missing_collections.join(", ")
            ));
        }
        for (label, refs) in [
            ("missing indexes", &self.missing_indexes),
            ("unexpected indexes", &self.unexpected_indexes),
            ("key mismatches", &self.key_mismatches),
            ("uniqueness mismatches", &self.uniqueness_mismatches),
        ] {
            if !refs.is_empty() {
                let names: Vec<String> = refs.iter().map(IndexRef::to_string).collect();
                parts.push(format!("{} [{}]", label, names.join(", ")));
            }
        }
        write!(f, "{}", parts.join("; "))
    }
}

/// Reads back collections and indexes and reports every deviation from the
/// manifest. Only reads; never changes the database.
pub async fn verify(database: &Database) -> Result<SchemaReport, SchemaError> {
    let existing: HashSet<String> = database
        .list_collection_names(None)
        .await?
        .into_iter()
        .collect();

    let mut report = SchemaReport::default();

    for spec in manifest() {
        if !existing.contains(spec.name) {
            warn!("Collection {} is missing", spec.name);
            report.missing_collections.push(spec.name.to_string());
            continue;
        }

        let live: Vec<IndexModel> = database
            .collection::<Document>(spec.name)
            .list_indexes(None)
            .await?
            .try_collect()
            .await?;
        debug!("Found {} indexes on {}", live.len(), spec.name);

        report.compare_indexes(&spec, &live);
    }

    Ok(report)
}
