// database/index.rs - declarative index specs and their mapping to driver index models

use mongodb::{
    bson::{Bson, Document},
    options::IndexOptions,
    IndexModel,
};
use serde::Serialize;

use crate::init::InitOptions;

/// Key type of a single field inside an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Ascending,
    Descending,
    Text,
}

impl Order {
    fn key_value(self) -> Bson {
        match self {
            Order::Ascending => Bson::Int32(1),
            Order::Descending => Bson::Int32(-1),
            Order::Text => Bson::String("text".to_string()),
        }
    }

    // Value fragment used by the server when it derives a default index name
    fn name_fragment(self) -> &'static str {
        match self {
            Order::Ascending => "1",
            Order::Descending => "-1",
            Order::Text => "text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexField {
    pub name: &'static str,
    pub order: Order,
}

/// One index declared on a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSpec {
    pub fields: Vec<IndexField>,
    pub unique: bool,
}

impl IndexSpec {
    pub fn ascending(field: &'static str) -> Self {
        Self::compound(&[field])
    }

    pub fn descending(field: &'static str) -> Self {
        Self::with_order(&[field], Order::Descending)
    }

    /// Ascending index over an ordered combination of fields.
    pub fn compound(fields: &[&'static str]) -> Self {
        Self::with_order(fields, Order::Ascending)
    }

    /// Full-text index over the given string fields.
    pub fn text(fields: &[&'static str]) -> Self {
        Self::with_order(fields, Order::Text)
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    fn with_order(fields: &[&'static str], order: Order) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|&name| IndexField { name, order })
                .collect(),
            unique: false,
        }
    }

    pub fn is_text(&self) -> bool {
        self.fields.iter().any(|field| field.order == Order::Text)
    }

    /// Key document, e.g. `{ "user_id": 1, "guild_id": 1 }`.
    pub fn keys(&self) -> Document {
        let mut keys = Document::new();
        for field in &self.fields {
            keys.insert(field.name, field.order.key_value());
        }
        keys
    }

    /// Name the server assigns when none is given, e.g. `timestamp_-1`.
    pub fn name(&self) -> String {
        self.fields
            .iter()
            .map(|field| format!("{}_{}", field.name, field.order.name_fragment()))
            .collect::<Vec<_>>()
            .join("_")
    }

    pub fn to_model(&self, init: &InitOptions) -> IndexModel {
        let options = IndexOptions::builder()
            .name(self.name())
            .unique(self.unique.then_some(true))
            .background(init.background.then_some(true))
            .build();

        IndexModel::builder()
            .keys(self.keys())
            .options(options)
            .build()
    }
}
