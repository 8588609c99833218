//! Aggregation nodes.

use serde::{Serialize, Serializer};
use serde_json::{json, Value as Json};

/// Any aggregation node.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    /// Counts the values of a field: `{"value_count": {"field": f}}`.
    ValueCount { field: String },
}

impl Aggregation {
    pub fn value_count(field: impl Into<String>) -> Self {
        Aggregation::ValueCount {
            field: field.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Aggregation::ValueCount { field } => field.is_empty(),
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            Aggregation::ValueCount { field } => json!({ "value_count": { "field": field } }),
        }
    }
}

impl Serialize for Aggregation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
