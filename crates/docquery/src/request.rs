//! Request bodies handed to the transport.
//!
//! - [`IndexMapping`] - `{"mappings": {"properties": {...}}}` for index creation
//! - [`SearchRequest`] - `{"query": ..., "aggs"?: ..., "from"?: n, "size"?: n}`
//! - [`MultiSearch`] - newline-delimited header/body pairs for `_msearch`

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value as Json};

use crate::aggregation::Aggregation;
use crate::error::{Error, Result};
use crate::mapping::{infer_type, MappingType};
use crate::query::Query;
use crate::shape::Mapped;

/// The mapping document of an index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexMapping {
    root: MappingType,
}

impl IndexMapping {
    /// Infers the mapping of record type `T`.
    pub fn for_type<T: Mapped + ?Sized>() -> Result<Self> {
        let shape = T::shape();
        if shape.as_record().is_none() {
            return Err(Error::InvalidObjectType {
                type_name: shape.describe(),
            });
        }
        Ok(IndexMapping {
            root: infer_type::<T>()?,
        })
    }

    /// The inferred root mapping.
    pub fn root(&self) -> &MappingType {
        &self.root
    }

    pub fn to_json(&self) -> Json {
        json!({ "mappings": self.root.to_json() })
    }
}

impl Serialize for IndexMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// A search request body.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    query: Query,
    aggs: Vec<(String, Aggregation)>,
    from: Option<usize>,
    size: Option<usize>,
}

impl SearchRequest {
    pub fn new(query: impl Into<Query>) -> Self {
        SearchRequest {
            query: query.into(),
            aggs: Vec::new(),
            from: None,
            size: None,
        }
    }

    /// Adds a named aggregation. A later aggregation with the same name
    /// replaces the earlier one.
    pub fn aggregation(mut self, name: impl Into<String>, aggregation: Aggregation) -> Self {
        let name = name.into();
        self.aggs.retain(|(n, _)| *n != name);
        self.aggs.push((name, aggregation));
        self
    }

    /// Sets the number of hits to skip, rendered as `"from"`.
    pub fn offset(mut self, offset: usize) -> Self {
        self.from = Some(offset);
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn to_json(&self) -> Json {
        let mut body = Map::new();
        body.insert("query".into(), self.query.to_json());
        if !self.aggs.is_empty() {
            let aggs: Map<String, Json> = self
                .aggs
                .iter()
                .map(|(name, agg)| (name.clone(), agg.to_json()))
                .collect();
            body.insert("aggs".into(), Json::Object(aggs));
        }
        if let Some(from) = self.from {
            body.insert("from".into(), json!(from));
        }
        if let Some(size) = self.size {
            body.insert("size".into(), json!(size));
        }
        Json::Object(body)
    }
}

impl Serialize for SearchRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// A batch of searches against possibly different indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiSearch {
    searches: Vec<(String, SearchRequest)>,
}

impl MultiSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, index: impl Into<String>, request: SearchRequest) -> Self {
        self.searches.push((index.into(), request));
        self
    }

    pub fn len(&self) -> usize {
        self.searches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.searches.is_empty()
    }

    /// Renders the NDJSON body: one header line and one body line per
    /// search, each terminated by `\n`.
    pub fn to_ndjson(&self) -> Result<String> {
        let mut out = String::new();
        for (index, request) in &self.searches {
            out.push_str(&serde_json::to_string(&json!({ "index": index }))?);
            out.push('\n');
            out.push_str(&serde_json::to_string(request)?);
            out.push('\n');
        }
        Ok(out)
    }
}
