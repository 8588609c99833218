//! Docquery - declarative search-document compiler.
//!
//! Docquery derives search-engine index mappings from annotated Rust structs
//! and compiles annotated query structs into boolean queries for
//! Elasticsearch-compatible engines. It does not talk to the engine: the
//! output is a JSON tree for whatever transport you use.
//!
//! - Mapping inference: primitives, wrappers, maps and nested records, with
//!   cycle protection for self-referential types
//! - Document descriptors: per-field role (filter / must / should), match
//!   strategy, boost and language
//! - Query compilation: term, multi-match and dis-max composition per clause
//! - Canonical JSON for every node, plus search, mapping and multi-search
//!   envelopes
//!
//! # Quick Start
//!
//! ```rust
//! use docquery::{compile, IndexMapping, Mapped, QueryModel};
//! use serde::Serialize;
//!
//! #[derive(Serialize, Mapped)]
//! struct Product {
//!     #[serde(rename = "CaptionRu")]
//!     #[mapping("text, analyzer=russian")]
//!     #[search("must, boost=2, lang=ru")]
//!     caption_ru: String,
//!
//!     #[mapping("keyword")]
//!     brand: String,
//!
//!     #[serde(skip)]
//!     cache_key: u64,
//! }
//!
//! #[derive(Default, Mapped, QueryModel)]
//! struct ProductSearch {
//!     #[query("query")]
//!     text: String,
//!
//!     #[query("filter")]
//!     brand: Option<String>,
//! }
//!
//! let search = ProductSearch { text: "item".into(), ..Default::default() };
//! let query = compile::<Product, ProductSearch>(&search, "ru").unwrap();
//! assert_eq!(
//!     serde_json::to_string(&query).unwrap(),
//!     r#"{"bool":{"must":[{"multi_match":{"fields":["CaptionRu^2"],"query":"item"}}]}}"#
//! );
//!
//! let mapping = IndexMapping::for_type::<Product>().unwrap();
//! assert_eq!(
//!     serde_json::to_string(&mapping).unwrap(),
//!     r#"{"mappings":{"properties":{"CaptionRu":{"analyzer":"russian","type":"text"},"brand":{"type":"keyword"}}}}"#
//! );
//! ```
//!
//! # Annotations
//!
//! | Attribute | Grammar | Used by |
//! |-----------|---------|---------|
//! | `#[mapping("...")]` | `type[,analyzer=name]` | mapping inference |
//! | `#[search("...")]` | `role[.term][,boost=n][,lang=code][,name=override]` | document descriptors |
//! | `#[query("...")]` | `role[,type=t][,name=override]` | query descriptors |
//!
//! Wire names follow `#[serde(rename = "...")]`; `#[serde(skip)]` leaves a
//! field out of the mapping and the descriptors.
//!
//! Types without a derive can describe themselves by hand; see [`Mapped`]
//! and [`QueryModel`].

mod aggregation;
mod annotation;
mod compiler;
mod config;
mod document;
mod error;
mod mapping;
mod query;
mod query_model;
mod registry;
mod request;
mod shape;
mod value;

// Re-export public API
pub use aggregation::Aggregation;
pub use annotation::FieldAnnotation;
pub use compiler::{compile, QueryCompiler};
pub use config::CompilerOptions;
pub use document::{
    describe_document, describe_document_type, DocumentFieldDescriptor, Role, Strategy,
};
pub use error::{Error, Result};
pub use mapping::{infer, infer_member, infer_type, FieldType, MappingType, Visited};
pub use query::{
    BoolQuery, DisMaxQuery, ExistsQuery, MatchAllQuery, MultiMatchQuery, Query, TermQuery,
};
pub use query_model::{
    describe_query, describe_query_type, QueryFieldDescriptor, QueryModel, QueryRole,
};
pub use registry::DescriptorRegistry;
pub use request::{IndexMapping, MultiSearch, SearchRequest};
pub use shape::{Mapped, Member, Primitive, RecordShape, Shape, ShapeFn};
pub use value::{FieldValue, IntoFieldValue, Scalar, ToScalar};

#[cfg(feature = "derive")]
pub use docquery_macros::{Mapped, QueryModel};
