//! Derive macros for docquery.
//!
//! - [`Mapped`] - Generate the static member table that mapping inference and
//!   descriptor building read
//! - [`QueryModel`] - Generate the runtime field accessor used by the query
//!   compiler
//!
//! The annotation strings are copied verbatim into the generated code and
//! parsed by docquery at runtime. The macros only check that each annotation
//! is a single string literal and that the target is a non-generic struct
//! with named fields.

mod model;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Mapped` trait for a record type.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[mapping("type[,analyzer=name]")]` | Explicit index field type and analyzer |
/// | `#[search("role[.term][,boost=n][,lang=code][,name=x]")]` | Document search role |
/// | `#[query("role[,type=t][,name=x]")]` | Query-model role |
/// | `#[serde(rename = "...")]` | Wire name in the index |
/// | `#[serde(skip)]` | Leave the field out of mappings and descriptors |
///
/// A container-level `#[serde(rename_all = "...")]` applies to every field
/// without its own `rename`.
///
/// # Example
///
/// ```ignore
/// use docquery::{IndexMapping, Mapped};
///
/// #[derive(serde::Serialize, Mapped)]
/// struct Product {
///     #[serde(rename = "CaptionRu")]
///     #[mapping("text, analyzer=russian")]
///     #[search("must, boost=2, lang=ru")]
///     caption_ru: String,
///
///     #[mapping("keyword")]
///     brand: String,
/// }
///
/// let mapping = IndexMapping::for_type::<Product>()?;
/// ```
#[proc_macro_derive(Mapped, attributes(mapping, search, query))]
pub fn mapped_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::mapped_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derives the `QueryModel` trait for a query struct.
///
/// Generates `field_value`, which returns the value of every `#[query(...)]`
/// field by its Rust name and an absent value for anything else. The type
/// must also implement `Mapped`, usually through `#[derive(Mapped)]`.
///
/// Field types must implement `IntoFieldValue`: strings, numbers, `bool`,
/// `char`, and `Option` or `Vec` of those.
///
/// # Example
///
/// ```ignore
/// use docquery::{Mapped, QueryModel};
///
/// #[derive(Default, Mapped, QueryModel)]
/// struct ProductSearch {
///     #[query("query")]
///     text: String,
///
///     #[query("filter, name=brand")]
///     brands: Vec<String>,
/// }
/// ```
#[proc_macro_derive(QueryModel, attributes(query))]
pub fn query_model_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::query_model_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
