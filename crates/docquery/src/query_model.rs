//! Query models and their field descriptors.
//!
//! A query model is a plain struct whose annotated fields carry the user's
//! search input. `#[query("...")]` says how each field is compiled:
//!
//! - `query` (or `must`, `should`, `must.term`, ...) - full-text input,
//!   matched against the document's must/should fields
//! - `filter` - exact value, matched against the document's filter fields
//!
//! `name=` narrows matching to document fields with the same override name;
//! `type=` (or `role=`) replaces the positional role.

use crate::annotation::FieldAnnotation;
use crate::error::{Error, Result};
use crate::shape::{Mapped, Shape};
use crate::value::FieldValue;

/// A type whose instances can be compiled into a query.
///
/// Usually derived with `#[derive(Mapped, QueryModel)]`.
///
/// # Manual Implementation
///
/// ```
/// use docquery::{FieldValue, IntoFieldValue, Mapped, Member, QueryModel, RecordShape, Shape};
///
/// struct Search {
///     text: String,
///     brand: Option<String>,
/// }
///
/// impl Mapped for Search {
///     fn shape() -> Shape {
///         Shape::Record(RecordShape::of::<Search>(|| {
///             vec![
///                 Member::new("text", <String as Mapped>::shape).query("query"),
///                 Member::new("brand", <Option<String> as Mapped>::shape).query("filter"),
///             ]
///         }))
///     }
/// }
///
/// impl QueryModel for Search {
///     fn field_value(&self, field: &str) -> FieldValue<'_> {
///         match field {
///             "text" => self.text.field_value(),
///             "brand" => self.brand.field_value(),
///             _ => FieldValue::absent(),
///         }
///     }
/// }
/// ```
pub trait QueryModel: Mapped {
    /// Returns the runtime value of a field by its source name.
    fn field_value(&self, field: &str) -> FieldValue<'_>;

    /// Returns `false` for an absent model, which compiles to an empty query.
    fn is_present(&self) -> bool {
        true
    }
}

impl<Q: QueryModel> QueryModel for Option<Q> {
    fn field_value(&self, field: &str) -> FieldValue<'_> {
        match self {
            Some(q) => q.field_value(field),
            None => FieldValue::absent(),
        }
    }

    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(QueryModel::is_present)
    }
}

impl<Q: QueryModel + ?Sized> QueryModel for Box<Q> {
    fn field_value(&self, field: &str) -> FieldValue<'_> {
        (**self).field_value(field)
    }

    fn is_present(&self) -> bool {
        (**self).is_present()
    }
}

impl<Q: QueryModel + ?Sized> QueryModel for &Q {
    fn field_value(&self, field: &str) -> FieldValue<'_> {
        (**self).field_value(field)
    }

    fn is_present(&self) -> bool {
        (**self).is_present()
    }
}

/// How a query-model field is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRole {
    /// Full-text input for must/should document fields.
    Query,
    /// Exact value for filter document fields.
    Filter,
}

/// How one query-model field should be compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFieldDescriptor {
    source_field: String,
    role: String,
    name: Option<String>,
}

impl QueryFieldDescriptor {
    pub fn new(source_field: impl Into<String>, role: impl Into<String>) -> Self {
        QueryFieldDescriptor {
            source_field: source_field.into(),
            role: role.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The query struct field this descriptor reads.
    pub fn source_field(&self) -> &str {
        &self.source_field
    }

    /// The role as written, e.g. `"query"`, `"filter"` or `"must.term"`.
    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Classifies the role, or `None` if it is neither a query nor a filter.
    pub fn kind(&self) -> Option<QueryRole> {
        let role = self.role.as_str();
        if role == "filter" {
            Some(QueryRole::Filter)
        } else if role == "query" || role.starts_with("must") || role.starts_with("should") {
            Some(QueryRole::Query)
        } else {
            None
        }
    }
}

/// Builds the descriptors of every annotated member of a query record.
pub fn describe_query(shape: &Shape) -> Result<Vec<QueryFieldDescriptor>> {
    let record = shape.as_record().ok_or_else(|| Error::InvalidObjectType {
        type_name: shape.describe(),
    })?;

    let mut descriptors = Vec::new();
    for member in record.members() {
        let Some(tag) = member.query_tag() else {
            continue;
        };
        let annotation = FieldAnnotation::parse(tag);

        if annotation.positional().is_empty() {
            return Err(Error::SearchTypeNotSpecified {
                field: member.name().to_string(),
            });
        }
        let role = ["type", "role"]
            .iter()
            .find_map(|key| annotation.get(key).filter(|v| !v.is_empty()))
            .unwrap_or(annotation.positional());

        let mut descriptor = QueryFieldDescriptor::new(member.name(), role);
        if let Some(name) = annotation.get("name").filter(|n| !n.is_empty()) {
            descriptor = descriptor.with_name(name);
        }
        descriptors.push(descriptor);
    }

    Ok(descriptors)
}

/// Builds the query descriptors of `Q`.
pub fn describe_query_type<Q: Mapped + ?Sized>() -> Result<Vec<QueryFieldDescriptor>> {
    describe_query(&Q::shape())
}
