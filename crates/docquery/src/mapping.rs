//! Mapping type inference.
//!
//! [`infer`] walks a [`Shape`] and produces the search-engine mapping for it.
//! Records become `properties`, wrappers are unwrapped, maps are opaque
//! objects, and primitives follow a fixed table:
//!
//! | Rust type | Mapping |
//! |-----------|---------|
//! | `String`, `str` | `text` |
//! | `bool` | `boolean` |
//! | `i8` / `i16` / `i32` | `byte` / `short` / `integer` |
//! | `i64`, `isize` | `long` |
//! | `f32` / `f64` | `float` / `double` |
//! | any unsigned integer | `unsigned_long` |
//! | anything else | `keyword` |
//!
//! A member's `#[mapping("...")]` annotation replaces the inferred type.

use std::any::TypeId;
use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value as Json};

use crate::annotation::FieldAnnotation;
use crate::error::{Error, Result};
use crate::shape::{Mapped, Primitive, Shape};

/// Search-engine field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Keyword,
    Text,
    Object,
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    UnsignedLong,
}

impl FieldType {
    /// The name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Keyword => "keyword",
            FieldType::Text => "text",
            FieldType::Object => "object",
            FieldType::Boolean => "boolean",
            FieldType::Byte => "byte",
            FieldType::Short => "short",
            FieldType::Integer => "integer",
            FieldType::Long => "long",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::UnsignedLong => "unsigned_long",
        }
    }

    /// Parses a wire name. Matching is case-insensitive.
    pub fn parse(name: &str) -> Option<Self> {
        let ty = match name.to_ascii_lowercase().as_str() {
            "keyword" => FieldType::Keyword,
            "text" => FieldType::Text,
            "object" => FieldType::Object,
            "boolean" => FieldType::Boolean,
            "byte" => FieldType::Byte,
            "short" => FieldType::Short,
            "integer" => FieldType::Integer,
            "long" => FieldType::Long,
            "float" => FieldType::Float,
            "double" => FieldType::Double,
            "unsigned_long" => FieldType::UnsignedLong,
            _ => return None,
        };
        Some(ty)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Primitive> for FieldType {
    fn from(p: Primitive) -> Self {
        match p {
            Primitive::Text => FieldType::Text,
            Primitive::Bool => FieldType::Boolean,
            Primitive::I8 => FieldType::Byte,
            Primitive::I16 => FieldType::Short,
            Primitive::I32 => FieldType::Integer,
            Primitive::I64 => FieldType::Long,
            Primitive::F32 => FieldType::Float,
            Primitive::F64 => FieldType::Double,
            Primitive::Unsigned => FieldType::UnsignedLong,
        }
    }
}

/// The mapping of one field, or of a whole record.
///
/// `properties` is only ever set when `field_type` is unset or
/// [`FieldType::Object`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingType {
    field_type: Option<FieldType>,
    properties: Option<Vec<(String, MappingType)>>,
    analyzer: Option<String>,
}

impl MappingType {
    /// A leaf mapping of the given type.
    pub fn of(field_type: FieldType) -> Self {
        MappingType {
            field_type: Some(field_type),
            ..Default::default()
        }
    }

    /// A record mapping with the given properties and no explicit type.
    pub fn record(properties: Vec<(String, MappingType)>) -> Self {
        MappingType {
            field_type: None,
            properties: Some(properties),
            analyzer: None,
        }
    }

    pub fn with_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    pub fn field_type(&self) -> Option<FieldType> {
        self.field_type
    }

    pub fn properties(&self) -> Option<&[(String, MappingType)]> {
        self.properties.as_deref()
    }

    /// Looks up a direct property by wire name.
    pub fn property(&self, name: &str) -> Option<&MappingType> {
        self.properties
            .as_ref()?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| m)
    }

    pub fn analyzer(&self) -> Option<&str> {
        self.analyzer.as_deref()
    }

    /// Wire form: `{"type"?: t, "analyzer"?: a, "properties"?: {...}}`.
    pub fn to_json(&self) -> Json {
        let mut obj = Map::new();
        if let Some(ty) = self.field_type {
            obj.insert("type".into(), json!(ty.as_str()));
        }
        if let Some(analyzer) = &self.analyzer {
            obj.insert("analyzer".into(), json!(analyzer));
        }
        if let Some(props) = &self.properties {
            let props: Map<String, Json> = props
                .iter()
                .map(|(name, mapping)| (name.clone(), mapping.to_json()))
                .collect();
            obj.insert("properties".into(), Json::Object(props));
        }
        Json::Object(obj)
    }
}

impl Serialize for MappingType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Record identities already expanded during one inference.
pub type Visited = HashSet<TypeId>;

/// Infers the mapping for `shape`.
///
/// Records already present in `visited` collapse to `{type: object}`, which
/// stops recursion through self-referential types. Records stay in the set
/// once added, so a record type is expanded at its first occurrence only.
pub fn infer(shape: &Shape, visited: &mut Visited) -> Result<MappingType> {
    match shape {
        Shape::Record(record) => {
            if !visited.insert(record.id()) {
                return Ok(MappingType::of(FieldType::Object));
            }
            let mut properties = Vec::new();
            for member in record.members() {
                let Some(wire_name) = member.wire_name() else {
                    continue;
                };
                let mapping =
                    infer_member(&member.shape(), member.mapping_tag(), wire_name, visited)?;
                properties.push((wire_name.to_string(), mapping));
            }
            Ok(MappingType::record(properties))
        }
        Shape::Sequence(inner) | Shape::Optional(inner) | Shape::Reference(inner) => {
            infer(&inner(), visited)
        }
        Shape::Map => Ok(MappingType::of(FieldType::Object)),
        Shape::Primitive(p) => Ok(MappingType::of((*p).into())),
        Shape::Other => Ok(MappingType::of(FieldType::Keyword)),
    }
}

/// Infers the mapping of one record member, honouring its mapping
/// annotation.
///
/// An explicit type name replaces inference entirely; `analyzer=` is applied
/// on top of whichever type results.
pub fn infer_member(
    shape: &Shape,
    tag: Option<&str>,
    field: &str,
    visited: &mut Visited,
) -> Result<MappingType> {
    let annotation = tag.map(FieldAnnotation::parse).unwrap_or_default();

    let mut mapping = match annotation.positional() {
        "" => infer(shape, visited)?,
        name => {
            let field_type = FieldType::parse(name).ok_or_else(|| Error::TypeUnknown {
                field: field.to_string(),
                name: name.to_string(),
            })?;
            MappingType::of(field_type)
        }
    };

    if let Some(analyzer) = annotation.get("analyzer").filter(|a| !a.is_empty()) {
        mapping.analyzer = Some(analyzer.to_string());
    }

    Ok(mapping)
}

/// Infers the mapping for a type.
pub fn infer_type<T: Mapped + ?Sized>() -> Result<MappingType> {
    infer(&T::shape(), &mut Visited::new())
}
