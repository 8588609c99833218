//! Document field descriptors.
//!
//! A [`DocumentFieldDescriptor`] records how one indexed field takes part in
//! queries: its clause role, its matching strategy, an optional boost and an
//! optional language restriction.
//!
//! Roles default from the mapping: text fields are matched (`must`),
//! everything else is filtered. A `#[search("...")]` annotation overrides
//! that:
//!
//! ```text
//! #[search("must.term, boost=3, lang=ru, name=caption")]
//!           ^^^^ ^^^^  ^^^^^^^  ^^^^^^^  ^^^^^^^^^^^^
//!           role  |    weight   language  override name used by queries
//!              strategy
//! ```

use std::fmt;

use crate::annotation::FieldAnnotation;
use crate::error::{Error, Result};
use crate::mapping::{infer_member, FieldType, MappingType, Visited};
use crate::shape::{Mapped, Shape};

/// The boolean clause a document field contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Filter,
    Must,
    Should,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Filter => "filter",
            Role::Must => "must",
            Role::Should => "should",
        }
    }

    /// Returns `true` for the roles that take part in full-text matching.
    pub fn is_query(self) -> bool {
        matches!(self, Role::Must | Role::Should)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a query value is matched against a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Exact `term` query; selected with a `.term` role suffix.
    Term,
    /// Analyzed `multi_match` query.
    #[default]
    MultiMatch,
}

/// How one document field participates in queries.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentFieldDescriptor {
    field: String,
    name: Option<String>,
    role: Role,
    strategy: Strategy,
    boost: Option<u32>,
    language: Option<String>,
    mapping: MappingType,
}

impl DocumentFieldDescriptor {
    /// Creates a descriptor with the role implied by `mapping`.
    pub fn new(field: impl Into<String>, mapping: MappingType) -> Self {
        let role = if mapping.field_type() == Some(FieldType::Text) {
            Role::Must
        } else {
            Role::Filter
        };
        DocumentFieldDescriptor {
            field: field.into(),
            name: None,
            role,
            strategy: Strategy::default(),
            boost: None,
            language: None,
            mapping,
        }
    }

    pub fn with_role(mut self, role: Role, strategy: Strategy) -> Self {
        self.role = role;
        self.strategy = strategy;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_boost(mut self, boost: u32) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// The wire name of the field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The override name query fields refer to.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn boost(&self) -> Option<u32> {
        self.boost
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn mapping(&self) -> &MappingType {
        &self.mapping
    }

    /// Returns `true` if the field may be searched for `language`.
    pub fn accepts_language(&self, language: &str) -> bool {
        self.language.as_deref().map_or(true, |l| l == language)
    }

    fn apply_search_annotation(&mut self, tag: &str) -> Result<()> {
        let annotation = FieldAnnotation::parse(tag);

        if !annotation.positional().is_empty() {
            let (role, strategy) = parse_role(annotation.positional(), &self.field)?;
            self.role = role;
            self.strategy = strategy;
        }

        if let Some(name) = annotation.get("name").filter(|n| !n.is_empty()) {
            self.name = Some(name.to_string());
        }

        if let Some(raw) = annotation.get("boost") {
            let boost = raw
                .parse::<u32>()
                .ok()
                .filter(|b| *b > 0)
                .ok_or_else(|| Error::InvalidBoostParam {
                    field: self.field.clone(),
                    value: raw.to_string(),
                })?;
            self.boost = Some(boost);
        }

        if let Some(lang) = annotation.get("lang") {
            self.language = match lang {
                "" | "*" => None,
                code => Some(code.to_string()),
            };
        }

        Ok(())
    }
}

/// Splits `must.term` into role and strategy.
fn parse_role(value: &str, field: &str) -> Result<(Role, Strategy)> {
    let (role, strategy) = match value.split_once('.') {
        Some((role, "term")) => (role, Strategy::Term),
        Some(_) => {
            return Err(Error::UnknownRole {
                field: field.to_string(),
                role: value.to_string(),
            })
        }
        None => (value, Strategy::MultiMatch),
    };

    let role = match role {
        "filter" => Role::Filter,
        "must" => Role::Must,
        "should" => Role::Should,
        _ => {
            return Err(Error::UnknownRole {
                field: field.to_string(),
                role: value.to_string(),
            })
        }
    };

    Ok((role, strategy))
}

/// Builds the descriptors of every serialized member of a record.
///
/// Fails with [`Error::InvalidObjectType`] unless `shape` is a record,
/// possibly behind one optional level.
pub fn describe_document(shape: &Shape) -> Result<Vec<DocumentFieldDescriptor>> {
    let record = shape.as_record().ok_or_else(|| Error::InvalidObjectType {
        type_name: shape.describe(),
    })?;

    let mut descriptors = Vec::new();
    for member in record.members() {
        let Some(wire_name) = member.wire_name() else {
            continue;
        };

        let mut visited = Visited::new();
        visited.insert(record.id());
        let mapping = infer_member(&member.shape(), member.mapping_tag(), wire_name, &mut visited)?;

        let mut descriptor = DocumentFieldDescriptor::new(wire_name, mapping);
        if let Some(tag) = member.search_tag() {
            descriptor.apply_search_annotation(tag)?;
        }
        descriptors.push(descriptor);
    }

    Ok(descriptors)
}

/// Builds the document descriptors of `T`.
pub fn describe_document_type<T: Mapped + ?Sized>() -> Result<Vec<DocumentFieldDescriptor>> {
    describe_document(&T::shape())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Member, RecordShape};

    struct Item;

    impl Mapped for Item {
        fn shape() -> Shape {
            Shape::Record(RecordShape::of::<Item>(|| {
                vec![
                    Member::new("caption_ru", <String as Mapped>::shape)
                        .rename("CaptionRu")
                        .mapping("text,analyzer=russian")
                        .search("must, boost=2, lang=ru"),
                    Member::new("sku", <String as Mapped>::shape)
                        .mapping("keyword")
                        .search("must.term, name=code"),
                    Member::new("brand", <String as Mapped>::shape)
                        .mapping("keyword")
                        .search("filter, lang=*"),
                    Member::new("price", <f64 as Mapped>::shape),
                    Member::new("body", <String as Mapped>::shape),
                    Member::new("cache_key", <String as Mapped>::shape).elide(),
                ]
            }))
        }
    }

    // One-member record around a string field with the given annotations.
    macro_rules! caption_with {
        ($($method:ident($tag:literal)),+) => {{
            struct One;
            let shape = Shape::Record(RecordShape::of::<One>(|| {
                vec![Member::new("caption", <String as Mapped>::shape)$(.$method($tag))+]
            }));
            describe_document(&shape)
        }};
    }

    #[test]
    fn describes_members_in_order() {
        let descriptors = describe_document(&Item::shape()).unwrap();
        let fields: Vec<&str> = descriptors.iter().map(|d| d.field()).collect();
        assert_eq!(fields, ["CaptionRu", "sku", "brand", "price", "body"]);
    }

    #[test]
    fn annotation_sets_boost_and_language() {
        let descriptors = describe_document_type::<Item>().unwrap();
        let caption = &descriptors[0];
        assert_eq!(caption.role(), Role::Must);
        assert_eq!(caption.strategy(), Strategy::MultiMatch);
        assert_eq!(caption.boost(), Some(2));
        assert_eq!(caption.language(), Some("ru"));
        assert_eq!(caption.mapping().analyzer(), Some("russian"));
    }

    #[test]
    fn term_strategy_and_name() {
        let descriptors = describe_document_type::<Item>().unwrap();
        let sku = &descriptors[1];
        assert_eq!(sku.role(), Role::Must);
        assert_eq!(sku.strategy(), Strategy::Term);
        assert_eq!(sku.name(), Some("code"));
    }

    #[test]
    fn wildcard_language_is_unset() {
        let descriptors = describe_document_type::<Item>().unwrap();
        assert_eq!(descriptors[2].role(), Role::Filter);
        assert_eq!(descriptors[2].language(), None);
        assert!(descriptors[2].accepts_language("en"));
    }

    #[test]
    fn default_role_follows_mapping() {
        let descriptors = describe_document_type::<Item>().unwrap();
        assert_eq!(descriptors[3].role(), Role::Filter);
        assert_eq!(descriptors[4].role(), Role::Must);
        assert_eq!(descriptors[4].boost(), None);
    }

    #[test]
    fn non_positive_boost_is_rejected() {
        let results = [
            caption_with!(search("must,boost=0")),
            caption_with!(search("must,boost=-1")),
            caption_with!(search("must,boost=abc")),
            caption_with!(search("must,boost=")),
        ];
        for result in results {
            let err = result.unwrap_err();
            assert!(
                matches!(err, Error::InvalidBoostParam { ref field, .. } if field == "caption"),
                "{err}"
            );
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = caption_with!(search("maybe")).unwrap_err();
        assert!(matches!(err, Error::UnknownRole { .. }));

        let err = caption_with!(search("must.fuzzy")).unwrap_err();
        assert!(matches!(err, Error::UnknownRole { .. }));
    }

    #[test]
    fn unknown_mapping_type_is_rejected() {
        let err = caption_with!(mapping("varchar")).unwrap_err();
        assert!(matches!(err, Error::TypeUnknown { .. }));
    }

    #[test]
    fn explicit_mapping_changes_default_role() {
        let descriptors = caption_with!(mapping("keyword")).unwrap();
        assert_eq!(descriptors[0].role(), Role::Filter);

        let descriptors = caption_with!(mapping("keyword"), search("should")).unwrap();
        assert_eq!(descriptors[0].role(), Role::Should);
    }

    #[test]
    fn non_record_is_rejected() {
        let err = describe_document_type::<String>().unwrap_err();
        assert!(matches!(err, Error::InvalidObjectType { .. }));

        let err = describe_document_type::<Vec<Item>>().unwrap_err();
        assert!(matches!(err, Error::InvalidObjectType { .. }));
    }

    #[test]
    fn optional_record_is_accepted() {
        let descriptors = describe_document_type::<Option<Item>>().unwrap();
        assert_eq!(descriptors.len(), 5);
    }
}
