//! Query compilation.
//!
//! [`QueryCompiler`] turns a query-model instance into a [`BoolQuery`] in a
//! single pass over the query descriptors. Every scalar visited is compiled
//! according to the field's role:
//!
//! **Query role.** The trimmed text is matched against document fields whose
//! role is `must` or `should`, whose language is unset or equal to the active
//! language, and, if the query field has a `name`, whose override name equals
//! it. Each clause (must, then should) is assembled separately:
//!
//! ```text
//! term fields only, one field     -> term
//! term fields only, several       -> dis_max[term, term, ...]
//! multi-match fields only         -> multi_match(fields with ^boost)
//! both strategies                 -> dis_max[term, ..., multi_match(all others)]
//! ```
//!
//! **Filter role.** The untrimmed text becomes one `term` in the filter clause
//! for every filter document field it matches, so a value that matches two
//! fields must be present in both. A document field matches when its override
//! name equals the query field's name (two unset names are equal), or when the
//! query field has no name and its source field equals the document wire name.

use tracing::{debug, trace};

use crate::config::CompilerOptions;
use crate::document::{DocumentFieldDescriptor, Role, Strategy};
use crate::error::Result;
use crate::query::{BoolQuery, DisMaxQuery, MultiMatchQuery, Query, TermQuery};
use crate::query_model::{QueryFieldDescriptor, QueryModel, QueryRole};
use crate::registry::DescriptorRegistry;
use crate::shape::Mapped;

/// Compiles query models into boolean queries.
///
/// # Example
///
/// ```
/// use docquery::{
///     DocumentFieldDescriptor, FieldType, FieldValue, IntoFieldValue, Mapped, MappingType,
///     Member, QueryCompiler, QueryFieldDescriptor, QueryModel, RecordShape, Shape,
/// };
///
/// struct Search { text: String }
///
/// impl Mapped for Search {
///     fn shape() -> Shape {
///         Shape::Record(RecordShape::of::<Search>(|| {
///             vec![Member::new("text", <String as Mapped>::shape).query("query")]
///         }))
///     }
/// }
///
/// impl QueryModel for Search {
///     fn field_value(&self, field: &str) -> FieldValue<'_> {
///         match field {
///             "text" => self.text.field_value(),
///             _ => FieldValue::absent(),
///         }
///     }
/// }
///
/// let documents = vec![
///     DocumentFieldDescriptor::new("CaptionRu", MappingType::of(FieldType::Text))
///         .with_boost(2)
///         .with_language("ru"),
/// ];
/// let queries = vec![QueryFieldDescriptor::new("text", "query")];
///
/// let query = QueryCompiler::new().compile(
///     &Search { text: "item".into() },
///     "ru",
///     &queries,
///     &documents,
/// );
/// assert_eq!(
///     serde_json::to_string(&query).unwrap(),
///     r#"{"bool":{"must":[{"multi_match":{"fields":["CaptionRu^2"],"query":"item"}}]}}"#
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    options: CompilerOptions,
}

impl QueryCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CompilerOptions) -> Self {
        QueryCompiler { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compiles `query` against prebuilt descriptor lists.
    ///
    /// An absent model (see [`QueryModel::is_present`]) yields an empty
    /// query. An empty `language` falls back to the configured default.
    pub fn compile<Q: QueryModel + ?Sized>(
        &self,
        query: &Q,
        language: &str,
        query_fields: &[QueryFieldDescriptor],
        document_fields: &[DocumentFieldDescriptor],
    ) -> BoolQuery {
        let mut result = BoolQuery::new();
        if !query.is_present() {
            return result;
        }

        let language = match (language, &self.options.default_language) {
            ("", Some(default)) => default.as_str(),
            (language, _) => language,
        };

        for query_field in query_fields {
            let Some(kind) = query_field.kind() else {
                debug!(
                    field = query_field.source_field(),
                    role = query_field.role(),
                    "skipping field with unknown role"
                );
                continue;
            };

            let value = query.field_value(query_field.source_field());
            for scalar in value.scalars() {
                let text = scalar.to_text();
                match kind {
                    QueryRole::Query => {
                        self.visit_query(&mut result, text.trim(), language, query_field, document_fields)
                    }
                    QueryRole::Filter => {
                        visit_filter(&mut result, &text, query_field, document_fields)
                    }
                }
            }
        }

        result
    }

    /// Compiles `query` with descriptors of document type `D` and query type
    /// `Q` taken from `registry`.
    pub fn compile_for<D, Q>(
        &self,
        registry: &DescriptorRegistry,
        query: &Q,
        language: &str,
    ) -> Result<BoolQuery>
    where
        D: Mapped + ?Sized + 'static,
        Q: QueryModel + 'static,
    {
        let document_fields = registry.documents::<D>()?;
        let query_fields = registry.queries::<Q>()?;
        Ok(self.compile(query, language, &query_fields, &document_fields))
    }

    fn visit_query(
        &self,
        result: &mut BoolQuery,
        text: &str,
        language: &str,
        query_field: &QueryFieldDescriptor,
        document_fields: &[DocumentFieldDescriptor],
    ) {
        if text.is_empty() {
            trace!(field = query_field.source_field(), "empty query text");
            return;
        }

        let queryable: Vec<&DocumentFieldDescriptor> = document_fields
            .iter()
            .filter(|d| d.role().is_query() && d.accepts_language(language))
            .filter(|d| query_field.name().map_or(true, |name| d.name() == Some(name)))
            .collect();

        let must = self.clause_query(text, Role::Must, &queryable);
        let should = self.clause_query(text, Role::Should, &queryable);
        trace!(
            field = query_field.source_field(),
            queryable = queryable.len(),
            must = must.is_some(),
            should = should.is_some(),
            "compiled query field"
        );

        if let Some(q) = must {
            result.push_must(q);
        }
        if let Some(q) = should {
            result.push_should(q);
        }
    }

    /// Builds the single node a clause receives for `text`.
    fn clause_query(
        &self,
        text: &str,
        role: Role,
        queryable: &[&DocumentFieldDescriptor],
    ) -> Option<Query> {
        let (terms, matches): (Vec<&DocumentFieldDescriptor>, Vec<&DocumentFieldDescriptor>) =
            queryable
                .iter()
                .copied()
                .filter(|d| d.role() == role)
                .partition(|d| d.strategy() == Strategy::Term);

        match (terms.as_slice(), matches.is_empty()) {
            ([], true) => None,
            ([], false) => Some(self.multi_match(text, &matches).into()),
            ([single], true) => Some(term(single, text).into()),
            (terms, true) => {
                let dis_max = terms
                    .iter()
                    .fold(self.dis_max(), |dm, d| dm.query(term(d, text)));
                Some(dis_max.into())
            }
            (terms, false) => {
                let dis_max = terms
                    .iter()
                    .fold(self.dis_max(), |dm, d| dm.query(term(d, text)))
                    .query(self.multi_match(text, &matches));
                Some(dis_max.into())
            }
        }
    }

    fn multi_match(&self, text: &str, fields: &[&DocumentFieldDescriptor]) -> MultiMatchQuery {
        let mut query = fields.iter().fold(MultiMatchQuery::new(text), |mm, d| {
            mm.field(d.field(), d.boost().unwrap_or(1))
        });
        if let Some(analyzer) = &self.options.analyzer {
            query = query.analyzer(analyzer.as_str());
        }
        if let Some(fuzziness) = &self.options.fuzziness {
            query = query.fuzziness(fuzziness.as_str());
        }
        query
    }

    fn dis_max(&self) -> DisMaxQuery {
        match self.options.tie_breaker {
            Some(t) => DisMaxQuery::new().tie_breaker(t),
            None => DisMaxQuery::new(),
        }
    }
}

fn term(field: &DocumentFieldDescriptor, text: &str) -> TermQuery {
    let query = TermQuery::new(field.field(), text);
    match field.boost() {
        Some(boost) if boost > 1 => query.boost(f64::from(boost)),
        _ => query,
    }
}

fn visit_filter(
    result: &mut BoolQuery,
    text: &str,
    query_field: &QueryFieldDescriptor,
    document_fields: &[DocumentFieldDescriptor],
) {
    for field in document_fields.iter().filter(|d| d.role() == Role::Filter) {
        let by_name = field.name() == query_field.name();
        let by_source = query_field.name().is_none() && query_field.source_field() == field.field();
        if by_name || by_source {
            trace!(field = field.field(), value = text, "filter term");
            result.push_filter(TermQuery::new(field.field(), text).into());
        }
    }
}

/// Compiles `query` with the process-wide registry and default options.
pub fn compile<D, Q>(query: &Q, language: &str) -> Result<BoolQuery>
where
    D: Mapped + ?Sized + 'static,
    Q: QueryModel + 'static,
{
    QueryCompiler::new().compile_for::<D, Q>(DescriptorRegistry::global(), query, language)
}
