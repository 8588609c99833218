//! Query nodes and their wire form.
//!
//! Each node renders to an object with a single key naming the query type:
//!
//! ```text
//! {"term":        {field: {"value": v, "boost"?: b}}}
//! {"multi_match": {"query": q, "fields"?: [...], "analyzer"?: a, "fuzziness"?: f}}
//! {"dis_max":     {"queries": [...], "tie_breaker"?: t}}
//! {"bool":        {"must"?: [...], "filter"?: [...], "should"?: [...], "must_not"?: [...]}}
//! {"match_all":   {"boost"?: b}}
//! {"exists":      {"field": f}}
//! ```
//!
//! Nodes render through [`serde_json::Value`], whose objects keep their keys
//! sorted, so the same tree always produces the same bytes.

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value as Json};

/// Any query node.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Term(TermQuery),
    MultiMatch(MultiMatchQuery),
    DisMax(DisMaxQuery),
    Bool(BoolQuery),
    MatchAll(MatchAllQuery),
    Exists(ExistsQuery),
}

impl Query {
    pub fn is_empty(&self) -> bool {
        match self {
            Query::Term(q) => q.is_empty(),
            Query::MultiMatch(q) => q.is_empty(),
            Query::DisMax(q) => q.is_empty(),
            Query::Bool(q) => q.is_empty(),
            Query::MatchAll(q) => q.is_empty(),
            Query::Exists(q) => q.is_empty(),
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            Query::Term(q) => q.to_json(),
            Query::MultiMatch(q) => q.to_json(),
            Query::DisMax(q) => q.to_json(),
            Query::Bool(q) => q.to_json(),
            Query::MatchAll(q) => q.to_json(),
            Query::Exists(q) => q.to_json(),
        }
    }
}

macro_rules! query_conversions {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        $(
            impl From<$ty> for Query {
                fn from(q: $ty) -> Self {
                    Query::$variant(q)
                }
            }

            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    self.to_json().serialize(serializer)
                }
            }
        )+
    };
}

query_conversions!(
    Term(TermQuery),
    MultiMatch(MultiMatchQuery),
    DisMax(DisMaxQuery),
    Bool(BoolQuery),
    MatchAll(MatchAllQuery),
    Exists(ExistsQuery),
);

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn wrap(kind: &str, body: Json) -> Json {
    let mut outer = Map::new();
    outer.insert(kind.to_string(), body);
    Json::Object(outer)
}

fn query_list(queries: &[Query]) -> Json {
    Json::Array(queries.iter().map(Query::to_json).collect())
}

/// Exact match of a single field value.
#[derive(Debug, Clone, PartialEq)]
pub struct TermQuery {
    field: String,
    value: String,
    boost: Option<f64>,
}

impl TermQuery {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        TermQuery {
            field: field.into(),
            value: value.into(),
            boost: None,
        }
    }

    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.field.is_empty()
    }

    pub fn to_json(&self) -> Json {
        let mut body = Map::new();
        body.insert("value".into(), json!(self.value));
        if let Some(boost) = self.boost {
            body.insert("boost".into(), json!(boost));
        }
        let mut inner = Map::new();
        inner.insert(self.field.clone(), Json::Object(body));
        wrap("term", Json::Object(inner))
    }
}

/// Analyzed match of one text against several fields.
///
/// Fields keep insertion order and render as `field` or `field^boost`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiMatchQuery {
    query: String,
    fields: Vec<(String, u32)>,
    analyzer: Option<String>,
    fuzziness: Option<String>,
}

impl MultiMatchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        MultiMatchQuery {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Adds a field with the given weight. A weight of 1 renders bare.
    pub fn field(mut self, name: impl Into<String>, boost: u32) -> Self {
        self.fields.push((name.into(), boost));
        self
    }

    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    pub fn fuzziness(mut self, fuzziness: impl Into<String>) -> Self {
        self.fuzziness = Some(fuzziness.into());
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn fields(&self) -> &[(String, u32)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    pub fn to_json(&self) -> Json {
        let mut body = Map::new();
        body.insert("query".into(), json!(self.query));
        if !self.fields.is_empty() {
            let fields: Vec<String> = self
                .fields
                .iter()
                .map(|(name, boost)| match boost {
                    0 | 1 => name.clone(),
                    b => format!("{}^{}", name, b),
                })
                .collect();
            body.insert("fields".into(), json!(fields));
        }
        if let Some(analyzer) = &self.analyzer {
            body.insert("analyzer".into(), json!(analyzer));
        }
        if let Some(fuzziness) = &self.fuzziness {
            body.insert("fuzziness".into(), json!(fuzziness));
        }
        wrap("multi_match", Json::Object(body))
    }
}

/// Scores a document by its best-matching subquery.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisMaxQuery {
    queries: Vec<Query>,
    tie_breaker: Option<f64>,
}

impl DisMaxQuery {
    pub fn new() -> Self {
        DisMaxQuery::default()
    }

    pub fn query(mut self, query: impl Into<Query>) -> Self {
        self.queries.push(query.into());
        self
    }

    pub fn tie_breaker(mut self, tie_breaker: f64) -> Self {
        self.tie_breaker = Some(tie_breaker);
        self
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn to_json(&self) -> Json {
        let mut body = Map::new();
        body.insert("queries".into(), query_list(&self.queries));
        if let Some(tie_breaker) = self.tie_breaker {
            body.insert("tie_breaker".into(), json!(tie_breaker));
        }
        wrap("dis_max", Json::Object(body))
    }
}

/// Boolean composition with four clause kinds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoolQuery {
    must: Vec<Query>,
    filter: Vec<Query>,
    should: Vec<Query>,
    must_not: Vec<Query>,
}

impl BoolQuery {
    pub fn new() -> Self {
        BoolQuery::default()
    }

    pub fn must(mut self, query: impl Into<Query>) -> Self {
        self.must.push(query.into());
        self
    }

    pub fn filter(mut self, query: impl Into<Query>) -> Self {
        self.filter.push(query.into());
        self
    }

    pub fn should(mut self, query: impl Into<Query>) -> Self {
        self.should.push(query.into());
        self
    }

    pub fn must_not(mut self, query: impl Into<Query>) -> Self {
        self.must_not.push(query.into());
        self
    }

    pub(crate) fn push_must(&mut self, query: Query) {
        self.must.push(query);
    }

    pub(crate) fn push_should(&mut self, query: Query) {
        self.should.push(query);
    }

    pub(crate) fn push_filter(&mut self, query: Query) {
        self.filter.push(query);
    }

    pub fn must_clauses(&self) -> &[Query] {
        &self.must
    }

    pub fn filter_clauses(&self) -> &[Query] {
        &self.filter
    }

    pub fn should_clauses(&self) -> &[Query] {
        &self.should
    }

    pub fn must_not_clauses(&self) -> &[Query] {
        &self.must_not
    }

    /// Returns `true` if all four clauses are empty.
    pub fn is_empty(&self) -> bool {
        self.must.is_empty()
            && self.filter.is_empty()
            && self.should.is_empty()
            && self.must_not.is_empty()
    }

    pub fn to_json(&self) -> Json {
        let mut body = Map::new();
        for (key, clause) in [
            ("must", &self.must),
            ("filter", &self.filter),
            ("should", &self.should),
            ("must_not", &self.must_not),
        ] {
            if !clause.is_empty() {
                body.insert(key.into(), query_list(clause));
            }
        }
        wrap("bool", Json::Object(body))
    }
}

/// Matches every document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchAllQuery {
    boost: Option<f64>,
}

impl MatchAllQuery {
    pub fn new() -> Self {
        MatchAllQuery::default()
    }

    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.boost.is_none()
    }

    pub fn to_json(&self) -> Json {
        let mut body = Map::new();
        if let Some(boost) = self.boost {
            body.insert("boost".into(), json!(boost));
        }
        wrap("match_all", Json::Object(body))
    }
}

/// Matches documents that have a value for a field.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistsQuery {
    field: String,
}

impl ExistsQuery {
    pub fn new(field: impl Into<String>) -> Self {
        ExistsQuery {
            field: field.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.field.is_empty()
    }

    pub fn to_json(&self) -> Json {
        wrap("exists", json!({ "field": self.field }))
    }
}
