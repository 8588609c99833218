//! End-to-end compilation tests with derived models.

#![cfg(feature = "derive")]
#![allow(dead_code)]

use std::io::Write;

use docquery::{
    compile, Aggregation, CompilerOptions, DescriptorRegistry, Error, IndexMapping, Mapped,
    MultiSearch, QueryCompiler, QueryModel, SearchRequest,
};
use serde::Serialize;
use serde_json::json;

// =============================================================================
// Models
// =============================================================================

#[derive(Serialize, Mapped)]
struct Caption {
    #[serde(rename = "CaptionRu")]
    #[mapping("text")]
    #[search("must, boost=2, lang=ru, analyzer=russian")]
    caption_ru: String,
}

#[derive(Serialize, Mapped)]
struct Item {
    #[serde(rename = "CaptionRu")]
    #[mapping("text, analyzer=russian")]
    #[search("must, boost=2, lang=ru")]
    caption_ru: String,

    #[serde(rename = "CaptionEn")]
    #[mapping("text, analyzer=english")]
    #[search("must, lang=en")]
    caption_en: String,

    #[mapping("keyword")]
    #[search("must.term, boost=3")]
    sku: String,

    #[mapping("keyword")]
    #[search("should.term")]
    barcode: String,

    #[search("should")]
    description: String,

    #[mapping("keyword")]
    brand: String,

    #[mapping("keyword")]
    #[search("filter, name=colour")]
    primary_colour: String,

    #[mapping("keyword")]
    #[search("filter, name=colour")]
    secondary_colour: String,
}

#[derive(Default, Mapped, QueryModel)]
struct ItemSearch {
    #[query("query")]
    text: String,

    #[query("filter")]
    brand: Option<String>,

    #[query("filter, name=colour")]
    colour: Option<String>,
}

#[derive(Default, Mapped, QueryModel)]
struct CaptionSearch {
    #[query("query")]
    text: String,
}

#[derive(Default, Mapped, QueryModel)]
struct BrandSearch {
    #[query("filter")]
    brand: Vec<String>,
}

#[derive(Serialize, Mapped)]
struct Palette {
    #[mapping("keyword")]
    color: String,
}

#[derive(Serialize, Mapped)]
struct ZeroBoost {
    #[search("must, boost=0")]
    title: String,
}

#[derive(Serialize, Mapped)]
struct NegativeBoost {
    #[search("must, boost=-1")]
    title: String,
}

#[derive(Serialize, Mapped)]
struct GeoDoc {
    #[mapping("geo_point")]
    location: String,
}

#[derive(Default, Mapped, QueryModel)]
struct Untyped {
    #[query("name=caption")]
    text: String,
}

fn item_search(text: &str) -> ItemSearch {
    ItemSearch {
        text: text.into(),
        ..Default::default()
    }
}

// =============================================================================
// Query role
// =============================================================================

#[test]
fn test_caption_multi_match() {
    let search = CaptionSearch {
        text: "item".into(),
    };
    let query = compile::<Caption, CaptionSearch>(&search, "ru").unwrap();
    assert_eq!(
        serde_json::to_string(&query).unwrap(),
        r#"{"bool":{"must":[{"multi_match":{"fields":["CaptionRu^2"],"query":"item"}}]}}"#
    );
}

#[test]
fn test_mixed_strategies_per_clause() {
    let query = compile::<Item, ItemSearch>(&item_search("item"), "ru").unwrap();
    assert_eq!(
        query.to_json(),
        json!({"bool": {
            "must": [{"dis_max": {"queries": [
                {"term": {"sku": {"value": "item", "boost": 3.0}}},
                {"multi_match": {"query": "item", "fields": ["CaptionRu^2"]}}
            ]}}],
            "should": [{"dis_max": {"queries": [
                {"term": {"barcode": {"value": "item"}}},
                {"multi_match": {"query": "item", "fields": ["description"]}}
            ]}}]
        }})
    );
}

#[test]
fn test_language_selects_fields() {
    let query = compile::<Item, ItemSearch>(&item_search("item"), "en").unwrap();
    let must = &query.to_json()["bool"]["must"][0]["dis_max"]["queries"][1];
    assert_eq!(
        must,
        &json!({"multi_match": {"query": "item", "fields": ["CaptionEn"]}})
    );
}

#[test]
fn test_query_text_is_trimmed() {
    let padded = compile::<Item, ItemSearch>(&item_search("  item \t"), "ru").unwrap();
    let plain = compile::<Item, ItemSearch>(&item_search("item"), "ru").unwrap();
    assert_eq!(padded, plain);

    let blank = compile::<Item, ItemSearch>(&item_search("   "), "ru").unwrap();
    assert!(blank.is_empty());
}

// =============================================================================
// Filter role
// =============================================================================

#[test]
fn test_filter_by_source_field() {
    let search = ItemSearch {
        brand: Some("acme".into()),
        ..Default::default()
    };
    let query = compile::<Item, ItemSearch>(&search, "ru").unwrap();
    assert_eq!(
        serde_json::to_string(&query).unwrap(),
        r#"{"bool":{"filter":[{"term":{"brand":{"value":"acme"}}}]}}"#
    );
}

#[test]
fn test_filter_unset_names_match() {
    let search = ItemSearch {
        brand: Some("acme".into()),
        ..Default::default()
    };
    let query = compile::<Palette, ItemSearch>(&search, "ru").unwrap();
    assert_eq!(
        serde_json::to_string(&query).unwrap(),
        r#"{"bool":{"filter":[{"term":{"color":{"value":"acme"}}}]}}"#
    );
}

#[test]
fn test_filter_name_matching_two_fields_ands_terms() {
    let search = ItemSearch {
        colour: Some("red".into()),
        ..Default::default()
    };
    let query = compile::<Item, ItemSearch>(&search, "ru").unwrap();
    assert_eq!(
        query.to_json(),
        json!({"bool": {"filter": [
            {"term": {"primary_colour": {"value": "red"}}},
            {"term": {"secondary_colour": {"value": "red"}}}
        ]}})
    );
}

#[test]
fn test_filter_sequence_visits_each_value() {
    let search = BrandSearch {
        brand: vec!["acme".into(), "globex".into()],
    };
    let query = compile::<Item, BrandSearch>(&search, "").unwrap();
    assert_eq!(query.filter_clauses().len(), 2);
}

// =============================================================================
// Empty and absent models
// =============================================================================

#[test]
fn test_empty_model_compiles_to_empty_bool() {
    let query = compile::<Item, ItemSearch>(&ItemSearch::default(), "ru").unwrap();
    assert_eq!(serde_json::to_string(&query).unwrap(), r#"{"bool":{}}"#);
}

#[test]
fn test_absent_model_compiles_to_empty_bool() {
    let search: Option<ItemSearch> = None;
    let query = compile::<Item, Option<ItemSearch>>(&search, "ru").unwrap();
    assert_eq!(serde_json::to_string(&query).unwrap(), r#"{"bool":{}}"#);

    let search = Some(item_search("item"));
    let query = compile::<Item, Option<ItemSearch>>(&search, "ru").unwrap();
    assert!(!query.is_empty());
}

#[test]
fn test_compilation_is_idempotent() {
    let search = ItemSearch {
        text: "item".into(),
        brand: Some("acme".into()),
        colour: Some("red".into()),
    };
    let first = serde_json::to_string(&compile::<Item, ItemSearch>(&search, "ru").unwrap()).unwrap();
    let second =
        serde_json::to_string(&compile::<Item, ItemSearch>(&search, "ru").unwrap()).unwrap();
    assert_eq!(first, second);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_boost_must_be_positive() {
    let search = CaptionSearch {
        text: "item".into(),
    };
    assert!(matches!(
        compile::<ZeroBoost, CaptionSearch>(&search, "ru"),
        Err(Error::InvalidBoostParam { ref value, .. }) if value == "0"
    ));
    assert!(matches!(
        compile::<NegativeBoost, CaptionSearch>(&search, "ru"),
        Err(Error::InvalidBoostParam { ref value, .. }) if value == "-1"
    ));
}

#[test]
fn test_unknown_mapping_type() {
    let err = IndexMapping::for_type::<GeoDoc>().unwrap_err();
    assert!(matches!(err, Error::TypeUnknown { ref name, .. } if name == "geo_point"));
}

#[test]
fn test_query_role_required() {
    let err = compile::<Item, Untyped>(&Untyped::default(), "ru").unwrap_err();
    assert!(matches!(err, Error::SearchTypeNotSpecified { ref field } if field == "text"));
}

// =============================================================================
// Options and envelopes
// =============================================================================

#[test]
fn test_options_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "fuzziness: AUTO").unwrap();
    writeln!(file, "analyzer: standard").unwrap();
    writeln!(file, "tie_breaker: 0.3").unwrap();

    let options = CompilerOptions::from_file(file.path()).unwrap();
    let compiler = QueryCompiler::with_options(options);
    let registry = DescriptorRegistry::new();
    let query = compiler
        .compile_for::<Item, ItemSearch>(&registry, &item_search("item"), "ru")
        .unwrap();

    assert_eq!(
        query.to_json()["bool"]["must"][0],
        json!({"dis_max": {
            "tie_breaker": 0.3,
            "queries": [
                {"term": {"sku": {"value": "item", "boost": 3.0}}},
                {"multi_match": {
                    "query": "item",
                    "fields": ["CaptionRu^2"],
                    "analyzer": "standard",
                    "fuzziness": "AUTO"
                }}
            ]
        }})
    );
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_default_language_option() {
    let compiler =
        QueryCompiler::with_options(CompilerOptions::default().with_default_language("en"));
    let query = compiler
        .compile_for::<Item, ItemSearch>(DescriptorRegistry::global(), &item_search("item"), "")
        .unwrap();
    let fields = &query.to_json()["bool"]["must"][0]["dis_max"]["queries"][1]["multi_match"]["fields"];
    assert_eq!(fields, &json!(["CaptionEn"]));
}

#[test]
fn test_compiled_query_in_multi_search() {
    let search = ItemSearch {
        brand: Some("acme".into()),
        ..Default::default()
    };
    let query = compile::<Item, ItemSearch>(&search, "ru").unwrap();
    let request = SearchRequest::new(query)
        .aggregation("brands", Aggregation::value_count("brand"))
        .size(0);
    let body = MultiSearch::new().search("items", request).to_ndjson().unwrap();

    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], r#"{"index":"items"}"#);
    assert_eq!(
        lines[1],
        r#"{"aggs":{"brands":{"value_count":{"field":"brand"}}},"query":{"bool":{"filter":[{"term":{"brand":{"value":"acme"}}}]}},"size":0}"#
    );
}
