//! Field annotation strings.
//!
//! Every annotated field carries a short tag such as `"must.term, boost=2"`
//! or `"text, analyzer=russian"`. [`FieldAnnotation::parse`] splits it into a
//! positional value (the first token, when it has no `=`) and a set of
//! `key=value` pairs.

use std::collections::BTreeMap;

/// A parsed annotation tag.
///
/// # Example
///
/// ```
/// use docquery::FieldAnnotation;
///
/// let ann = FieldAnnotation::parse("must.term, boost=2, lang=ru");
/// assert_eq!(ann.positional(), "must.term");
/// assert_eq!(ann.get("boost"), Some("2"));
/// assert_eq!(ann.get("lang"), Some("ru"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldAnnotation {
    positional: String,
    pairs: BTreeMap<String, String>,
}

impl FieldAnnotation {
    /// Parses a comma-separated annotation tag.
    ///
    /// Tokens are trimmed. The first token becomes the positional value if it
    /// contains no `=`. Every other token is split on its first `=`; a bare
    /// token after the positional slot is kept as a key with an empty value.
    pub fn parse(tag: &str) -> Self {
        let mut ann = FieldAnnotation::default();
        if tag.trim().is_empty() {
            return ann;
        }

        let mut tokens = tag.split(',').map(str::trim).peekable();

        if let Some(first) = tokens.peek() {
            if !first.contains('=') {
                ann.positional = first.to_string();
                tokens.next();
            }
        }

        for token in tokens {
            let (key, value) = match token.split_once('=') {
                Some((k, v)) => (k.trim(), v.trim()),
                None => (token, ""),
            };
            ann.pairs.insert(key.to_string(), value.to_string());
        }

        ann
    }

    /// The positional value, or `""` when the tag starts with a pair.
    pub fn positional(&self) -> &str {
        &self.positional
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.get(key).map(String::as_str)
    }

    /// Returns `true` if `key` was given, with or without a value.
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.contains_key(key)
    }

    /// Iterates over the key/value pairs in key order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns `true` if the tag had neither a positional value nor pairs.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.pairs.is_empty()
    }
}
