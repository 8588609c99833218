//! Attribute parsing for the `Mapped` and `QueryModel` derive macros.
//!
//! Field annotations are kept as raw strings: `#[mapping("text")]`,
//! `#[search("must, boost=2")]` and `#[query("filter")]` are copied into the
//! generated member table and parsed at runtime by docquery. This module only
//! checks their form and reads the `serde` attributes that decide wire names.

use syn::{
    meta::ParseNestedMeta, spanned::Spanned, Attribute, Error, Expr, Lit, LitStr, Result, Token,
};

/// Field-level attributes relevant to docquery.
#[derive(Debug, Clone, Default)]
pub struct FieldAttrs {
    /// `#[mapping("...")]`
    pub mapping: Option<LitStr>,
    /// `#[search("...")]`
    pub search: Option<LitStr>,
    /// `#[query("...")]`
    pub query: Option<LitStr>,
    /// `#[serde(rename = "...")]` or `#[serde(rename(serialize = "..."))]`
    pub rename: Option<String>,
    /// `#[serde(skip)]` or `#[serde(skip_serializing)]`
    pub skip: bool,
}

/// Extracts docquery and serde attributes from a field's attributes.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttrs> {
    let mut out = FieldAttrs::default();

    for attr in attrs {
        if attr.path().is_ident("mapping") {
            set_once(&mut out.mapping, attr, "mapping")?;
        } else if attr.path().is_ident("search") {
            set_once(&mut out.search, attr, "search")?;
        } else if attr.path().is_ident("query") {
            set_once(&mut out.query, attr, "query")?;
        } else if attr.path().is_ident("serde") {
            parse_serde_field(attr, &mut out);
        }
    }

    Ok(out)
}

fn set_once(slot: &mut Option<LitStr>, attr: &Attribute, name: &str) -> Result<()> {
    if slot.is_some() {
        return Err(Error::new(
            attr.span(),
            format!("duplicate #[{}(...)] attribute", name),
        ));
    }
    let lit = attr.parse_args::<LitStr>().map_err(|_| {
        Error::new(
            attr.span(),
            format!("expected a string literal: #[{}(\"...\")]", name),
        )
    })?;
    *slot = Some(lit);
    Ok(())
}

// Malformed serde attributes are serde's to report, so errors are ignored.
fn parse_serde_field(attr: &Attribute, out: &mut FieldAttrs) {
    let _ = attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("rename") {
            if meta.input.peek(Token![=]) {
                out.rename = Some(string_value(&meta)?);
            } else {
                meta.parse_nested_meta(|inner| {
                    if inner.path.is_ident("serialize") {
                        out.rename = Some(string_value(&inner)?);
                    } else {
                        skip_value(&inner)?;
                    }
                    Ok(())
                })?;
            }
        } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
            out.skip = true;
        } else {
            skip_value(&meta)?;
        }
        Ok(())
    });
}

/// Reads the container-level `#[serde(rename_all = "...")]` rule.
pub fn parse_rename_all(attrs: &[Attribute]) -> Result<Option<RenameRule>> {
    let mut rule = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        let mut found: Option<LitStr> = None;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                if meta.input.peek(Token![=]) {
                    found = Some(meta.value()?.parse()?);
                } else {
                    meta.parse_nested_meta(|inner| {
                        if inner.path.is_ident("serialize") {
                            found = Some(inner.value()?.parse()?);
                        } else {
                            skip_value(&inner)?;
                        }
                        Ok(())
                    })?;
                }
            } else {
                skip_value(&meta)?;
            }
            Ok(())
        });
        if let Some(lit) = found {
            rule = Some(RenameRule::parse(&lit.value()).ok_or_else(|| {
                Error::new(lit.span(), format!("unknown rename_all rule: '{}'", lit.value()))
            })?);
        }
    }
    Ok(rule)
}

fn string_value(meta: &ParseNestedMeta) -> Result<String> {
    let expr: Expr = meta.value()?.parse()?;
    match expr {
        Expr::Lit(syn::ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        other => Err(Error::new(other.span(), "expected a string literal")),
    }
}

fn skip_value(meta: &ParseNestedMeta) -> Result<()> {
    if meta.input.peek(Token![=]) {
        let _: Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_value(&inner))?;
    }
    Ok(())
}

/// Serde's field renaming rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    pub fn parse(s: &str) -> Option<Self> {
        let rule = match s {
            "lowercase" => RenameRule::Lower,
            "UPPERCASE" => RenameRule::Upper,
            "PascalCase" => RenameRule::Pascal,
            "camelCase" => RenameRule::Camel,
            "snake_case" => RenameRule::Snake,
            "SCREAMING_SNAKE_CASE" => RenameRule::ScreamingSnake,
            "kebab-case" => RenameRule::Kebab,
            "SCREAMING-KEBAB-CASE" => RenameRule::ScreamingKebab,
            _ => return None,
        };
        Some(rule)
    }

    /// Applies the rule to a snake_case field name.
    pub fn apply(self, field: &str) -> String {
        match self {
            RenameRule::Lower | RenameRule::Snake => field.to_string(),
            RenameRule::Upper | RenameRule::ScreamingSnake => field.to_ascii_uppercase(),
            RenameRule::Pascal => to_pascal(field),
            RenameRule::Camel => {
                let pascal = to_pascal(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => pascal,
                }
            }
            RenameRule::Kebab => field.replace('_', "-"),
            RenameRule::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

fn to_pascal(field: &str) -> String {
    let mut result = String::with_capacity(field.len());
    let mut capitalize = true;
    for c in field.chars() {
        if c == '_' {
            capitalize = true;
        } else if capitalize {
            result.push(c.to_ascii_uppercase());
            capitalize = false;
        } else {
            result.push(c);
        }
    }
    result
}
