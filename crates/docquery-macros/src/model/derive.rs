//! Implementation of the `#[derive(Mapped)]` and `#[derive(QueryModel)]` macros.
//!
//! `Mapped` emits a lazy member table: one `Member` per field, carrying the
//! source name, the serde wire name and the raw annotation strings. Nothing is
//! interpreted here; docquery parses the annotations when descriptors are
//! first built, so malformed annotations surface as runtime errors.
//!
//! `QueryModel` emits a `field_value` accessor that matches on the source name
//! of every `#[query]` field.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{ext::IdentExt, spanned::Spanned, Data, DeriveInput, Error, Field, Fields, Result};

use super::attrs::{parse_field_attrs, parse_rename_all};

/// Main implementation of the Mapped derive macro.
pub fn mapped_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let fields = named_fields(&input, "Mapped")?;
    let rename_all = parse_rename_all(&input.attrs)?;

    let mut members: Vec<TokenStream> = Vec::new();

    for field in fields {
        let ident = field_ident(field)?;
        let name = ident.unraw().to_string();
        let ty = &field.ty;
        let attrs = parse_field_attrs(&field.attrs)?;

        let mut member = quote! {
            ::docquery::Member::new(#name, <#ty as ::docquery::Mapped>::shape)
        };

        if attrs.skip {
            member.extend(quote! { .elide() });
        } else {
            let wire = attrs
                .rename
                .or_else(|| rename_all.map(|rule| rule.apply(&name)));
            if let Some(wire) = wire.filter(|w| *w != name) {
                member.extend(quote! { .rename(#wire) });
            }
        }
        if let Some(tag) = &attrs.mapping {
            member.extend(quote! { .mapping(#tag) });
        }
        if let Some(tag) = &attrs.search {
            member.extend(quote! { .search(#tag) });
        }
        if let Some(tag) = &attrs.query {
            member.extend(quote! { .query(#tag) });
        }

        members.push(member);
    }

    Ok(quote! {
        impl ::docquery::Mapped for #struct_name {
            fn shape() -> ::docquery::Shape {
                ::docquery::Shape::Record(::docquery::RecordShape::of::<Self>(|| {
                    ::std::vec![#(#members),*]
                }))
            }
        }
    })
}

/// Main implementation of the QueryModel derive macro.
pub fn query_model_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let fields = named_fields(&input, "QueryModel")?;

    let mut field_matches: Vec<TokenStream> = Vec::new();

    for field in fields {
        let ident = field_ident(field)?;
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.query.is_none() {
            continue;
        }
        let name = ident.unraw().to_string();
        field_matches.push(quote! {
            #name => ::docquery::IntoFieldValue::field_value(&self.#ident),
        });
    }

    Ok(quote! {
        impl ::docquery::QueryModel for #struct_name {
            fn field_value(&self, field: &str) -> ::docquery::FieldValue<'_> {
                match field {
                    #(#field_matches)*
                    _ => ::docquery::FieldValue::absent(),
                }
            }
        }
    })
}

fn named_fields<'a>(input: &'a DeriveInput, derive: &str) -> Result<Vec<&'a Field>> {
    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            format!("{} cannot be derived for generic types", derive),
        ));
    }

    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => Ok(named.named.iter().collect()),
            Fields::Unit => Ok(Vec::new()),
            Fields::Unnamed(_) => Err(Error::new(
                input.span(),
                format!("{} can only be derived for structs with named fields", derive),
            )),
        },
        _ => Err(Error::new(
            input.span(),
            format!("{} can only be derived for structs", derive),
        )),
    }
}

fn field_ident(field: &Field) -> Result<&syn::Ident> {
    field
        .ident
        .as_ref()
        .ok_or_else(|| Error::new(field.span(), "expected named field"))
}
