//! Implementation of the `#[derive(Mapped)]` and `#[derive(QueryModel)]` macros.
//!
//! Both derives read the same field annotations and generate code against the
//! runtime types of docquery.

mod attrs;
mod derive;

pub use derive::{mapped_derive_impl, query_model_derive_impl};
