//! Descriptor cache.
//!
//! Descriptor lists only depend on a type's annotations, so they are built
//! once per type and shared afterwards. A [`DescriptorRegistry`] holds them
//! keyed by [`TypeId`]:
//!
//! - lookups take a shared read lock
//! - the first lookup of a type takes the write lock, re-checks, builds and
//!   inserts
//! - failed builds are returned to the caller and not cached
//!
//! [`DescriptorRegistry::global`] is the process-wide instance. It is
//! populated on first use, lives for the process, and is only cleared by
//! tests.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;
use tracing::{debug, trace};

use crate::document::{describe_document_type, DocumentFieldDescriptor};
use crate::error::Result;
use crate::query_model::{describe_query_type, QueryFieldDescriptor};
use crate::shape::Mapped;

type Cache<T> = RwLock<HashMap<TypeId, Arc<[T]>>>;

static GLOBAL: Lazy<DescriptorRegistry> = Lazy::new(DescriptorRegistry::new);

/// Build-once cache of document and query descriptors.
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    documents: Cache<DocumentFieldDescriptor>,
    queries: Cache<QueryFieldDescriptor>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static DescriptorRegistry {
        &GLOBAL
    }

    /// Returns the document descriptors of `D`, building them on first use.
    pub fn documents<D: Mapped + ?Sized + 'static>(&self) -> Result<Arc<[DocumentFieldDescriptor]>> {
        get_or_build::<D, _>(&self.documents, "document", describe_document_type::<D>)
    }

    /// Returns the query descriptors of `Q`, building them on first use.
    pub fn queries<Q: Mapped + ?Sized + 'static>(&self) -> Result<Arc<[QueryFieldDescriptor]>> {
        get_or_build::<Q, _>(&self.queries, "query", describe_query_type::<Q>)
    }

    /// Number of cached descriptor lists, documents and queries together.
    pub fn len(&self) -> usize {
        read(&self.documents).len() + read(&self.queries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached list.
    pub fn clear(&self) {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.queries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

fn read<T>(cache: &Cache<T>) -> std::sync::RwLockReadGuard<'_, HashMap<TypeId, Arc<[T]>>> {
    cache.read().unwrap_or_else(PoisonError::into_inner)
}

fn get_or_build<K: ?Sized + 'static, T>(
    cache: &Cache<T>,
    kind: &str,
    build: impl FnOnce() -> Result<Vec<T>>,
) -> Result<Arc<[T]>> {
    let key = TypeId::of::<K>();
    let type_name = std::any::type_name::<K>();

    if let Some(hit) = read(cache).get(&key) {
        trace!(kind, type_name, "descriptor cache hit");
        return Ok(Arc::clone(hit));
    }

    let mut guard = cache.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(hit) = guard.get(&key) {
        return Ok(Arc::clone(hit));
    }

    let built: Arc<[T]> = build()?.into();
    debug!(kind, type_name, fields = built.len(), "built descriptors");
    guard.insert(key, Arc::clone(&built));
    Ok(built)
}
