//! # Per-Model Knowledge Cache
//!
//! Derived indexes are expensive to compute and immutable once built, so a
//! [`Model`] caches one instance of each index type. The cache guarantees:
//!
//! - each index type is built **at most once** per model, even when several
//!   threads ask for it concurrently; losers of the race block until the
//!   winner publishes;
//! - an index is visible only after its builder returned, so no caller can
//!   observe a partially constructed index;
//! - building one index may request a *different* index from the same
//!   model (the validator index needs the nullable index).
//!
//! The map lock is held only to find or create the per-type cell. The cell
//! itself (`OnceLock`) serializes construction.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::model::Model;

/// An index derived from a model and cached on it.
pub trait KnowledgeIndex: Any + Send + Sync + Sized {
    /// Compute the index. Called at most once per model.
    fn build(model: &Model) -> Self;
}

type Slot = Arc<dyn Any + Send + Sync>;

/// Type-keyed cache of derived indexes.
#[derive(Default)]
pub(crate) struct KnowledgeCache {
    cells: Mutex<HashMap<TypeId, Slot>>,
}

impl KnowledgeCache {
    pub(crate) fn get_or_build<T: KnowledgeIndex>(&self, model: &Model) -> Arc<T> {
        let slot = {
            let mut cells = self.cells.lock();
            cells
                .entry(TypeId::of::<T>())
                .or_insert_with(|| Arc::new(OnceLock::<Arc<T>>::new()) as Slot)
                .clone()
        };

        match slot.downcast_ref::<OnceLock<Arc<T>>>() {
            Some(cell) => cell
                .get_or_init(|| {
                    tracing::debug!(index = std::any::type_name::<T>(), "building knowledge index");
                    Arc::new(T::build(model))
                })
                .clone(),
            None => {
                // Cells are keyed by their own TypeId, so this is unreachable;
                // fall back to an uncached build rather than panic.
                tracing::error!(
                    index = std::any::type_name::<T>(),
                    "knowledge cache slot has unexpected type; building uncached"
                );
                Arc::new(T::build(model))
            }
        }
    }

    /// Number of index types requested so far.
    pub(crate) fn len(&self) -> usize {
        self.cells.lock().len()
    }
}

impl std::fmt::Debug for KnowledgeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeCache")
            .field("indexes", &self.len())
            .finish()
    }
}
