//! Per-class attribute tables with lazily generated entries.
//!
//! Each class owns one [`SlotTable`]. A slot holds either a pending generator or an installed
//! method. The first resolution of a pending slot runs the generator for the resolving class and
//! installs the result in that class's table only.
//!
//! ## Concurrency
//! - A pending slot owns a `OnceCell`. Concurrent first accesses block on it, so at most one
//!   method is ever produced per class and slot, and every caller receives that same method.
//! - Installation replaces the table entry after the cell is filled. A reader holding a stale
//!   pending entry still gets the filled cell's method, so nobody observes the placeholder after
//!   anybody observed the method.
//! - No table lock is held while a generator runs; generators may resolve other slots.
//! - A generator that resolves its own slot on the class it is generating for gets
//!   [`LookupError::RecursiveGeneration`] instead of waiting on its own cell. Each thread tracks
//!   the `(class, slot)` pairs it is generating.
//! - A failed generation leaves the cell empty and the entry pending.

use std::cell::RefCell;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;

use super::method::Method;
use crate::errors::LookupError;
use crate::generators::Generator;
use crate::schema::class::{Class, ClassId};

thread_local! {
    static GENERATING: RefCell<Vec<(ClassId, String)>> = const { RefCell::new(Vec::new()) };
}

/// Marks `(class, slot)` as being generated on this thread until dropped.
struct GenerationGuard;

impl GenerationGuard {
    /// `None` if this thread is already generating `slot` for `class`.
    fn enter(class: ClassId, slot: &str) -> Option<Self> {
        GENERATING.with(|active| {
            let mut active = active.borrow_mut();
            if active.iter().any(|(id, name)| *id == class && name == slot) {
                return None;
            }
            active.push((class, slot.to_string()));
            Some(GenerationGuard)
        })
    }
}

impl Drop for GenerationGuard {
    fn drop(&mut self) {
        GENERATING.with(|active| {
            active.borrow_mut().pop();
        });
    }
}

/// A placeholder awaiting its first access.
pub(crate) struct PendingMethod {
    generator: Arc<Generator>,
    cell: OnceCell<Arc<Method>>,
}

#[derive(Clone)]
enum Slot {
    Pending(Arc<PendingMethod>),
    Installed(Arc<Method>),
}

#[derive(Default)]
pub(crate) struct SlotTable {
    slots: DashMap<String, Slot>,
}

impl SlotTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_pending(&self, name: &str, generator: Arc<Generator>) {
        let pending = PendingMethod {
            generator,
            cell: OnceCell::new(),
        };
        self.slots.insert(name.to_string(), Slot::Pending(Arc::new(pending)));
    }

    pub(crate) fn insert_ready(&self, name: &str, method: Arc<Method>) {
        self.slots.insert(name.to_string(), Slot::Installed(method));
    }

    pub(crate) fn is_pending(&self, name: &str) -> Option<bool> {
        self.slots.get(name).map(|slot| matches!(slot.value(), Slot::Pending(_)))
    }

    pub(crate) fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.slots.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    /// Resolve `name` on `class`, generating and installing it on first access.
    pub(crate) fn resolve(&self, class: &Class, name: &str) -> Result<Arc<Method>, LookupError> {
        // Clone out of the map so the shard lock is released before any generator runs.
        let slot = self
            .slots
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| LookupError::NoSuchAttribute {
                class: class.name().to_string(),
                name: name.to_string(),
            })?;

        let pending = match slot {
            Slot::Installed(method) => return Ok(method),
            Slot::Pending(pending) => pending,
        };

        if let Some(method) = pending.cell.get() {
            return Ok(self.install(name, method.clone()));
        }

        let _guard = GenerationGuard::enter(class.id(), name).ok_or_else(|| {
            LookupError::RecursiveGeneration {
                class: class.name().to_string(),
                slot: name.to_string(),
            }
        })?;

        let method = pending
            .cell
            .get_or_try_init(|| {
                pending
                    .generator
                    .generate(class)
                    .map(Arc::new)
                    .map_err(|source| LookupError::Generation {
                        class: class.name().to_string(),
                        slot: name.to_string(),
                        source,
                    })
            })?
            .clone();

        Ok(self.install(name, method))
    }

    fn install(&self, name: &str, method: Arc<Method>) -> Arc<Method> {
        self.slots.insert(name.to_string(), Slot::Installed(method.clone()));
        method
    }
}
