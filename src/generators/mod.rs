//! Generation functions and the built-in generators.
//!
//! A [`Generator`] is bound to one slot name. On the first access to that slot on a class, the
//! generator receives a [`GenContext`] (the requesting class and its field set) and returns the
//! [`Method`] to install. The built-in generators compile the field set into a [`FieldPlan`] once
//! and close over it.
//!
//! ## Modules
//!
//! - `init`, `repr`, `iter`, `eq` - the four default behaviors
//! - `as_dict` - an extension generator producing a dict of field values
//! - `capabilities` - classes carrying the built-in generators (`Init`, ..., `Datum`)
//! - `dunders` - slot name vocabulary

pub mod as_dict;
pub mod capabilities;
pub mod dunders;
pub mod eq;
pub mod init;
pub mod iter;
pub mod repr;

use std::fmt;
use std::sync::Arc;

use crate::errors::{CallError, GenerateError};
use crate::runtime::instance::Instance;
use crate::runtime::method::{Method, MethodKind};
use crate::runtime::value::Value;
use crate::schema::class::{Class, ClassId};
use crate::schema::clues::FieldSet;

pub type GenerateFn = dyn Fn(&GenContext<'_>) -> Result<Method, GenerateError> + Send + Sync;

/// Input to a generation function.
#[derive(Debug, Clone, Copy)]
pub struct GenContext<'a> {
    class: &'a Class,
    clues: &'a FieldSet,
    slot: &'a str,
}

impl<'a> GenContext<'a> {
    /// The class that triggered generation (not necessarily the one declaring the generator).
    pub fn class(&self) -> &'a Class {
        self.class
    }

    /// The requesting class's field set.
    pub fn clues(&self) -> &'a FieldSet {
        self.clues
    }

    pub fn slot(&self) -> &'a str {
        self.slot
    }

    /// Precomputed access to every field of the requesting class.
    pub fn plan(&self) -> FieldPlan {
        FieldPlan::new(self.class, self.clues.names().map(str::to_string))
    }
}

pub struct Generator {
    slot: String,
    expects: Option<MethodKind>,
    func: Box<GenerateFn>,
}

impl Generator {
    pub fn new(
        slot: impl Into<String>,
        func: impl Fn(&GenContext<'_>) -> Result<Method, GenerateError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            slot: slot.into(),
            expects: None,
            func: Box::new(func),
        }
    }

    /// Reject generated methods that are not of `kind`.
    pub fn expecting(mut self, kind: MethodKind) -> Self {
        self.expects = Some(kind);
        self
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn expects(&self) -> Option<MethodKind> {
        self.expects
    }

    /// Run the generation function for `class`.
    #[tracing::instrument(skip_all, fields(class = %class.name(), slot = %self.slot))]
    pub(crate) fn generate(&self, class: &Class) -> Result<Method, GenerateError> {
        let cx = GenContext {
            class,
            clues: class.clues(),
            slot: &self.slot,
        };
        let method = (self.func)(&cx).inspect_err(|err| tracing::debug!(error = %err, "generation failed"))?;
        if let Some(expected) = self.expects {
            if method.kind() != expected {
                return Err(GenerateError::WrongKind {
                    expected,
                    found: method.kind(),
                });
            }
        }
        tracing::debug!(fields = cx.clues.len(), kind = %method.kind(), "generated method");
        Ok(method)
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("slot", &self.slot)
            .field("expects", &self.expects)
            .finish_non_exhaustive()
    }
}

/// A field-access list fixed at generation time.
///
/// Instances of the owning class are read by storage index. Instances of any other class (a
/// method called explicitly on a foreign receiver) fall back to lookup by name.
#[derive(Debug, Clone)]
pub struct FieldPlan {
    owner: ClassId,
    class_name: Arc<str>,
    fields: Arc<[PlannedField]>,
}

#[derive(Debug)]
pub struct PlannedField {
    pub name: String,
    pub index: usize,
}

impl FieldPlan {
    /// Plan access to `names` on `class`. Names outside the class's field set are read by name.
    pub fn new(class: &Class, names: impl IntoIterator<Item = String>) -> Self {
        let clues = class.clues();
        let fields = names
            .into_iter()
            .map(|name| PlannedField {
                index: clues.index_of(&name).unwrap_or(usize::MAX),
                name,
            })
            .collect();
        Self {
            owner: class.id(),
            class_name: Arc::from(class.name()),
            fields,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn fields(&self) -> &[PlannedField] {
        &self.fields
    }

    pub fn owns(&self, instance: &Instance) -> bool {
        instance.class().id() == self.owner
    }

    /// The `i`th planned field of `instance`, if set.
    pub fn get<'a>(&self, instance: &'a Instance, i: usize) -> Option<&'a Value> {
        let field = self.fields.get(i)?;
        if self.owns(instance) && field.index != usize::MAX {
            instance.slot(field.index)
        } else {
            instance.get(&field.name)
        }
    }

    /// Like [`FieldPlan::get`], but an unset field is an error.
    pub fn require<'a>(&self, instance: &'a Instance, i: usize) -> Result<&'a Value, CallError> {
        self.get(instance, i).ok_or_else(|| CallError::NoSuchField {
            class: instance.class().name().to_string(),
            name: self.fields.get(i).map(|f| f.name.clone()).unwrap_or_default(),
        })
    }

    /// Storage indices of the planned fields on `instance`'s class, skipping absent ones.
    pub fn indices_for(&self, instance: &Instance) -> Vec<usize> {
        if self.owns(instance) {
            return self.fields.iter().map(|f| f.index).filter(|&i| i != usize::MAX).collect();
        }
        let clues = instance.class().clues();
        self.fields.iter().filter_map(|f| clues.index_of(&f.name)).collect()
    }
}
