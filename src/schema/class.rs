//! Class descriptors.
//!
//! A [`Class`] is the explicit schema a record-like type declares: a name, direct bases, its own
//! field declarations, class-level constants, and the generators or hand-written methods it binds
//! to slot names. Classes are immutable after [`ClassBuilder::build`] except for their attribute
//! table, where pending generators are swapped for installed methods on first access.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::OnceCell;

use super::clues::{FieldSet, all_clues};
use super::field::{FieldDecl, TypeHint};
use super::mro;
use crate::errors::{DefineError, Error, LookupError};
use crate::generators::Generator;
use crate::runtime::instance::Instance;
use crate::runtime::method::{Args, Method};
use crate::runtime::slots::SlotTable;
use crate::runtime::value::Value;

pub type ClassRef = Arc<Class>;

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a class. Two classes with the same name are still different classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u64);

impl ClassId {
    fn fresh() -> Self {
        Self(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// What a class body binds to a slot name.
#[derive(Clone)]
pub enum Declaration {
    /// Deferred: every class that inherits this gets its own pending placeholder.
    Generator(Arc<Generator>),
    /// Written by hand; shared as-is with descendants.
    Method(Arc<Method>),
}

impl fmt::Debug for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Generator(g) => write!(f, "Generator({})", g.slot()),
            Declaration::Method(m) => write!(f, "Method({})", m.kind()),
        }
    }
}

pub struct Class {
    id: ClassId,
    name: String,
    bases: Vec<ClassRef>,
    mro: Vec<ClassRef>,
    fields: Vec<FieldDecl>,
    constants: BTreeMap<String, Value>,
    declarations: Vec<(String, Declaration)>,
    attrs: SlotTable,
    clues: OnceCell<FieldSet>,
}

impl Class {
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bases(&self) -> &[ClassRef] {
        &self.bases
    }

    /// Ancestors in method resolution order, nearest first. Excludes the class itself.
    pub fn mro(&self) -> &[ClassRef] {
        &self.mro
    }

    /// Fields declared on this class body only.
    pub fn own_fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// The field set of this class, collected on first request.
    pub fn clues(&self) -> &FieldSet {
        self.clues.get_or_init(|| all_clues(self))
    }

    /// True if `self` is `other` or inherits from it.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        self.id == other.id || self.mro.iter().any(|c| c.id == other.id)
    }

    /// A class-level constant, resolved through the MRO.
    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.constants
            .get(name)
            .or_else(|| self.mro.iter().find_map(|c| c.constants.get(name)))
    }

    /// Slot names bound on this class, own or inherited, in sorted order.
    pub fn slot_names(&self) -> Vec<String> {
        self.attrs.names()
    }

    /// `Some(true)` while `name` still holds its placeholder, `Some(false)` once a method is
    /// installed, `None` if the class has no such slot. Never triggers generation.
    pub fn is_pending(&self, name: &str) -> Option<bool> {
        self.attrs.is_pending(name)
    }

    /// Resolve `name` to an unbound method, generating it on first access.
    pub fn method(&self, name: &str) -> Result<Arc<Method>, LookupError> {
        self.attrs.resolve(self, name)
    }

    /// Create an instance through the class's `__init__` slot.
    pub fn instantiate(self: &Arc<Self>, args: Args) -> Result<Instance, Error> {
        let init = self.method(crate::generators::dunders::INIT)?;
        init.construct_on(crate::generators::dunders::INIT, self, args)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("bases", &self.bases.iter().map(|b| b.name()).collect::<Vec<_>>())
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class '{}'>", self.name)
    }
}

/// Builder for [`Class`].
///
/// ## Examples
/// ```rust
/// use cluegen::{Args, Class, Value, capabilities};
///
/// let point = Class::builder("Point")
///     .base(capabilities::datum())
///     .field("x", "int")
///     .field("y", "int")
///     .build()
///     .unwrap();
///
/// let p = point.instantiate(Args::positional([Value::from(2), Value::from(3)])).unwrap();
/// assert_eq!(p.repr().unwrap(), "Point(x=2, y=3)");
/// ```
#[derive(Debug)]
pub struct ClassBuilder {
    name: String,
    bases: Vec<ClassRef>,
    fields: Vec<FieldDecl>,
    constants: BTreeMap<String, Value>,
    declarations: Vec<(String, Declaration)>,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            fields: Vec::new(),
            constants: BTreeMap::new(),
            declarations: Vec::new(),
        }
    }

    pub fn base(mut self, base: ClassRef) -> Self {
        self.bases.push(base);
        self
    }

    pub fn bases(mut self, bases: impl IntoIterator<Item = ClassRef>) -> Self {
        self.bases.extend(bases);
        self
    }

    pub fn field(mut self, name: impl Into<String>, ty: impl Into<TypeHint>) -> Self {
        self.fields.push(FieldDecl::new(name, ty));
        self
    }

    /// Declare a field together with a same-named class constant, which the default constructor
    /// uses as the argument's default.
    pub fn field_with_default(self, name: impl Into<String>, ty: impl Into<TypeHint>, default: impl Into<Value>) -> Self {
        let name = name.into();
        self.field(name.clone(), ty).constant(name, default)
    }

    pub fn constant(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constants.insert(name.into(), value.into());
        self
    }

    /// Bind a generator to its slot on this class.
    pub fn generator(mut self, generator: Generator) -> Self {
        let slot = generator.slot().to_string();
        self.declarations.retain(|(name, _)| *name != slot);
        self.declarations.push((slot, Declaration::Generator(Arc::new(generator))));
        self
    }

    /// Bind a hand-written method to `name` on this class.
    pub fn method(mut self, name: impl Into<String>, method: Method) -> Self {
        let name = name.into();
        self.declarations.retain(|(n, _)| *n != name);
        self.declarations.push((name, Declaration::Method(Arc::new(method))));
        self
    }

    #[tracing::instrument(skip_all, fields(class = %self.name, bases = self.bases.len()))]
    pub fn build(self) -> Result<ClassRef, DefineError> {
        if self.name.is_empty() {
            return Err(DefineError::EmptyName);
        }
        for (i, base) in self.bases.iter().enumerate() {
            if self.bases[..i].iter().any(|b| b.id() == base.id()) {
                return Err(DefineError::DuplicateBase {
                    class: self.name,
                    base: base.name().to_string(),
                });
            }
        }
        let mro = mro::linearize(&self.name, &self.bases)?;

        // Own declarations first, then the nearest ancestor declaring each remaining name.
        let attrs = SlotTable::new();
        let mut bound: Vec<&str> = Vec::new();
        let inherited = mro.iter().flat_map(|c| c.declarations.iter());
        for (name, decl) in self.declarations.iter().chain(inherited) {
            if bound.contains(&name.as_str()) {
                continue;
            }
            bound.push(name);
            match decl {
                Declaration::Generator(generator) => attrs.insert_pending(name, generator.clone()),
                Declaration::Method(method) => attrs.insert_ready(name, method.clone()),
            }
        }
        tracing::trace!(slots = bound.len(), "class defined");

        Ok(Arc::new(Class {
            id: ClassId::fresh(),
            name: self.name,
            bases: self.bases,
            mro,
            fields: self.fields,
            constants: self.constants,
            declarations: self.declarations,
            attrs,
            clues: OnceCell::new(),
        }))
    }
}
