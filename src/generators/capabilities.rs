//! Capability classes: pick generated behaviors by listing these as bases.
//!
//! ```rust
//! use cluegen::{Class, capabilities};
//!
//! // Construction and representation only; no generated equality.
//! let base = Class::builder("Base")
//!     .base(capabilities::init())
//!     .base(capabilities::repr())
//!     .build()
//!     .unwrap();
//! assert_eq!(base.is_pending("__init__"), Some(true));
//! assert_eq!(base.is_pending("__eq__"), None);
//! ```

use once_cell::sync::Lazy;

use super::{Generator, eq, init as init_gen, iter as iter_gen, repr as repr_gen};
use crate::schema::class::{Class, ClassRef};

static INIT: Lazy<ClassRef> = Lazy::new(|| capability("Init", init_gen::generator()));
static REPR: Lazy<ClassRef> = Lazy::new(|| capability("Repr", repr_gen::generator()));
static ITER: Lazy<ClassRef> = Lazy::new(|| capability("Iter", iter_gen::generator()));
static EQUALS: Lazy<ClassRef> = Lazy::new(|| capability("Equals", eq::generator()));
static DATUM: Lazy<ClassRef> = Lazy::new(|| {
    Class::builder("Datum")
        .bases([init(), repr(), iter(), equals()])
        .build()
        .expect("INVARIANT: capability classes share no ancestors, so their MRO is consistent")
});

fn capability(name: &str, generator: Generator) -> ClassRef {
    Class::builder(name)
        .generator(generator)
        .build()
        .expect("INVARIANT: a base-less class with a non-empty name always builds")
}

pub fn init() -> ClassRef {
    INIT.clone()
}

pub fn repr() -> ClassRef {
    REPR.clone()
}

pub fn iter() -> ClassRef {
    ITER.clone()
}

pub fn equals() -> ClassRef {
    EQUALS.clone()
}

/// All four behaviors: `__init__`, `__repr__`, `__iter__`, `__eq__`.
pub fn datum() -> ClassRef {
    DATUM.clone()
}

/// Resolve a capability class by name.
pub fn by_name(name: &str) -> Option<ClassRef> {
    match name {
        "Init" => Some(init()),
        "Repr" => Some(repr()),
        "Iter" => Some(iter()),
        "Equals" => Some(equals()),
        "Datum" => Some(datum()),
        _ => None,
    }
}
