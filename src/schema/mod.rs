//! Explicit class schemas: fields, field sets, classes and their resolution order.

pub mod class;
pub mod clues;
pub mod field;
mod mro;

pub use class::{Class, ClassBuilder, ClassId, ClassRef, Declaration};
pub use clues::{FieldSet, all_clues};
pub use field::{FieldDecl, TypeHint};
