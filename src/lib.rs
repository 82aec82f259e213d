#![forbid(unsafe_code)]
//! Lazily generated boilerplate methods for record-like classes.
//!
//! A class declares its fields (`name: type` pairs) and adopts generated behaviors by inheriting
//! capability classes such as [`capabilities::datum`]. Each behavior lives in a class slot as a
//! pending generator. The first access to a slot on a given class builds a method from that class's
//! accumulated field set and installs it on that class only; later accesses are direct calls.
//!
//! ```rust
//! use cluegen::{Args, Class, capabilities};
//!
//! let coordinates = Class::builder("Coordinates")
//!     .base(capabilities::datum())
//!     .field("x", "int")
//!     .field("y", "int")
//!     .build()?;
//! let coordinates3 = Class::builder("Coordinates3").base(coordinates.clone()).field("z", "int").build()?;
//!
//! let c = coordinates3.instantiate(Args::positional([1, 2, 3]))?;
//! assert_eq!(c.repr()?, "Coordinates3(x=1, y=2, z=3)");
//! // The parent's slots are untouched until used on the parent itself.
//! assert_eq!(coordinates.is_pending("__repr__"), Some(true));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Panic Policy
//!
//! - **Library code**: failures are returned as [`Error`], [`DefineError`] or [`ConfigError`]. The
//!   only `expect` calls guard invariants (`"INVARIANT: ..."`) of the built-in capability classes.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! ## Modules
//!
//! - [`schema`] - fields, field sets, classes, method resolution order
//! - [`runtime`] - values, instances, methods, lazy slot tables, repr/eq protocols
//! - [`generators`] - generation functions and the built-in behaviors
//! - [`record`] - the build-time path: `#[derive(Clues)]` support
//! - [`config`] - JSON schema documents
//! - [`cli`] - the `cluegen` command

pub mod cli;
pub mod config;
pub mod errors;
pub mod generators;
pub mod record;
pub mod runtime;
pub mod schema;

pub use errors::{CallError, DefineError, Error, GenerateError, LookupError};
pub use generators::{FieldPlan, GenContext, Generator, capabilities};
pub use runtime::{Args, BoundMethod, Comparison, FieldIter, Instance, Method, MethodKind, Value};
pub use schema::{Class, ClassBuilder, ClassId, ClassRef, FieldDecl, FieldSet, TypeHint, all_clues};

pub use config::{ConfigError, Schema, SchemaDocument};
pub use record::{ClueValues, Clues, render};

pub use cluegen_derive::Clues;
