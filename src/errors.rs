//! Error taxonomy for the synthesizer.
//!
//! Every failure is surfaced to the caller that triggered it; nothing here is retried or swallowed.
//! The enums derive [`miette::Diagnostic`] so the CLI can render them with codes and help text.

use miette::Diagnostic;
use thiserror::Error;

use crate::runtime::method::MethodKind;

/// A generation function failed to produce a method.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum GenerateError {
    /// The author-supplied generation function reported a failure.
    #[error("{0}")]
    #[diagnostic(code(cluegen::generate::failed))]
    Failed(String),

    /// The generation function produced a method of the wrong shape for its slot.
    #[error("expected a {expected} method, generation produced a {found} method")]
    #[diagnostic(
        code(cluegen::generate::wrong_kind),
        help("a generator bound to a slot must return a method of the kind that slot is called as")
    )]
    WrongKind { expected: MethodKind, found: MethodKind },
}

impl GenerateError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Resolving an attribute on a class or instance failed.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum LookupError {
    #[error("class `{class}` has no attribute `{name}`")]
    #[diagnostic(code(cluegen::lookup::no_such_attribute))]
    NoSuchAttribute { class: String, name: String },

    /// First access to a pending slot ran its generator and the generator failed.
    ///
    /// The slot stays pending, so a later access runs the generator again.
    #[error("failed to generate `{slot}` for class `{class}`")]
    #[diagnostic(code(cluegen::lookup::generation))]
    Generation {
        class: String,
        slot: String,
        #[source]
        #[diagnostic_source]
        source: GenerateError,
    },

    /// A generator resolved the slot it is generating, on the class it is generating for.
    #[error("generating `{slot}` for class `{class}` requires `{slot}` itself")]
    #[diagnostic(
        code(cluegen::lookup::recursive_generation),
        help("a generator may look up other slots, but not the one it is producing")
    )]
    RecursiveGeneration { class: String, slot: String },
}

/// Calling a method failed (argument binding, or calling a method as the wrong kind).
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum CallError {
    #[error("{class}() takes {expected} positional arguments but {given} were given")]
    #[diagnostic(code(cluegen::call::too_many_arguments))]
    TooManyArguments { class: String, expected: usize, given: usize },

    #[error("{class}() got an unexpected keyword argument '{name}'")]
    #[diagnostic(code(cluegen::call::unexpected_keyword))]
    UnexpectedKeyword { class: String, name: String },

    #[error("{class}() got multiple values for argument '{name}'")]
    #[diagnostic(code(cluegen::call::multiple_values))]
    MultipleValues { class: String, name: String },

    #[error("{class}() missing required argument: '{name}'")]
    #[diagnostic(code(cluegen::call::missing_argument))]
    MissingArgument { class: String, name: String },

    #[error("`{slot}` is a {found} method and cannot be called as a {expected} method")]
    #[diagnostic(code(cluegen::call::wrong_kind))]
    WrongKind {
        slot: String,
        expected: MethodKind,
        found: MethodKind,
    },

    #[error("`{class}` instance has no field `{name}`")]
    #[diagnostic(code(cluegen::call::no_such_field))]
    NoSuchField { class: String, name: String },

    /// A hand-written or custom method reported a failure.
    #[error("{0}")]
    #[diagnostic(code(cluegen::call::failed))]
    Failed(String),
}

/// Defining a class failed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum DefineError {
    #[error("class name must not be empty")]
    #[diagnostic(code(cluegen::define::empty_name))]
    EmptyName,

    #[error("duplicate base class `{base}` in definition of `{class}`")]
    #[diagnostic(code(cluegen::define::duplicate_base))]
    DuplicateBase { class: String, base: String },

    #[error("cannot create a consistent method resolution order for `{class}` (bases {bases})")]
    #[diagnostic(
        code(cluegen::define::inconsistent_hierarchy),
        help("reorder the bases so that every class appears before its own ancestors")
    )]
    InconsistentHierarchy { class: String, bases: String },
}

/// Umbrella error for operations that resolve a slot and then call it.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Call(#[from] CallError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_error_names_class_and_slot() {
        let err = LookupError::Generation {
            class: "Point".into(),
            slot: "__repr__".into(),
            source: GenerateError::failed("boom"),
        };
        assert_eq!(err.to_string(), "failed to generate `__repr__` for class `Point`");
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("boom"));
    }

    #[test]
    fn call_errors_read_like_host_type_errors() {
        let err = CallError::MissingArgument {
            class: "Coordinates".into(),
            name: "y".into(),
        };
        assert_eq!(err.to_string(), "Coordinates() missing required argument: 'y'");
    }

    #[test]
    fn umbrella_error_is_transparent() {
        let err: Error = CallError::Failed("nope".into()).into();
        assert_eq!(err.to_string(), "nope");
    }
}
