//! Field declarations: a name plus an advisory type hint.

use std::fmt;

/// A declared type, kept verbatim.
///
/// Hints are metadata for generators and external tooling. Nothing in the synthesizer checks a
/// field value against its hint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHint(String);

impl TypeHint {
    pub fn new(hint: impl Into<String>) -> Self {
        Self(hint.into())
    }

    /// The hint used when a declaration does not name a type.
    pub fn any() -> Self {
        Self("any".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeHint {
    fn from(hint: &str) -> Self {
        Self::new(hint)
    }
}

impl From<String> for TypeHint {
    fn from(hint: String) -> Self {
        Self(hint)
    }
}

/// One `(name, type)` pair declared on a class body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeHint,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeHint>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

impl fmt::Display for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}
