//! Field sets ("clues"): the ordered fields a class accumulates from itself and its ancestors.
//!
//! ## Notes
//! - Order is base-to-derived, following the reversed method resolution order.
//! - A name contributes once. Redeclaring it later replaces the type but keeps the position of the
//!   first declaration.

use std::fmt;

use super::class::Class;
use super::field::{FieldDecl, TypeHint};

/// Ordered `name -> type` mapping with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldSet {
    fields: Vec<FieldDecl>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field, applying the redeclaration policy.
    pub fn declare(&mut self, name: impl Into<String>, ty: impl Into<TypeHint>) {
        let name = name.into();
        let ty = ty.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.ty = ty,
            None => self.fields.push(FieldDecl { name, ty }),
        }
    }

    /// Declare every field of `other` in order.
    pub fn extend_from(&mut self, other: &FieldSet) {
        for field in &other.fields {
            self.declare(field.name.clone(), field.ty.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDecl> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&TypeHint> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.ty)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

impl FromIterator<FieldDecl> for FieldSet {
    fn from_iter<I: IntoIterator<Item = FieldDecl>>(iter: I) -> Self {
        let mut set = FieldSet::new();
        for field in iter {
            set.declare(field.name, field.ty);
        }
        set
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = &'a FieldDecl;
    type IntoIter = std::slice::Iter<'a, FieldDecl>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Collect the field set of `class` from the current state of its hierarchy.
///
/// This does no caching; [`Class::clues`] memoizes it per class.
pub fn all_clues(class: &Class) -> FieldSet {
    let mut set = FieldSet::new();
    for ancestor in class.mro().iter().rev() {
        for field in ancestor.own_fields() {
            set.declare(field.name.clone(), field.ty.clone());
        }
    }
    for field in class.own_fields() {
        set.declare(field.name.clone(), field.ty.clone());
    }
    set
}
