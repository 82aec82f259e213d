//! Instances of classes.
//!
//! Storage follows the class's field set: slot `i` holds field `i`. Attributes outside the field
//! set (set by custom constructors, for example) live in a side list.

use std::fmt;

use super::method::{Args, BoundMethod, Comparison, FieldIter};
use super::value::Value;
use crate::errors::{Error, LookupError};
use crate::generators::dunders;
use crate::schema::class::ClassRef;

#[derive(Clone)]
pub struct Instance {
    class: ClassRef,
    fields: Vec<Option<Value>>,
    extra: Vec<(String, Value)>,
}

impl Instance {
    /// An instance with no attributes set.
    pub fn new(class: &ClassRef) -> Self {
        Self {
            class: class.clone(),
            fields: vec![None; class.clues().len()],
            extra: Vec::new(),
        }
    }

    /// An instance whose fields are `values` in field-set order.
    pub(crate) fn from_values(class: &ClassRef, values: Vec<Value>) -> Self {
        debug_assert_eq!(values.len(), class.clues().len());
        Self {
            class: class.clone(),
            fields: values.into_iter().map(Some).collect(),
            extra: Vec::new(),
        }
    }

    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.class.clues().index_of(name) {
            Some(index) => self.slot(index),
            None => self.extra.iter().find(|(n, _)| n == name).map(|(_, v)| v),
        }
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        if let Some(index) = self.class.clues().index_of(name) {
            self.fields[index] = Some(value);
        } else if let Some(entry) = self.extra.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value;
        } else {
            self.extra.push((name.to_string(), value));
        }
    }

    /// Field by storage index.
    pub fn slot(&self, index: usize) -> Option<&Value> {
        self.fields.get(index).and_then(Option::as_ref)
    }

    /// Resolve `name` on the instance's class and bind it to this instance.
    pub fn method(&self, name: &str) -> Result<BoundMethod<'_>, LookupError> {
        let method = self.class.method(name)?;
        Ok(BoundMethod::new(name, method, self))
    }

    /// `repr(self)` through the class's `__repr__` slot.
    pub fn repr(&self) -> Result<String, Error> {
        self.method(dunders::REPR)?.render()
    }

    /// A fresh pass over field values through the class's `__iter__` slot.
    pub fn iter(&self) -> Result<FieldIter<'_>, Error> {
        self.method(dunders::ITER)?.iterate()
    }

    /// `self.__eq__(other)`. A class without `__eq__` declines the comparison.
    pub fn equals(&self, other: &Value) -> Result<Comparison, Error> {
        if self.class.is_pending(dunders::EQ).is_none() {
            return Ok(Comparison::NotImplemented);
        }
        self.method(dunders::EQ)?.compare(other)
    }

    /// Call a [`Call`](crate::MethodKind::Call) method by name.
    pub fn call(&self, name: &str, args: Args) -> Result<Value, Error> {
        self.method(name)?.call(args)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.class.name());
        for (field, value) in self.class.clues().iter().zip(&self.fields) {
            s.field(&field.name, value);
        }
        for (name, value) in &self.extra {
            s.field(name, value);
        }
        s.finish()
    }
}
