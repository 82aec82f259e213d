//! Dynamic values stored in instance fields and returned by methods.

use std::fmt;
use std::sync::Arc;

use super::instance::Instance;
use super::protocol;

#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    /// String-keyed mapping that keeps insertion order.
    Dict(Vec<(String, Value)>),
    Instance(Arc<Instance>),
}

impl Value {
    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::Instance(instance) => instance.class().name(),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Arc<Instance>> {
        match self {
            Value::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// Look up a key in a `Dict` value.
    pub fn get_key(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Dict(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Debug representation, with instances rendered through their `__repr__` slot.
    ///
    /// Falls back to `<Name object>` when an instance's class has no usable representation.
    pub fn repr(&self) -> String {
        protocol::repr(self).unwrap_or_else(|err| {
            tracing::debug!(error = %err, "falling back to default representation");
            match self {
                Value::Instance(instance) => protocol::default_repr(instance),
                other => format!("<{} object>", other.type_name()),
            }
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            other => f.write_str(&other.repr()),
        }
    }
}

/// Equality through the host comparison protocol. Lookup failures compare unequal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        protocol::equals(self, other).unwrap_or_else(|err| {
            tracing::debug!(error = %err, "comparison failed, treating operands as unequal");
            false
        })
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Instance(Arc::new(instance))
    }
}

impl From<Arc<Instance>> for Value {
    fn from(instance: Arc<Instance>) -> Self {
        Value::Instance(instance)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}
