//! Methods: the callables that fill class slots.
//!
//! A method is a closure over a plan computed once from a class's field set, so once generated a
//! call does no more work than a hand-written equivalent. Each method has a [`MethodKind`] that
//! fixes how it is called.

use std::fmt;
use std::sync::Arc;

use super::instance::Instance;
use super::value::Value;
use crate::errors::{CallError, Error};
use crate::schema::class::ClassRef;

pub type ConstructFn = dyn Fn(&ClassRef, Args) -> Result<Instance, Error> + Send + Sync;
pub type RenderFn = dyn Fn(&Instance) -> Result<String, Error> + Send + Sync;
pub type IterateFn = dyn Fn(&Instance) -> FieldIter<'_> + Send + Sync;
pub type CompareFn = dyn Fn(&Instance, &Value) -> Result<Comparison, Error> + Send + Sync;
pub type CallFn = dyn Fn(&Instance, Args) -> Result<Value, Error> + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// Called on the class; produces a new instance.
    Construct,
    /// Produces the instance's text representation.
    Render,
    /// Produces a lazy pass over field values.
    Iterate,
    /// Compares the instance against another value.
    Compare,
    /// Anything else: instance plus arguments in, value out.
    Call,
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MethodKind::Construct => "constructor",
            MethodKind::Render => "render",
            MethodKind::Iterate => "iterate",
            MethodKind::Compare => "compare",
            MethodKind::Call => "call",
        })
    }
}

/// Outcome of an equality method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NotEqual,
    /// The method does not know how to compare against this operand.
    NotImplemented,
}

impl Comparison {
    pub fn from_bool(equal: bool) -> Self {
        if equal { Comparison::Equal } else { Comparison::NotEqual }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Comparison::Equal => Some(true),
            Comparison::NotEqual => Some(false),
            Comparison::NotImplemented => None,
        }
    }
}

#[derive(Clone)]
pub enum Method {
    Construct(Arc<ConstructFn>),
    Render(Arc<RenderFn>),
    Iterate(Arc<IterateFn>),
    Compare(Arc<CompareFn>),
    Call(Arc<CallFn>),
}

impl Method {
    pub fn construct(f: impl Fn(&ClassRef, Args) -> Result<Instance, Error> + Send + Sync + 'static) -> Self {
        Method::Construct(Arc::new(f))
    }

    pub fn render(f: impl Fn(&Instance) -> Result<String, Error> + Send + Sync + 'static) -> Self {
        Method::Render(Arc::new(f))
    }

    pub fn iterate(f: impl Fn(&Instance) -> FieldIter<'_> + Send + Sync + 'static) -> Self {
        Method::Iterate(Arc::new(f))
    }

    pub fn compare(f: impl Fn(&Instance, &Value) -> Result<Comparison, Error> + Send + Sync + 'static) -> Self {
        Method::Compare(Arc::new(f))
    }

    pub fn call(f: impl Fn(&Instance, Args) -> Result<Value, Error> + Send + Sync + 'static) -> Self {
        Method::Call(Arc::new(f))
    }

    pub fn kind(&self) -> MethodKind {
        match self {
            Method::Construct(_) => MethodKind::Construct,
            Method::Render(_) => MethodKind::Render,
            Method::Iterate(_) => MethodKind::Iterate,
            Method::Compare(_) => MethodKind::Compare,
            Method::Call(_) => MethodKind::Call,
        }
    }

    fn wrong_kind(&self, slot: &str, expected: MethodKind) -> Error {
        CallError::WrongKind {
            slot: slot.to_string(),
            expected,
            found: self.kind(),
        }
        .into()
    }

    /// Invoke as a constructor on `class`. `slot` only labels errors.
    pub fn construct_on(&self, slot: &str, class: &ClassRef, args: Args) -> Result<Instance, Error> {
        match self {
            Method::Construct(f) => f(class, args),
            _ => Err(self.wrong_kind(slot, MethodKind::Construct)),
        }
    }

    pub fn render_on(&self, slot: &str, instance: &Instance) -> Result<String, Error> {
        match self {
            Method::Render(f) => f(instance),
            _ => Err(self.wrong_kind(slot, MethodKind::Render)),
        }
    }

    pub fn iterate_on<'a>(&self, slot: &str, instance: &'a Instance) -> Result<FieldIter<'a>, Error> {
        match self {
            Method::Iterate(f) => Ok(f(instance)),
            _ => Err(self.wrong_kind(slot, MethodKind::Iterate)),
        }
    }

    pub fn compare_on(&self, slot: &str, instance: &Instance, other: &Value) -> Result<Comparison, Error> {
        match self {
            Method::Compare(f) => f(instance, other),
            _ => Err(self.wrong_kind(slot, MethodKind::Compare)),
        }
    }

    pub fn call_on(&self, slot: &str, instance: &Instance, args: Args) -> Result<Value, Error> {
        match self {
            Method::Call(f) => f(instance, args),
            _ => Err(self.wrong_kind(slot, MethodKind::Call)),
        }
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} method>", self.kind())
    }
}

/// A method resolved through an instance, carrying its receiver.
#[derive(Debug, Clone)]
pub struct BoundMethod<'a> {
    slot: String,
    method: Arc<Method>,
    receiver: &'a Instance,
}

impl<'a> BoundMethod<'a> {
    pub(crate) fn new(slot: &str, method: Arc<Method>, receiver: &'a Instance) -> Self {
        Self {
            slot: slot.to_string(),
            method,
            receiver,
        }
    }

    /// The unbound method, identical to the one the class holds.
    pub fn method(&self) -> &Arc<Method> {
        &self.method
    }

    pub fn receiver(&self) -> &'a Instance {
        self.receiver
    }

    pub fn render(&self) -> Result<String, Error> {
        self.method.render_on(&self.slot, self.receiver)
    }

    pub fn iterate(&self) -> Result<FieldIter<'a>, Error> {
        self.method.iterate_on(&self.slot, self.receiver)
    }

    pub fn compare(&self, other: &Value) -> Result<Comparison, Error> {
        self.method.compare_on(&self.slot, self.receiver, other)
    }

    pub fn call(&self, args: Args) -> Result<Value, Error> {
        self.method.call_on(&self.slot, self.receiver, args)
    }
}

/// Positional and keyword arguments for a call.
#[derive(Debug, Clone, Default)]
pub struct Args {
    pub positional: Vec<Value>,
    pub keywords: Vec<(String, Value)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            keywords: Vec::new(),
        }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.push((name.into(), value.into()));
        self
    }
}

/// One lazy pass over an instance's field values.
///
/// `plan` lists the storage indices to visit; it is computed once when the method is generated.
#[derive(Debug, Clone)]
pub struct FieldIter<'a> {
    instance: &'a Instance,
    plan: Arc<[usize]>,
    next: usize,
}

impl<'a> FieldIter<'a> {
    pub fn new(instance: &'a Instance, plan: Arc<[usize]>) -> Self {
        Self { instance, plan, next: 0 }
    }
}

impl<'a> Iterator for FieldIter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&index) = self.plan.get(self.next) {
            self.next += 1;
            if let Some(value) = self.instance.slot(index) {
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.plan.len() - self.next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_mismatch_is_a_call_error() {
        let method = Method::call(|_, _| Ok(Value::None));
        let class = crate::schema::class::Class::builder("A").build();
        let Ok(class) = class else {
            panic!("class should build");
        };
        let err = method.construct_on("__init__", &class, Args::new()).unwrap_err();
        assert_eq!(
            err,
            Error::Call(CallError::WrongKind {
                slot: "__init__".into(),
                expected: MethodKind::Construct,
                found: MethodKind::Call,
            })
        );
    }

    #[test]
    fn args_builder_keeps_order() {
        let args = Args::positional([1, 2]).arg("three").kwarg("z", 4);
        assert_eq!(args.positional.len(), 3);
        assert_eq!(args.keywords[0].0, "z");
    }

    #[test]
    fn comparison_round_trips_bools() {
        assert_eq!(Comparison::from_bool(true).as_bool(), Some(true));
        assert_eq!(Comparison::NotImplemented.as_bool(), None);
    }
}
