//! `__eq__`: pairwise field comparison with another instance of exactly the same class.

use std::sync::Arc;

use super::{GenContext, Generator, dunders};
use crate::errors::GenerateError;
use crate::runtime::method::{Comparison, Method, MethodKind};
use crate::runtime::protocol;
use crate::runtime::value::Value;

pub fn generator() -> Generator {
    Generator::new(dunders::EQ, generate).expecting(MethodKind::Compare)
}

pub fn generate(cx: &GenContext<'_>) -> Result<Method, GenerateError> {
    let plan = cx.plan();

    Ok(Method::compare(move |instance, other| {
        let Value::Instance(other) = other else {
            return Ok(Comparison::NotImplemented);
        };
        if instance.class().id() != other.class().id() {
            return Ok(Comparison::NotImplemented);
        }
        if std::ptr::eq(instance, Arc::as_ptr(other)) {
            return Ok(Comparison::Equal);
        }
        for i in 0..plan.len() {
            let equal = match (plan.get(instance, i), plan.get(other, i)) {
                (Some(a), Some(b)) => protocol::equals(a, b)?,
                (None, None) => true,
                _ => false,
            };
            if !equal {
                return Ok(Comparison::NotEqual);
            }
        }
        Ok(Comparison::Equal)
    }))
}
