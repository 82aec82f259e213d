//! `as_dict`: a `Dict` of field values keyed by field name.
//!
//! Not part of the default capability set; bind it explicitly with
//! [`ClassBuilder::generator`](crate::ClassBuilder::generator).

use super::{GenContext, Generator};
use crate::errors::GenerateError;
use crate::runtime::method::{Method, MethodKind};
use crate::runtime::value::Value;

pub const SLOT: &str = "as_dict";

pub fn generator() -> Generator {
    Generator::new(SLOT, generate).expecting(MethodKind::Call)
}

pub fn generate(cx: &GenContext<'_>) -> Result<Method, GenerateError> {
    let plan = cx.plan();

    Ok(Method::call(move |instance, _args| {
        let mut entries = Vec::with_capacity(plan.len());
        for (i, field) in plan.fields().iter().enumerate() {
            entries.push((field.name.clone(), plan.require(instance, i)?.clone()));
        }
        Ok(Value::Dict(entries))
    }))
}
