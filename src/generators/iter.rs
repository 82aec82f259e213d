//! `__iter__`: a lazy, restartable pass over field values in field-set order.

use std::sync::Arc;

use super::{GenContext, Generator, dunders};
use crate::errors::GenerateError;
use crate::runtime::method::{FieldIter, Method, MethodKind};

pub fn generator() -> Generator {
    Generator::new(dunders::ITER, generate).expecting(MethodKind::Iterate)
}

pub fn generate(cx: &GenContext<'_>) -> Result<Method, GenerateError> {
    let plan = cx.plan();
    let indices: Arc<[usize]> = (0..plan.len()).collect();

    Ok(Method::iterate(move |instance| {
        if plan.owns(instance) {
            FieldIter::new(instance, indices.clone())
        } else {
            FieldIter::new(instance, plan.indices_for(instance).into())
        }
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::runtime::instance::Instance;
    use crate::runtime::value::Value;
    use crate::schema::class::Class;

    #[test]
    fn each_call_is_an_independent_pass() {
        let class = Class::builder("P")
            .generator(generator())
            .field("x", "int")
            .field("y", "int")
            .build()
            .unwrap();
        let mut p = Instance::new(&class);
        p.set("x", 1);
        p.set("y", 2);

        let mut first = p.iter().unwrap();
        assert_eq!(first.next(), Some(&Value::Int(1)));
        let second: Vec<_> = p.iter().unwrap().cloned().collect();
        assert_eq!(second, [Value::Int(1), Value::Int(2)]);
        assert_eq!(first.next(), Some(&Value::Int(2)));
        assert_eq!(first.next(), None);
    }
}
