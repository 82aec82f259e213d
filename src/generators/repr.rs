//! `__repr__`: `Name(field1=value1, field2=value2, ...)`.

use super::{GenContext, Generator, dunders};
use crate::errors::GenerateError;
use crate::runtime::method::{Method, MethodKind};
use crate::runtime::protocol;

pub fn generator() -> Generator {
    Generator::new(dunders::REPR, generate).expecting(MethodKind::Render)
}

pub fn generate(cx: &GenContext<'_>) -> Result<Method, GenerateError> {
    let plan = cx.plan();
    let prefix = format!("{}(", cx.class().name());
    let labels: Vec<String> = plan.fields().iter().map(|f| format!("{}=", f.name)).collect();
    let capacity = prefix.len() + labels.iter().map(|l| l.len() + 8).sum::<usize>() + 1;

    Ok(Method::render(move |instance| {
        let mut out = String::with_capacity(capacity);
        out.push_str(&prefix);
        for (i, label) in labels.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(label);
            protocol::write_repr(&mut out, plan.require(instance, i)?)?;
        }
        out.push(')');
        Ok(out)
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::errors::{CallError, Error};
    use crate::runtime::instance::Instance;
    use crate::schema::class::Class;

    #[test]
    fn empty_field_set_renders_bare_call() {
        let class = Class::builder("Marker").generator(generator()).build().unwrap();
        assert_eq!(Instance::new(&class).repr().unwrap(), "Marker()");
    }

    #[test]
    fn strings_are_quoted() {
        let class = Class::builder("Holding")
            .generator(generator())
            .field("name", "str")
            .field("shares", "int")
            .build()
            .unwrap();
        let mut h = Instance::new(&class);
        h.set("name", "ACME");
        h.set("shares", 50);
        assert_eq!(h.repr().unwrap(), "Holding(name='ACME', shares=50)");
    }

    #[test]
    fn unset_field_is_an_error() {
        let class = Class::builder("P").generator(generator()).field("x", "int").build().unwrap();
        let err = Instance::new(&class).repr().unwrap_err();
        assert!(matches!(err, Error::Call(CallError::NoSuchField { ref name, .. }) if name == "x"));
    }
}
