//! `__init__`: one positional-or-keyword parameter per field, in field-set order.
//!
//! A class constant named like a field (visible through the MRO) becomes that parameter's default.
//! As in a hand-written signature, a parameter without a default may not follow one with a default;
//! such a field set fails to generate.

use std::sync::Arc;

use super::{GenContext, Generator, dunders};
use crate::errors::{CallError, Error, GenerateError};
use crate::runtime::instance::Instance;
use crate::runtime::method::{Args, Method, MethodKind};
use crate::runtime::value::Value;
use crate::schema::class::{ClassId, ClassRef};

pub fn generator() -> Generator {
    Generator::new(dunders::INIT, generate).expecting(MethodKind::Construct)
}

#[derive(Debug)]
struct Param {
    name: String,
    default: Option<Value>,
}

pub fn generate(cx: &GenContext<'_>) -> Result<Method, GenerateError> {
    let mut params = Vec::with_capacity(cx.clues().len());
    let mut seen_default: Option<&str> = None;
    for field in cx.clues() {
        let default = cx.class().constant(&field.name).cloned();
        match (&default, seen_default) {
            (Some(_), _) => seen_default = Some(field.name.as_str()),
            (None, Some(previous)) => {
                return Err(GenerateError::failed(format!(
                    "non-default argument '{}' follows default argument '{previous}'",
                    field.name
                )));
            }
            (None, None) => {}
        }
        params.push(Param {
            name: field.name.clone(),
            default,
        });
    }

    let params: Arc<[Param]> = params.into();
    let owner = cx.class().id();
    Ok(Method::construct(move |class, args| bind(owner, &params, class, args)))
}

fn bind(owner: ClassId, params: &[Param], class: &ClassRef, args: Args) -> Result<Instance, Error> {
    let Args { positional, keywords } = args;
    if positional.len() > params.len() {
        return Err(CallError::TooManyArguments {
            class: class.name().to_string(),
            expected: params.len(),
            given: positional.len(),
        }
        .into());
    }

    let mut values: Vec<Option<Value>> = positional.into_iter().map(Some).collect();
    values.resize(params.len(), None);

    for (name, value) in keywords {
        let Some(index) = params.iter().position(|p| p.name == name) else {
            return Err(CallError::UnexpectedKeyword {
                class: class.name().to_string(),
                name,
            }
            .into());
        };
        if values[index].is_some() {
            return Err(CallError::MultipleValues {
                class: class.name().to_string(),
                name,
            }
            .into());
        }
        values[index] = Some(value);
    }

    let values = values
        .into_iter()
        .zip(params)
        .map(|(value, param)| {
            value
                .or_else(|| param.default.clone())
                .ok_or_else(|| CallError::MissingArgument {
                    class: class.name().to_string(),
                    name: param.name.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if class.id() == owner {
        return Ok(Instance::from_values(class, values));
    }
    // Constructing a different class than the one this method was generated for.
    let mut instance = Instance::new(class);
    for (param, value) in params.iter().zip(values) {
        instance.set(&param.name, value);
    }
    Ok(instance)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::schema::class::Class;

    fn point() -> ClassRef {
        Class::builder("Point")
            .generator(generator())
            .field("x", "int")
            .field("y", "int")
            .build()
            .unwrap()
    }

    #[test]
    fn positional_and_keyword_arguments_mix() {
        let p = point().instantiate(Args::positional([1]).kwarg("y", 2)).unwrap();
        assert_eq!(p.get("x"), Some(&Value::Int(1)));
        assert_eq!(p.get("y"), Some(&Value::Int(2)));
    }

    #[test]
    fn too_many_arguments() {
        let err = point().instantiate(Args::positional([1, 2, 3])).unwrap_err();
        assert_eq!(
            err,
            Error::Call(CallError::TooManyArguments {
                class: "Point".into(),
                expected: 2,
                given: 3
            })
        );
    }

    #[test]
    fn keyword_errors() {
        let class = point();
        let err = class.instantiate(Args::positional([1]).kwarg("x", 2)).unwrap_err();
        assert!(matches!(err, Error::Call(CallError::MultipleValues { ref name, .. }) if name == "x"));

        let err = class.instantiate(Args::positional([1, 2]).kwarg("z", 3)).unwrap_err();
        assert!(matches!(err, Error::Call(CallError::UnexpectedKeyword { ref name, .. }) if name == "z"));

        let err = class.instantiate(Args::positional([1])).unwrap_err();
        assert!(matches!(err, Error::Call(CallError::MissingArgument { ref name, .. }) if name == "y"));
    }

    #[test]
    fn class_constants_supply_defaults() {
        let class = Class::builder("Coordinates")
            .generator(generator())
            .field("x", "int")
            .field_with_default("y", "int", 23)
            .build()
            .unwrap();
        let c = class.instantiate(Args::positional([2])).unwrap();
        assert_eq!(c.get("y"), Some(&Value::Int(23)));
    }

    #[test]
    fn required_after_default_fails_to_generate() {
        let base = Class::builder("Base")
            .generator(generator())
            .field_with_default("a", "int", 1)
            .build()
            .unwrap();
        let derived = Class::builder("Derived").base(base).field("b", "int").build().unwrap();
        let err = derived.instantiate(Args::positional([1, 2])).unwrap_err();
        assert!(matches!(
            err,
            Error::Lookup(crate::errors::LookupError::Generation { ref class, .. }) if class == "Derived"
        ));
        assert_eq!(derived.is_pending(dunders::INIT), Some(true));
    }
}
