//! Host protocols layered over slots: representation and equality.
//!
//! Generated methods call back into these for field values, so nested instances render and compare
//! through their own classes' slots.

use std::fmt::Write as _;
use std::sync::Arc;

use super::instance::Instance;
use super::value::Value;
use crate::errors::Error;

/// Render `value` the way the host's `repr()` would.
pub fn repr(value: &Value) -> Result<String, Error> {
    let mut out = String::new();
    write_repr(&mut out, value)?;
    Ok(out)
}

pub(crate) fn write_repr(out: &mut String, value: &Value) -> Result<(), Error> {
    match value {
        Value::None => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Int(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Float(x) => write_float(out, *x),
        Value::Str(s) => write_str_literal(out, s),
        Value::List(items) => {
            out.push('[');
            write_items(out, items)?;
            out.push(']');
        }
        Value::Tuple(items) => {
            out.push('(');
            write_items(out, items)?;
            if items.len() == 1 {
                out.push(',');
            }
            out.push(')');
        }
        Value::Dict(entries) => {
            out.push('{');
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_str_literal(out, key);
                out.push_str(": ");
                write_repr(out, item)?;
            }
            out.push('}');
        }
        Value::Instance(instance) => {
            if instance.class().is_pending(crate::generators::dunders::REPR).is_none() {
                out.push_str(&default_repr(instance));
            } else {
                out.push_str(&instance.repr()?);
            }
        }
    }
    Ok(())
}

fn write_items(out: &mut String, items: &[Value]) -> Result<(), Error> {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_repr(out, item)?;
    }
    Ok(())
}

fn write_float(out: &mut String, x: f64) {
    if x.is_nan() {
        out.push_str("nan");
    } else if x.is_infinite() {
        out.push_str(if x > 0.0 { "inf" } else { "-inf" });
    } else {
        // Exponent form below 1e-4 and from 1e16 up, with a signed exponent of at least two digits.
        let scientific = format!("{x:e}");
        match scientific.split_once('e').map(|(mantissa, exp)| (mantissa, exp.parse::<i32>())) {
            Some((mantissa, Ok(exp))) if !(-4..16).contains(&exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                let _ = write!(out, "{mantissa}e{sign}{:02}", exp.unsigned_abs());
            }
            // Debug formatting always keeps a fractional part for integral floats.
            _ => {
                let _ = write!(out, "{x:?}");
            }
        }
    }
}

/// Single quotes unless the text contains a single quote and no double quote.
fn write_str_literal(out: &mut String, s: &str) {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    out.push(quote);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

/// Integer value of an `Int`, or of a `Bool` as 0 or 1.
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Int(n) => Some(*n),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Exact comparison, without rounding `n` to the nearest float.
fn int_equals_float(n: i64, x: f64) -> bool {
    // 2^63; every integral float in [-2^63, 2^63) converts to i64 exactly.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    x.fract() == 0.0 && (-LIMIT..LIMIT).contains(&x) && x as i64 == n
}

/// Representation of an instance whose class binds no `__repr__`.
pub fn default_repr(instance: &Instance) -> String {
    format!("<{} object>", instance.class().name())
}

/// Compare two values the way the host's `==` does.
///
/// For instances the left operand's `__eq__` is tried first, then the right operand's (reflected);
/// if both decline, the operands are equal only if they are the same instance.
pub fn equals(left: &Value, right: &Value) -> Result<bool, Error> {
    match (left, right) {
        (Value::Instance(a), _) => {
            if let Some(result) = a.equals(right)?.as_bool() {
                return Ok(result);
            }
            if let Value::Instance(b) = right {
                if let Some(result) = b.equals(left)?.as_bool() {
                    return Ok(result);
                }
                return Ok(Arc::ptr_eq(a, b));
            }
            Ok(false)
        }
        (_, Value::Instance(b)) => Ok(b.equals(left)?.as_bool().unwrap_or(false)),
        (Value::None, Value::None) => Ok(true),
        (Value::Float(a), Value::Float(b)) => Ok(a == b),
        (Value::Float(x), n) | (n, Value::Float(x)) => Ok(as_integer(n).is_some_and(|n| int_equals_float(n, *x))),
        (Value::Int(_) | Value::Bool(_), Value::Int(_) | Value::Bool(_)) => Ok(as_integer(left) == as_integer(right)),
        (Value::Str(a), Value::Str(b)) => Ok(a == b),
        (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => sequences_equal(a, b),
        (Value::Dict(a), Value::Dict(b)) => {
            if a.len() != b.len() {
                return Ok(false);
            }
            for (key, item) in a {
                match b.iter().find(|(k, _)| k == key) {
                    Some((_, other)) if equals(item, other)? => {}
                    _ => return Ok(false),
                }
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Pairwise comparison, stopping at the first unequal pair.
pub(crate) fn sequences_equal(a: &[Value], b: &[Value]) -> Result<bool, Error> {
    if a.len() != b.len() {
        return Ok(false);
    }
    for (x, y) in a.iter().zip(b) {
        if !equals(x, y)? {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_special_values() {
        assert_eq!(repr(&Value::Float(f64::INFINITY)).ok().as_deref(), Some("inf"));
        assert_eq!(repr(&Value::Float(f64::NAN)).ok().as_deref(), Some("nan"));
    }

    #[test]
    fn float_exponent_form_matches_host() {
        let cases = [
            (1e20, "1e+20"),
            (1e16, "1e+16"),
            (1.5e16, "1.5e+16"),
            (-2.5e300, "-2.5e+300"),
            (1e-5, "1e-05"),
            (1.25e-7, "1.25e-07"),
            (9999999999999998.0, "9999999999999998.0"),
            (123456.0, "123456.0"),
            (0.0001, "0.0001"),
            (0.5, "0.5"),
            (0.0, "0.0"),
        ];
        for (x, expected) in cases {
            assert_eq!(repr(&Value::Float(x)).ok().as_deref(), Some(expected), "repr of {x:e}");
        }
    }

    #[test]
    fn int_float_comparison_is_exact() {
        let big = 1_i64 << 53;
        assert_eq!(equals(&Value::Int(big + 1), &Value::Float(big as f64)).ok(), Some(false));
        assert_eq!(equals(&Value::Float(big as f64), &Value::Int(big)).ok(), Some(true));
        assert_eq!(equals(&Value::Int(i64::MAX), &Value::Float(9.223372036854775807e18)).ok(), Some(false));
        assert_eq!(equals(&Value::Int(2), &Value::Float(2.5)).ok(), Some(false));
        assert_eq!(equals(&Value::Int(0), &Value::Float(f64::NAN)).ok(), Some(false));
    }

    #[test]
    fn bools_compare_as_integers() {
        assert_eq!(equals(&Value::Bool(true), &Value::Int(1)).ok(), Some(true));
        assert_eq!(equals(&Value::Int(0), &Value::Bool(false)).ok(), Some(true));
        assert_eq!(equals(&Value::Bool(false), &Value::Float(0.0)).ok(), Some(true));
        assert_eq!(equals(&Value::Bool(true), &Value::Int(2)).ok(), Some(false));
        assert_eq!(equals(&Value::Bool(true), &Value::None).ok(), Some(false));
    }

    #[test]
    fn string_escapes() {
        assert_eq!(repr(&Value::from("a\nb")).ok().as_deref(), Some("'a\\nb'"));
        assert_eq!(repr(&Value::from("'\"")).ok().as_deref(), Some("'\\'\"'"));
    }

    #[test]
    fn dict_equality_ignores_order() {
        let a = Value::Dict(vec![("x".into(), Value::Int(1)), ("y".into(), Value::Int(2))]);
        let b = Value::Dict(vec![("y".into(), Value::Int(2)), ("x".into(), Value::Int(1))]);
        assert_eq!(equals(&a, &b).ok(), Some(true));
    }

    #[test]
    fn lists_and_tuples_do_not_mix() {
        let list = Value::List(vec![Value::Int(1)]);
        let tuple = Value::Tuple(vec![Value::Int(1)]);
        assert_eq!(equals(&list, &tuple).ok(), Some(false));
    }
}
