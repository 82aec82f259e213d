//! Property-based tests for field sets and the generated behaviors
//!
//! These tests use proptest to check invariants over randomly generated hierarchies and field
//! values.

use cluegen::{Args, Class, ClassRef, Value, capabilities};
use proptest::prelude::*;

/// Distinct lowercase field names.
fn field_names(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z][a-z0-9_]{0,6}", 0..max).prop_map(|set| set.into_iter().collect())
}

fn define(name: &str, base: Option<&ClassRef>, fields: &[String]) -> ClassRef {
    let mut builder = Class::builder(name);
    builder = match base {
        Some(base) => builder.base(base.clone()),
        None => builder.base(capabilities::datum()),
    };
    for field in fields {
        builder = builder.field(field.clone(), "int");
    }
    builder.build().unwrap()
}

proptest! {
    /// Property: a subclass's field set is the parent's followed by its new names.
    #[test]
    fn subclass_field_set_concatenates(parent in field_names(6), child in field_names(6)) {
        let base = define("Parent", None, &parent);
        let derived = define("Child", Some(&base), &child);

        let mut expected = parent.clone();
        for name in &child {
            if !expected.contains(name) {
                expected.push(name.clone());
            }
        }
        prop_assert_eq!(derived.clues().names().collect::<Vec<_>>(), expected);
    }

    /// Property: construction then iteration returns the arguments in order.
    #[test]
    fn iteration_returns_constructor_arguments(values in prop::collection::vec(any::<i64>(), 0..8)) {
        let names: Vec<String> = (0..values.len()).map(|i| format!("f{i}")).collect();
        let class = define("Row", None, &names);

        let row = class.instantiate(Args::positional(values.iter().copied())).unwrap();
        let back: Vec<i64> = row.iter().unwrap().map(|v| v.as_int().unwrap()).collect();
        prop_assert_eq!(back, values);
    }

    /// Property: the representation names every field in field-set order.
    #[test]
    fn repr_lists_fields_in_order(values in prop::collection::vec(-1000i64..1000, 1..6)) {
        let names: Vec<String> = (0..values.len()).map(|i| format!("f{i}")).collect();
        let class = define("Row", None, &names);
        let row = class.instantiate(Args::positional(values.iter().copied())).unwrap();

        let body = names
            .iter()
            .zip(&values)
            .map(|(n, v)| format!("{n}={v}"))
            .collect::<Vec<_>>()
            .join(", ");
        prop_assert_eq!(row.repr().unwrap(), format!("Row({body})"));
    }

    /// Property: equality agrees with equality of the field values.
    #[test]
    fn equality_follows_field_values(a in prop::collection::vec(0i64..3, 3), b in prop::collection::vec(0i64..3, 3)) {
        let class = define("Triple", None, &["x".to_string(), "y".to_string(), "z".to_string()]);
        let left = Value::from(class.instantiate(Args::positional(a.iter().copied())).unwrap());
        let right = Value::from(class.instantiate(Args::positional(b.iter().copied())).unwrap());
        prop_assert_eq!(left == right, a == b);
        prop_assert_eq!(right == left, a == b);
    }

    /// Property: string fields render as quoted literals that survive any content.
    #[test]
    fn string_fields_render_quoted(text in "\\PC{0,12}") {
        let class = define("Label", None, &["text".to_string()]);
        let label = class.instantiate(Args::positional([text.as_str()])).unwrap();
        let repr = label.repr().unwrap();
        prop_assert!(repr.starts_with("Label(text="));
        prop_assert!(repr.ends_with("')") || repr.ends_with("\")"));
    }
}
