//! Method resolution order (C3 linearization).
//!
//! The order decides which ancestor a lookup reaches first and, reversed, the order in which
//! ancestors contribute fields.

use std::collections::VecDeque;

use super::class::ClassRef;
use crate::errors::DefineError;

/// Linearize the ancestors of a class named `class` with direct `bases`.
///
/// The result excludes the class itself (it does not exist yet) and starts with the first base.
pub(crate) fn linearize(class: &str, bases: &[ClassRef]) -> Result<Vec<ClassRef>, DefineError> {
    let mut sequences: Vec<VecDeque<ClassRef>> = bases
        .iter()
        .map(|base| {
            let mut seq = VecDeque::with_capacity(base.mro().len() + 1);
            seq.push_back(base.clone());
            seq.extend(base.mro().iter().cloned());
            seq
        })
        .collect();
    sequences.push(bases.iter().cloned().collect());

    let mut order = Vec::new();
    loop {
        sequences.retain(|seq| !seq.is_empty());
        if sequences.is_empty() {
            return Ok(order);
        }

        // A head is a valid next entry when it does not appear in the tail of any sequence.
        let next = sequences
            .iter()
            .filter_map(|seq| seq.front())
            .find(|head| {
                !sequences
                    .iter()
                    .any(|seq| seq.iter().skip(1).any(|c| c.id() == head.id()))
            })
            .cloned();

        let Some(next) = next else {
            return Err(DefineError::InconsistentHierarchy {
                class: class.to_string(),
                bases: bases.iter().map(|b| b.name()).collect::<Vec<_>>().join(", "),
            });
        };

        for seq in &mut sequences {
            if seq.front().is_some_and(|head| head.id() == next.id()) {
                seq.pop_front();
            }
        }
        order.push(next);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::schema::class::Class;

    fn names(class: &crate::schema::class::ClassRef) -> Vec<&str> {
        class.mro().iter().map(|c| c.name()).collect()
    }

    #[test]
    fn single_chain_is_nearest_first() {
        let a = Class::builder("A").build().unwrap();
        let b = Class::builder("B").base(a.clone()).build().unwrap();
        let c = Class::builder("C").base(b).build().unwrap();
        assert_eq!(names(&c), ["B", "A"]);
    }

    #[test]
    fn diamond_visits_shared_base_last() {
        let o = Class::builder("O").build().unwrap();
        let a = Class::builder("A").base(o.clone()).build().unwrap();
        let b = Class::builder("B").base(o).build().unwrap();
        let d = Class::builder("D").base(a).base(b).build().unwrap();
        assert_eq!(names(&d), ["A", "B", "O"]);
    }

    #[test]
    fn conflicting_orders_are_rejected() {
        let x = Class::builder("X").build().unwrap();
        let y = Class::builder("Y").build().unwrap();
        let a = Class::builder("A").base(x.clone()).base(y.clone()).build().unwrap();
        let b = Class::builder("B").base(y).base(x).build().unwrap();
        let err = Class::builder("Z").base(a).base(b).build().unwrap_err();
        assert!(matches!(
            err,
            crate::errors::DefineError::InconsistentHierarchy { ref class, .. } if class == "Z"
        ));
    }
}
