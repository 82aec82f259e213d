//! Build-time field sets for plain Rust structs.
//!
//! `#[derive(Clues)]` implements [`Clues`] for a struct, so its field set and field values are
//! available without defining a runtime [`Class`](crate::Class). A field marked `#[clue(base)]`
//! splices in the field set and values of its own (also `Clues`) type, which is how one struct
//! extends another's fields. `#[clue(skip)]` leaves a field out.
//!
//! ```rust
//! use cluegen::Clues;
//!
//! #[derive(Clues)]
//! struct Coordinates {
//!     x: i64,
//!     y: i64,
//! }
//!
//! #[derive(Clues)]
//! struct Coordinates3 {
//!     #[clue(base)]
//!     base: Coordinates,
//!     z: i64,
//! }
//!
//! let c = Coordinates3 { base: Coordinates { x: 1, y: 2 }, z: 3 };
//! assert_eq!(cluegen::render(&c), "Coordinates3(x=1, y=2, z=3)");
//! assert_eq!(Coordinates3::clues().to_string(), "x: i64, y: i64, z: i64");
//! ```
//!
//! Only structs derive `Clues`:
//!
//! ```compile_fail
//! use cluegen::Clues;
//!
//! #[derive(Clues)]
//! enum Shape {
//!     Circle { radius: f64 },
//!     Square { side: f64 },
//! }
//! ```

use std::fmt;

use crate::schema::clues::FieldSet;

/// Field set and field values of a struct, known at build time.
pub trait Clues {
    /// The struct's name, as rendered.
    fn class_name() -> &'static str;

    /// The struct's field set, base fields included.
    fn clues() -> FieldSet;

    /// References to the current field values, in field-set order.
    fn clue_values(&self) -> ClueValues<'_>;
}

/// Named field values in field-set order. A repeated name replaces the earlier value in place.
#[derive(Default)]
pub struct ClueValues<'a> {
    entries: Vec<(&'static str, &'a dyn fmt::Debug)>,
}

impl<'a> ClueValues<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &'static str, value: &'a dyn fmt::Debug) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn extend(&mut self, other: ClueValues<'a>) {
        for (name, value) in other.entries {
            self.push(name, value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'a dyn fmt::Debug)> + '_ {
        self.entries.iter().copied()
    }
}

impl fmt::Debug for ClueValues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter().map(|(n, v)| (n, v))).finish()
    }
}

/// Render `value` as `Name(field=value, ...)` using each field's `Debug` output.
pub fn render<T: Clues>(value: &T) -> String {
    Rendered(value).to_string()
}

/// `Display` adapter behind [`render`].
pub struct Rendered<'a, T>(pub &'a T);

impl<T: Clues> fmt::Display for Rendered<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", T::class_name())?;
        for (i, (name, value)) in self.0.clue_values().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value:?}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_names_replace_in_place() {
        let (a, b, c) = (1, 2, 3);
        let mut values = ClueValues::new();
        values.push("x", &a);
        values.push("y", &b);
        values.push("x", &c);
        assert_eq!(values.names().collect::<Vec<_>>(), ["x", "y"]);
        assert_eq!(format!("{values:?}"), r#"{"x": 3, "y": 2}"#);
    }
}
