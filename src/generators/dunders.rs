//! Slot names the built-in generators fill.

pub const INIT: &str = "__init__";
pub const REPR: &str = "__repr__";
pub const ITER: &str = "__iter__";
pub const EQ: &str = "__eq__";
