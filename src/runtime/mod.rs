//! Runtime object model: values, instances, methods and the lazy slot tables behind them.

pub mod instance;
pub mod method;
pub mod protocol;
pub(crate) mod slots;
pub mod value;

pub use instance::Instance;
pub use method::{Args, BoundMethod, Comparison, FieldIter, Method, MethodKind};
pub use value::Value;
