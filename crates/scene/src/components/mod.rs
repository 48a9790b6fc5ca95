pub mod anchor;
pub mod arrow;
pub mod transform;

pub use anchor::*;
pub use arrow::*;
pub use transform::*;
