mod dataset;
mod value;

pub use dataset::{Column, Dataset};
pub use value::{format_float, DType, Timestamp, Value, ValueKey};
