//! Data model: declared shapes, bound values and the describe capability

pub mod describe;
pub mod json;
pub mod shape;
pub mod value;

pub use describe::{Describe, shape_of};
pub use json::decode_key;
pub use shape::{FieldShape, FloatWidth, IntWidth, RecordRef, RecordShape, Shape, UintWidth};
pub use value::{DATE_TIME_FORMAT, Value};
