//! Conversions between external documents and statement bags.

pub mod json;

pub use json::{CodecError, decode};
