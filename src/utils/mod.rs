//! Shared validation and parsing helpers

pub mod color;
pub mod validation;

pub use color::ColorParser;
pub use validation::{BufferValidator, ConfigValidator};
