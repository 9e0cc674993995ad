//! Consolidated validation utilities
//!
//! Precondition checks live here so the segmentation stages can assume
//! well-formed input.

pub mod buffer;
pub mod config;

pub use buffer::BufferValidator;
pub use config::ConfigValidator;
