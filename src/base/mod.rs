//! Foundation types for the remapper.
//!
//! This module provides fundamental types used throughout the engine:
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineIndex`], [`Position`] - Offset to line/column conversion
//! - [`RemapError`] - Fatal errors
//! - Identifier helpers for getter/property naming
//!
//! This module has NO dependencies on other remap modules.

mod error;
mod position;
pub mod text_utils;

pub use error::RemapError;
pub use position::{LineIndex, Position};

// Re-export text-size types for convenience
pub use text_size::{self, TextRange, TextSize};
