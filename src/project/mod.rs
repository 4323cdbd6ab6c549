//! Run-level driver: configuration and multi-file processing.

mod config;
mod transformer;

pub use config::RemapConfig;
pub use transformer::{RemapOutput, Source, Transformer};

pub use crate::remap::FileResult;
