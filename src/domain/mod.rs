//! Shared domain types for the vetting pipeline.

mod types;

pub use types::*;
