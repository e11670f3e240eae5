//! File-format collaborators: CSV ingest of batch uploads.
//!
//! Model artifact JSON lives with the model types in
//! [`crate::model::artifact`]; this module only covers tabular observation
//! uploads.

pub mod ingest;
