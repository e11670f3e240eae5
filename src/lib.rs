//! `transit-vet` library crate.
//!
//! The binary (`tvet`) is a thin wrapper around this library so that:
//!
//! - core pipeline logic is testable without spawning processes
//! - modules are reusable (e.g., a future service front-end or notebooks)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod batch;
pub mod cli;
pub mod curve;
pub mod domain;
pub mod error;
pub mod features;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod validate;
