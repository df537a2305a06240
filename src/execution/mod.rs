//! Call-time execution.
//!
//! This module owns the value-routing engine and the typed facade over it.

pub mod callable;
pub mod engine;

pub use callable::{compile, Callable};
pub use engine::{ExecutionOutcome, ExecutionStats, Pipeline};
