//! Core types and traits for the typewire composition engine.
//!
//! This module contains the foundational pieces the binder and executor are
//! built from:
//! - Type tokens and type-erased values
//! - The per-invocation value pool
//! - The error-carrying [`Fault`] value
//! - Error types

pub mod error;
pub mod fault;
pub mod pool;
pub mod types;

// Re-export commonly used types
pub use error::{BindError, ExecutionError, PipelineId, TypewireError};
pub use fault::Fault;
pub use pool::ValuePool;
pub use types::{BoxedValue, DefaultedList, PoolValue, TypeToken, ValueList};
