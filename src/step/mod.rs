//! Step abstraction: erased interface, metadata, and function adapters.
//!
//! Anything that can be described by a [`StepDescriptor`] and invoked
//! against a [`ValuePool`](crate::core::ValuePool) can be a step; ordinary
//! functions get there through [`step`] and [`deferred`].

pub mod adapter;
pub mod descriptor;

pub use adapter::{deferred, step, DeferredStep, FnStep, Step, StepFn};
pub use descriptor::StepDescriptor;
