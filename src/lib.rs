//! # Typewire - Type-directed Pipeline Composition
//!
//! Typewire builds a callable implementing a statically specified function
//! signature by composing an ordered list of step-functions, wiring each
//! step's inputs automatically from the values available at that point in
//! the pipeline, matched purely by value type.
//!
//! ## Features
//!
//! - **Type-directed Wiring**: Step arguments are resolved from a type-keyed
//!   pool of values - no manual threading of intermediate results
//! - **Validated Construction**: A forward reachability pass rejects
//!   unsatisfiable pipelines before a callable exists
//! - **Short-circuiting**: A step returning a set [`Fault`](core::Fault)
//!   stops the remaining ordinary steps
//! - **Deferred Steps**: Cleanup steps that always run last, even after a
//!   short-circuit
//! - **Concurrent Invocation**: A compiled [`Callable`](execution::Callable)
//!   is `Send + Sync + Clone`; every call gets its own value pool
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use typewire::prelude::*;
//!
//! #[derive(Clone, Default)]
//! struct Request(String);
//! #[derive(Clone, Default)]
//! struct User(u32);
//! #[derive(Clone, Default)]
//! struct Response(String);
//!
//! let handler = PipelineBuilder::new()
//!     .step_named("auth", |req: Request| (User(1), Fault::none()))
//!     .step_named("respond", |user: User| (Response(format!("hi {}", user.0)),))
//!     .deferred_named("audit", |resp: Response, fault: Fault| ())
//!     .compile::<(Request,), (Response,)>()?;
//!
//! let (response,) = handler.call((Request("/me".into()),));
//! ```
//!
//! ## Architecture
//!
//! The library is organized into four modules:
//!
//! - [`core`]: Type tokens, erased values, the value pool, faults, errors
//! - [`step`]: The step trait and function adapters
//! - [`binder`]: Construction-time validation, the builder, pipeline plans
//! - [`execution`]: The call-time engine and the typed callable
//!
//! ## Writing Steps
//!
//! Any `Fn` closure or fn item of arity 0-6 is a step, as long as every
//! parameter type is `Clone + Send + 'static` and the return type is a
//! tuple of such values: `()` for none, `(T,)` for one, `(T, U)` for two.
//! A fallible step returns its error as data, usually as a
//! `(value, Fault)` pair built with [`Fault::capture`](core::Fault::capture):
//!
//! ```rust,ignore
//! fn decode(req: Request) -> (Payload, Fault) {
//!     Fault::capture(serde_json::from_str(&req.body))
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binder;
pub mod core;
pub mod execution;
pub mod step;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use typewire::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::fault::Fault;
    pub use crate::core::pool::ValuePool;
    pub use crate::core::types::{BoxedValue, DefaultedList, PoolValue, TypeToken, ValueList};

    // Errors
    pub use crate::core::error::{
        BindError, BindResult, ExecResult, ExecutionError, PipelineId, TypewireError,
        TypewireResult,
    };

    // Steps
    pub use crate::step::{deferred, step, DeferredStep, FnStep, Step, StepFn, StepDescriptor};

    // Binder
    pub use crate::binder::{bind, PipelineBuilder, PipelinePlan, Signature, StepPlan};

    // Execution
    pub use crate::execution::{compile, Callable, ExecutionOutcome, ExecutionStats, Pipeline};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
