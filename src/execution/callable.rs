//! The typed callable facade.
//!
//! A [`Callable<I, O>`] wraps a validated pipeline behind the exact shape
//! the signature declares: from a consumer's viewpoint it is a plain
//! function from the input tuple to the output tuple. Cloning a callable is
//! cheap (the pipeline is shared), and concurrent calls are independent.

use crate::binder::analysis::bind;
use crate::binder::signature::Signature;
use crate::core::error::BindResult;
use crate::core::types::{DefaultedList, ValueList};
use crate::execution::engine::{ExecutionStats, Pipeline};
use crate::step::Step;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A compiled pipeline exposed as a function of shape `I -> O`.
///
/// `I` and `O` are the signature's input and output tuples. The callable is
/// `Send + Sync + Clone`: clones share the same immutable pipeline, and each
/// call builds its own value pool.
pub struct Callable<I, O> {
    pipeline: Arc<Pipeline>,
    _shape: PhantomData<fn(I) -> O>,
}

impl<I, O> Callable<I, O>
where
    I: ValueList + 'static,
    O: DefaultedList + 'static,
{
    pub(crate) fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            _shape: PhantomData,
        }
    }

    /// Invoke the pipeline.
    ///
    /// Declared output types that a short-circuited run never produced
    /// resolve to their `Default` values.
    ///
    /// # Panics
    ///
    /// Panics if the underlying pipeline reports a wiring fault. A callable
    /// produced by [`compile`] cannot trigger this: the bind analysis and
    /// the typed input shape rule out every such fault.
    pub fn call(&self, inputs: I) -> O {
        self.call_traced(inputs).0
    }

    /// Invoke the pipeline and also return its execution statistics.
    pub fn call_traced(&self, inputs: I) -> (O, ExecutionStats) {
        match self.pipeline.execute(inputs.into_values()) {
            Ok(outcome) => (O::from_pool_or_default(&outcome.outputs), outcome.stats),
            Err(error) => panic!(
                "pipeline {} wiring invariant violated: {error}",
                self.pipeline.id()
            ),
        }
    }

    /// Access the underlying validated pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

impl<I, O> Clone for Callable<I, O> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            _shape: PhantomData,
        }
    }
}

impl<I, O> fmt::Debug for Callable<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("pipeline", &self.pipeline.id())
            .finish()
    }
}

/// Compile a step list into a typed callable of shape `I -> O`.
///
/// This is the construction entry point: the signature is derived from the
/// type parameters, the step list is validated, and the resulting callable
/// can never fail from missing wiring once in service.
pub fn compile<I, O>(steps: Vec<Box<dyn Step>>) -> BindResult<Callable<I, O>>
where
    I: ValueList + 'static,
    O: DefaultedList + 'static,
{
    let pipeline = bind(Signature::of::<I, O>(), steps)?;
    Ok(Callable::new(pipeline))
}
