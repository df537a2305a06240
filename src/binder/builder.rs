//! Fluent pipeline construction.

use crate::binder::analysis::bind;
use crate::binder::signature::Signature;
use crate::core::error::BindResult;
use crate::core::types::{DefaultedList, ValueList};
use crate::execution::callable::Callable;
use crate::execution::engine::Pipeline;
use crate::step::{DeferredStep, FnStep, Step, StepFn};

/// Builder for assembling a pipeline step by step.
///
/// Steps keep the order they are appended in. Nothing is validated until
/// [`compile`](PipelineBuilder::compile) or [`bind`](PipelineBuilder::bind)
/// runs the wiring analysis.
#[derive(Default)]
pub struct PipelineBuilder {
    steps: Vec<Box<dyn Step>>,
}

impl PipelineBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append an ordinary step.
    pub fn step<F, Args, Out>(mut self, func: F) -> Self
    where
        F: StepFn<Args, Out>,
        Args: ValueList + 'static,
        Out: ValueList + 'static,
    {
        self.steps.push(Box::new(FnStep::new(func)));
        self
    }

    /// Append an ordinary step with an explicit name.
    pub fn step_named<F, Args, Out>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: StepFn<Args, Out>,
        Args: ValueList + 'static,
        Out: ValueList + 'static,
    {
        self.steps.push(Box::new(FnStep::new(func).with_name(name)));
        self
    }

    /// Append a deferred step.
    pub fn deferred<F, Args, Out>(mut self, func: F) -> Self
    where
        F: StepFn<Args, Out>,
        Args: DefaultedList + 'static,
        Out: ValueList + 'static,
    {
        self.steps.push(Box::new(DeferredStep::new(func)));
        self
    }

    /// Append a deferred step with an explicit name.
    pub fn deferred_named<F, Args, Out>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: StepFn<Args, Out>,
        Args: DefaultedList + 'static,
        Out: ValueList + 'static,
    {
        self.steps
            .push(Box::new(DeferredStep::new(func).with_name(name)));
        self
    }

    /// Append a prebuilt step (for custom [`Step`] implementations).
    pub fn push(mut self, step: impl Step + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Number of steps appended so far.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check whether no steps were appended.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Validate against an explicit signature, producing the erased
    /// pipeline.
    pub fn bind(self, signature: Signature) -> BindResult<Pipeline> {
        bind(signature, self.steps)
    }

    /// Validate and wrap into a typed callable of shape `I -> O`.
    pub fn compile<I, O>(self) -> BindResult<Callable<I, O>>
    where
        I: ValueList + 'static,
        O: DefaultedList + 'static,
    {
        crate::execution::callable::compile(self.steps)
    }
}
