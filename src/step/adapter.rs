//! The step trait and function adapters.
//!
//! [`Step`] is the erased interface the binder validates and the executor
//! drives. Ordinary functions and closures become steps through [`StepFn`]:
//! at registration the adapter captures the parameter and return type
//! tokens, so no reflection is needed at call time — resolving arguments is
//! a series of token lookups in the pool.
//!
//! A step's return type is always a value tuple: `()` for a side-effecting
//! step, `(T,)` for one output, `(T, U)` for two, and so on.

use crate::core::error::{ExecResult, ExecutionError};
use crate::core::pool::ValuePool;
use crate::core::types::{short_type_name, BoxedValue, DefaultedList, TypeToken, ValueList};
use crate::step::descriptor::StepDescriptor;
use std::marker::PhantomData;

/// The erased step interface.
///
/// # Thread Safety
///
/// `Send + Sync` bounds allow a compiled pipeline to be invoked from many
/// threads at once; `invoke` takes `&self` and all per-call state lives in
/// the pool passed to it.
pub trait Step: Send + Sync {
    /// Get the metadata for this step.
    ///
    /// The descriptor must stay consistent across calls; the binder trusts
    /// it when validating the wiring.
    fn descriptor(&self) -> &StepDescriptor;

    /// Resolve arguments from the pool, run the step, and return its
    /// outputs in declaration order.
    ///
    /// For non-deferred steps a missing argument type is reported as
    /// [`ExecutionError::MissingValue`]; validated pipelines never hit it.
    fn invoke(&self, pool: &ValuePool) -> ExecResult<Vec<BoxedValue>>;
}

/// Adapter trait for functions usable as steps.
///
/// Implemented for `Fn` closures and fn items of arity 0 through 6 whose
/// return type is a [`ValueList`] tuple. `Args` is the parameter tuple and
/// `Out` the return tuple; both are inferred, so user code just passes the
/// function itself.
pub trait StepFn<Args, Out>: Send + Sync + 'static {
    /// Call the function with a packed argument tuple.
    fn apply(&self, args: Args) -> Out;
}

macro_rules! impl_step_fn {
    ($($name:ident),*) => {
        impl<Func, Out, $($name,)*> StepFn<($($name,)*), Out> for Func
        where
            Func: Fn($($name),*) -> Out + Send + Sync + 'static,
        {
            #[allow(non_snake_case)]
            fn apply(&self, args: ($($name,)*)) -> Out {
                let ($($name,)*) = args;
                (self)($($name),*)
            }
        }
    };
}

impl_step_fn!();
impl_step_fn!(A);
impl_step_fn!(A, B);
impl_step_fn!(A, B, C);
impl_step_fn!(A, B, C, D);
impl_step_fn!(A, B, C, D, E);
impl_step_fn!(A, B, C, D, E, F);

/// An ordinary (non-deferred) step wrapping a function.
///
/// Arguments are resolved by token lookup; the binder guarantees every
/// lookup succeeds for a validated pipeline.
pub struct FnStep<F, Args, Out> {
    func: F,
    descriptor: StepDescriptor,
    _shape: PhantomData<fn(Args) -> Out>,
}

impl<F, Args, Out> FnStep<F, Args, Out>
where
    F: StepFn<Args, Out>,
    Args: ValueList + 'static,
    Out: ValueList + 'static,
{
    /// Wrap a function, deriving the step name from its type name.
    pub fn new(func: F) -> Self {
        Self {
            descriptor: StepDescriptor::new(
                short_type_name(std::any::type_name::<F>()),
                Args::tokens(),
                Out::tokens(),
                false,
            ),
            func,
            _shape: PhantomData,
        }
    }

    /// Set a human-readable name.
    ///
    /// Closures get the unhelpful default `{{closure}}`; name them.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.descriptor.name = name.into();
        self
    }
}

impl<F, Args, Out> Step for FnStep<F, Args, Out>
where
    F: StepFn<Args, Out>,
    Args: ValueList + 'static,
    Out: ValueList + 'static,
{
    fn descriptor(&self) -> &StepDescriptor {
        &self.descriptor
    }

    fn invoke(&self, pool: &ValuePool) -> ExecResult<Vec<BoxedValue>> {
        let args = match Args::from_pool(pool) {
            Some(args) => args,
            None => return Err(missing_value(&self.descriptor, pool)),
        };
        Ok(self.func.apply(args).into_values())
    }
}

/// A deferred step wrapping a function.
///
/// Deferred steps run once after every non-deferred step, whether or not
/// the main sequence short-circuited. Each argument resolves to the latest
/// pool value of its type, or to the type's `Default` when nothing produced
/// it — the zero-value placeholder a cleanup step must tolerate.
pub struct DeferredStep<F, Args, Out> {
    func: F,
    descriptor: StepDescriptor,
    _shape: PhantomData<fn(Args) -> Out>,
}

impl<F, Args, Out> DeferredStep<F, Args, Out>
where
    F: StepFn<Args, Out>,
    Args: DefaultedList + 'static,
    Out: ValueList + 'static,
{
    /// Wrap a function, deriving the step name from its type name.
    pub fn new(func: F) -> Self {
        Self {
            descriptor: StepDescriptor::new(
                short_type_name(std::any::type_name::<F>()),
                Args::tokens(),
                Out::tokens(),
                true,
            ),
            func,
            _shape: PhantomData,
        }
    }

    /// Set a human-readable name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.descriptor.name = name.into();
        self
    }
}

impl<F, Args, Out> Step for DeferredStep<F, Args, Out>
where
    F: StepFn<Args, Out>,
    Args: DefaultedList + 'static,
    Out: ValueList + 'static,
{
    fn descriptor(&self) -> &StepDescriptor {
        &self.descriptor
    }

    fn invoke(&self, pool: &ValuePool) -> ExecResult<Vec<BoxedValue>> {
        let args = Args::from_pool_or_default(pool);
        Ok(self.func.apply(args).into_values())
    }
}

/// Wrap a function as an ordinary step.
pub fn step<F, Args, Out>(func: F) -> FnStep<F, Args, Out>
where
    F: StepFn<Args, Out>,
    Args: ValueList + 'static,
    Out: ValueList + 'static,
{
    FnStep::new(func)
}

/// Wrap a function as a deferred step.
///
/// The binder exempts deferred steps from the ordering rule (their inputs
/// are checked against everything the whole pipeline can produce), and the
/// executor runs them last, in declaration order, even after a
/// short-circuit.
pub fn deferred<F, Args, Out>(func: F) -> DeferredStep<F, Args, Out>
where
    F: StepFn<Args, Out>,
    Args: DefaultedList + 'static,
    Out: ValueList + 'static,
{
    DeferredStep::new(func)
}

fn missing_value(descriptor: &StepDescriptor, pool: &ValuePool) -> ExecutionError {
    let missing = descriptor
        .inputs
        .iter()
        .copied()
        .find(|token| !pool.contains(*token))
        .unwrap_or_else(TypeToken::of::<()>);
    ExecutionError::MissingValue {
        step: descriptor.name.clone(),
        missing,
    }
}
