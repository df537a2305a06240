//! The call-time execution engine.
//!
//! A [`Pipeline`] is the validated, immutable product of the binder. Each
//! invocation builds a fresh [`ValuePool`], runs the non-deferred steps in
//! declaration order, stops early when a step leaves a set
//! [`Fault`](crate::core::Fault) in the pool, snapshots the declared
//! outputs, and finally runs the deferred steps.

use crate::binder::plan::PipelinePlan;
use crate::binder::signature::Signature;
use crate::core::error::{ExecResult, ExecutionError, PipelineId};
use crate::core::fault::Fault;
use crate::core::pool::ValuePool;
use crate::core::types::BoxedValue;
use crate::step::{Step, StepDescriptor};
use log::{debug, trace};
use std::fmt;
use std::time::{Duration, Instant};

/// A validated pipeline: the ordered step list plus the target signature.
///
/// Pipelines are created by [`bind`](crate::binder::bind) and reused for
/// every invocation. The structure is read-only after construction and may
/// be shared freely across threads; all mutable state is the per-call pool.
pub struct Pipeline {
    id: PipelineId,
    signature: Signature,
    steps: Vec<Box<dyn Step>>,
}

impl Pipeline {
    /// Only the binder builds pipelines: construction implies the step list
    /// already passed the wiring analysis.
    pub(crate) fn new(signature: Signature, steps: Vec<Box<dyn Step>>) -> Self {
        Self {
            id: PipelineId::new(),
            signature,
            steps,
        }
    }

    /// Identifier of this compiled pipeline.
    pub fn id(&self) -> PipelineId {
        self.id
    }

    /// The target signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Number of steps, deferred included.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check whether the pipeline has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Descriptors of all steps, in declaration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &StepDescriptor> + '_ {
        self.steps.iter().map(|step| step.descriptor())
    }

    /// Serializable description of this pipeline.
    pub fn plan(&self) -> PipelinePlan {
        PipelinePlan::from_pipeline(self)
    }

    /// Execute the pipeline with erased input values.
    ///
    /// The inputs must match the signature's input list in number and type,
    /// in order. Returns the invocation outcome: the declared outputs
    /// (snapshotted before deferred steps ran), the final pool, and
    /// execution statistics.
    ///
    /// An `Err` here is a programming fault, not a step failure — step
    /// failures travel through the pool as [`Fault`] values and only
    /// truncate the run.
    pub fn execute(&self, inputs: Vec<BoxedValue>) -> ExecResult<ExecutionOutcome> {
        let declared = self.signature.inputs();
        if inputs.len() != declared.len() {
            return Err(ExecutionError::InputArity {
                expected: declared.len(),
                got: inputs.len(),
            });
        }

        let mut pool = ValuePool::with_capacity(declared.len() + self.steps.len());
        for (index, value) in inputs.into_iter().enumerate() {
            if value.token() != declared[index] {
                return Err(ExecutionError::InputType {
                    index,
                    expected: declared[index],
                    got: value.token(),
                });
            }
            pool.insert(value);
        }

        let start = Instant::now();
        let mut stats = ExecutionStats::default();

        for (index, step) in self.steps.iter().enumerate() {
            let descriptor = step.descriptor();
            if descriptor.deferred {
                continue;
            }

            trace!(
                "pipeline {}: running step {} '{}'",
                self.id,
                index,
                descriptor.name
            );
            let outputs = step.invoke(&pool)?;
            stats.steps_executed += 1;

            let mut tripped = false;
            for value in outputs {
                if let Some(fault) = value.downcast_ref::<Fault>() {
                    tripped |= fault.is_set();
                }
                // A later output of the same type overwrites; the fault
                // itself stays in the pool for deferred steps to read.
                pool.insert(value);
            }

            if tripped {
                debug!(
                    "pipeline {}: step {} '{}' produced a set fault, skipping remaining steps",
                    self.id, index, descriptor.name
                );
                stats.short_circuited_at = Some(index);
                break;
            }
        }

        // Snapshot the declared outputs now: deferred steps may write the
        // same types, but those insertions are diagnostic only and must not
        // change what the caller receives.
        let mut outputs = ValuePool::with_capacity(self.signature.outputs().len());
        for token in self.signature.outputs() {
            if let Some(value) = pool.get(*token) {
                outputs.insert(value.clone());
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            let descriptor = step.descriptor();
            if !descriptor.deferred {
                continue;
            }

            trace!(
                "pipeline {}: running deferred step {} '{}'",
                self.id,
                index,
                descriptor.name
            );
            let produced = step.invoke(&pool)?;
            pool.insert_all(produced);
            stats.deferred_executed += 1;
        }

        stats.total_duration = start.elapsed();
        Ok(ExecutionOutcome {
            outputs,
            pool,
            stats,
        })
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("id", &self.id)
            .field(
                "steps",
                &self
                    .steps
                    .iter()
                    .map(|step| step.descriptor().name.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Result of one pipeline invocation.
#[derive(Debug)]
pub struct ExecutionOutcome {
    /// Declared output values, snapshotted before deferred steps ran.
    ///
    /// Output types a short-circuited run never produced are absent here;
    /// the typed [`Callable`](crate::execution::Callable) resolves them to
    /// their `Default` values.
    pub outputs: ValuePool,
    /// The full value pool at the end of the run, deferred outputs included.
    pub pool: ValuePool,
    /// Execution statistics.
    pub stats: ExecutionStats,
}

/// Execution statistics for one invocation.
#[derive(Debug, Clone, Default)]
pub struct ExecutionStats {
    /// Number of non-deferred steps that ran.
    pub steps_executed: usize,
    /// Number of deferred steps that ran.
    pub deferred_executed: usize,
    /// Index of the step whose set fault truncated the run, if any.
    pub short_circuited_at: Option<usize>,
    /// Total wall-clock time of the invocation.
    pub total_duration: Duration,
}

impl ExecutionStats {
    /// Whether the run was truncated by a set fault.
    pub fn short_circuited(&self) -> bool {
        self.short_circuited_at.is_some()
    }
}
