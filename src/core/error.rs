//! Error types for typewire.
//!
//! Uses thiserror for structured errors with context. The taxonomy follows
//! the engine's two failure classes:
//! - Bind errors are raised once, at construction time, and are fatal to
//!   building that pipeline.
//! - Execution errors only signal programming faults (arity or wiring
//!   violations); a step's own failure travels through the pool as a
//!   [`Fault`](crate::core::fault::Fault) value instead.

use crate::core::types::TypeToken;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a compiled pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PipelineId(pub Uuid);

impl PipelineId {
    /// Create a new random pipeline ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a pipeline ID from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for PipelineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PipelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Top-level error type for typewire.
///
/// This enum encompasses all error categories and enables automatic
/// conversion from the specific error types.
#[derive(Error, Debug)]
pub enum TypewireError {
    /// Construction-time wiring failure.
    #[error("bind error: {0}")]
    Bind(#[from] BindError),

    /// Call-time programming fault.
    #[error("execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// Plan (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Errors from the construction-time wiring analysis.
///
/// Bind errors are caught before a callable exists, allowing users to fix a
/// misassembled pipeline without reproducing it at run time. They carry the
/// offending step index and the missing type.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BindError {
    /// A step requires a type that nothing before it provides.
    ///
    /// For a deferred step, "before it" means the end of the whole pipeline.
    #[error("step {index} ('{name}') requires a value of type {missing} that neither the pipeline inputs nor any earlier step provides")]
    UnresolvedInput {
        /// Position of the step in declaration order.
        index: usize,
        /// Name of the step.
        name: String,
        /// The input type no provider was found for.
        missing: TypeToken,
    },

    /// A declared output type is never produced.
    #[error("declared output type {missing} is not produced by the pipeline inputs or any step")]
    UnresolvedOutput {
        /// The output type no provider was found for.
        missing: TypeToken,
    },
}

impl BindError {
    /// Index of the offending step, if the error is tied to one.
    pub fn step_index(&self) -> Option<usize> {
        match self {
            BindError::UnresolvedInput { index, .. } => Some(*index),
            BindError::UnresolvedOutput { .. } => None,
        }
    }

    /// The type the binder could not resolve.
    pub fn missing_type(&self) -> TypeToken {
        match self {
            BindError::UnresolvedInput { missing, .. } => *missing,
            BindError::UnresolvedOutput { missing } => *missing,
        }
    }

    /// Get a suggestion for fixing this error.
    pub fn suggested_fix(&self) -> String {
        match self {
            BindError::UnresolvedInput { index, missing, .. } => format!(
                "add a step producing {} before step {}, or add {} to the pipeline inputs",
                missing.short_name(),
                index,
                missing.short_name()
            ),
            BindError::UnresolvedOutput { missing } => format!(
                "add a step producing {}, or remove it from the declared outputs",
                missing.short_name()
            ),
        }
    }
}

/// Errors during pipeline execution.
///
/// Every variant is a programming fault: a validated pipeline invoked
/// through its typed [`Callable`](crate::execution::Callable) can never
/// produce one. They exist so the erased-level
/// [`Pipeline::execute`](crate::execution::Pipeline::execute) stays
/// panic-free when driven by hand.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// Wrong number of input values for the signature.
    #[error("pipeline expects {expected} input values, got {got}")]
    InputArity {
        /// Number of inputs the signature declares.
        expected: usize,
        /// Number of inputs supplied.
        got: usize,
    },

    /// An input value's type does not match the signature at its position.
    #[error("input {index} has type {got}, but the pipeline signature declares {expected}")]
    InputType {
        /// Position of the offending input.
        index: usize,
        /// Type the signature declares at that position.
        expected: TypeToken,
        /// Type actually supplied.
        got: TypeToken,
    },

    /// A step's required type was missing from the pool.
    ///
    /// The binder rules this out for validated pipelines; hitting it means
    /// the step list was mutated or assembled outside the binder.
    #[error("no value of type {missing} was available for step '{step}'")]
    MissingValue {
        /// Name of the step whose argument could not be resolved.
        step: String,
        /// The type that was missing.
        missing: TypeToken,
    },
}

/// Result type alias for typewire operations.
pub type TypewireResult<T> = Result<T, TypewireError>;

/// Result type alias for bind operations.
pub type BindResult<T> = Result<T, BindError>;

/// Result type alias for execution operations.
pub type ExecResult<T> = Result<T, ExecutionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_id_display() {
        let id = PipelineId::new();
        let display = format!("{}", id);
        assert_eq!(display.len(), 8);
    }

    #[test]
    fn test_bind_error_accessors() {
        let error = BindError::UnresolvedInput {
            index: 2,
            name: "decode".to_string(),
            missing: TypeToken::of::<String>(),
        };
        assert_eq!(error.step_index(), Some(2));
        assert_eq!(error.missing_type(), TypeToken::of::<String>());
        assert!(error.suggested_fix().contains("String"));

        let error = BindError::UnresolvedOutput {
            missing: TypeToken::of::<u64>(),
        };
        assert_eq!(error.step_index(), None);
        assert!(error.to_string().contains("u64"));
    }

    #[test]
    fn test_bind_error_serializes() {
        let error = BindError::UnresolvedOutput {
            missing: TypeToken::of::<u64>(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("u64"));
        assert!(json.contains("UnresolvedOutput"));
    }

    #[test]
    fn test_top_level_conversions() {
        let bind: TypewireError = BindError::UnresolvedOutput {
            missing: TypeToken::of::<u64>(),
        }
        .into();
        assert!(matches!(bind, TypewireError::Bind(_)));

        let exec: TypewireError = ExecutionError::InputArity {
            expected: 2,
            got: 0,
        }
        .into();
        assert!(exec.to_string().contains("2 input values"));
    }
}
