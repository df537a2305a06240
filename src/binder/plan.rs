//! Pipeline plans for inspection and diagnostics.
//!
//! A plan is a serializable snapshot of a compiled pipeline: the signature
//! shape, every step's name and type lists, and the deferred flags. Plans
//! are one-way — the engine never turns a plan back into an executable
//! pipeline, since the function bodies are not serializable.

use crate::execution::engine::Pipeline;
use serde::{Deserialize, Serialize};

/// Serializable representation of one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepPlan {
    /// Position in declaration order.
    pub index: usize,
    /// Step name.
    pub name: String,
    /// Full type paths the step consumes.
    pub inputs: Vec<String>,
    /// Full type paths the step produces.
    pub outputs: Vec<String>,
    /// Whether the step is deferred.
    pub deferred: bool,
}

/// Serializable representation of a compiled pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelinePlan {
    /// Plan format version.
    pub version: String,
    /// Identifier of the pipeline the plan was taken from.
    pub pipeline_id: String,
    /// Full type paths of the signature inputs.
    pub inputs: Vec<String>,
    /// Full type paths of the signature outputs.
    pub outputs: Vec<String>,
    /// All steps, in declaration order.
    pub steps: Vec<StepPlan>,
}

impl PipelinePlan {
    /// Current plan format version.
    pub const VERSION: &'static str = "1.0.0";

    /// Snapshot a compiled pipeline.
    pub fn from_pipeline(pipeline: &Pipeline) -> Self {
        Self {
            version: Self::VERSION.to_string(),
            pipeline_id: pipeline.id().to_string(),
            inputs: pipeline
                .signature()
                .inputs()
                .iter()
                .map(|token| token.name().to_string())
                .collect(),
            outputs: pipeline
                .signature()
                .outputs()
                .iter()
                .map(|token| token.name().to_string())
                .collect(),
            steps: pipeline
                .descriptors()
                .enumerate()
                .map(|(index, descriptor)| StepPlan {
                    index,
                    name: descriptor.name.clone(),
                    inputs: descriptor
                        .inputs
                        .iter()
                        .map(|token| token.name().to_string())
                        .collect(),
                    outputs: descriptor
                        .outputs
                        .iter()
                        .map(|token| token.name().to_string())
                        .collect(),
                    deferred: descriptor.deferred,
                })
                .collect(),
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize to compact JSON (no whitespace).
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
