//! Step metadata.
//!
//! A descriptor is everything the binder knows about a step: its name, the
//! ordered types it consumes, the ordered types it produces, and whether it
//! is deferred. Descriptors are fixed at registration and never change.

use crate::core::types::TypeToken;
use serde::Serialize;

/// Metadata describing one step of a pipeline.
///
/// This struct contains all information needed to:
/// - Validate the wiring before execution
/// - Route values at call time
/// - Report misassembled pipelines with a usable step name
#[derive(Debug, Clone, Serialize)]
pub struct StepDescriptor {
    /// Human-readable name (derived from the function name by default).
    pub name: String,
    /// Types this step consumes, in parameter order.
    pub inputs: Vec<TypeToken>,
    /// Types this step produces, in return order.
    pub outputs: Vec<TypeToken>,
    /// Whether this step runs after all non-deferred steps.
    pub deferred: bool,
}

impl StepDescriptor {
    /// Create a new descriptor.
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<TypeToken>,
        outputs: Vec<TypeToken>,
        deferred: bool,
    ) -> Self {
        Self {
            name: name.into(),
            inputs,
            outputs,
            deferred,
        }
    }

    /// Check whether this step consumes the given type.
    pub fn requires(&self, token: TypeToken) -> bool {
        self.inputs.contains(&token)
    }

    /// Check whether this step produces the given type.
    pub fn produces(&self, token: TypeToken) -> bool {
        self.outputs.contains(&token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_queries() {
        let descriptor = StepDescriptor::new(
            "parse",
            vec![TypeToken::of::<String>()],
            vec![TypeToken::of::<u64>()],
            false,
        );

        assert_eq!(descriptor.name, "parse");
        assert!(descriptor.requires(TypeToken::of::<String>()));
        assert!(!descriptor.requires(TypeToken::of::<u64>()));
        assert!(descriptor.produces(TypeToken::of::<u64>()));
        assert!(!descriptor.deferred);
    }
}
