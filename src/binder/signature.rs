//! The target call shape.
//!
//! A signature is the externally visible contract of a compiled pipeline:
//! the ordered types a caller passes in, and the ordered types the callable
//! hands back. It is extracted once from tuple types and immutable after.

use crate::core::types::{TypeToken, ValueList};
use serde::Serialize;

/// Ordered input and output type lists of the callable being compiled.
#[derive(Debug, Clone, Serialize)]
pub struct Signature {
    inputs: Vec<TypeToken>,
    outputs: Vec<TypeToken>,
}

impl Signature {
    /// Build the signature for a callable shape from input and output
    /// tuples, e.g. `Signature::of::<(Ctx, Request), (Response,)>()`.
    pub fn of<I: ValueList, O: ValueList>() -> Self {
        Self {
            inputs: I::tokens(),
            outputs: O::tokens(),
        }
    }

    /// Build a signature from explicit token lists.
    pub fn from_tokens(inputs: Vec<TypeToken>, outputs: Vec<TypeToken>) -> Self {
        Self { inputs, outputs }
    }

    /// Input types, in call order.
    pub fn inputs(&self) -> &[TypeToken] {
        &self.inputs
    }

    /// Output types, in return order.
    pub fn outputs(&self) -> &[TypeToken] {
        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_of_tuples() {
        let signature = Signature::of::<(String, u32), (bool,)>();
        assert_eq!(
            signature.inputs(),
            &[TypeToken::of::<String>(), TypeToken::of::<u32>()]
        );
        assert_eq!(signature.outputs(), &[TypeToken::of::<bool>()]);
    }

    #[test]
    fn test_empty_shapes() {
        let signature = Signature::of::<(), ()>();
        assert!(signature.inputs().is_empty());
        assert!(signature.outputs().is_empty());
    }
}
