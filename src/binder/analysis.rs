//! Construction-time wiring analysis.
//!
//! A single forward pass over the declared step list decides whether a
//! pipeline can ever be invoked: a step's inputs may only come from the
//! signature's inputs or from outputs of *earlier* steps. There is no
//! backtracking — a later step can never retroactively satisfy an earlier
//! one — which keeps validation linear and the run-time wiring unambiguous.
//!
//! Deferred steps sit outside the ordering: they contribute nothing to the
//! forward set, and their own inputs are checked against everything the
//! whole pipeline can provide, since they always run last.

use crate::binder::signature::Signature;
use crate::core::error::{BindError, BindResult};
use crate::core::types::TypeToken;
use crate::execution::engine::Pipeline;
use crate::step::Step;
use log::debug;
use std::collections::HashSet;

/// Validate a candidate pipeline against its target signature.
///
/// On success the returned [`Pipeline`] is guaranteed to resolve every
/// non-deferred step's arguments on every invocation; a failed bind
/// identifies the offending step index and the missing type. Validation is
/// purely type-level: no step is invoked.
pub fn bind(signature: Signature, steps: Vec<Box<dyn Step>>) -> BindResult<Pipeline> {
    let mut available: HashSet<TypeToken> = signature.inputs().iter().copied().collect();

    for (index, step) in steps.iter().enumerate() {
        let descriptor = step.descriptor();
        if descriptor.deferred {
            continue;
        }

        for input in &descriptor.inputs {
            if !available.contains(input) {
                return Err(BindError::UnresolvedInput {
                    index,
                    name: descriptor.name.clone(),
                    missing: *input,
                });
            }
        }
        available.extend(descriptor.outputs.iter().copied());
    }

    // Deferred steps run after the whole main sequence, so their inputs
    // check against the final set; their outputs feed nothing.
    for (index, step) in steps.iter().enumerate() {
        let descriptor = step.descriptor();
        if !descriptor.deferred {
            continue;
        }

        for input in &descriptor.inputs {
            if !available.contains(input) {
                return Err(BindError::UnresolvedInput {
                    index,
                    name: descriptor.name.clone(),
                    missing: *input,
                });
            }
        }
    }

    for output in signature.outputs() {
        if !available.contains(output) {
            return Err(BindError::UnresolvedOutput { missing: *output });
        }
    }

    let pipeline = Pipeline::new(signature, steps);
    debug!(
        "pipeline {} bound: {} steps, {} inputs, {} outputs",
        pipeline.id(),
        pipeline.len(),
        pipeline.signature().inputs().len(),
        pipeline.signature().outputs().len()
    );
    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{ExecResult, ExecutionError};
    use crate::core::pool::ValuePool;
    use crate::core::types::BoxedValue;
    use crate::step::{deferred, step, StepDescriptor};
    use proptest::collection::vec;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct T0;
    #[derive(Debug, Clone, PartialEq, Default)]
    struct T1;
    #[derive(Debug, Clone, PartialEq, Default)]
    struct T2;
    #[derive(Debug, Clone, PartialEq, Default)]
    struct T3;
    #[derive(Debug, Clone, PartialEq, Default)]
    struct T4;
    #[derive(Debug, Clone, PartialEq, Default)]
    struct T5;

    fn token(id: u8) -> TypeToken {
        match id {
            0 => TypeToken::of::<T0>(),
            1 => TypeToken::of::<T1>(),
            2 => TypeToken::of::<T2>(),
            3 => TypeToken::of::<T3>(),
            4 => TypeToken::of::<T4>(),
            _ => TypeToken::of::<T5>(),
        }
    }

    fn value(id: u8) -> BoxedValue {
        match id {
            0 => BoxedValue::new(T0),
            1 => BoxedValue::new(T1),
            2 => BoxedValue::new(T2),
            3 => BoxedValue::new(T3),
            4 => BoxedValue::new(T4),
            _ => BoxedValue::new(T5),
        }
    }

    /// A step defined purely by its descriptor; invoking it emits one value
    /// per declared output type.
    struct ScriptedStep {
        descriptor: StepDescriptor,
        output_ids: Vec<u8>,
    }

    impl ScriptedStep {
        fn boxed(name: &str, inputs: &[u8], outputs: &[u8], deferred: bool) -> Box<dyn Step> {
            Box::new(Self {
                descriptor: StepDescriptor::new(
                    name,
                    inputs.iter().copied().map(token).collect(),
                    outputs.iter().copied().map(token).collect(),
                    deferred,
                ),
                output_ids: outputs.to_vec(),
            })
        }
    }

    impl Step for ScriptedStep {
        fn descriptor(&self) -> &StepDescriptor {
            &self.descriptor
        }

        fn invoke(&self, pool: &ValuePool) -> ExecResult<Vec<BoxedValue>> {
            if !self.descriptor.deferred {
                for input in &self.descriptor.inputs {
                    if !pool.contains(*input) {
                        return Err(ExecutionError::MissingValue {
                            step: self.descriptor.name.clone(),
                            missing: *input,
                        });
                    }
                }
            }
            Ok(self.output_ids.iter().copied().map(value).collect())
        }
    }

    fn signature(inputs: &[u8], outputs: &[u8]) -> Signature {
        Signature::from_tokens(
            inputs.iter().copied().map(token).collect(),
            outputs.iter().copied().map(token).collect(),
        )
    }

    #[test]
    fn test_accepts_well_wired_pipeline() {
        let result = bind(
            signature(&[0], &[2]),
            vec![
                ScriptedStep::boxed("a", &[0], &[1], false),
                ScriptedStep::boxed("b", &[0, 1], &[2], false),
            ],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_rejects_unresolved_input() {
        let error = bind(
            signature(&[0], &[]),
            vec![
                ScriptedStep::boxed("a", &[0], &[1], false),
                ScriptedStep::boxed("b", &[3], &[], false),
            ],
        )
        .expect_err("step b's input is never produced");

        assert_eq!(
            error,
            BindError::UnresolvedInput {
                index: 1,
                name: "b".to_string(),
                missing: token(3),
            }
        );
    }

    #[test]
    fn test_rejects_unresolved_output() {
        let error = bind(
            signature(&[0], &[4]),
            vec![ScriptedStep::boxed("a", &[0], &[1], false)],
        )
        .expect_err("declared output is never produced");

        assert_eq!(error, BindError::UnresolvedOutput { missing: token(4) });
    }

    #[test]
    fn test_order_sensitivity() {
        let producer = || ScriptedStep::boxed("producer", &[0], &[1], false);
        let consumer = || ScriptedStep::boxed("consumer", &[1], &[2], false);

        assert!(bind(signature(&[0], &[2]), vec![producer(), consumer()]).is_ok());

        // consumer first: the type it needs now arrives too late
        let error = bind(signature(&[0], &[2]), vec![consumer(), producer()])
            .expect_err("swapped order breaks the wiring");
        assert_eq!(error.step_index(), Some(0));
        assert_eq!(error.missing_type(), token(1));
    }

    #[test]
    fn test_deferred_step_exempt_from_ordering() {
        // deferred step declared before the producer of its input
        let result = bind(
            signature(&[0], &[]),
            vec![
                ScriptedStep::boxed("finish", &[1], &[], true),
                ScriptedStep::boxed("produce", &[0], &[1], false),
            ],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_deferred_outputs_feed_nothing() {
        // only the deferred step produces T1; the ordinary consumer cannot use it
        let error = bind(
            signature(&[0], &[]),
            vec![
                ScriptedStep::boxed("finish", &[], &[1], true),
                ScriptedStep::boxed("consume", &[1], &[], false),
            ],
        )
        .expect_err("deferred outputs are not available to ordinary steps");
        assert_eq!(error.step_index(), Some(1));

        // nor can they satisfy the declared outputs
        let error = bind(
            signature(&[0], &[1]),
            vec![ScriptedStep::boxed("finish", &[], &[1], true)],
        )
        .expect_err("deferred outputs cannot satisfy declared outputs");
        assert_eq!(error, BindError::UnresolvedOutput { missing: token(1) });
    }

    #[test]
    fn test_deferred_input_must_be_producible_somewhere() {
        let error = bind(
            signature(&[0], &[]),
            vec![ScriptedStep::boxed("finish", &[5], &[], true)],
        )
        .expect_err("nothing ever produces T5");
        assert_eq!(
            error,
            BindError::UnresolvedInput {
                index: 0,
                name: "finish".to_string(),
                missing: token(5),
            }
        );
    }

    #[test]
    fn test_empty_step_list() {
        // outputs drawn straight from the inputs: a valid identity pipeline
        assert!(bind(signature(&[0, 1], &[1]), vec![]).is_ok());
        assert!(bind(signature(&[0], &[1]), vec![]).is_err());
    }

    #[test]
    fn test_typed_steps_bind_like_scripted_ones() {
        let result = bind(
            Signature::of::<(T0,), (T1,)>(),
            vec![
                Box::new(step(|_t: T0| (T1,))),
                Box::new(deferred(|_t: T1| ())),
            ],
        );
        assert!(result.is_ok());
    }

    /// Straight-line reference model of the reachability rule.
    fn model_accepts(
        sig_inputs: &[u8],
        sig_outputs: &[u8],
        steps: &[(Vec<u8>, Vec<u8>, bool)],
    ) -> bool {
        let mut have: Vec<u8> = sig_inputs.to_vec();
        for (inputs, outputs, deferred) in steps {
            if *deferred {
                continue;
            }
            if inputs.iter().any(|input| !have.contains(input)) {
                return false;
            }
            have.extend(outputs.iter().copied());
        }
        for (inputs, _, deferred) in steps {
            if *deferred && inputs.iter().any(|input| !have.contains(input)) {
                return false;
            }
        }
        sig_outputs.iter().all(|output| have.contains(output))
    }

    proptest! {
        // Random pipelines over a six-type universe: bind must agree with
        // the reference model, and every accepted pipeline must execute
        // without a missing-value fault when seeded with its inputs.
        #[test]
        fn bind_agrees_with_model_and_accepted_pipelines_run(
            sig_inputs in vec(0u8..6, 0..3),
            sig_outputs in vec(0u8..6, 0..3),
            scripted in vec((vec(0u8..6, 0..3), vec(0u8..6, 0..3), any::<bool>()), 0..6),
        ) {
            let steps: Vec<Box<dyn Step>> = scripted
                .iter()
                .enumerate()
                .map(|(index, (inputs, outputs, deferred))| {
                    ScriptedStep::boxed(&format!("step{index}"), inputs, outputs, *deferred)
                })
                .collect();

            let result = bind(signature(&sig_inputs, &sig_outputs), steps);
            let expected = model_accepts(&sig_inputs, &sig_outputs, &scripted);
            prop_assert_eq!(result.is_ok(), expected);

            if let Ok(pipeline) = result {
                let inputs: Vec<BoxedValue> =
                    sig_inputs.iter().copied().map(value).collect();
                let outcome = pipeline.execute(inputs);
                prop_assert!(outcome.is_ok());
            }
        }
    }
}
