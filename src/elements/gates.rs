//! Basic logic gates: AND, OR, XOR, NAND, NOR and NOT.

use super::params::ElementParams;
use crate::error::Result;

/// Reduction performed by a multi-input gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOp {
    And,
    Or,
    /// Parity of the inputs
    Xor,
    Nand,
    Nor,
}

impl GateOp {
    /// Apply the reduction to a set of input levels.
    pub fn reduce(&self, inputs: &[bool]) -> bool {
        match self {
            GateOp::And => inputs.iter().all(|&b| b),
            GateOp::Or => inputs.iter().any(|&b| b),
            GateOp::Xor => inputs.iter().fold(false, |acc, &b| acc ^ b),
            GateOp::Nand => !inputs.iter().all(|&b| b),
            GateOp::Nor => !inputs.iter().any(|&b| b),
        }
    }

    /// Upper-case type tag.
    pub fn name(&self) -> &'static str {
        match self {
            GateOp::And => "AND",
            GateOp::Or => "OR",
            GateOp::Xor => "XOR",
            GateOp::Nand => "NAND",
            GateOp::Nor => "NOR",
        }
    }
}

/// An n-input logic gate with a single `out` pin.
///
/// Inputs are labelled `in1..inN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicGate {
    pub op: GateOp,
    pub num_inputs: usize,
}

impl LogicGate {
    /// Fewest inputs a gate may have.
    pub const MIN_INPUTS: u32 = 2;

    /// Create a gate, reading the `inputs` parameter (default 2).
    pub fn from_params(op: GateOp, params: &ElementParams) -> Result<Self> {
        params.expect_only(op.name(), &["inputs"])?;
        let num_inputs = params.size(op.name(), "inputs", Self::MIN_INPUTS, Self::MIN_INPUTS)?;
        Ok(Self { op, num_inputs })
    }

    pub fn input_labels(&self) -> Vec<String> {
        (1..=self.num_inputs).map(|i| format!("in{}", i)).collect()
    }

    pub fn evaluate(&self, inputs: &[bool]) -> bool {
        self.op.reduce(inputs)
    }
}

/// Single-input inverter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotGate;

impl NotGate {
    pub fn from_params(params: &ElementParams) -> Result<Self> {
        params.expect_only("NOT", &[])?;
        Ok(Self)
    }

    pub fn evaluate(&self, input: bool) -> bool {
        !input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemeError;
    use proptest::prelude::*;

    const OPS: [GateOp; 5] = [GateOp::And, GateOp::Or, GateOp::Xor, GateOp::Nand, GateOp::Nor];

    fn bits(value: usize, width: usize) -> Vec<bool> {
        (0..width).map(|i| value >> i & 1 == 1).collect()
    }

    #[test]
    fn test_exhaustive_two_and_three_inputs() {
        for width in [2usize, 3] {
            for combo in 0..(1usize << width) {
                let inputs = bits(combo, width);
                let ones = combo.count_ones() as usize;
                assert_eq!(GateOp::And.reduce(&inputs), ones == width);
                assert_eq!(GateOp::Or.reduce(&inputs), ones > 0);
                assert_eq!(GateOp::Xor.reduce(&inputs), ones % 2 == 1);
                assert_eq!(GateOp::Nand.reduce(&inputs), ones != width);
                assert_eq!(GateOp::Nor.reduce(&inputs), ones == 0);
            }
        }
    }

    #[test]
    fn test_arity_below_two_rejected() {
        for op in OPS {
            let params = ElementParams::new().with("inputs", 1);
            let err = LogicGate::from_params(op, &params).unwrap_err();
            assert!(matches!(err, SchemeError::InvalidArity { .. }));
        }
    }

    #[test]
    fn test_labels() {
        let gate = LogicGate::from_params(GateOp::Or, &ElementParams::new().with("inputs", 3)).unwrap();
        assert_eq!(gate.input_labels(), vec!["in1", "in2", "in3"]);
    }

    #[test]
    fn test_not_negates() {
        assert!(NotGate.evaluate(false));
        assert!(!NotGate.evaluate(true));
    }

    proptest! {
        #[test]
        fn nand_nor_are_negations(inputs in proptest::collection::vec(any::<bool>(), 2..12)) {
            prop_assert_eq!(GateOp::Nand.reduce(&inputs), !GateOp::And.reduce(&inputs));
            prop_assert_eq!(GateOp::Nor.reduce(&inputs), !GateOp::Or.reduce(&inputs));
        }

        #[test]
        fn xor_is_parity(inputs in proptest::collection::vec(any::<bool>(), 2..12)) {
            let ones = inputs.iter().filter(|&&b| b).count();
            prop_assert_eq!(GateOp::Xor.reduce(&inputs), ones % 2 == 1);
        }
    }
}
