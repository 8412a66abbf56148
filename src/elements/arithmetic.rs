//! Arithmetic blocks: full adder, ripple adder-subtractor and right shifter.

use super::params::ElementParams;
use crate::error::Result;

/// One-bit full adder step: returns `(sum, carry_out)`.
fn add_bit(a: bool, b: bool, carry: bool) -> (bool, bool) {
    let sum = a ^ b ^ carry;
    let carry_out = (a && b) || (a && carry) || (b && carry);
    (sum, carry_out)
}

/// Inputs `A`, `B`, `Cin`; outputs `S`, `Cout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FullAdder;

impl FullAdder {
    pub fn from_params(params: &ElementParams) -> Result<Self> {
        params.expect_only("FULLADDER", &[])?;
        Ok(Self)
    }

    pub fn evaluate(&self, a: bool, b: bool, carry_in: bool) -> [bool; 2] {
        let (sum, carry_out) = add_bit(a, b, carry_in);
        [sum, carry_out]
    }
}

/// n-bit ripple-carry adder with a subtract control.
///
/// Inputs `A0..A(n-1)`, `B0..B(n-1)`, `sub`; outputs `S0..S(n-1)`, `Cout`.
/// With `sub` high every B bit passes through an XOR inverter and the
/// carry chain starts at 1, giving `A - B` in two's complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdderSubtractor {
    pub bits: usize,
}

impl AdderSubtractor {
    pub fn from_params(params: &ElementParams) -> Result<Self> {
        params.expect_only("ADDERSUBTRACTOR", &["bits"])?;
        Ok(Self {
            bits: params.size("ADDERSUBTRACTOR", "bits", 1, 1)?,
        })
    }

    pub fn input_labels(&self) -> Vec<String> {
        let a = (0..self.bits).map(|i| format!("A{}", i));
        let b = (0..self.bits).map(|i| format!("B{}", i));
        a.chain(b).chain(std::iter::once("sub".to_string())).collect()
    }

    pub fn output_labels(&self) -> Vec<String> {
        (0..self.bits)
            .map(|i| format!("S{}", i))
            .chain(std::iter::once("Cout".to_string()))
            .collect()
    }

    pub fn evaluate(&self, inputs: &[bool]) -> Vec<bool> {
        let (a, rest) = inputs.split_at(self.bits);
        let (b, rest) = rest.split_at(self.bits);
        let sub = rest[0];

        let mut carry = sub;
        let mut out = Vec::with_capacity(self.bits + 1);
        for (&a_bit, &b_bit) in a.iter().zip(b) {
            let (sum, next) = add_bit(a_bit, b_bit ^ sub, carry);
            out.push(sum);
            carry = next;
        }
        out.push(carry);
        out
    }
}

/// n-bit shifter driven by one-hot (or combined) shift lines.
///
/// Inputs `in0..in(n-1)`, `shift_line0..shift_line(n-1)`; outputs
/// `out0..out(n-1)` with `out_i = OR_{j<=i} (in_(i-j) AND shift_line_j)`.
/// Several asserted shift lines OR their shifted copies together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RightShifter {
    pub bits: usize,
}

impl RightShifter {
    pub const MIN_BITS: u32 = 2;

    pub fn from_params(params: &ElementParams) -> Result<Self> {
        params.expect_only("SHIFTER", &["bits"])?;
        Ok(Self {
            bits: params.size("SHIFTER", "bits", Self::MIN_BITS, Self::MIN_BITS)?,
        })
    }

    pub fn input_labels(&self) -> Vec<String> {
        let data = (0..self.bits).map(|i| format!("in{}", i));
        let shift = (0..self.bits).map(|i| format!("shift_line{}", i));
        data.chain(shift).collect()
    }

    pub fn output_labels(&self) -> Vec<String> {
        (0..self.bits).map(|i| format!("out{}", i)).collect()
    }

    pub fn evaluate(&self, inputs: &[bool]) -> Vec<bool> {
        let (data, shift) = inputs.split_at(self.bits);
        (0..self.bits)
            .map(|i| (0..=i).any(|j| data[i - j] && shift[j]))
            .collect()
    }
}
