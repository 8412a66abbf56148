//! Address-driven elements: multiplexer, encoder and decoder.
//!
//! All three weight line `i` (1-indexed) by `2^(i-1)`, so the first line
//! is the least significant bit.

use super::params::ElementParams;
use crate::error::Result;

/// Binary value of a little-endian slice of lines.
fn binary_value(lines: &[bool]) -> usize {
    lines
        .iter()
        .rev()
        .fold(0, |acc, &on| (acc << 1) | on as usize)
}

/// Selects one of `2^n` data inputs by `n` select lines.
///
/// Inputs: `sel1..selN` then `in1..in(2^N)`; output: `out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiplexer {
    pub select_lines: usize,
}

impl Multiplexer {
    pub fn from_params(params: &ElementParams) -> Result<Self> {
        params.expect_only("MULTIPLEXER", &["select_lines"])?;
        Ok(Self {
            select_lines: params.address_lines("MULTIPLEXER", "select_lines", 1, 1)?,
        })
    }

    pub fn data_lines(&self) -> usize {
        1 << self.select_lines
    }

    pub fn input_labels(&self) -> Vec<String> {
        let select = (1..=self.select_lines).map(|i| format!("sel{}", i));
        let data = (1..=self.data_lines()).map(|i| format!("in{}", i));
        select.chain(data).collect()
    }

    /// `inputs` is laid out as in [`Multiplexer::input_labels`].
    pub fn evaluate(&self, inputs: &[bool]) -> bool {
        let (select, data) = inputs.split_at(self.select_lines);
        data[binary_value(select)]
    }
}

/// Priority encoder: `2^n` inputs to an `n`-bit code.
///
/// Inputs: `in1..in(2^N)`; outputs: `out1..outN`. The lowest-indexed
/// asserted input `in_k` yields code `k - 1`; no asserted input yields 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoder {
    pub output_lines: usize,
}

impl Encoder {
    pub fn from_params(params: &ElementParams) -> Result<Self> {
        params.expect_only("ENCODER", &["outputs"])?;
        Ok(Self {
            output_lines: params.address_lines("ENCODER", "outputs", 1, 1)?,
        })
    }

    pub fn input_labels(&self) -> Vec<String> {
        (1..=1usize << self.output_lines).map(|i| format!("in{}", i)).collect()
    }

    pub fn output_labels(&self) -> Vec<String> {
        (1..=self.output_lines).map(|i| format!("out{}", i)).collect()
    }

    pub fn evaluate(&self, inputs: &[bool]) -> Vec<bool> {
        let code = inputs.iter().position(|&on| on).unwrap_or(0);
        (0..self.output_lines).map(|bit| code >> bit & 1 == 1).collect()
    }
}

/// One-hot decoder: `n` inputs to `2^n` outputs.
///
/// Inputs: `in1..inN`; outputs: `out1..out(2^N)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoder {
    pub input_lines: usize,
}

impl Decoder {
    pub fn from_params(params: &ElementParams) -> Result<Self> {
        params.expect_only("DECODER", &["inputs"])?;
        Ok(Self {
            input_lines: params.address_lines("DECODER", "inputs", 1, 1)?,
        })
    }

    pub fn input_labels(&self) -> Vec<String> {
        (1..=self.input_lines).map(|i| format!("in{}", i)).collect()
    }

    pub fn output_labels(&self) -> Vec<String> {
        (1..=1usize << self.input_lines).map(|i| format!("out{}", i)).collect()
    }

    pub fn evaluate(&self, inputs: &[bool]) -> Vec<bool> {
        let selected = binary_value(inputs);
        (0..1usize << self.input_lines).map(|i| i == selected).collect()
    }
}
