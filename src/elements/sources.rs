//! Signal sources: constants and switchable variables.

use super::params::ElementParams;
use crate::error::Result;

/// An element that always drives the same level on `out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant {
    pub value: bool,
}

impl Constant {
    /// Create a constant, reading the `value` flag (default 0).
    pub fn from_params(params: &ElementParams) -> Result<Self> {
        params.expect_only("CONSTANT", &["value"])?;
        Ok(Self {
            value: params.flag("CONSTANT", "value", false)?,
        })
    }
}

/// An input the user flips between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable {
    pub value: bool,
}

impl Variable {
    /// Create a variable, reading the `value` flag (default 0).
    pub fn from_params(params: &ElementParams) -> Result<Self> {
        params.expect_only("VARIABLE", &["value"])?;
        Ok(Self {
            value: params.flag("VARIABLE", "value", false)?,
        })
    }

    /// Toggle the driven level.
    pub fn switch(&mut self) {
        self.value = !self.value;
    }
}
