//! Construction parameters for elements.

use std::collections::BTreeMap;

use crate::error::{Result, SchemeError};

/// Upper bound for parameters that size a pin table exponentially
/// (multiplexer select lines, encoder outputs, decoder inputs).
pub const MAX_ADDRESS_LINES: u32 = 16;

/// Upper bound for parameters that size a pin table linearly
/// (gate inputs, adder and shifter bits).
pub const MAX_WIDTH: u32 = 1024;

/// Named unsigned parameters passed to an element constructor.
///
/// Sizes (`inputs`, `bits`, `select_lines`, ...) and flags (`value`,
/// `enabled`) share one map; flags accept 0 or 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementParams {
    values: BTreeMap<String, u32>,
}

impl ElementParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter (builder style).
    pub fn with(mut self, name: impl Into<String>, value: u32) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: u32) {
        self.values.insert(name.into().to_lowercase(), value);
    }

    /// Get a parameter by name.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.values.get(name).copied()
    }

    /// Reject any parameter not listed in `allowed`.
    pub(crate) fn expect_only(&self, element_type: &str, allowed: &[&str]) -> Result<()> {
        match self.values.keys().find(|k| !allowed.contains(&k.as_str())) {
            Some(name) => Err(SchemeError::invalid_parameter(
                element_type,
                name.as_str(),
                format!("not recognised (accepted: {})", allowed.join(", ")),
            )),
            None => Ok(()),
        }
    }

    /// Read a size parameter, enforcing its minimum and [`MAX_WIDTH`].
    pub(crate) fn size(&self, element_type: &str, name: &str, default: u32, min: u32) -> Result<usize> {
        let got = self.get(name).unwrap_or(default);
        if got < min {
            return Err(SchemeError::InvalidArity {
                element_type: element_type.to_string(),
                param: name.to_string(),
                got,
                min,
            });
        }
        if got > MAX_WIDTH {
            return Err(SchemeError::invalid_parameter(
                element_type,
                name,
                format!("at most {} is supported, got {}", MAX_WIDTH, got),
            ));
        }
        Ok(got as usize)
    }

    /// Read a size parameter that is used as an exponent.
    pub(crate) fn address_lines(&self, element_type: &str, name: &str, default: u32, min: u32) -> Result<usize> {
        let lines = self.size(element_type, name, default, min)?;
        if lines > MAX_ADDRESS_LINES as usize {
            return Err(SchemeError::invalid_parameter(
                element_type,
                name,
                format!("at most {} lines are supported", MAX_ADDRESS_LINES),
            ));
        }
        Ok(lines)
    }

    /// Read a 0/1 flag.
    pub(crate) fn flag(&self, element_type: &str, name: &str, default: bool) -> Result<bool> {
        match self.get(name) {
            None => Ok(default),
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            Some(other) => Err(SchemeError::invalid_parameter(
                element_type,
                name,
                format!("expected 0 or 1, got {}", other),
            )),
        }
    }
}
