//! Gated latches with a retained bit.
//!
//! Both flip-flops keep their stored bit across ticks and runs. The enable
//! is not a pin; it is toggled through `Scheme::switch_enable` between runs.

use super::params::ElementParams;
use crate::error::Result;

/// Gated SR flip-flop. Inputs `S`, `R`; output `Q`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatedSrFlipFlop {
    pub enabled: bool,
    pub state: bool,
}

impl GatedSrFlipFlop {
    pub fn from_params(params: &ElementParams) -> Result<Self> {
        params.expect_only("SRFLIPFLOP", &["enabled"])?;
        Ok(Self {
            enabled: params.flag("SRFLIPFLOP", "enabled", true)?,
            state: false,
        })
    }

    /// Next retained bit, or `None` for the forbidden S = R = 1 while enabled.
    pub fn next_state(&self, set: bool, reset: bool, retained: bool) -> Option<bool> {
        if !self.enabled {
            return Some(retained);
        }
        match (set, reset) {
            (false, false) => Some(retained),
            (true, false) => Some(true),
            (false, true) => Some(false),
            (true, true) => None,
        }
    }
}

/// Gated D flip-flop. Input `D`; output `Q`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatedDFlipFlop {
    pub enabled: bool,
    pub state: bool,
}

impl GatedDFlipFlop {
    pub fn from_params(params: &ElementParams) -> Result<Self> {
        params.expect_only("DFLIPFLOP", &["enabled"])?;
        Ok(Self {
            enabled: params.flag("DFLIPFLOP", "enabled", true)?,
            state: false,
        })
    }

    pub fn next_state(&self, data: bool, retained: bool) -> bool {
        if self.enabled {
            data
        } else {
            retained
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sr_transitions() {
        let mut ff = GatedSrFlipFlop::from_params(&ElementParams::new()).unwrap();
        assert_eq!(ff.next_state(true, false, false), Some(true));
        assert_eq!(ff.next_state(false, false, true), Some(true));
        assert_eq!(ff.next_state(false, true, true), Some(false));
        assert_eq!(ff.next_state(true, true, true), None);

        ff.enabled = false;
        assert_eq!(ff.next_state(true, true, true), Some(true));
        assert_eq!(ff.next_state(false, true, true), Some(true));
    }

    #[test]
    fn test_d_latch() {
        let mut ff = GatedDFlipFlop::from_params(&ElementParams::new()).unwrap();
        assert!(ff.next_state(true, false));
        ff.enabled = false;
        assert!(!ff.next_state(true, false));
    }
}
