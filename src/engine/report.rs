//! Results of a run.

use std::fmt;

use indexmap::IndexMap;

use crate::scheme::ElementId;

/// Final level of one output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low,
    High,
    /// The pin kept changing inside the detected period
    Unresolved,
}

impl Level {
    /// The settled boolean, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Level::Low => Some(false),
            Level::High => Some(true),
            Level::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Level::Unresolved)
    }
}

impl From<bool> for Level {
    fn from(value: bool) -> Self {
        if value {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Level::Low => "0",
            Level::High => "1",
            Level::Unresolved => "X",
        };
        f.write_str(symbol)
    }
}

/// Output levels of every element after a run, in registry order.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub(crate) values: IndexMap<ElementId, IndexMap<String, Level>>,
    pub(crate) settle_ticks: usize,
    pub(crate) detection_ticks: usize,
    pub(crate) period: usize,
}

impl RunReport {
    /// Level of one output pin.
    pub fn get(&self, id: &str, pin: &str) -> Option<Level> {
        self.values.get(id)?.get(pin).copied()
    }

    /// All pins of one element.
    pub fn element(&self, id: &str) -> Option<&IndexMap<String, Level>> {
        self.values.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ElementId, &IndexMap<String, Level>)> {
        self.values.iter()
    }

    /// Every `(element, pin)` left unresolved.
    pub fn unresolved(&self) -> impl Iterator<Item = (&ElementId, &str)> {
        self.values.iter().flat_map(|(id, pins)| {
            pins.iter()
                .filter(|(_, level)| !level.is_resolved())
                .map(move |(pin, _)| (id, pin.as_str()))
        })
    }

    /// Whether every pin settled to a single value.
    pub fn is_stable(&self) -> bool {
        self.unresolved().next().is_none()
    }

    pub fn settle_ticks(&self) -> usize {
        self.settle_ticks
    }

    pub fn detection_ticks(&self) -> usize {
        self.detection_ticks
    }

    /// Length of the detected cycle of global states (1 for a fixed point).
    pub fn period(&self) -> usize {
        self.period
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, pins) in &self.values {
            for (pin, level) in pins {
                writeln!(f, "{}.{} = {}", id, pin, level)?;
            }
        }
        Ok(())
    }
}
