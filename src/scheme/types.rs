//! Core types for scheme representation.

use std::borrow::Borrow;
use std::fmt;

/// A unique identifier for an element in a scheme.
///
/// Ids are chosen by the caller and never reused while the element lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub String);

impl ElementId {
    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ElementId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Drawing position of an element.
///
/// Opaque to the simulator; only renderers interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a new position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A directed edge from one element's output pin to another's input pin.
///
/// Connections hold endpoint ids, never the elements themselves; both
/// endpoints keep a copy in their pin tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    source: ElementId,
    output_label: String,
    destination: ElementId,
    input_label: String,
}

impl Connection {
    /// Create a new connection.
    pub fn new(
        source: impl Into<ElementId>,
        output_label: impl Into<String>,
        destination: impl Into<ElementId>,
        input_label: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            output_label: output_label.into(),
            destination: destination.into(),
            input_label: input_label.into(),
        }
    }

    /// Element the signal is taken from.
    pub fn source(&self) -> &ElementId {
        &self.source
    }

    /// Output pin on the source element.
    pub fn output_label(&self) -> &str {
        &self.output_label
    }

    /// Element the signal is passed to.
    pub fn destination(&self) -> &ElementId {
        &self.destination
    }

    /// Input pin on the destination element.
    pub fn input_label(&self) -> &str {
        &self.input_label
    }

    /// Whether either endpoint is the given element.
    pub fn touches(&self, id: &str) -> bool {
        self.source.as_str() == id || self.destination.as_str() == id
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} --> {}.{}",
            self.source, self.output_label, self.destination, self.input_label
        )
    }
}
