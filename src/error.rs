//! Error types for the logic scheme simulator.
//!
//! This module provides a unified error type [`SchemeError`] that covers
//! all error conditions that can occur while editing a scheme, evaluating
//! it, and reading command scripts.

use thiserror::Error;

/// Result type alias using [`SchemeError`].
pub type Result<T> = std::result::Result<T, SchemeError>;

/// Unified error type for all scheme operations.
#[derive(Error, Debug)]
pub enum SchemeError {
    // ============ Construction Errors ============
    /// Element id is already registered
    #[error("ID <{id}> is already taken")]
    DuplicateId { id: String },

    /// Type name does not map to any element constructor
    #[error("Element type <{element_type}> does not exist or is not supported")]
    UnknownElementType { element_type: String },

    /// Size parameter below the type's minimum
    #[error("Invalid {param} for {element_type}: got {got}, need at least {min}")]
    InvalidArity {
        element_type: String,
        param: String,
        got: u32,
        min: u32,
    },

    /// Parameter not recognised by the type, or value out of range
    #[error("Invalid parameter '{param}' for {element_type}: {message}")]
    InvalidParameter {
        element_type: String,
        param: String,
        message: String,
    },

    // ============ Graph Errors ============
    /// No element with this id
    #[error("There's no element with ID <{id}>")]
    UnknownId { id: String },

    /// Input pin not declared on the element
    #[error("There's no <{label}> input label on element <{id}>")]
    UnknownInputLabel { id: String, label: String },

    /// Output pin not declared on the element
    #[error("There's no <{label}> output label on element <{id}>")]
    UnknownOutputLabel { id: String, label: String },

    /// Destination input already holds a connection
    #[error("Input <{label}> of element <{id}> is already taken")]
    InputAlreadyConnected { id: String, label: String },

    /// Pin tables of two endpoints disagree about a connection
    #[error("Pin <{label}> of element <{id}> holds a connection its other endpoint does not know")]
    InconsistentPins { id: String, label: String },

    /// Element has no control of the requested kind
    #[error("Element <{id}> does not support '{operation}'")]
    NotSwitchable { id: String, operation: String },

    // ============ Evaluation Errors ============
    /// Enabled SR flip-flop sampled with S = R = 1
    #[error("Forbidden latch state on <{id}>: S and R are both high while enabled")]
    ForbiddenLatchState { id: String },

    /// Input levels passed to an element do not match its pin table
    #[error("Element <{id}> takes {expected} inputs, got {got}")]
    InputCountMismatch {
        id: String,
        expected: usize,
        got: usize,
    },

    /// Period detection hit the tick cap
    #[error("Scheme did not converge to a repeating state within {max_ticks} ticks")]
    DidNotConverge { max_ticks: usize },

    // ============ Script Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// A script command was rejected by the scheme
    #[error("Command at line {line} failed: {source}")]
    ScriptCommand {
        line: usize,
        #[source]
        source: Box<SchemeError>,
    },

    // ============ I/O Errors ============
    /// Error reading a script file
    #[error("Failed to read script file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SchemeError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an unknown id error
    pub fn unknown_id(id: impl Into<String>) -> Self {
        Self::UnknownId { id: id.into() }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(
        element_type: impl Into<String>,
        param: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            element_type: element_type.into(),
            param: param.into(),
            message: message.into(),
        }
    }

    /// Attach the script line a command came from.
    pub fn at_line(self, line: usize) -> Self {
        Self::ScriptCommand {
            line,
            source: Box::new(self),
        }
    }
}
