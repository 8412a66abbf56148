//! # Logic Scheme
//!
//! A simulator for networks of digital logic elements.
//!
//! This library provides:
//! - Gates, sources, coders, arithmetic blocks and gated flip-flops
//! - A scheme graph with validated, all-or-nothing edits
//! - A tick-based evaluation engine that also terminates on feedback loops
//! - A small line-oriented command language for building schemes
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`elements`] - Element models, pin tables and the type registry
//! - [`scheme`] - The element registry and its mutation API
//! - [`engine`] - Settle-then-detect-period evaluation
//! - [`script`] - Parser and executor for command scripts
//!
//! ## Usage
//!
//! ```
//! use logic_scheme::{ElementParams, Level, Scheme};
//!
//! let mut scheme = Scheme::new();
//! let params = ElementParams::new();
//! scheme.add_element("constant", "c", (0.0, 0.0), &params.clone().with("value", 1))?;
//! scheme.add_element("not", "n", (1.0, 0.0), &params)?;
//! scheme.add_connection("c", "out", "n", "in")?;
//!
//! let report = scheme.run()?;
//! assert_eq!(report.get("n", "out"), Some(Level::Low));
//! # Ok::<(), logic_scheme::SchemeError>(())
//! ```
//!
//! ## Evaluation Method
//!
//! Each tick, every element reads only the outputs committed by the
//! previous tick. After `N` settle ticks (one per element) the engine keeps
//! ticking until a global output vector repeats. Pins that change inside
//! that repeating period are reported as [`Level::Unresolved`].

pub mod elements;
pub mod engine;
pub mod error;
pub mod scheme;
pub mod script;

// Re-export main types for convenience
pub use elements::{Element, ElementKind, ElementParams, ElementType};
pub use engine::{EngineConfig, Level, RunReport, DEFAULT_MAX_TICKS};
pub use error::{Result, SchemeError};
pub use scheme::{Connection, ElementId, Position, Scheme};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmScheme;
