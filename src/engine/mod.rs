//! Evaluation engine.
//!
//! A run has two phases, both made of synchronous ticks. In a tick every
//! element computes its outputs from the outputs committed by the previous
//! tick, and the whole vector is then committed at once, so iteration
//! order over elements never matters.
//!
//! 1. **Settle**: exactly `N` ticks for `N` elements. That is enough for a
//!    value to cross the longest acyclic path in the graph.
//! 2. **Period detection**: keep ticking and remember every global output
//!    vector. The first vector seen twice closes a period and ends the run.
//!    Pins that change during this phase are reported as
//!    [`Level::Unresolved`].
//!
//! The reachable state space is finite, so the second phase always ends;
//! [`EngineConfig::max_ticks`] still caps it and turns a runaway into
//! [`crate::SchemeError::DidNotConverge`].

mod evaluator;
mod report;
mod wiring;

pub use evaluator::EngineConfig;
pub use report::{Level, RunReport};

pub(crate) use evaluator::run;

/// Default cap on period-detection ticks.
pub const DEFAULT_MAX_TICKS: usize = 65_536;
