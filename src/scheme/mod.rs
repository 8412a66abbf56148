//! Scheme graph representation and structural checks.
//!
//! This module provides the element registry ([`Scheme`]) together with
//! the plain value types it is built from. Connections store endpoint
//! ids and pin names only; every lookup goes through the registry.

mod graph;
mod types;
mod validate;

pub use graph::Scheme;
pub use types::*;
pub use validate::{find_feedback, validate_scheme};
