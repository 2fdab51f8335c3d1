//! Circuit representation and validation.
//!
//! This module turns a parsed [`Netlist`](crate::components::Netlist) into a
//! [`Circuit`]: the single analysis frequency, a dense index for every
//! non-ground node, and an extra MNA row for every voltage-defining component.

mod graph;
mod types;
mod validate;

pub use graph::Circuit;
pub use types::*;
pub use validate::validate_circuit;
