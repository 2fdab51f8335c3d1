//! # Phasor Core
//!
//! AC steady-state analysis of linear circuits.
//!
//! This library provides:
//! - A line-oriented netlist format for R, L, C, independent sinusoidal
//!   sources and the four linear controlled sources (G, E, F, H)
//! - Modified Nodal Analysis (MNA) over complex phasors at a single frequency
//! - Node voltages, branch currents, equivalent impedance, complex power and
//!   power factor
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`dsl`] - Parser for the netlist format
//! - [`components`] - Typed component models
//! - [`circuit`] - Node indexing, frequency resolution and validation
//! - [`solver`] - MNA matrix assembly and complex linear solving
//! - [`analysis`] - Derived quantities and result rendering
//!
//! ## Usage
//!
//! ### Library
//!
//! ```no_run
//! let result = phasor_core::analyze("V1 1 0 120 0 60\nR1 1 0 10")?;
//! println!("{result}");
//! # Ok::<(), phasor_core::PhasorError>(())
//! ```
//!
//! ### Native CLI
//!
//! ```bash
//! phasor circuit.net --json --pretty
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import init, { analyze_netlist } from 'phasor_core';
//!
//! await init();
//! const result = JSON.parse(analyze_netlist(netlistText));
//! ```
//!
//! ## Analysis Method
//!
//! Every source in the netlist must run at the same frequency f; there is no
//! default. With ω = 2πf:
//!
//! 1. Index the non-ground nodes and give each voltage-defining component
//!    (V, E, H) an extra row
//! 2. Stamp every component's admittance or constraint into A and b
//! 3. Solve Ax = b by dense LU with partial pivoting
//! 4. Derive branch currents and the summary from the solution
//!
//! Source magnitudes are RMS, so complex power is S = V·conj(I).

pub mod analysis;
pub mod circuit;
pub mod components;
pub mod dsl;
pub mod error;
pub mod solver;

// Re-export main types for convenience
pub use analysis::AnalysisResult;
pub use circuit::Circuit;
pub use components::{Component, Netlist};
pub use error::{ErrorKind, PhasorError, Result};
pub use solver::{Analyzer, AnalyzerConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::analyze_netlist;

/// Parse netlist text.
pub fn parse(input: &str) -> Result<Netlist> {
    dsl::parse(input)
}

/// Solve a parsed netlist with the default configuration.
pub fn solve(netlist: &Netlist) -> Result<AnalysisResult> {
    Analyzer::new().solve(netlist)
}

/// Parse and solve netlist text with the default configuration.
pub fn analyze(input: &str) -> Result<AnalysisResult> {
    Analyzer::new().analyze(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_then_solve() {
        let netlist = parse("* divider\nV1 1 0 10 0 1k\nR1 1 2 1k\nR2 2 0 1k ; lower leg\n").unwrap();
        assert_eq!(netlist.len(), 3);
        let result = solve(&netlist).unwrap();
        assert_relative_eq!(result.node_voltage(2).unwrap().magnitude, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(analyze("X1 1 0 5").unwrap_err().kind(), ErrorKind::Parse);
        assert_eq!(analyze("R1 1 0 5").unwrap_err().kind(), ErrorKind::MissingFrequency);
        assert_eq!(
            analyze("V1 1 0 1 0 50\nR1 1 0 1\nF1 2 0 V9 1\nR2 2 0 1").unwrap_err().kind(),
            ErrorKind::UnresolvedSensor
        );
        assert_eq!(
            analyze("V1 1 0 1 0 50\nR1 1 0 1\nR2 2 3 1").unwrap_err().kind(),
            ErrorKind::SingularMatrix
        );
    }
}
