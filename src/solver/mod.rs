//! Complex MNA (Modified Nodal Analysis) solver.
//!
//! This module provides the numerical engine for single-frequency AC analysis.
//!
//! ## Modified Nodal Analysis
//!
//! MNA assembles a complex system of equations Ax = b where:
//! - x contains node voltage phasors and branch current phasors
//! - A is the admittance/coefficient matrix
//! - b is the source vector
//!
//! The matrix structure is:
//! ```text
//! [ Y   B ] [ v ]   [ i ]
//! [ C   D ] [ j ] = [ e ]
//! ```
//!
//! where:
//! - Y is the nodal admittance matrix (node equations)
//! - B, C connect voltage-defining components to nodes
//! - D holds CCVS transresistances, 0 otherwise
//! - v is the vector of node voltages
//! - j is the vector of voltage-defining branch currents
//! - i is the sum of current sources into each node
//! - e is the vector of voltage source values

mod analyzer;
mod linear;
mod mna;

pub use analyzer::{Analyzer, AnalyzerConfig};
pub use linear::{solve_complex, Solution};
pub use mna::{assemble, ComplexMna};

/// Default pivot tolerance for singularity detection, applied after each
/// equation is scaled to a largest coefficient of 1.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-13;

/// Default band (degrees) around zero impedance angle reported as unity power
/// factor.
pub const DEFAULT_UNITY_TOLERANCE_DEG: f64 = 1e-6;
