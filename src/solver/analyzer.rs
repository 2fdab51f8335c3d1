//! Main analyzer interface.

use tracing::debug;

use crate::analysis::{post_process, AnalysisResult};
use crate::circuit::{validate_circuit, Circuit};
use crate::components::Netlist;
use crate::dsl;
use crate::error::Result;

use super::linear::{solve_complex, Solution};
use super::mna::assemble;
use super::{DEFAULT_PIVOT_TOLERANCE, DEFAULT_UNITY_TOLERANCE_DEG};

/// Configuration for the analyzer.
///
/// There is deliberately no frequency setting: the frequency always comes from
/// the netlist's sources.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Pivot magnitude, after each equation is scaled to a largest
    /// coefficient of 1, below which the system is declared singular.
    pub pivot_tolerance: f64,
    /// Impedance angle (degrees) within which the power factor is "unity".
    pub unity_tolerance_deg: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
            unity_tolerance_deg: DEFAULT_UNITY_TOLERANCE_DEG,
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relative pivot tolerance.
    ///
    /// Raise it to reject nearly singular circuits (e.g. 1e-9).
    pub fn with_pivot_tolerance(mut self, pivot_tolerance: f64) -> Self {
        self.pivot_tolerance = pivot_tolerance;
        self
    }

    /// Set the unity power factor band, in degrees.
    pub fn with_unity_tolerance_deg(mut self, unity_tolerance_deg: f64) -> Self {
        self.unity_tolerance_deg = unity_tolerance_deg;
        self
    }
}

/// Single-frequency AC analyzer.
///
/// Holds only configuration: every call builds its own circuit, matrix and
/// solution, so one analyzer can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    /// Create an analyzer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with custom configuration.
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Solve a parsed netlist.
    pub fn solve(&self, netlist: &Netlist) -> Result<AnalysisResult> {
        let circuit = Circuit::from_netlist(netlist)?;
        let mna = assemble(&circuit)?;
        validate_circuit(&circuit)?;

        let x = solve_complex(&mna.a, &mna.b, self.config.pivot_tolerance)?;
        let solution = Solution::new(x);

        let result = post_process(&circuit, &solution, &self.config)?;
        debug!(
            nodes = result.node_voltages.len(),
            branches = result.branch_currents.len(),
            "analysis complete"
        );
        Ok(result)
    }

    /// Parse and solve netlist text.
    pub fn analyze(&self, input: &str) -> Result<AnalysisResult> {
        let netlist = dsl::parse(input)?;
        self.solve(&netlist)
    }
}
