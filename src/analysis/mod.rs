//! Post-processing of solved circuits.
//!
//! Turns the raw MNA solution into node voltages, per-component currents, a
//! summary seen from the primary source (equivalent impedance, complex power,
//! power factor) and a per-component impedance table.
//!
//! All phasors are RMS: complex power is S = V·conj(I) with no ½ factor.

mod format;
mod postprocess;
mod result;

pub use format::{format_complex, format_polar, format_rect, phase_deg, serialize_complex};
pub use postprocess::post_process;
pub use result::{
    AnalysisResult, ComplexPower, ComponentImpedance, PassiveKind, PhasorValue, PowerFactor,
    PowerFactorKind, SystemSummary,
};
