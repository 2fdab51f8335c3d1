//! Analysis result types.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use num_complex::Complex64;
use serde::Serialize;

use super::format::{phase_deg, serialize_complex};
use crate::circuit::NodeId;
use crate::error::Result;

/// A phasor with its magnitude and phase in degrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhasorValue {
    #[serde(serialize_with = "serialize_complex")]
    pub phasor: Complex64,
    pub magnitude: f64,
    pub phase_deg: f64,
}

impl PhasorValue {
    pub fn new(phasor: Complex64) -> Self {
        Self {
            phasor,
            magnitude: phasor.norm(),
            phase_deg: phase_deg(phasor),
        }
    }
}

/// Complex power S = V·conj(I) of RMS phasors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexPower {
    /// Apparent power |S| (VA)
    #[serde(rename = "S")]
    pub apparent: f64,
    /// Active power Re(S) (W)
    #[serde(rename = "P")]
    pub active: f64,
    /// Reactive power Im(S) (var)
    #[serde(rename = "Q")]
    pub reactive: f64,
    #[serde(serialize_with = "serialize_complex")]
    pub phasor: Complex64,
}

impl ComplexPower {
    pub fn new(s: Complex64) -> Self {
        Self {
            apparent: s.norm(),
            active: s.re,
            reactive: s.im,
            phasor: s,
        }
    }
}

/// Power factor classification by the sign of the impedance angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PowerFactorKind {
    #[serde(rename = "lagging (inductive)")]
    Lagging,
    #[serde(rename = "leading (capacitive)")]
    Leading,
    #[serde(rename = "unity")]
    Unity,
}

impl PowerFactorKind {
    /// Classify an impedance angle; `|angle| <= unity_tolerance_deg` is unity.
    pub fn classify(angle_deg: f64, unity_tolerance_deg: f64) -> Self {
        if angle_deg.abs() <= unity_tolerance_deg {
            PowerFactorKind::Unity
        } else if angle_deg > 0.0 {
            PowerFactorKind::Lagging
        } else {
            PowerFactorKind::Leading
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PowerFactorKind::Lagging => "lagging (inductive)",
            PowerFactorKind::Leading => "leading (capacitive)",
            PowerFactorKind::Unity => "unity",
        }
    }
}

impl fmt::Display for PowerFactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerFactor {
    /// cos(angle(Z_eq))
    pub value: f64,
    #[serde(rename = "type")]
    pub kind: PowerFactorKind,
}

/// Quantities seen from the primary source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSummary {
    /// Id of the source the summary is computed against
    pub source: String,
    /// `None` when the source delivers no current
    pub equivalent_impedance: Option<PhasorValue>,
    pub complex_power: ComplexPower,
    /// `None` when the source delivers no current
    pub power_factor: Option<PowerFactor>,
}

/// Kind of a passive component in the impedance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PassiveKind {
    Resistor,
    Inductor,
    Capacitor,
}

impl fmt::Display for PassiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            PassiveKind::Resistor => "Resistor",
            PassiveKind::Inductor => "Inductor",
            PassiveKind::Capacitor => "Capacitor",
        })
    }
}

/// One row of the per-component impedance table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentImpedance {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PassiveKind,
    /// Component value (Ω, H or F)
    pub value: f64,
    /// Reactance magnitude, for L and C
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactance: Option<f64>,
    #[serde(serialize_with = "serialize_complex")]
    pub impedance: Complex64,
    pub impedance_rect: String,
    pub impedance_polar: String,
}

/// Result of a single-frequency AC analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Analysis frequency (Hz)
    pub frequency: f64,
    /// Angular frequency (rad/s)
    pub omega: f64,
    /// Every non-ground node, ascending by label
    pub node_voltages: BTreeMap<NodeId, PhasorValue>,
    /// Every component, in netlist order
    pub branch_currents: IndexMap<String, PhasorValue>,
    pub system_summary: SystemSummary,
    /// R, L and C components, in netlist order
    pub derived_calculations: Vec<ComponentImpedance>,
}

impl AnalysisResult {
    /// Voltage at a node label.
    pub fn node_voltage(&self, label: u32) -> Option<&PhasorValue> {
        self.node_voltages.get(&NodeId(label))
    }

    /// Current through a component, by id.
    pub fn branch_current(&self, id: &str) -> Option<&PhasorValue> {
        self.branch_currents.get(id)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_power_factor() {
        assert_eq!(PowerFactorKind::classify(0.0, 1e-6), PowerFactorKind::Unity);
        assert_eq!(PowerFactorKind::classify(-5e-7, 1e-6), PowerFactorKind::Unity);
        assert_eq!(PowerFactorKind::classify(53.1, 1e-6), PowerFactorKind::Lagging);
        assert_eq!(PowerFactorKind::classify(-0.01, 1e-6), PowerFactorKind::Leading);
        assert_eq!(PowerFactorKind::Lagging.to_string(), "lagging (inductive)");
    }

    #[test]
    fn test_phasor_value_serializes_as_text() {
        let value = PhasorValue::new(Complex64::new(3.0, -4.0));
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["phasor"], "3 - 4j");
        assert_eq!(json["magnitude"], 5.0);
    }

    #[test]
    fn test_summary_json_shape() {
        let summary = SystemSummary {
            source: "V1".to_string(),
            equivalent_impedance: None,
            complex_power: ComplexPower::new(Complex64::new(0.0, 0.0)),
            power_factor: Some(PowerFactor {
                value: 1.0,
                kind: PowerFactorKind::Unity,
            }),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["equivalent_impedance"].is_null());
        assert_eq!(json["complex_power"]["S"], 0.0);
        assert_eq!(json["power_factor"]["type"], "unity");
    }
}
