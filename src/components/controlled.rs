//! Linearly controlled (dependent) sources: VCCS (G), VCVS (E), CCCS (F),
//! CCVS (H).

use crate::circuit::NodeId;

/// Voltage-controlled current source.
///
/// I = gain * (V(nc+) - V(nc-)), flowing from n+ through the source to n-.
#[derive(Debug, Clone)]
pub struct Vccs {
    pub name: String,
    pub nodes: [NodeId; 2],
    /// Control nodes [nc+, nc-]
    pub control: [NodeId; 2],
    /// Transconductance in siemens
    pub gain: f64,
}

impl Vccs {
    pub fn new(name: String, nodes: [NodeId; 2], control: [NodeId; 2], gain: f64) -> Self {
        Self {
            name,
            nodes,
            control,
            gain,
        }
    }
}

/// Voltage-controlled voltage source.
///
/// V(n+) - V(n-) = gain * (V(nc+) - V(nc-)). Requires one branch current
/// variable, like an independent voltage source.
#[derive(Debug, Clone)]
pub struct Vcvs {
    pub name: String,
    pub nodes: [NodeId; 2],
    /// Control nodes [nc+, nc-]
    pub control: [NodeId; 2],
    pub gain: f64,
}

impl Vcvs {
    pub fn new(name: String, nodes: [NodeId; 2], control: [NodeId; 2], gain: f64) -> Self {
        Self {
            name,
            nodes,
            control,
            gain,
        }
    }
}

/// Current-controlled current source.
///
/// I = gain * I(sensor), where the sensor is a voltage-defining component
/// whose branch current is an MNA unknown.
#[derive(Debug, Clone)]
pub struct Cccs {
    pub name: String,
    pub nodes: [NodeId; 2],
    /// Identifier of the sensing component
    pub sensor: String,
    pub gain: f64,
}

impl Cccs {
    pub fn new(name: String, nodes: [NodeId; 2], sensor: String, gain: f64) -> Self {
        Self {
            name,
            nodes,
            sensor,
            gain,
        }
    }
}

/// Current-controlled voltage source.
///
/// V(n+) - V(n-) = gain * I(sensor). Requires one branch current variable.
#[derive(Debug, Clone)]
pub struct Ccvs {
    pub name: String,
    pub nodes: [NodeId; 2],
    /// Identifier of the sensing component
    pub sensor: String,
    /// Transresistance in ohms
    pub gain: f64,
}

impl Ccvs {
    pub fn new(name: String, nodes: [NodeId; 2], sensor: String, gain: f64) -> Self {
        Self {
            name,
            nodes,
            sensor,
            gain,
        }
    }
}
