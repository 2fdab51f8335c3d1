//! Independent sinusoidal voltage and current sources.

use num_complex::Complex64;

use crate::circuit::NodeId;

/// Magnitude, phase and frequency of a sinusoidal source.
///
/// Magnitudes are RMS values; the phasor carries the same scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sinusoid {
    pub magnitude: f64,
    pub phase_deg: f64,
    /// Frequency in Hz
    pub frequency: f64,
}

impl Sinusoid {
    pub fn new(magnitude: f64, phase_deg: f64, frequency: f64) -> Self {
        Self {
            magnitude,
            phase_deg,
            frequency,
        }
    }

    /// Phasor `magnitude ∠ phase_deg`.
    pub fn phasor(&self) -> Complex64 {
        Complex64::from_polar(self.magnitude, self.phase_deg.to_radians())
    }
}

/// A voltage source component.
///
/// Voltage sources require an extra row/column in the MNA matrix for the
/// branch current. The source enforces: V+ - V- = V_source
#[derive(Debug, Clone)]
pub struct VoltageSource {
    pub name: String,
    pub nodes: [NodeId; 2], // [positive, negative]
    pub waveform: Sinusoid,
}

impl VoltageSource {
    /// Create a new voltage source.
    pub fn new(name: String, nodes: [NodeId; 2], waveform: Sinusoid) -> Self {
        Self {
            name,
            nodes,
            waveform,
        }
    }

    /// Source voltage phasor.
    pub fn voltage(&self) -> Complex64 {
        self.waveform.phasor()
    }
}

/// A current source component.
///
/// Current sources add directly to the RHS vector of the MNA equations: the
/// source draws its current out of n+ and delivers it into n-.
#[derive(Debug, Clone)]
pub struct CurrentSource {
    pub name: String,
    pub nodes: [NodeId; 2], // [positive, negative]
    pub waveform: Sinusoid,
}

impl CurrentSource {
    /// Create a new current source.
    pub fn new(name: String, nodes: [NodeId; 2], waveform: Sinusoid) -> Self {
        Self {
            name,
            nodes,
            waveform,
        }
    }

    /// Source current phasor.
    pub fn current(&self) -> Complex64 {
        self.waveform.phasor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_phasor_from_degrees() {
        let s = Sinusoid::new(10.0, 90.0, 50.0);
        let p = s.phasor();
        assert_relative_eq!(p.re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.im, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_phase_is_real() {
        let v = VoltageSource::new(
            "V1".into(),
            [NodeId(1), NodeId::GROUND],
            Sinusoid::new(120.0, 0.0, 60.0),
        );
        assert_eq!(v.voltage(), Complex64::new(120.0, 0.0));
    }
}
