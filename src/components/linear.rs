//! Linear passive components: Resistor, Inductor, Capacitor.
//!
//! Admittances are computed directly (not as `1 / Z`) so that an open
//! circuit (C = 0) yields a clean zero and a short (R = 0, L = 0) yields a
//! non-finite value the assembler can reject, never a NaN.

use num_complex::Complex64;

use crate::circuit::NodeId;

/// A resistor component.
#[derive(Debug, Clone)]
pub struct Resistor {
    pub name: String,
    pub nodes: [NodeId; 2],
    /// Resistance in ohms
    pub resistance: f64,
}

impl Resistor {
    /// Create a new resistor.
    pub fn new(name: String, nodes: [NodeId; 2], resistance: f64) -> Self {
        Self {
            name,
            nodes,
            resistance,
        }
    }

    /// Z = R
    pub fn impedance(&self) -> Complex64 {
        Complex64::new(self.resistance, 0.0)
    }

    /// Y = 1/R
    pub fn admittance(&self) -> Complex64 {
        Complex64::new(1.0 / self.resistance, 0.0)
    }
}

/// An inductor component.
#[derive(Debug, Clone)]
pub struct Inductor {
    pub name: String,
    pub nodes: [NodeId; 2],
    /// Inductance in henries
    pub inductance: f64,
}

impl Inductor {
    /// Create a new inductor.
    pub fn new(name: String, nodes: [NodeId; 2], inductance: f64) -> Self {
        Self {
            name,
            nodes,
            inductance,
        }
    }

    /// Inductive reactance X_L = ωL.
    pub fn reactance(&self, omega: f64) -> f64 {
        omega * self.inductance
    }

    /// Z = jωL
    pub fn impedance(&self, omega: f64) -> Complex64 {
        Complex64::new(0.0, self.reactance(omega))
    }

    /// Y = 1/(jωL) = -j/(ωL)
    pub fn admittance(&self, omega: f64) -> Complex64 {
        Complex64::new(0.0, -1.0 / self.reactance(omega))
    }
}

/// A capacitor component.
#[derive(Debug, Clone)]
pub struct Capacitor {
    pub name: String,
    pub nodes: [NodeId; 2],
    /// Capacitance in farads
    pub capacitance: f64,
}

impl Capacitor {
    /// Create a new capacitor.
    pub fn new(name: String, nodes: [NodeId; 2], capacitance: f64) -> Self {
        Self {
            name,
            nodes,
            capacitance,
        }
    }

    /// Capacitive reactance magnitude X_C = 1/(ωC).
    pub fn reactance(&self, omega: f64) -> f64 {
        1.0 / (omega * self.capacitance)
    }

    /// Z = 1/(jωC) = -j/(ωC)
    pub fn impedance(&self, omega: f64) -> Complex64 {
        Complex64::new(0.0, -self.reactance(omega))
    }

    /// Y = jωC
    pub fn admittance(&self, omega: f64) -> Complex64 {
        Complex64::new(0.0, omega * self.capacitance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn nodes() -> [NodeId; 2] {
        [NodeId(1), NodeId::GROUND]
    }

    #[test]
    fn test_resistor_impedance() {
        let r = Resistor::new("R1".into(), nodes(), 50.0);
        assert_eq!(r.impedance(), Complex64::new(50.0, 0.0));
        assert_relative_eq!(r.admittance().re, 0.02);
    }

    #[test]
    fn test_inductor_reactance() {
        let omega = 2.0 * PI * 60.0;
        let l = Inductor::new("L1".into(), nodes(), 0.1);
        assert_relative_eq!(l.reactance(omega), 37.699111843077517, epsilon = 1e-12);
        let product = l.impedance(omega) * l.admittance(omega);
        assert_relative_eq!(product.re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(product.im, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_capacitor_impedance_is_negative_imaginary() {
        let omega = 2.0 * PI * 50.0;
        let c = Capacitor::new("C1".into(), nodes(), 100e-6);
        let z = c.impedance(omega);
        assert_eq!(z.re, 0.0);
        assert_relative_eq!(z.im, -31.830988618379067, epsilon = 1e-9);
        assert_relative_eq!(c.admittance(omega).im, omega * 100e-6);
    }

    #[test]
    fn test_zero_values_are_not_nan() {
        let omega = 2.0 * PI * 50.0;
        let r = Resistor::new("R0".into(), nodes(), 0.0);
        assert!(!r.admittance().is_finite() && !r.admittance().is_nan());
        let l = Inductor::new("L0".into(), nodes(), 0.0);
        assert!(!l.admittance(omega).is_finite() && !l.admittance(omega).is_nan());
        let c = Capacitor::new("C0".into(), nodes(), 0.0);
        assert_eq!(c.admittance(omega), Complex64::new(0.0, 0.0));
    }
}
