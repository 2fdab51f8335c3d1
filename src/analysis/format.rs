//! Number formatting for phasors and impedances.

use std::fmt;

use num_complex::Complex64;
use serde::Serializer;

use super::result::AnalysisResult;

/// Phase angle in degrees, in (-180, 180].
///
/// Components below round-off level relative to |z| (including a signed
/// zero) count as zero, so a real negative value reports 180°, never -180°.
pub fn phase_deg(z: Complex64) -> f64 {
    let floor = 16.0 * f64::EPSILON * z.norm();
    let snap = |v: f64| if v.abs() <= floor { 0.0 } else { v };
    snap(z.im).atan2(snap(z.re)).to_degrees()
}

/// Text form of a complex number: `3 + 4j`, `3 - 4j`.
pub fn format_complex(z: Complex64) -> String {
    if z.im < 0.0 {
        format!("{} - {}j", z.re, -z.im)
    } else {
        format!("{} + {}j", z.re, z.im.abs())
    }
}

/// Rectangular form with two decimals: `3.00 + j4.00`.
pub fn format_rect(z: Complex64) -> String {
    if z.im < 0.0 {
        format!("{:.2} - j{:.2}", z.re, -z.im)
    } else {
        format!("{:.2} + j{:.2}", z.re, z.im.abs())
    }
}

/// Polar form with two decimals: `5.00 ∠ 53.13°`.
pub fn format_polar(z: Complex64) -> String {
    format!("{:.2} ∠ {:.2}°", z.norm(), phase_deg(z))
}

/// serde adapter: JSON has no complex type, so phasors are written as text.
pub fn serialize_complex<S: Serializer>(z: &Complex64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_complex(*z))
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AC analysis at {} Hz (ω = {:.4} rad/s)", self.frequency, self.omega)?;

        writeln!(f)?;
        writeln!(f, "Node voltages:")?;
        for (node, v) in &self.node_voltages {
            writeln!(
                f,
                "  V({})  {:>12.4} V ∠ {:>9.3}°   ({})",
                node,
                v.magnitude,
                v.phase_deg,
                format_rect(v.phasor)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Branch currents:")?;
        for (id, i) in &self.branch_currents {
            writeln!(
                f,
                "  I({})  {:>12.6} A ∠ {:>9.3}°   ({})",
                id,
                i.magnitude,
                i.phase_deg,
                format_rect(i.phasor)
            )?;
        }

        let summary = &self.system_summary;
        writeln!(f)?;
        writeln!(f, "System summary (source {}):", summary.source)?;
        match &summary.equivalent_impedance {
            Some(z) => writeln!(f, "  Equivalent impedance: {} Ω", format_polar(z.phasor))?,
            None => writeln!(f, "  Equivalent impedance: undefined (source delivers no current)")?,
        }
        let power = &summary.complex_power;
        writeln!(f, "  Apparent power S: {:.4} VA", power.apparent)?;
        writeln!(f, "  Active power P:   {:.4} W", power.active)?;
        writeln!(f, "  Reactive power Q: {:.4} var", power.reactive)?;
        match &summary.power_factor {
            Some(pf) => writeln!(f, "  Power factor: {:.4} ({})", pf.value, pf.kind)?,
            None => writeln!(f, "  Power factor: undefined")?,
        }

        if !self.derived_calculations.is_empty() {
            writeln!(f)?;
            writeln!(f, "Component impedances:")?;
            for row in &self.derived_calculations {
                write!(f, "  {:<8} {:<10} {:>12}", row.id, row.kind, row.value)?;
                if let Some(x) = row.reactance {
                    write!(f, "  X = {:.4} Ω", x)?;
                }
                writeln!(f, "  Z = {} = {}", row.impedance_rect, row.impedance_polar)?;
            }
        }

        Ok(())
    }
}
