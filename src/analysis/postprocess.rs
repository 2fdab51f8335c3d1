//! Derive node voltages, branch currents, summary and impedance table from a
//! solved MNA system.

use indexmap::IndexMap;
use num_complex::Complex64;
use tracing::warn;

use super::format::{format_polar, format_rect, phase_deg};
use super::result::{
    AnalysisResult, ComplexPower, ComponentImpedance, PassiveKind, PhasorValue, PowerFactor,
    PowerFactorKind, SystemSummary,
};
use crate::circuit::{Circuit, NodeId};
use crate::components::Component;
use crate::error::{PhasorError, Result};
use crate::solver::{AnalyzerConfig, Solution};

/// Build the full analysis result for a solved circuit.
pub fn post_process(
    circuit: &Circuit,
    solution: &Solution,
    config: &AnalyzerConfig,
) -> Result<AnalysisResult> {
    let node_voltages = circuit
        .nodes()
        .iter()
        .map(|&node| (node, PhasorValue::new(solution.node_voltage(circuit, node))))
        .collect();

    let mut branch_currents = IndexMap::with_capacity(circuit.components.len());
    for component in &circuit.components {
        let current = branch_current(circuit, solution, component)?;
        branch_currents.insert(component.name().to_string(), PhasorValue::new(current));
    }

    Ok(AnalysisResult {
        frequency: circuit.frequency,
        omega: circuit.omega,
        node_voltages,
        branch_currents,
        system_summary: summarize(circuit, solution, config)?,
        derived_calculations: derived_calculations(circuit),
    })
}

/// Current through a component, flowing from n+ to n- through it.
///
/// Voltage-defining components report their branch unknown, which flows into
/// n+; for a source driving a load this is the negative of what it delivers.
fn branch_current(circuit: &Circuit, solution: &Solution, component: &Component) -> Result<Complex64> {
    let v = |node: NodeId| solution.node_voltage(circuit, node);
    let [n1, n2] = component.nodes();
    let omega = circuit.omega;

    let current = match component {
        Component::Resistor(r) => (v(n1) - v(n2)) * r.admittance(),
        Component::Inductor(l) => (v(n1) - v(n2)) * l.admittance(omega),
        Component::Capacitor(c) => (v(n1) - v(n2)) * c.admittance(omega),
        Component::VoltageSource(_) | Component::Vcvs(_) | Component::Ccvs(_) => {
            let branch = circuit.branch_of(component.name()).ok_or_else(|| {
                PhasorError::singular(format!("'{}' has no branch row", component.name()))
            })?;
            solution.branch_current(circuit, branch)
        }
        Component::CurrentSource(i) => i.current(),
        Component::Vccs(g) => {
            let [c1, c2] = g.control;
            (v(c1) - v(c2)) * g.gain
        }
        Component::Cccs(f) => {
            let branch = circuit.sensor_branch(&f.name, &f.sensor)?;
            solution.branch_current(circuit, branch) * f.gain
        }
    };

    Ok(current)
}

/// Source the system summary is computed against, with the voltage across
/// it and the current it delivers into the circuit.
fn primary_source(circuit: &Circuit, solution: &Solution) -> Result<(String, Complex64, Complex64)> {
    let voltage_source = circuit.components.iter().find_map(|c| match c {
        Component::VoltageSource(v) => Some(v),
        _ => None,
    });
    if let Some(source) = voltage_source {
        let branch = circuit.branch_of(&source.name).ok_or_else(|| {
            PhasorError::singular(format!("'{}' has no branch row", source.name))
        })?;
        let delivered = -solution.branch_current(circuit, branch);
        return Ok((source.name.clone(), source.voltage(), delivered));
    }

    // Current sources push their phasor out of n+ into n-
    let current_source = circuit.components.iter().find_map(|c| match c {
        Component::CurrentSource(i) => Some(i),
        _ => None,
    });
    match current_source {
        Some(source) => {
            let [n1, n2] = source.nodes;
            let voltage = solution.node_voltage(circuit, n2) - solution.node_voltage(circuit, n1);
            Ok((source.name.clone(), voltage, source.current()))
        }
        None => Err(PhasorError::MissingFrequency),
    }
}

fn summarize(
    circuit: &Circuit,
    solution: &Solution,
    config: &AnalyzerConfig,
) -> Result<SystemSummary> {
    let (source, voltage, current) = primary_source(circuit, solution)?;
    let complex_power = ComplexPower::new(voltage * current.conj());

    if current == Complex64::new(0.0, 0.0) {
        warn!(source = %source, "source delivers no current; equivalent impedance is undefined");
        return Ok(SystemSummary {
            source,
            equivalent_impedance: None,
            complex_power,
            power_factor: None,
        });
    }

    let impedance = voltage / current;
    let angle = phase_deg(impedance);
    let power_factor = PowerFactor {
        value: angle.to_radians().cos(),
        kind: PowerFactorKind::classify(angle, config.unity_tolerance_deg),
    };

    Ok(SystemSummary {
        source,
        equivalent_impedance: Some(PhasorValue::new(impedance)),
        complex_power,
        power_factor: Some(power_factor),
    })
}

fn derived_calculations(circuit: &Circuit) -> Vec<ComponentImpedance> {
    let omega = circuit.omega;
    circuit
        .components
        .iter()
        .filter_map(|component| {
            let (kind, value, reactance, impedance) = match component {
                Component::Resistor(r) => (PassiveKind::Resistor, r.resistance, None, r.impedance()),
                Component::Inductor(l) => (
                    PassiveKind::Inductor,
                    l.inductance,
                    Some(l.reactance(omega)),
                    l.impedance(omega),
                ),
                Component::Capacitor(c) => (
                    PassiveKind::Capacitor,
                    c.capacitance,
                    Some(c.reactance(omega)),
                    c.impedance(omega),
                ),
                _ => return None,
            };
            Some(ComponentImpedance {
                id: component.name().to_string(),
                kind,
                value,
                reactance,
                impedance,
                impedance_rect: format_rect(impedance),
                impedance_polar: format_polar(impedance),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl;
    use crate::solver::{assemble, solve_complex, DEFAULT_PIVOT_TOLERANCE};
    use approx::assert_relative_eq;

    fn run(input: &str) -> AnalysisResult {
        let circuit = Circuit::from_netlist(&dsl::parse(input).unwrap()).unwrap();
        let mna = assemble(&circuit).unwrap();
        let x = solve_complex(&mna.a, &mna.b, DEFAULT_PIVOT_TOLERANCE).unwrap();
        post_process(&circuit, &Solution::new(x), &AnalyzerConfig::default()).unwrap()
    }

    #[test]
    fn test_branch_currents_keep_netlist_order() {
        let result = run("R2 1 2 1\nV1 1 0 1 0 50\nC1 2 0 1m\nR1 2 0 1");
        let ids: Vec<&str> = result.branch_currents.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["R2", "V1", "C1", "R1"]);
    }

    #[test]
    fn test_kcl_at_shared_node() {
        let result = run("V1 1 0 10 30 50\nR1 1 2 3\nL1 2 0 10m\nC1 2 0 470u");
        let i = |id: &str| result.branch_current(id).unwrap().phasor;
        let residual = i("R1") - i("L1") - i("C1");
        assert!(residual.norm() < 1e-9, "KCL residual {residual}");
        // The source delivers what R1 carries
        assert_relative_eq!((i("V1") + i("R1")).norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_derived_table() {
        let omega = 2.0 * std::f64::consts::PI * 50.0;
        let result = run("V1 1 0 1 0 50\nR1 1 2 3\nL1 2 3 10m\nC1 3 0 100u");
        let rows = &result.derived_calculations;
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].kind, PassiveKind::Resistor);
        assert_eq!(rows[0].reactance, None);
        assert_eq!(rows[0].impedance_rect, "3.00 + j0.00");
        assert_eq!(rows[0].impedance_polar, "3.00 ∠ 0.00°");

        assert_eq!(rows[1].kind, PassiveKind::Inductor);
        assert_relative_eq!(rows[1].reactance.unwrap(), omega * 0.01, epsilon = 1e-12);
        assert_eq!(rows[1].impedance_rect, "0.00 + j3.14");
        assert_eq!(rows[1].impedance_polar, "3.14 ∠ 90.00°");

        assert_eq!(rows[2].kind, PassiveKind::Capacitor);
        assert_relative_eq!(rows[2].reactance.unwrap(), 1.0 / (omega * 100e-6), epsilon = 1e-9);
        assert_eq!(rows[2].impedance_rect, "0.00 - j31.83");
        assert_eq!(rows[2].impedance_polar, "31.83 ∠ -90.00°");
    }

    #[test]
    fn test_json_output() {
        let result = run("V1 1 0 120 0 60\nR1 1 0 10");
        let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(json["frequency"], 60.0);
        assert_eq!(json["node_voltages"]["1"]["phasor"], "120 + 0j");
        assert_eq!(json["branch_currents"]["V1"]["phase_deg"], 180.0);
        assert_eq!(json["system_summary"]["source"], "V1");
        assert_eq!(json["system_summary"]["power_factor"]["type"], "unity");
        assert_eq!(json["derived_calculations"][0]["type"], "Resistor");
        assert!(json["derived_calculations"][0].get("reactance").is_none());
    }

    #[test]
    fn test_text_report() {
        let report = run("V1 1 0 120 0 60\nR1 1 0 10").to_string();
        assert!(report.contains("V(1)"));
        assert!(report.contains("I(R1)"));
        assert!(report.contains("System summary (source V1)"));
        assert!(report.contains("10.00 ∠ 0.00°"));
        assert!(report.contains("(unity)"));
    }
}
