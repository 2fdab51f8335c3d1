//! Component models for AC circuit analysis.
//!
//! This module provides models for all supported circuit components:
//! - Linear: Resistor, Inductor, Capacitor
//! - Sources: sinusoidal Voltage Source, Current Source
//! - Controlled: VCCS, VCVS, CCCS, CCVS
//!
//! Each kind carries only its own fields; the assembler dispatches on
//! [`Component`] with an exhaustive `match`.

mod controlled;
mod linear;
mod sources;

pub use controlled::{Cccs, Ccvs, Vccs, Vcvs};
pub use linear::{Capacitor, Inductor, Resistor};
pub use sources::{CurrentSource, Sinusoid, VoltageSource};

use crate::circuit::NodeId;
use crate::dsl::{parse_value, ComponentDef, ComponentType, NetlistAst};
use crate::error::{PhasorError, Result};

/// A circuit component.
#[derive(Debug, Clone)]
pub enum Component {
    Resistor(Resistor),
    Inductor(Inductor),
    Capacitor(Capacitor),
    VoltageSource(VoltageSource),
    CurrentSource(CurrentSource),
    Vccs(Vccs),
    Vcvs(Vcvs),
    Cccs(Cccs),
    Ccvs(Ccvs),
}

impl Component {
    /// Create a component from a parsed netlist line, converting and
    /// validating every field.
    pub fn from_def(def: &ComponentDef) -> Result<Self> {
        let name = def.name.clone();
        let nodes = [node_field(def, 0)?, node_field(def, 1)?];

        let component = match def.component_type {
            ComponentType::Resistor => {
                Component::Resistor(Resistor::new(name, nodes, number_field(def, 2)?))
            }
            ComponentType::Inductor => {
                Component::Inductor(Inductor::new(name, nodes, number_field(def, 2)?))
            }
            ComponentType::Capacitor => {
                Component::Capacitor(Capacitor::new(name, nodes, number_field(def, 2)?))
            }
            ComponentType::VoltageSource => {
                Component::VoltageSource(VoltageSource::new(name, nodes, sinusoid_fields(def)?))
            }
            ComponentType::CurrentSource => {
                Component::CurrentSource(CurrentSource::new(name, nodes, sinusoid_fields(def)?))
            }
            ComponentType::Vccs => {
                let control = [node_field(def, 2)?, node_field(def, 3)?];
                Component::Vccs(Vccs::new(name, nodes, control, number_field(def, 4)?))
            }
            ComponentType::Vcvs => {
                let control = [node_field(def, 2)?, node_field(def, 3)?];
                Component::Vcvs(Vcvs::new(name, nodes, control, number_field(def, 4)?))
            }
            ComponentType::Cccs => {
                let sensor = def.fields[2].clone();
                Component::Cccs(Cccs::new(name, nodes, sensor, number_field(def, 3)?))
            }
            ComponentType::Ccvs => {
                let sensor = def.fields[2].clone();
                Component::Ccvs(Ccvs::new(name, nodes, sensor, number_field(def, 3)?))
            }
        };

        Ok(component)
    }

    /// Get the component name.
    pub fn name(&self) -> &str {
        match self {
            Component::Resistor(r) => &r.name,
            Component::Inductor(l) => &l.name,
            Component::Capacitor(c) => &c.name,
            Component::VoltageSource(v) => &v.name,
            Component::CurrentSource(i) => &i.name,
            Component::Vccs(g) => &g.name,
            Component::Vcvs(e) => &e.name,
            Component::Cccs(f) => &f.name,
            Component::Ccvs(h) => &h.name,
        }
    }

    /// Get the terminal nodes [n+, n-].
    pub fn nodes(&self) -> [NodeId; 2] {
        match self {
            Component::Resistor(r) => r.nodes,
            Component::Inductor(l) => l.nodes,
            Component::Capacitor(c) => c.nodes,
            Component::VoltageSource(v) => v.nodes,
            Component::CurrentSource(i) => i.nodes,
            Component::Vccs(g) => g.nodes,
            Component::Vcvs(e) => e.nodes,
            Component::Cccs(f) => f.nodes,
            Component::Ccvs(h) => h.nodes,
        }
    }

    /// Control nodes [nc+, nc-] of voltage-controlled sources.
    pub fn control_nodes(&self) -> Option<[NodeId; 2]> {
        match self {
            Component::Vccs(g) => Some(g.control),
            Component::Vcvs(e) => Some(e.control),
            _ => None,
        }
    }

    /// Every node this component references, terminals first.
    pub fn referenced_nodes(&self) -> impl Iterator<Item = NodeId> {
        self.nodes()
            .into_iter()
            .chain(self.control_nodes().into_iter().flatten())
    }

    /// Sensing component id of current-controlled sources.
    pub fn sensor(&self) -> Option<&str> {
        match self {
            Component::Cccs(f) => Some(&f.sensor),
            Component::Ccvs(h) => Some(&h.sensor),
            _ => None,
        }
    }

    /// Frequency carried by independent sources.
    pub fn frequency(&self) -> Option<f64> {
        match self {
            Component::VoltageSource(v) => Some(v.waveform.frequency),
            Component::CurrentSource(i) => Some(i.waveform.frequency),
            _ => None,
        }
    }

    /// Check if this component forces a voltage constraint and therefore owns
    /// an extra MNA row (V, E, H).
    pub fn is_voltage_defining(&self) -> bool {
        matches!(
            self,
            Component::VoltageSource(_) | Component::Vcvs(_) | Component::Ccvs(_)
        )
    }

    /// The kind of this component.
    pub fn component_type(&self) -> ComponentType {
        match self {
            Component::Resistor(_) => ComponentType::Resistor,
            Component::Inductor(_) => ComponentType::Inductor,
            Component::Capacitor(_) => ComponentType::Capacitor,
            Component::VoltageSource(_) => ComponentType::VoltageSource,
            Component::CurrentSource(_) => ComponentType::CurrentSource,
            Component::Vccs(_) => ComponentType::Vccs,
            Component::Vcvs(_) => ComponentType::Vcvs,
            Component::Cccs(_) => ComponentType::Cccs,
            Component::Ccvs(_) => ComponentType::Ccvs,
        }
    }
}

/// An ordered list of components, in netlist file order.
#[derive(Debug, Clone, Default)]
pub struct Netlist {
    components: Vec<Component>,
}

impl Netlist {
    /// Convert every parsed line into a typed component.
    pub fn from_ast(ast: NetlistAst) -> Result<Self> {
        let components = ast
            .components
            .iter()
            .map(Component::from_def)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { components })
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Component> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<'a> IntoIterator for &'a Netlist {
    type Item = &'a Component;
    type IntoIter = std::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

fn field_error(def: &ComponentDef, idx: usize, message: String) -> PhasorError {
    PhasorError::invalid_field(
        &def.name,
        def.line,
        def.component_type.field_names()[idx],
        message,
    )
}

fn node_field(def: &ComponentDef, idx: usize) -> Result<NodeId> {
    let text = &def.fields[idx];
    if text.eq_ignore_ascii_case("gnd") {
        return Ok(NodeId::GROUND);
    }
    text.parse::<u32>().map(NodeId).map_err(|_| {
        field_error(
            def,
            idx,
            format!("expected a non-negative integer node label, got '{}'", text),
        )
    })
}

fn number_field(def: &ComponentDef, idx: usize) -> Result<f64> {
    let text = &def.fields[idx];
    match parse_value(text) {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(field_error(def, idx, format!("value must be finite, got '{}'", text))),
        None => Err(field_error(def, idx, format!("not a number: '{}'", text))),
    }
}

fn sinusoid_fields(def: &ComponentDef) -> Result<Sinusoid> {
    let magnitude = number_field(def, 2)?;
    let phase_deg = number_field(def, 3)?;
    let frequency = number_field(def, 4)?;
    if frequency <= 0.0 {
        return Err(field_error(
            def,
            4,
            format!("frequency must be positive, got {}", frequency),
        ));
    }
    Ok(Sinusoid::new(magnitude, phase_deg, frequency))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl;

    #[test]
    fn test_every_kind_parses_to_its_variant() {
        let netlist = dsl::parse(
            "V1 1 0 10 0 50\n\
             I1 0 2 1 30 50\n\
             R1 1 2 1k\n\
             L1 2 3 10m\n\
             C1 3 0 1u\n\
             G1 4 0 1 2 0.5\n\
             E1 5 0 2 3 10\n\
             F1 6 0 V1 2\n\
             H1 7 0 E1 100\n",
        )
        .unwrap();

        let types: Vec<ComponentType> = netlist.iter().map(|c| c.component_type()).collect();
        assert_eq!(
            types,
            vec![
                ComponentType::VoltageSource,
                ComponentType::CurrentSource,
                ComponentType::Resistor,
                ComponentType::Inductor,
                ComponentType::Capacitor,
                ComponentType::Vccs,
                ComponentType::Vcvs,
                ComponentType::Cccs,
                ComponentType::Ccvs,
            ]
        );

        let components = netlist.components();
        match &components[2] {
            Component::Resistor(r) => assert_eq!(r.resistance, 1000.0),
            other => panic!("unexpected component: {:?}", other),
        }
        match &components[1] {
            Component::CurrentSource(i) => {
                assert_eq!(i.nodes, [NodeId::GROUND, NodeId(2)]);
                assert_eq!(i.waveform, Sinusoid::new(1.0, 30.0, 50.0));
            }
            other => panic!("unexpected component: {:?}", other),
        }
        assert_eq!(components[5].control_nodes(), Some([NodeId(1), NodeId(2)]));
        assert_eq!(components[8].sensor(), Some("E1"));
    }

    #[test]
    fn test_voltage_defining_kinds() {
        let netlist = dsl::parse("V1 1 0 1 0 50\nE1 2 0 1 0 2\nH1 3 0 V1 1\nF1 4 0 V1 1\nG1 5 0 1 0 1\nR1 1 0 1").unwrap();
        let defining: Vec<&str> = netlist
            .iter()
            .filter(|c| c.is_voltage_defining())
            .map(|c| c.name())
            .collect();
        assert_eq!(defining, vec!["V1", "E1", "H1"]);
    }

    #[test]
    fn test_gnd_alias() {
        let netlist = dsl::parse("R1 1 GND 10\nR2 gnd 1 10").unwrap();
        assert_eq!(netlist.components()[0].nodes(), [NodeId(1), NodeId::GROUND]);
        assert_eq!(netlist.components()[1].nodes(), [NodeId::GROUND, NodeId(1)]);
    }

    #[test]
    fn test_bad_node_label() {
        let err = dsl::parse("R1 in 0 10").unwrap_err();
        match err {
            PhasorError::InvalidField { name, line, field, .. } => {
                assert_eq!(name, "R1");
                assert_eq!(line, 1);
                assert_eq!(field, "n+");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_number_names_field() {
        let err = dsl::parse("* comment\nV1 1 0 120 zero 60").unwrap_err();
        match err {
            PhasorError::InvalidField { line, field, .. } => {
                assert_eq!(line, 2);
                assert_eq!(field, "phase_deg");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_positive_frequency_rejected() {
        let err = dsl::parse("V1 1 0 120 0 0").unwrap_err();
        assert!(matches!(err, PhasorError::InvalidField { ref field, .. } if field == "frequency"));
        assert!(dsl::parse("I1 1 0 1 0 -60").is_err());
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let err = dsl::parse("R1 1 0 inf").unwrap_err();
        assert!(matches!(err, PhasorError::InvalidField { ref field, .. } if field == "value"));
    }

    #[test]
    fn test_referenced_nodes_include_control() {
        let netlist = dsl::parse("E1 2 0 5 4 10").unwrap();
        let nodes: Vec<NodeId> = netlist.components()[0].referenced_nodes().collect();
        assert_eq!(nodes, vec![NodeId(2), NodeId(0), NodeId(5), NodeId(4)]);
    }
}
