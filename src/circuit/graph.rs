//! Circuit model: node indices, frequency, and extra-row allocation.

use std::collections::{BTreeSet, HashMap};
use std::f64::consts::PI;

use tracing::debug;

use super::types::{BranchId, NodeId};
use crate::components::{Component, Netlist};
use crate::error::{PhasorError, Result};

/// Two source frequencies closer than this (relative) are the same frequency.
const FREQUENCY_RELATIVE_TOLERANCE: f64 = 1e-9;

/// A circuit ready for assembly.
#[derive(Debug)]
pub struct Circuit {
    /// All components, in netlist order
    pub components: Vec<Component>,

    /// Analysis frequency in Hz
    pub frequency: f64,

    /// Angular frequency ω = 2πf
    pub omega: f64,

    /// Non-ground node labels, ascending; position = matrix index
    nodes: Vec<NodeId>,

    /// Inverse of `nodes`
    node_map: HashMap<NodeId, usize>,

    /// Voltage-defining component id -> branch
    branch_map: HashMap<String, BranchId>,

    /// Voltage-defining component ids in branch order
    branch_names: Vec<String>,
}

impl Circuit {
    /// Build a circuit from a parsed netlist.
    ///
    /// Resolves the single analysis frequency, indexes the nodes, and assigns
    /// every voltage-defining component its extra row in file order.
    pub fn from_netlist(netlist: &Netlist) -> Result<Self> {
        let frequency = resolve_frequency(netlist)?;

        // Node indices depend only on the set of referenced labels
        let nodes: Vec<NodeId> = netlist
            .iter()
            .flat_map(Component::referenced_nodes)
            .filter(|n| !n.is_ground())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let node_map = nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();

        // First pass: extra rows for voltage-defining components
        let mut branch_map = HashMap::new();
        let mut branch_names = Vec::new();
        for component in netlist.iter().filter(|c| c.is_voltage_defining()) {
            branch_map.insert(component.name().to_string(), BranchId(branch_names.len()));
            branch_names.push(component.name().to_string());
        }

        debug!(
            frequency,
            nodes = nodes.len(),
            branches = branch_names.len(),
            "circuit built"
        );

        Ok(Circuit {
            components: netlist.components().to_vec(),
            frequency,
            omega: 2.0 * PI * frequency,
            nodes,
            node_map,
            branch_map,
            branch_names,
        })
    }

    /// Number of non-ground nodes (N).
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of voltage-defining components (M).
    pub fn num_branches(&self) -> usize {
        self.branch_names.len()
    }

    /// Get the total size of the MNA system, N + M.
    pub fn matrix_size(&self) -> usize {
        self.num_nodes() + self.num_branches()
    }

    /// Non-ground node labels in index order (ascending).
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Get the matrix index for a node voltage.
    /// Returns None for ground (node 0).
    pub fn node_index(&self, node: NodeId) -> Option<usize> {
        if node.is_ground() {
            None
        } else {
            self.node_map.get(&node).copied()
        }
    }

    /// Get the matrix index for a branch current.
    pub fn branch_index(&self, branch: BranchId) -> usize {
        self.num_nodes() + branch.0
    }

    /// Branch owned by a voltage-defining component.
    pub fn branch_of(&self, name: &str) -> Option<BranchId> {
        self.branch_map.get(name).copied()
    }

    /// Voltage-defining component ids in branch order.
    pub fn branch_names(&self) -> &[String] {
        &self.branch_names
    }

    /// Resolve the branch sensed by a current-controlled source.
    pub fn sensor_branch(&self, component: &str, sensor: &str) -> Result<BranchId> {
        self.branch_of(sensor)
            .ok_or_else(|| PhasorError::UnresolvedSensor {
                component: component.to_string(),
                sensor: sensor.to_string(),
            })
    }
}

fn resolve_frequency(netlist: &Netlist) -> Result<f64> {
    let mut frequency: Option<f64> = None;
    for component in netlist {
        let Some(found) = component.frequency() else {
            continue;
        };
        match frequency {
            None => frequency = Some(found),
            Some(expected) => {
                if (found - expected).abs() > FREQUENCY_RELATIVE_TOLERANCE * expected.abs() {
                    return Err(PhasorError::ConflictingFrequency {
                        component: component.name().to_string(),
                        expected,
                        found,
                    });
                }
            }
        }
    }
    frequency.ok_or(PhasorError::MissingFrequency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl;
    use approx::assert_relative_eq;

    fn circuit(input: &str) -> Result<Circuit> {
        Circuit::from_netlist(&dsl::parse(input).unwrap())
    }

    #[test]
    fn test_nodes_sorted_and_dense() {
        let c = circuit("V1 7 0 1 0 50\nR1 7 3 1\nR2 3 12 1\nE1 5 0 12 3 2").unwrap();
        assert_eq!(c.nodes(), &[NodeId(3), NodeId(5), NodeId(7), NodeId(12)]);
        assert_eq!(c.node_index(NodeId(3)), Some(0));
        assert_eq!(c.node_index(NodeId(12)), Some(3));
        assert_eq!(c.node_index(NodeId::GROUND), None);
        assert_eq!(c.node_index(NodeId(99)), None);
    }

    #[test]
    fn test_node_indices_independent_of_order() {
        let a = circuit("V1 2 0 1 0 50\nR1 2 9 1\nR2 9 4 1").unwrap();
        let b = circuit("R2 9 4 1\nR1 2 9 1\nV1 2 0 1 0 50").unwrap();
        assert_eq!(a.nodes(), b.nodes());
    }

    #[test]
    fn test_control_only_node_is_indexed() {
        let c = circuit("V1 1 0 1 0 50\nG1 1 0 4 0 1").unwrap();
        assert_eq!(c.nodes(), &[NodeId(1), NodeId(4)]);
    }

    #[test]
    fn test_branches_in_file_order() {
        let c = circuit("R1 1 0 1\nH1 3 0 V1 2\nV1 1 0 1 0 50\nE1 2 0 1 0 3\nF1 4 0 V1 1").unwrap();
        assert_eq!(c.num_nodes(), 4);
        assert_eq!(c.num_branches(), 3);
        assert_eq!(c.matrix_size(), 7);
        assert_eq!(c.branch_names(), &["H1", "V1", "E1"]);
        assert_eq!(c.branch_of("V1"), Some(BranchId(1)));
        assert_eq!(c.branch_index(BranchId(1)), 5);
        assert_eq!(c.branch_of("F1"), None);
    }

    #[test]
    fn test_sensor_resolution() {
        let c = circuit("V1 1 0 1 0 50\nR1 1 0 1\nF1 2 0 V1 1").unwrap();
        assert_eq!(c.sensor_branch("F1", "V1").unwrap(), BranchId(0));
        assert!(matches!(
            c.sensor_branch("F1", "R1"),
            Err(PhasorError::UnresolvedSensor { .. })
        ));
        assert!(matches!(
            c.sensor_branch("F1", "VX"),
            Err(PhasorError::UnresolvedSensor { .. })
        ));
    }

    #[test]
    fn test_frequency_and_omega() {
        let c = circuit("V1 1 0 120 0 60\nR1 1 0 10").unwrap();
        assert_eq!(c.frequency, 60.0);
        assert_relative_eq!(c.omega, 376.99111843077515, epsilon = 1e-10);
    }

    #[test]
    fn test_missing_frequency() {
        let err = circuit("R1 1 0 10\nC1 1 0 1u").unwrap_err();
        assert!(matches!(err, PhasorError::MissingFrequency));
        let err = circuit("").unwrap_err();
        assert!(matches!(err, PhasorError::MissingFrequency));
    }

    #[test]
    fn test_conflicting_frequency() {
        let err = circuit("V1 1 0 1 0 50\nR1 1 2 1\nI1 0 2 1 0 60").unwrap_err();
        match err {
            PhasorError::ConflictingFrequency {
                component,
                expected,
                found,
            } => {
                assert_eq!(component, "I1");
                assert_eq!(expected, 50.0);
                assert_eq!(found, 60.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_same_frequency_with_suffix() {
        let c = circuit("V1 1 0 1 0 1k\nI1 0 1 1 0 1000\nR1 1 0 1").unwrap();
        assert_eq!(c.frequency, 1000.0);
    }
}
