//! Circuit validation.

use crate::error::{PhasorError, Result};

use super::{Circuit, NodeId};

/// Validate circuit topology before solving.
///
/// Checks:
/// - No voltage-defining component has both terminals on the same node
/// - Every node has a path to ground through component terminals
///
/// Both conditions make the MNA matrix singular; catching them here gives a
/// clearer message. The solver still detects every other singular case.
pub fn validate_circuit(circuit: &Circuit) -> Result<()> {
    for component in circuit.components.iter().filter(|c| c.is_voltage_defining()) {
        let [n1, n2] = component.nodes();
        if n1 == n2 {
            return Err(PhasorError::singular(format!(
                "'{}' has both terminals on node {}",
                component.name(),
                n1
            )));
        }
    }

    let floating = floating_nodes(circuit);
    if !floating.is_empty() {
        let labels: Vec<String> = floating.iter().map(NodeId::to_string).collect();
        return Err(PhasorError::singular(format!(
            "floating node(s) {} with no path to ground",
            labels.join(", ")
        )));
    }

    Ok(())
}

/// Nodes not connected to ground through any chain of component terminals.
/// Control-node references do not conduct.
fn floating_nodes(circuit: &Circuit) -> Vec<NodeId> {
    let n = circuit.num_nodes();
    // Ground is the extra set at index n
    let mut sets = DisjointSets::new(n + 1);
    let index = |node: NodeId| circuit.node_index(node).unwrap_or(n);

    for component in &circuit.components {
        let [n1, n2] = component.nodes();
        sets.union(index(n1), index(n2));
    }

    let ground = sets.find(n);
    circuit
        .nodes()
        .iter()
        .enumerate()
        .filter(|&(i, _)| sets.find(i) != ground)
        .map(|(_, &node)| node)
        .collect()
}

struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}
