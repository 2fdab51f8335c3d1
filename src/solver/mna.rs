//! MNA matrix assembly.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use tracing::{debug, trace};

use crate::circuit::{BranchId, Circuit};
use crate::components::Component;
use crate::error::{PhasorError, Result};

const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Complex MNA system Ax = b.
///
/// Rows/columns 0..num_nodes are node voltages; num_nodes..size are branch
/// currents of voltage-defining components.
#[derive(Debug, Clone)]
pub struct ComplexMna {
    /// System matrix A
    pub a: DMatrix<Complex64>,
    /// Source vector b
    pub b: DVector<Complex64>,
    /// Number of node-voltage unknowns
    pub num_nodes: usize,
}

impl ComplexMna {
    /// Create a zeroed system with `num_nodes` node rows and `num_branches`
    /// extra rows.
    pub fn new(num_nodes: usize, num_branches: usize) -> Self {
        let size = num_nodes + num_branches;
        Self {
            a: DMatrix::zeros(size, size),
            b: DVector::zeros(size),
            num_nodes,
        }
    }

    /// Matrix dimension.
    pub fn size(&self) -> usize {
        self.b.len()
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: Complex64) {
        self.a[(row, col)] += value;
    }

    /// Add to source vector element.
    pub fn add_source(&mut self, row: usize, value: Complex64) {
        self.b[row] += value;
    }

    /// Stamp an admittance between two nodes.
    /// For an admittance Y between nodes n1 and n2:
    ///   A[n1,n1] += Y
    ///   A[n2,n2] += Y
    ///   A[n1,n2] -= Y
    ///   A[n2,n1] -= Y
    pub fn stamp_admittance(&mut self, n1: Option<usize>, n2: Option<usize>, y: Complex64) {
        if let Some(i) = n1 {
            self.add(i, i, y);
        }
        if let Some(j) = n2 {
            self.add(j, j, y);
        }
        if let (Some(i), Some(j)) = (n1, n2) {
            self.add(i, j, -y);
            self.add(j, i, -y);
        }
    }

    /// Stamp a current source between two nodes.
    /// The source draws `current` out of n+ and delivers it into n-.
    pub fn stamp_current_source(
        &mut self,
        n_pos: Option<usize>,
        n_neg: Option<usize>,
        current: Complex64,
    ) {
        if let Some(i) = n_pos {
            self.add_source(i, -current);
        }
        if let Some(j) = n_neg {
            self.add_source(j, current);
        }
    }

    /// Stamp the topology part of a voltage-defining branch at row `br`:
    /// the branch current enters KCL at n+ / n-, and the branch row reads
    /// V[n+] - V[n-].
    pub fn stamp_branch(&mut self, n_pos: Option<usize>, n_neg: Option<usize>, br: usize) {
        if let Some(i) = n_pos {
            self.add(br, i, ONE);
            self.add(i, br, ONE);
        }
        if let Some(j) = n_neg {
            self.add(br, j, -ONE);
            self.add(j, br, -ONE);
        }
    }

    /// Stamp a voltage source with branch current at index br.
    /// V[n+] - V[n-] = E
    pub fn stamp_voltage_source(
        &mut self,
        n_pos: Option<usize>,
        n_neg: Option<usize>,
        br: usize,
        voltage: Complex64,
    ) {
        self.stamp_branch(n_pos, n_neg, br);
        self.add_source(br, voltage);
    }

    /// Stamp a VCVS (Voltage-Controlled Voltage Source).
    /// V[out+] - V[out-] = gain * (V[ctrl+] - V[ctrl-])
    pub fn stamp_vcvs(
        &mut self,
        n_out_pos: Option<usize>,
        n_out_neg: Option<usize>,
        n_ctrl_pos: Option<usize>,
        n_ctrl_neg: Option<usize>,
        br: usize,
        gain: f64,
    ) {
        self.stamp_branch(n_out_pos, n_out_neg, br);

        // Control voltage contribution
        if let Some(i) = n_ctrl_pos {
            self.add(br, i, Complex64::from(-gain));
        }
        if let Some(j) = n_ctrl_neg {
            self.add(br, j, Complex64::from(gain));
        }
    }

    /// Stamp a VCCS (Voltage-Controlled Current Source).
    /// I = gm * (V[ctrl+] - V[ctrl-]), flowing from out+ through the source
    /// to out-.
    pub fn stamp_vccs(
        &mut self,
        n_out_pos: Option<usize>,
        n_out_neg: Option<usize>,
        n_ctrl_pos: Option<usize>,
        n_ctrl_neg: Option<usize>,
        gm: f64,
    ) {
        let gm = Complex64::from(gm);
        if let (Some(i), Some(k)) = (n_out_pos, n_ctrl_pos) {
            self.add(i, k, gm);
        }
        if let (Some(i), Some(l)) = (n_out_pos, n_ctrl_neg) {
            self.add(i, l, -gm);
        }
        if let (Some(j), Some(k)) = (n_out_neg, n_ctrl_pos) {
            self.add(j, k, -gm);
        }
        if let (Some(j), Some(l)) = (n_out_neg, n_ctrl_neg) {
            self.add(j, l, gm);
        }
    }

    /// Stamp a CCCS (Current-Controlled Current Source) sensing the branch
    /// current at index `sense`.
    /// I = gain * I[sense], flowing from out+ through the source to out-.
    pub fn stamp_cccs(
        &mut self,
        n_out_pos: Option<usize>,
        n_out_neg: Option<usize>,
        sense: usize,
        gain: f64,
    ) {
        if let Some(i) = n_out_pos {
            self.add(i, sense, Complex64::from(gain));
        }
        if let Some(j) = n_out_neg {
            self.add(j, sense, Complex64::from(-gain));
        }
    }

    /// Stamp a CCVS (Current-Controlled Voltage Source) with its own branch
    /// at `br`, sensing the branch current at index `sense`.
    /// V[out+] - V[out-] = gain * I[sense]
    pub fn stamp_ccvs(
        &mut self,
        n_out_pos: Option<usize>,
        n_out_neg: Option<usize>,
        br: usize,
        sense: usize,
        gain: f64,
    ) {
        self.stamp_branch(n_out_pos, n_out_neg, br);
        self.add(br, sense, Complex64::from(-gain));
    }
}

/// Assemble the MNA system for a circuit.
///
/// Extra rows were assigned to every voltage-defining component when the
/// [`Circuit`] was built, so sensor references resolve regardless of where
/// the sensed component appears in the netlist.
pub fn assemble(circuit: &Circuit) -> Result<ComplexMna> {
    let mut mna = ComplexMna::new(circuit.num_nodes(), circuit.num_branches());
    let omega = circuit.omega;

    for component in &circuit.components {
        let [n1, n2] = component.nodes().map(|n| circuit.node_index(n));
        trace!(component = component.name(), "stamping");

        match component {
            Component::Resistor(r) => {
                stamp_passive(&mut mna, component, n1, n2, r.admittance())?;
            }

            Component::Inductor(l) => {
                stamp_passive(&mut mna, component, n1, n2, l.admittance(omega))?;
            }

            Component::Capacitor(c) => {
                stamp_passive(&mut mna, component, n1, n2, c.admittance(omega))?;
            }

            Component::VoltageSource(v) => {
                let br = own_branch(circuit, component)?;
                mna.stamp_voltage_source(n1, n2, br, v.voltage());
            }

            Component::CurrentSource(i) => {
                mna.stamp_current_source(n1, n2, i.current());
            }

            Component::Vccs(g) => {
                let [c1, c2] = g.control.map(|n| circuit.node_index(n));
                mna.stamp_vccs(n1, n2, c1, c2, g.gain);
            }

            Component::Vcvs(e) => {
                let br = own_branch(circuit, component)?;
                let [c1, c2] = e.control.map(|n| circuit.node_index(n));
                mna.stamp_vcvs(n1, n2, c1, c2, br, e.gain);
            }

            Component::Cccs(f) => {
                let sense = circuit.branch_index(circuit.sensor_branch(&f.name, &f.sensor)?);
                mna.stamp_cccs(n1, n2, sense, f.gain);
            }

            Component::Ccvs(h) => {
                let br = own_branch(circuit, component)?;
                let sense = circuit.branch_index(circuit.sensor_branch(&h.name, &h.sensor)?);
                mna.stamp_ccvs(n1, n2, br, sense, h.gain);
            }
        }
    }

    debug!(
        size = mna.size(),
        nodes = mna.num_nodes,
        branches = mna.size() - mna.num_nodes,
        "MNA system assembled"
    );
    Ok(mna)
}

fn stamp_passive(
    mna: &mut ComplexMna,
    component: &Component,
    n1: Option<usize>,
    n2: Option<usize>,
    y: Complex64,
) -> Result<()> {
    if !y.is_finite() {
        return Err(PhasorError::singular(format!(
            "'{}' has zero impedance",
            component.name()
        )));
    }
    mna.stamp_admittance(n1, n2, y);
    Ok(())
}

fn own_branch(circuit: &Circuit, component: &Component) -> Result<usize> {
    circuit
        .branch_of(component.name())
        .map(|b: BranchId| circuit.branch_index(b))
        .ok_or_else(|| {
            PhasorError::singular(format!(
                "'{}' was not assigned a branch row",
                component.name()
            ))
        })
}
