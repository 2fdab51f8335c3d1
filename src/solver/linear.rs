//! Dense complex linear solve.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use tracing::debug;

use crate::circuit::{BranchId, Circuit, NodeId};
use crate::error::{PhasorError, Result};

/// Solve the complex linear system Ax = b using LU decomposition with
/// partial pivoting.
///
/// Each equation is first divided by its largest coefficient, so admittances
/// spanning many decades (a milliohm shunt next to a gigaohm divider) do not
/// hide one another. A pivot of the scaled system whose magnitude is at most
/// `pivot_tolerance` means the system has no unique solution. The returned
/// vector never contains NaN or infinite entries.
pub fn solve_complex(
    a: &DMatrix<Complex64>,
    b: &DVector<Complex64>,
    pivot_tolerance: f64,
) -> Result<DVector<Complex64>> {
    let n = b.len();
    debug_assert_eq!((a.nrows(), a.ncols()), (n, n));
    if n == 0 {
        return Ok(DVector::zeros(0));
    }

    let mut a = a.clone();
    let mut b = b.clone();
    for i in 0..n {
        let row_max = a.row(i).iter().map(|z| z.norm()).fold(0.0, f64::max);
        if row_max == 0.0 {
            return Err(PhasorError::singular(format!(
                "equation {} of {} has no coefficients; check for floating nodes \
                 or current-source cutsets",
                i + 1,
                n
            )));
        }
        let scale = 1.0 / row_max;
        a.row_mut(i).iter_mut().for_each(|z| *z *= scale);
        b[i] *= scale;
    }

    let lu = a.lu();
    let u = lu.u();
    if let Some(k) = (0..n).find(|&k| u[(k, k)].norm() <= pivot_tolerance) {
        return Err(PhasorError::singular(format!(
            "pivot {} of {} vanished; check for floating nodes, voltage-source loops \
             or current-source cutsets",
            k + 1,
            n
        )));
    }

    let x = lu
        .solve(&b)
        .ok_or_else(|| PhasorError::singular("LU back-substitution failed"))?;
    if x.iter().any(|z| !z.is_finite()) {
        return Err(PhasorError::singular("solution contains non-finite values"));
    }

    debug!(size = n, "linear system solved");
    Ok(x)
}

/// Solution vector of an MNA system: N node voltages followed by M branch
/// currents.
#[derive(Debug, Clone)]
pub struct Solution {
    x: DVector<Complex64>,
}

impl Solution {
    pub fn new(x: DVector<Complex64>) -> Self {
        Self { x }
    }

    /// Get the voltage at a matrix index (ground for `None`).
    pub fn voltage(&self, index: Option<usize>) -> Complex64 {
        match index {
            Some(i) => self.x[i],
            None => Complex64::new(0.0, 0.0), // Ground
        }
    }

    /// Get the voltage at a NodeId (handling ground).
    pub fn node_voltage(&self, circuit: &Circuit, node: NodeId) -> Complex64 {
        self.voltage(circuit.node_index(node))
    }

    /// Branch current of a voltage-defining component, flowing into its n+.
    pub fn branch_current(&self, circuit: &Circuit, branch: BranchId) -> Complex64 {
        self.x[circuit.branch_index(branch)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_solve_complex() {
        // (1+j) x + y = 2 + j
        //       x - j y = 1 - j
        // Solution: x = 1, y = 1
        let a = DMatrix::from_row_slice(2, 2, &[c(1.0, 1.0), c(1.0, 0.0), c(1.0, 0.0), c(0.0, -1.0)]);
        let b = DVector::from_vec(vec![c(2.0, 1.0), c(1.0, -1.0)]);

        let x = solve_complex(&a, &b, 1e-13).unwrap();

        assert_relative_eq!(x[0].re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[0].im, 0.0, epsilon = 1e-12);
        assert_relative_eq!(x[1].re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1].im, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_matrix() {
        // Row 2 = j * row 1
        let a = DMatrix::from_row_slice(2, 2, &[c(1.0, 0.0), c(2.0, 0.0), c(0.0, 1.0), c(0.0, 2.0)]);
        let b = DVector::from_vec(vec![c(1.0, 0.0), c(0.0, 1.0)]);

        let result = solve_complex(&a, &b, 1e-13);
        assert!(matches!(result, Err(PhasorError::SingularMatrix { .. })));
    }

    #[test]
    fn test_wide_admittance_range() {
        // 1 mOhm shunt across the source, 100 GOhm divider hanging off it
        let g_small = 1e-11;
        let a = DMatrix::from_row_slice(
            3,
            3,
            &[
                c(1e3 + g_small, 0.0),
                c(-g_small, 0.0),
                c(1.0, 0.0),
                c(-g_small, 0.0),
                c(2.0 * g_small, 0.0),
                c(0.0, 0.0),
                c(1.0, 0.0),
                c(0.0, 0.0),
                c(0.0, 0.0),
            ],
        );
        let b = DVector::from_vec(vec![c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0)]);

        let x = solve_complex(&a, &b, 1e-13).unwrap();

        assert_relative_eq!(x[0].re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1].re, 0.5, epsilon = 1e-9);
        assert_relative_eq!(x[2].re, -1e3, max_relative = 1e-9);
    }

    #[test]
    fn test_zero_row_is_singular() {
        let a = DMatrix::from_row_slice(2, 2, &[c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(0.0, 0.0)]);
        let b = DVector::from_vec(vec![c(1.0, 0.0), c(0.0, 0.0)]);
        assert!(matches!(
            solve_complex(&a, &b, 1e-13),
            Err(PhasorError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn test_zero_matrix() {
        let a = DMatrix::zeros(3, 3);
        let b = DVector::zeros(3);
        assert!(matches!(
            solve_complex(&a, &b, 1e-13),
            Err(PhasorError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn test_empty_system() {
        let a = DMatrix::zeros(0, 0);
        let b = DVector::zeros(0);
        assert_eq!(solve_complex(&a, &b, 1e-13).unwrap().len(), 0);
    }

    #[test]
    fn test_solution_ground_voltage() {
        let s = Solution::new(DVector::from_vec(vec![c(3.0, 4.0)]));
        assert_eq!(s.voltage(None), c(0.0, 0.0));
        assert_eq!(s.voltage(Some(0)), c(3.0, 4.0));
    }
}
