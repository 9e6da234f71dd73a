use crate::banded::BandedMatrix;
use crate::dlu::DluSplit;
use crate::error::SolverError;
use crate::Real;
use na::DVector;

/// Pivot magnitudes below this threshold abort a triangular sweep.
const PIVOT_FLOOR: Real = 1e-14;

/// One of the three preconditioners understood by the conjugate-gradient
/// driver, stored in the same k-diagonal layout as the system matrix.
///
/// The selector `omega` doubles as the discriminant for the application
/// algorithm:
/// - `omega == -1`: identity, application is a copy;
/// - `omega == 0`: Jacobi, the matrix stores `1/D` on its main diagonal and
///   application is a plain banded multiply;
/// - `omega` in `[1, 2)`: Gauss-Seidel (`omega == 1`) or SSOR, the matrix
///   stores `D`, `L` and `U` jointly and application runs two triangular
///   sweeps through the factors `(D + ωL)` and `(D + ωU)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Preconditioner {
    matrix: BandedMatrix,
    omega: Real,
}

impl Preconditioner {
    /// Builds the preconditioner selected by `omega` from the split parts of
    /// the (already symmetrized) system matrix.
    ///
    /// Jacobi and SSOR require every main-diagonal entry to be nonzero;
    /// selectors outside `{-1} ∪ {0} ∪ [1, 2)` are rejected.
    pub fn build(split: &DluSplit, omega: Real) -> Result<Self, SolverError> {
        let n = split.d.len();
        let m = split.lower.len();
        let k = 2 * m + 1;
        let mut matrix = BandedMatrix::zeros(n, k);

        if omega == -1.0 {
            matrix.set_diagonal(m, DVector::from_element(n, 1.0));
        } else if omega == 0.0 {
            let main = matrix.diagonal_mut(m);
            for j in 0..n {
                if split.d[j] == 0.0 {
                    return Err(SolverError::ZeroDiagonal { index: j });
                }
                main[j] = 1.0 / split.d[j];
            }
        } else if (1.0..2.0).contains(&omega) {
            if let Some(j) = (0..n).find(|&j| split.d[j] == 0.0) {
                return Err(SolverError::ZeroDiagonal { index: j });
            }
            matrix.set_diagonal(m, split.d.clone());
            for i in 0..m {
                matrix.set_diagonal(m - 1 - i, split.lower[i].clone());
                matrix.set_diagonal(m + 1 + i, split.upper[i].clone());
            }
        } else {
            return Err(SolverError::InvalidOmega { omega });
        }

        Ok(Self { matrix, omega })
    }

    /// The selector this preconditioner was built with.
    pub fn omega(&self) -> Real {
        self.omega
    }

    /// Applies the inverse action `M⁻¹ r`.
    pub fn apply(&self, r: &DVector<Real>) -> Result<DVector<Real>, SolverError> {
        if self.omega == -1.0 {
            Ok(r.clone())
        } else if self.omega == 0.0 {
            // The matrix already stores D⁻¹, so the inverse action is a
            // plain multiply.
            Ok(self.matrix.mul_vector(r))
        } else if (1.0..2.0).contains(&self.omega) {
            self.apply_ssor(r)
        } else {
            // Unreachable when `self` came out of `build`.
            Err(SolverError::InvalidOmega { omega: self.omega })
        }
    }

    /// SSOR application: solves `(D + ωL) z = r` forward, then
    /// `(D + ωU) v = D z` backward.
    fn apply_ssor(&self, r: &DVector<Real>) -> Result<DVector<Real>, SolverError> {
        let n = self.matrix.order();
        let k = self.matrix.bandwidth();
        let m = k / 2;
        let w = self.omega;

        // Forward sweep. Lower offsets are strictly negative, so every z[j]
        // read here was produced by an earlier step of this loop.
        let mut z = DVector::zeros(n);
        for i in 0..n {
            let mut sum = r[i];
            for d in 0..m {
                let j = i as isize + d as isize - m as isize;
                if j >= 0 {
                    sum -= w * self.matrix.diagonal(d)[i] * z[j as usize];
                }
            }

            let pivot = self.matrix.diagonal(m)[i];
            if pivot.abs() < PIVOT_FLOOR {
                return Err(SolverError::TinyPivot { index: i, value: pivot });
            }
            z[i] = sum / pivot;
        }

        // Backward sweep, upper offsets strictly positive.
        let mut v = DVector::zeros(n);
        for i in (0..n).rev() {
            let pivot = self.matrix.diagonal(m)[i];
            let mut sum = pivot * z[i];
            for d in m + 1..k {
                let j = i + d - m;
                if j < n {
                    sum -= w * self.matrix.diagonal(d)[i] * v[j];
                }
            }

            if pivot.abs() < PIVOT_FLOOR {
                return Err(SolverError::TinyPivot { index: i, value: pivot });
            }
            v[i] = sum / pivot;
        }

        Ok(v)
    }
}
