use crate::Real;
use itertools::iproduct;
use na::DVector;
use nalgebra_sparse::{CooMatrix, CscMatrix};

/// Compact storage for an `n × n` matrix whose nonzero entries are confined
/// to `k` consecutive diagonals centered on the main diagonal.
///
/// Diagonal `d` (for `d` in `0..k`) stores the entries at matrix offset
/// `d - m` from the main diagonal, where `m = k / 2`. The entry at
/// `(row, col)` lives at `diags[col - row + m][row]` whenever
/// `|col - row| <= m` and is implicitly zero otherwise.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BandedMatrix {
    n: usize,
    k: usize,
    diags: Vec<DVector<Real>>,
}

impl BandedMatrix {
    /// Allocates an all-zero banded matrix of order `n` with `k` diagonals.
    ///
    /// `k` must be odd and satisfy `1 < k <= 2n - 1`. This is checked once
    /// here, at the boundary; the accessors below rely on it.
    pub fn zeros(n: usize, k: usize) -> Self {
        assert!(
            k % 2 == 1 && k > 1 && k <= 2 * n - 1,
            "invalid bandwidth k = {k} for order n = {n}"
        );
        Self {
            n,
            k,
            diags: vec![DVector::zeros(n); k],
        }
    }

    /// The order `n` of the matrix.
    pub fn order(&self) -> usize {
        self.n
    }

    /// The number `k` of stored diagonals.
    pub fn bandwidth(&self) -> usize {
        self.k
    }

    /// The number of sub-diagonals (equivalently, super-diagonals): `k / 2`.
    pub fn half_bandwidth(&self) -> usize {
        self.k / 2
    }

    /// The entry at `(row, col)`; zero outside the band.
    pub fn get(&self, row: usize, col: usize) -> Real {
        let m = self.k / 2;
        let offset = col as isize - row as isize;
        if offset.unsigned_abs() > m {
            return 0.0;
        }
        self.diags[(offset + m as isize) as usize][row]
    }

    /// The stored vector for diagonal `d`, row-indexed.
    pub fn diagonal(&self, d: usize) -> &DVector<Real> {
        &self.diags[d]
    }

    /// Mutable access to the stored vector for diagonal `d`.
    pub fn diagonal_mut(&mut self, d: usize) -> &mut DVector<Real> {
        &mut self.diags[d]
    }

    /// Overwrites diagonal `d` with `values`.
    pub fn set_diagonal(&mut self, d: usize, values: DVector<Real>) {
        assert_eq!(values.len(), self.n);
        self.diags[d] = values;
    }

    /// Banded matrix-vector product `A * x`.
    pub fn mul_vector(&self, x: &DVector<Real>) -> DVector<Real> {
        assert_eq!(x.len(), self.n);
        let m = self.k / 2;
        let mut result = DVector::zeros(self.n);

        for (d, row) in iproduct!(0..self.k, 0..self.n) {
            let col = row as isize + d as isize - m as isize;
            if col < 0 || col >= self.n as isize {
                continue;
            }
            let val = self.diags[d][row];
            if val != 0.0 {
                result[row] += val * x[col as usize];
            }
        }

        result
    }

    /// Euclidean norm of the residual `b - A * x`.
    pub fn residual_norm(&self, b: &DVector<Real>, x: &DVector<Real>) -> Real {
        (b - self.mul_vector(x)).norm()
    }

    /// Triplet-format copy of the stored band, for handing the system to
    /// generic sparse code.
    pub fn to_coo(&self) -> CooMatrix<Real> {
        let m = self.k / 2;
        let mut coo = CooMatrix::new(self.n, self.n);

        for (d, row) in iproduct!(0..self.k, 0..self.n) {
            let col = row as isize + d as isize - m as isize;
            if col < 0 || col >= self.n as isize {
                continue;
            }
            let val = self.diags[d][row];
            if val != 0.0 {
                coo.push(row, col as usize, val);
            }
        }

        coo
    }

    /// Compressed-sparse-column copy of the stored band.
    pub fn to_csc(&self) -> CscMatrix<Real> {
        CscMatrix::from(&self.to_coo())
    }

    /// Dense row-major copy, for tests and debugging.
    pub fn to_dense_rows(&self) -> Vec<Vec<Real>> {
        (0..self.n)
            .map(|i| (0..self.n).map(|j| self.get(i, j)).collect())
            .collect()
    }
}
