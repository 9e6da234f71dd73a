use crate::banded::BandedMatrix;
use crate::Real;
use na::DVector;
use rand::Rng;

/// Generates a random `n × n`, `k`-diagonal system `(A, b)` for tests and
/// benchmarks.
///
/// Main-diagonal entries are drawn uniformly from `[0, 2k)` so the matrix is
/// diagonally dominant on average, off-diagonal entries from `[0, 1)`, and
/// right-hand-side entries from `[0, 4k)`. Entries outside the valid column
/// range of a boundary diagonal are left at zero.
///
/// The caller supplies the random generator; seed it to make runs
/// reproducible.
pub fn generate_system(n: usize, k: usize, rng: &mut impl Rng) -> (BandedMatrix, DVector<Real>) {
    let mut a = BandedMatrix::zeros(n, k);
    let m = k / 2;

    for d in 0..k {
        let scale = if d == m { (2 * k) as Real } else { 1.0 };
        // Rows where diagonal d actually lands inside the matrix.
        let (first, last) = if d < m { (m - d, n) } else { (0, n - (d - m)) };

        let values = a.diagonal_mut(d);
        for row in first..last {
            values[row] = scale * rng.random::<Real>();
        }
    }

    let b = DVector::from_fn(n, |_, _| (4 * k) as Real * rng.random::<Real>());
    (a, b)
}
