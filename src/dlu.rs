use crate::banded::BandedMatrix;
use crate::Real;
use na::DVector;

/// The main diagonal and strictly triangular bands of a banded matrix,
/// extracted once and reused by the preconditioner builders.
#[derive(Clone, Debug, PartialEq)]
pub struct DluSplit {
    /// Main diagonal, length `n`.
    pub d: DVector<Real>,
    /// Sub-diagonals; `lower[i]` is the `(i + 1)`-th diagonal below the main
    /// one. The main diagonal is never included.
    pub lower: Vec<DVector<Real>>,
    /// Super-diagonals; `upper[i]` is the `(i + 1)`-th diagonal above the
    /// main one.
    pub upper: Vec<DVector<Real>>,
}

impl DluSplit {
    /// Splits `a` into its diagonal, strictly-lower and strictly-upper parts.
    ///
    /// Pure extraction, no numerical work; calling it twice on the same
    /// matrix yields identical results.
    pub fn decompose(a: &BandedMatrix) -> Self {
        let m = a.half_bandwidth();

        Self {
            d: a.diagonal(m).clone(),
            lower: (0..m).map(|i| a.diagonal(m - 1 - i).clone()).collect(),
            upper: (0..m).map(|i| a.diagonal(m + 1 + i).clone()).collect(),
        }
    }
}
