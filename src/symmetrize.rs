use crate::banded::BandedMatrix;
use crate::Real;
use na::DVector;

/// Transforms an arbitrary banded system `Ax = b` into the equivalent
/// normal-equations system `AᵀA x = Aᵀb`.
///
/// `AᵀA` is symmetric positive semi-definite by construction, and positive
/// definite whenever `A` has full column rank; no convergence guarantee is
/// made for rank-deficient input. The resulting band is wider, with
/// `min(2k - 1, 2n - 1)` diagonals.
pub fn symmetrize(a: &BandedMatrix, b: &DVector<Real>) -> (BandedMatrix, DVector<Real>) {
    let n = a.order();
    let k = a.bandwidth();
    let m = k / 2;
    let new_k = (2 * k - 1).min(2 * n - 1);
    let new_m = new_k / 2;

    // (Aᵀb)[i] = Σ_j A[j][i] * b[j], where A[j][i] is nonzero only for
    // |i - j| <= m.
    let mut bsp = DVector::zeros(n);
    for i in 0..n {
        let lo = i.saturating_sub(m);
        let hi = (i + m).min(n - 1);
        let mut sum = 0.0;
        for j in lo..=hi {
            sum += a.get(j, i) * b[j];
        }
        bsp[i] = sum;
    }

    let mut asp = BandedMatrix::zeros(n, new_k);
    for d in 0..new_k {
        let offset = d as isize - new_m as isize;
        for i in 0..n {
            let j = i as isize + offset;
            if j < 0 || j >= n as isize {
                continue;
            }
            let j = j as usize;

            // (AᵀA)[i][j] = Σ_l A[l][i] * A[l][j]. Restricting l to the rows
            // where both columns fall inside A's band keeps the whole pass
            // O(n·k²) instead of O(n²).
            let lo = i.saturating_sub(m).max(j.saturating_sub(m));
            let hi = (i + m).min(j + m).min(n - 1);
            let mut sum = 0.0;
            for l in lo..=hi {
                sum += a.get(l, i) * a.get(l, j);
            }
            asp.diagonal_mut(d)[i] = sum;
        }
    }

    (asp, bsp)
}

#[cfg(test)]
mod test {
    use crate::{generate_system, symmetrize};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn result_band_is_min_of_2k_minus_1_and_2n_minus_1() {
        let (a, b) = generate_system(20, 5, &mut StdRng::seed_from_u64(3));
        let (asp, _) = symmetrize(&a, &b);
        assert_eq!(asp.bandwidth(), 9);

        // Effectively dense input: the widened band clamps at 2n - 1.
        let (a, b) = generate_system(11, 21, &mut StdRng::seed_from_u64(3));
        let (asp, _) = symmetrize(&a, &b);
        assert_eq!(asp.bandwidth(), 21);
    }

    #[test]
    fn transformed_matrix_is_symmetric() {
        let (a, b) = generate_system(25, 7, &mut StdRng::seed_from_u64(99));
        let (asp, _) = symmetrize(&a, &b);
        let n = asp.order();

        for i in 0..n {
            for j in 0..n {
                assert_relative_eq!(asp.get(i, j), asp.get(j, i), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn matches_the_dense_normal_equations() {
        let n = 15;
        let (a, b) = generate_system(n, 5, &mut StdRng::seed_from_u64(7));
        let (asp, bsp) = symmetrize(&a, &b);
        let dense = a.to_dense_rows();

        for i in 0..n {
            let expected: f64 = (0..n).map(|j| dense[j][i] * b[j]).sum();
            assert_relative_eq!(bsp[i], expected, epsilon = 1e-10, max_relative = 1e-10);

            for j in 0..n {
                let expected: f64 = (0..n).map(|l| dense[l][i] * dense[l][j]).sum();
                assert_relative_eq!(asp.get(i, j), expected, epsilon = 1e-10, max_relative = 1e-10);
            }
        }
    }
}
