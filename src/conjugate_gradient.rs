use crate::banded::BandedMatrix;
use crate::error::SolverError;
use crate::preconditioner::Preconditioner;
use crate::Real;
use na::DVector;

/// Threshold under which the step-size denominator `⟨v, Av⟩` counts as a
/// breakdown.
const BREAKDOWN_EPS: Real = 1e-14;

/// Why the conjugate-gradient loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The max-norm of the solution update dropped below the requested
    /// tolerance.
    Converged,
    /// The step-size denominator `⟨v, Av⟩` vanished after at least one
    /// iteration. The iterate can no longer be improved; it is effectively
    /// at the solution, even when the update norm is still above the
    /// tolerance.
    Breakdown,
    /// The iteration limit was reached before meeting the tolerance.
    IterationLimit,
}

/// Result of one conjugate-gradient solve.
#[derive(Clone, Debug)]
pub struct CgOutcome {
    /// The computed solution.
    pub x: DVector<Real>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Max-norm of the last solution update, the convergence metric.
    pub update_norm: Real,
    /// Why the iteration stopped.
    pub termination: Termination,
}

/// Preconditioned conjugate gradient on a banded SPD system.
///
/// Convergence is declared when the max-norm of the solution update,
/// `‖x_{k+1} − x_k‖∞`, drops below `epsilon`. This is deliberately not a
/// residual test: for ill-conditioned systems the update can shrink below
/// the tolerance while the residual is still comparatively large, and the
/// caller is expected to measure the residual separately for reporting.
///
/// Only reaching `maxit` counts as non-convergence, reported through
/// [`CgOutcome::termination`], never as an error. A vanishing `⟨v, Av⟩`
/// after the first iteration means no further progress is possible and
/// terminates early with [`Termination::Breakdown`] and the final iterate;
/// on the very first iteration it is escalated to
/// [`SolverError::IllConditioned`].
pub fn conjugate_gradient(
    a: &BandedMatrix,
    b: &DVector<Real>,
    preconditioner: &Preconditioner,
    epsilon: Real,
    maxit: usize,
) -> Result<CgOutcome, SolverError> {
    let n = a.order();

    let mut x = DVector::zeros(n);
    let mut x_old = DVector::zeros(n);
    let mut r = b.clone(); // x₀ = 0, so r₀ = b − A·x₀ = b.
    let mut y = preconditioner.apply(&r)?;
    let mut v = y.clone();
    let mut aux = y.dot(&r);

    let mut update_norm = Real::INFINITY;
    let mut iterations = 0;
    let mut termination = Termination::IterationLimit;

    for iter in 0..maxit {
        let z = a.mul_vector(&v);

        let vtz = v.dot(&z);
        if vtz.abs() < BREAKDOWN_EPS {
            if iter == 0 {
                return Err(SolverError::IllConditioned { denominator: vtz });
            }
            // The denominator vanished mid-run: the current iterate is
            // already as close to the solution as this search can get.
            termination = Termination::Breakdown;
            break;
        }
        let s = aux / vtz;

        x.axpy(s, &v, 1.0); // x += s·v
        r.axpy(-s, &z, 1.0); // r -= s·z
        y = preconditioner.apply(&r)?;
        iterations = iter + 1;

        update_norm = (&x - &x_old).amax();
        if update_norm < epsilon {
            termination = Termination::Converged;
            break;
        }

        let aux1 = y.dot(&r);
        let beta = aux1 / aux;
        aux = aux1;
        v.axpy(1.0, &y, beta); // v = y + β·v
        x_old.copy_from(&x);
    }

    Ok(CgOutcome {
        x,
        iterations,
        update_norm,
        termination,
    })
}

#[cfg(test)]
mod test {
    use crate::{
        conjugate_gradient, BandedMatrix, DluSplit, Preconditioner, SolverError, Termination,
    };
    use approx::assert_relative_eq;
    use na::DVector;

    /// Diagonally dominant SPD tridiagonal system with a known solution.
    fn laplacian_like_system(n: usize) -> (BandedMatrix, DVector<f64>, DVector<f64>) {
        let mut a = BandedMatrix::zeros(n, 3);
        a.set_diagonal(1, DVector::from_element(n, 4.0));
        let mut sub = DVector::from_element(n, -1.0);
        sub[0] = 0.0;
        let mut sup = DVector::from_element(n, -1.0);
        sup[n - 1] = 0.0;
        a.set_diagonal(0, sub);
        a.set_diagonal(2, sup);

        let x_true = DVector::from_fn(n, |i, _| 1.0 + (i as f64) / (n as f64));
        let b = a.mul_vector(&x_true);
        (a, b, x_true)
    }

    fn preconditioner_for(a: &BandedMatrix, omega: f64) -> Preconditioner {
        Preconditioner::build(&DluSplit::decompose(a), omega).unwrap()
    }

    #[test]
    fn converges_on_a_well_conditioned_system_with_jacobi() {
        let n = 50;
        let (a, b, x_true) = laplacian_like_system(n);
        let m = preconditioner_for(&a, 0.0);

        let outcome = conjugate_gradient(&a, &b, &m, 1e-10, n).unwrap();
        assert_ne!(outcome.termination, Termination::IterationLimit);
        assert!(outcome.iterations <= n);
        assert!(outcome.update_norm < 1e-6);
        assert!(a.residual_norm(&b, &outcome.x) < 1e-6);

        for i in 0..n {
            assert_relative_eq!(outcome.x[i], x_true[i], epsilon = 1e-6);
        }
    }

    #[test]
    fn breakdown_stops_early_with_the_final_iterate() {
        // With a tolerance tighter than the update norms this system can
        // reach, the denominator vanishes first; that must end the run as an
        // early stop at the solution, not as iteration-limit exhaustion, no
        // matter how large the limit is.
        let n = 50;
        let (a, b, x_true) = laplacian_like_system(n);
        let m = preconditioner_for(&a, 0.0);

        let outcome = conjugate_gradient(&a, &b, &m, 1e-10, 500).unwrap();
        assert_eq!(outcome.termination, Termination::Breakdown);
        assert!(outcome.iterations < 500);
        assert!(a.residual_norm(&b, &outcome.x) < 1e-6);
        for i in 0..n {
            assert_relative_eq!(outcome.x[i], x_true[i], epsilon = 1e-6);
        }
    }

    #[test]
    fn unpreconditioned_run_reaches_the_same_solution() {
        let n = 50;
        let (a, b, _) = laplacian_like_system(n);

        let with_jacobi =
            conjugate_gradient(&a, &b, &preconditioner_for(&a, 0.0), 1e-10, n).unwrap();
        let without =
            conjugate_gradient(&a, &b, &preconditioner_for(&a, -1.0), 1e-10, n).unwrap();

        assert_ne!(with_jacobi.termination, Termination::IterationLimit);
        assert_ne!(without.termination, Termination::IterationLimit);
        for i in 0..n {
            assert_relative_eq!(with_jacobi.x[i], without.x[i], epsilon = 1e-6);
        }
    }

    #[test]
    fn ssor_preconditioning_also_converges() {
        let n = 50;
        let (a, b, x_true) = laplacian_like_system(n);
        let m = preconditioner_for(&a, 1.5);

        let outcome = conjugate_gradient(&a, &b, &m, 1e-10, n).unwrap();
        assert_ne!(outcome.termination, Termination::IterationLimit);
        for i in 0..n {
            assert_relative_eq!(outcome.x[i], x_true[i], epsilon = 1e-6);
        }
    }

    #[test]
    fn iteration_limit_is_reported_but_is_not_an_error() {
        let n = 50;
        let (a, b, _) = laplacian_like_system(n);
        let m = preconditioner_for(&a, -1.0);

        let outcome = conjugate_gradient(&a, &b, &m, 1e-30, 2).unwrap();
        assert_eq!(outcome.termination, Termination::IterationLimit);
        assert_eq!(outcome.iterations, 2);
    }

    #[test]
    fn zero_rhs_breaks_down_on_the_first_iteration() {
        let n = 20;
        let (a, _, _) = laplacian_like_system(n);
        let m = preconditioner_for(&a, 0.0);
        let b = DVector::zeros(n);

        match conjugate_gradient(&a, &b, &m, 1e-10, 100) {
            Err(SolverError::IllConditioned { .. }) => {}
            other => panic!("expected first-iteration breakdown, got {other:?}"),
        }
    }
}
