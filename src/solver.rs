use crate::banded::BandedMatrix;
use crate::conjugate_gradient::{conjugate_gradient, Termination};
use crate::dlu::DluSplit;
use crate::error::SolverError;
use crate::preconditioner::Preconditioner;
use crate::symmetrize::symmetrize;
use crate::Real;
use log::{debug, warn};
use na::DVector;
use std::time::{Duration, Instant};

/// Wall-clock time spent in each stage of [`solve_system`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StageTimings {
    /// Symmetrization, DLU extraction and preconditioner construction,
    /// combined.
    pub setup: Duration,
    /// Average duration of one conjugate-gradient iteration.
    pub iteration_avg: Duration,
    /// Residual computation against the original system.
    pub residual: Duration,
}

/// Everything the caller needs to report a completed solve.
#[derive(Clone, Debug)]
pub struct SolveReport {
    /// The computed solution, length `n`.
    pub x: DVector<Real>,
    /// Number of conjugate-gradient iterations performed.
    pub iterations: usize,
    /// Max-norm of the last solution update.
    pub update_norm: Real,
    /// Why the iteration stopped. Only [`Termination::IterationLimit`] means
    /// the tolerance was not reached; a breakdown stop leaves the iterate at
    /// the solution, and in every case `x` is the best iterate found.
    pub termination: Termination,
    /// `‖b − Ax‖₂` measured against the original, pre-symmetrization system.
    pub residual_norm: Real,
    /// Per-stage wall-clock measurements.
    pub timings: StageTimings,
}

/// Runs the full pipeline on an arbitrary banded system: symmetrize into
/// normal-equations form, split into D/L/U, build the preconditioner selected
/// by `omega`, iterate, and measure the residual of the original system.
///
/// Parameter ranges (`n > 10`, odd `k` in `(1, 2n - 1]`, `omega` in
/// `[-1, 2)`, positive `maxit` and `epsilon`) are validated here, once; the
/// stages below assume them.
pub fn solve_system(
    a: &BandedMatrix,
    b: &DVector<Real>,
    omega: Real,
    epsilon: Real,
    maxit: usize,
) -> Result<SolveReport, SolverError> {
    validate_parameters(a.order(), a.bandwidth(), omega, epsilon, maxit)?;

    let setup_start = Instant::now();
    let (asp, bsp) = symmetrize(a, b);
    let split = DluSplit::decompose(&asp);
    let preconditioner = Preconditioner::build(&split, omega)?;
    let setup = setup_start.elapsed();

    let cg_start = Instant::now();
    let outcome = conjugate_gradient(&asp, &bsp, &preconditioner, epsilon, maxit)?;
    let cg_elapsed = cg_start.elapsed();

    let residual_start = Instant::now();
    let residual_norm = a.residual_norm(b, &outcome.x);
    let residual = residual_start.elapsed();

    if log::log_enabled!(log::Level::Debug) {
        debug!(
            "{:?} after {} iterations, transformed-system residual {:.6e}",
            outcome.termination,
            outcome.iterations,
            asp.residual_norm(&bsp, &outcome.x)
        );
    }

    if outcome.termination == Termination::IterationLimit {
        warn!(
            "conjugate gradient did not converge within {maxit} iterations \
             (last update norm {:.6e})",
            outcome.update_norm
        );
    }

    let iteration_avg = if outcome.iterations > 0 {
        cg_elapsed / outcome.iterations as u32
    } else {
        Duration::ZERO
    };

    Ok(SolveReport {
        x: outcome.x,
        iterations: outcome.iterations,
        update_norm: outcome.update_norm,
        termination: outcome.termination,
        residual_norm,
        timings: StageTimings {
            setup,
            iteration_avg,
            residual,
        },
    })
}

fn validate_parameters(
    n: usize,
    k: usize,
    omega: Real,
    epsilon: Real,
    maxit: usize,
) -> Result<(), SolverError> {
    if n <= 10 {
        return Err(SolverError::InvalidOrder { n });
    }
    if k <= 1 || k % 2 == 0 || k > 2 * n - 1 {
        return Err(SolverError::InvalidBandwidth { k, n });
    }
    if !(-1.0..2.0).contains(&omega) {
        return Err(SolverError::InvalidOmega { omega });
    }
    if maxit == 0 {
        return Err(SolverError::InvalidIterationLimit);
    }
    if epsilon <= 0.0 {
        return Err(SolverError::InvalidTolerance { epsilon });
    }
    Ok(())
}
