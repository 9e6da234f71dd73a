use crate::Real;
use std::error::Error;
use std::fmt;

/// Errors reported by the solver pipeline.
///
/// Configuration errors (`InvalidOrder`, `InvalidBandwidth`, `InvalidOmega`,
/// `InvalidIterationLimit`, `InvalidTolerance`, `ZeroDiagonal`, `TinyPivot`,
/// `IllConditioned`) abort the solve; reaching the iteration limit without
/// meeting the tolerance is *not* an error and is reported through
/// [`crate::CgOutcome::termination`] instead.
#[derive(Clone, Debug, PartialEq)]
pub enum SolverError {
    /// The system order must be greater than 10.
    InvalidOrder {
        /// The rejected order.
        n: usize,
    },
    /// The bandwidth must be odd and satisfy `1 < k <= 2n - 1`.
    InvalidBandwidth {
        /// The rejected bandwidth.
        k: usize,
        /// The system order it was checked against.
        n: usize,
    },
    /// The preconditioner selector must be `-1`, `0` or in `[1, 2)`.
    InvalidOmega {
        /// The rejected selector.
        omega: Real,
    },
    /// The iteration limit must be positive.
    InvalidIterationLimit,
    /// The convergence tolerance must be positive.
    InvalidTolerance {
        /// The rejected tolerance.
        epsilon: Real,
    },
    /// A main-diagonal entry was exactly zero while building the Jacobi or
    /// SSOR preconditioner.
    ZeroDiagonal {
        /// Index of the zero diagonal entry.
        index: usize,
    },
    /// A pivot magnitude fell below `1e-14` during a triangular sweep of the
    /// SSOR preconditioner.
    TinyPivot {
        /// Index of the offending pivot.
        index: usize,
        /// The offending pivot value.
        value: Real,
    },
    /// The step-size denominator `⟨v, Av⟩` vanished on the very first
    /// conjugate-gradient iteration.
    IllConditioned {
        /// The vanished denominator.
        denominator: Real,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::InvalidOrder { n } => {
                write!(f, "system order must be greater than 10, got n = {n}")
            }
            SolverError::InvalidBandwidth { k, n } => {
                write!(f, "bandwidth must be odd and in (1, 2n - 1], got k = {k} for n = {n}")
            }
            SolverError::InvalidOmega { omega } => {
                write!(f, "preconditioner selector must be -1, 0 or in [1, 2), got w = {omega}")
            }
            SolverError::InvalidIterationLimit => {
                write!(f, "iteration limit must be positive")
            }
            SolverError::InvalidTolerance { epsilon } => {
                write!(f, "convergence tolerance must be positive, got epsilon = {epsilon}")
            }
            SolverError::ZeroDiagonal { index } => {
                write!(f, "zero diagonal entry at index {index}")
            }
            SolverError::TinyPivot { index, value } => {
                write!(f, "pivot too small at index {index} (value {value:e})")
            }
            SolverError::IllConditioned { denominator } => {
                write!(
                    f,
                    "breakdown on the first iteration, the matrix is ill-conditioned \
                     (denominator {denominator:e})"
                )
            }
        }
    }
}

impl Error for SolverError {}

#[cfg(test)]
mod test {
    use crate::SolverError;

    #[test]
    fn display_includes_offending_index_and_value() {
        let err = SolverError::TinyPivot {
            index: 7,
            value: 1.0e-20,
        };
        let msg = err.to_string();
        assert!(msg.contains('7'));
        assert!(msg.contains("1e-20"));
    }
}
