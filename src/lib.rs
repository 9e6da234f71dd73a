/*!
Preconditioned conjugate gradient solver for banded (k-diagonal) linear systems.

An arbitrary k-diagonal system `Ax = b` is first turned into the equivalent
normal-equations system `AᵀA x = Aᵀb`, which is symmetric positive-definite
whenever `A` has full column rank, and then solved iteratively with one of
three interchangeable preconditioners (identity, Jacobi, SSOR).
*/

#![allow(clippy::too_many_arguments)]
#![warn(missing_docs)]

/// Floating-point type used by this library.
pub type Real = f64;

extern crate nalgebra as na;

pub use self::banded::BandedMatrix;
pub use self::conjugate_gradient::{conjugate_gradient, CgOutcome, Termination};
pub use self::dlu::DluSplit;
pub use self::error::SolverError;
pub use self::generator::generate_system;
pub use self::preconditioner::Preconditioner;
pub use self::solver::{solve_system, SolveReport, StageTimings};
pub use self::symmetrize::symmetrize;

mod banded;
mod conjugate_gradient;
mod dlu;
mod error;
mod generator;
mod preconditioner;
mod solver;
mod symmetrize;
