//! # Stepwise Math
//!
//! Numerical primitives for the Stepwise piecewise-flat curve library.
//!
//! This crate provides:
//!
//! - **Solvers**: one-dimensional root finders (Newton-Raphson with an
//!   analytic derivative, derivative-free secant)
//!
//! The solvers know nothing about curves or instruments: callers hand them a
//! residual `Fn(f64) -> f64` (and its derivative for Newton) and get back the
//! root or a typed failure.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]

pub mod error;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::solvers::{
        newton_raphson, secant, secant_from_guess, NewtonSolver, RootFinder, SecantBounds,
        SecantSolver, SolverConfig, SolverResult,
    };
}

pub use error::{MathError, MathResult};
