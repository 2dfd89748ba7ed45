//! Root-finding algorithms.
//!
//! This module provides the two one-dimensional solvers used by the curve
//! bootstrap:
//!
//! - [`newton_raphson`]: quadratic convergence when an analytic derivative is
//!   available
//! - [`secant`]: derivative-free, driven by the two most recent iterates
//! - [`secant_from_guess`]: secant started from a single guess and a bump
//!   factor
//!
//! Both are bounded: they either meet the residual tolerance or fail with
//! [`MathError::ConvergenceFailed`](crate::MathError::ConvergenceFailed) once
//! the iteration cap is exhausted. A stale estimate is never returned.
//!
//! # Choosing a Solver
//!
//! | Solver | Speed | Requires |
//! |--------|-------|----------|
//! | Newton-Raphson | Fastest (quadratic) | Derivative |
//! | Secant | Fast (superlinear) | Two points (or guess + bump) |
//!
//! # Example
//!
//! ```rust
//! use stepwise_math::solvers::{newton_raphson, SolverConfig};
//!
//! // Continuously compounded zero rate of a 5Y discount factor of 0.8
//! let f = |r: f64| (-5.0 * r).exp() - 0.8;
//! let df = |r: f64| -5.0 * (-5.0 * r).exp();
//!
//! let result = newton_raphson(f, df, 0.01, &SolverConfig::default()).unwrap();
//! assert!((result.root - (-(0.8_f64).ln() / 5.0)).abs() < 1e-12);
//! ```

mod newton;
mod secant;

pub use newton::newton_raphson;
pub use secant::{secant, secant_from_guess};

use serde::{Deserialize, Serialize};

use crate::error::MathResult;

/// Default tolerance for root-finding algorithms (machine epsilon).
pub const DEFAULT_TOLERANCE: f64 = f64::EPSILON;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Default multiplicative bump used to derive the second secant point.
pub const DEFAULT_SECANT_BUMP: f64 = 1.01;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Absolute residual tolerance for convergence.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Clamping interval for secant iterates.
///
/// Every proposed iterate is clamped into `[lower, upper]` before the
/// function is evaluated. The default admits the full `f64` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecantBounds {
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
}

impl Default for SecantBounds {
    fn default() -> Self {
        Self {
            lower: f64::MIN,
            upper: f64::MAX,
        }
    }
}

impl SecantBounds {
    /// Creates bounds `[lower, upper]`.
    #[must_use]
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Clamps `x` into the bounds.
    #[must_use]
    pub fn clamp(&self, x: f64) -> f64 {
        x.max(self.lower).min(self.upper)
    }
}

/// A root finder for a scalar residual.
///
/// Implementations may ignore `derivative`; the secant solver does.
///
/// # Example
///
/// ```rust
/// use stepwise_math::solvers::{NewtonSolver, RootFinder, SecantSolver, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
/// let config = SolverConfig::default().with_tolerance(1e-12);
///
/// let newton = NewtonSolver.find_root(f, df, 1.5, &config).unwrap();
/// let secant = SecantSolver::default().find_root(f, df, 1.5, &config).unwrap();
/// assert!((newton.root - secant.root).abs() < 1e-10);
/// ```
pub trait RootFinder {
    /// Finds a root of `f` starting from `initial_guess`.
    fn find_root<F, D>(
        &self,
        f: F,
        derivative: D,
        initial_guess: f64,
        config: &SolverConfig,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
        D: Fn(f64) -> f64;

    /// Returns the name of the solver.
    fn name(&self) -> &'static str;
}

/// Newton-Raphson solver implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonSolver;

impl RootFinder for NewtonSolver {
    fn find_root<F, D>(
        &self,
        f: F,
        derivative: D,
        initial_guess: f64,
        config: &SolverConfig,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
        D: Fn(f64) -> f64,
    {
        newton_raphson(f, derivative, initial_guess, config)
    }

    fn name(&self) -> &'static str {
        "Newton-Raphson"
    }
}

/// Secant solver implementation started from a single guess.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecantSolver {
    /// Multiplicative bump for the second starting point.
    pub bump: f64,
    /// Clamping interval for iterates.
    pub bounds: SecantBounds,
}

impl Default for SecantSolver {
    fn default() -> Self {
        Self {
            bump: DEFAULT_SECANT_BUMP,
            bounds: SecantBounds::default(),
        }
    }
}

impl SecantSolver {
    /// Creates a secant solver with the given bump and bounds.
    #[must_use]
    pub fn new(bump: f64, bounds: SecantBounds) -> Self {
        Self { bump, bounds }
    }
}

impl RootFinder for SecantSolver {
    fn find_root<F, D>(
        &self,
        f: F,
        _derivative: D,
        initial_guess: f64,
        config: &SolverConfig,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
        D: Fn(f64) -> f64,
    {
        secant_from_guess(f, initial_guess, self.bump, &self.bounds, config)
    }

    fn name(&self) -> &'static str {
        "Secant"
    }
}

/// Result of a root-finding iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Final residual (function value at root).
    pub residual: f64,
}
