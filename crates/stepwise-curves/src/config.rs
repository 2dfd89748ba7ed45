//! Bootstrap configuration.
//!
//! [`BootstrapConfig`] collects the solver settings used by the general
//! (iterative) bootstrap path and the extrapolation policy of curves handed
//! out by [`YieldCurve`](crate::yield_curve::YieldCurve). It is
//! serde-serialisable so it can be stored next to the curve inputs.

use serde::{Deserialize, Serialize};
use stepwise_math::solvers::{SecantBounds, SecantSolver, SolverConfig, DEFAULT_SECANT_BUMP};

use crate::error::{CurveError, CurveResult};

/// Initial forward-rate guess when the curve is empty and none is supplied.
pub const DEFAULT_INITIAL_GUESS: f64 = 0.01;

/// Root finder used for instruments without a closed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SolverKind {
    /// Newton-Raphson with the analytic duration derivative.
    #[default]
    Newton,
    /// Derivative-free secant started from the guess and a bump.
    Secant,
}

impl std::fmt::Display for SolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Newton => write!(f, "Newton"),
            Self::Secant => write!(f, "Secant"),
        }
    }
}

/// Forward rate assumed beyond the last bootstrapped knot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum ExtrapolationType {
    /// Extend the last solved forward rate flat (zero on an empty curve).
    #[default]
    Flat,
    /// Use a fixed forward rate.
    Constant(f64),
}

/// Configuration for sequential bootstrapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Root finder for the general path.
    pub solver: SolverKind,
    /// Tolerance and iteration cap shared by both root finders.
    pub solver_config: SolverConfig,
    /// Multiplicative bump deriving the second secant point.
    pub secant_bump: f64,
    /// Clamping interval for secant iterates.
    pub secant_bounds: SecantBounds,
    /// Starting rate when the curve is empty and no guess is supplied.
    pub default_guess: f64,
    /// Extrapolation of curves exposed by the yield curve.
    pub extrapolation: ExtrapolationType,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            solver: SolverKind::Newton,
            solver_config: SolverConfig::default(),
            secant_bump: DEFAULT_SECANT_BUMP,
            secant_bounds: SecantBounds::default(),
            default_guess: DEFAULT_INITIAL_GUESS,
            extrapolation: ExtrapolationType::Flat,
        }
    }
}

impl BootstrapConfig {
    /// Sets the root finder.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the residual tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.solver_config.tolerance = tolerance;
        self
    }

    /// Sets the iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.solver_config.max_iterations = max_iterations;
        self
    }

    /// Sets the secant bump factor.
    #[must_use]
    pub fn with_secant_bump(mut self, bump: f64) -> Self {
        self.secant_bump = bump;
        self
    }

    /// Sets the secant clamping interval.
    #[must_use]
    pub fn with_secant_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.secant_bounds = SecantBounds::new(lower, upper);
        self
    }

    /// Sets the starting rate used on an empty curve.
    #[must_use]
    pub fn with_default_guess(mut self, guess: f64) -> Self {
        self.default_guess = guess;
        self
    }

    /// Sets the extrapolation policy.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: ExtrapolationType) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Returns the secant solver described by this configuration.
    #[must_use]
    pub fn secant_solver(&self) -> SecantSolver {
        SecantSolver::new(self.secant_bump, self.secant_bounds)
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> CurveResult<()> {
        let tolerance = self.solver_config.tolerance;
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(CurveError::invalid_config(format!(
                "tolerance must be positive, got {tolerance}"
            )));
        }
        if self.solver_config.max_iterations == 0 {
            return Err(CurveError::invalid_config("max_iterations must be at least 1"));
        }
        if !(self.secant_bump.is_finite() && self.secant_bump > 1.0) {
            return Err(CurveError::invalid_config(format!(
                "secant bump must exceed 1, got {}",
                self.secant_bump
            )));
        }
        if self.secant_bounds.lower >= self.secant_bounds.upper {
            return Err(CurveError::invalid_config(format!(
                "secant bounds [{}, {}] are empty",
                self.secant_bounds.lower, self.secant_bounds.upper
            )));
        }
        if !self.default_guess.is_finite() {
            return Err(CurveError::invalid_config("default guess must be finite"));
        }
        if let ExtrapolationType::Constant(rate) = self.extrapolation {
            if !rate.is_finite() {
                return Err(CurveError::invalid_config(
                    "constant extrapolation rate must be finite",
                ));
            }
        }
        Ok(())
    }
}
