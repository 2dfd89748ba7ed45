//! Error types for curve operations.
//!
//! Every failure is a precondition or convergence failure surfaced to the
//! caller. Nothing is retried internally, and a failed bootstrap leaves the
//! curve untouched.

use stepwise_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// An instrument does not extend beyond the curve's last knot.
    #[error("Instrument maturity {maturity:.6} does not extend beyond last knot {last:.6}")]
    NonMonotonicMaturity {
        /// Final cash-flow time of the instrument.
        maturity: f64,
        /// Last knot time of the curve.
        last: f64,
    },

    /// Invalid or degenerate instrument.
    #[error("Invalid instrument: {reason}")]
    InvalidInstrument {
        /// Description of what's wrong with the instrument.
        reason: String,
    },

    /// A redemption cash flow that admits arbitrage.
    #[error("Arbitrage: redemption cash flow {amount} must be positive")]
    Arbitrage {
        /// The offending cash flow.
        amount: f64,
    },

    /// Knot times are not strictly increasing.
    #[error("Non-monotonic tenors at index {index}: {prev:.6} >= {current:.6}")]
    NonMonotonicTenors {
        /// Index where monotonicity violation occurred.
        index: usize,
        /// Previous tenor value.
        prev: f64,
        /// Current tenor value.
        current: f64,
    },

    /// Parallel arrays have different lengths.
    #[error("Length mismatch: {times} times but {values} values")]
    LengthMismatch {
        /// Number of times.
        times: usize,
        /// Number of paired values.
        values: usize,
    },

    /// Curve calibration failed to converge.
    #[error(
        "Calibration failed after {iterations} iterations (residual: {residual:.2e}): {message}"
    )]
    CalibrationFailure {
        /// Number of iterations attempted.
        iterations: u32,
        /// Final residual value.
        residual: f64,
        /// Description of failure.
        message: String,
    },

    /// Other numerical failure reported by a solver.
    #[error("Math error: {reason}")]
    MathError {
        /// Description of the mathematical error.
        reason: String,
    },

    /// Invalid bootstrap configuration.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration problem.
        reason: String,
    },

    /// Snapshot (de)serialization failed.
    #[error("Serialization error: {reason}")]
    Serialization {
        /// Description of the serde failure.
        reason: String,
    },
}

impl CurveError {
    /// Creates a maturity ordering error.
    #[must_use]
    pub fn non_monotonic_maturity(maturity: f64, last: f64) -> Self {
        Self::NonMonotonicMaturity { maturity, last }
    }

    /// Creates an invalid instrument error.
    #[must_use]
    pub fn invalid_instrument(reason: impl Into<String>) -> Self {
        Self::InvalidInstrument {
            reason: reason.into(),
        }
    }

    /// Creates an arbitrage error.
    #[must_use]
    pub fn arbitrage(amount: f64) -> Self {
        Self::Arbitrage { amount }
    }

    /// Creates a non-monotonic tenors error.
    #[must_use]
    pub fn non_monotonic_tenors(index: usize, prev: f64, current: f64) -> Self {
        Self::NonMonotonicTenors {
            index,
            prev,
            current,
        }
    }

    /// Creates a length mismatch error.
    #[must_use]
    pub fn length_mismatch(times: usize, values: usize) -> Self {
        Self::LengthMismatch { times, values }
    }

    /// Creates a calibration failure error.
    #[must_use]
    pub fn calibration_failed(iterations: u32, residual: f64, message: impl Into<String>) -> Self {
        Self::CalibrationFailure {
            iterations,
            residual,
            message: message.into(),
        }
    }

    /// Creates a math error.
    #[must_use]
    pub fn math_error(reason: impl Into<String>) -> Self {
        Self::MathError {
            reason: reason.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CurveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

impl From<MathError> for CurveError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::ConvergenceFailed {
                iterations,
                residual,
            } => Self::calibration_failed(iterations, residual, "root finder did not converge"),
            other => Self::math_error(other.to_string()),
        }
    }
}
