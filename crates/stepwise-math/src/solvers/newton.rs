//! Newton-Raphson root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Derivatives below this magnitude are treated as zero.
const MIN_DERIVATIVE: f64 = 1e-15;

/// Newton-Raphson root-finding algorithm.
///
/// Uses the iteration:
/// `x_{n+1} = x_n - f(x_n) / f'(x_n)`
///
/// Terminates when `|f(x)| < tolerance`, or when a Newton step is shorter
/// than the tolerance so the iterate can no longer move in floating point.
/// Exhausting `max_iterations` is an error; the last iterate is not returned.
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `df` - The derivative of the function
/// * `initial_guess` - Starting point for the iteration
/// * `config` - Solver configuration
///
/// # Errors
///
/// - [`MathError::DivisionByZero`] if the derivative vanishes
/// - [`MathError::InvalidInput`] if the residual becomes non-finite
/// - [`MathError::ConvergenceFailed`] if the iteration cap is reached
///
/// # Example
///
/// ```rust
/// use stepwise_math::solvers::{newton_raphson, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
///
/// let result = newton_raphson(f, df, 1.5, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-12);
/// ```
pub fn newton_raphson<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let mut x = initial_guess;
    let mut fx = f(x);

    for iteration in 0..config.max_iterations {
        if !fx.is_finite() {
            return Err(MathError::invalid_input(format!(
                "residual is not finite at x = {x}"
            )));
        }
        if fx.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        let slope = df(x);
        if !slope.is_finite() || slope.abs() < MIN_DERIVATIVE {
            return Err(MathError::DivisionByZero { value: slope });
        }

        let dx = fx / slope;
        x -= dx;
        fx = f(x);

        log::trace!("newton iteration {iteration}: x = {x:.17e}, f = {fx:.3e}, dx = {dx:.3e}");

        // The iterate has stopped moving
        if dx.abs() < config.tolerance && fx.is_finite() {
            return Ok(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual: fx,
            });
        }
    }

    if fx.abs() < config.tolerance {
        return Ok(SolverResult {
            root: x,
            iterations: config.max_iterations,
            residual: fx,
        });
    }

    log::warn!(
        "newton failed to converge after {} iterations (residual {:.3e})",
        config.max_iterations,
        fx.abs()
    );
    Err(MathError::convergence_failed(
        config.max_iterations,
        fx.abs(),
    ))
}
