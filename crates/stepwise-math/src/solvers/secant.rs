//! Secant root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{SecantBounds, SolverConfig, SolverResult};

/// Secant root-finding algorithm.
///
/// Keeps the two most recent points `(x0, y0)`, `(x1, y1)` and replaces the
/// derivative by the slope of the chord through them:
///
/// ```text
/// m     = (y1 - y0) / (x1 - x0)
/// x_new = clamp(x1 - y1 / m, lower, upper)
/// ```
///
/// The function is evaluated at the clamped point. Convergence is declared
/// when `|y| < tolerance`.
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `x0` - First starting point
/// * `x1` - Second starting point (must differ from `x0`)
/// * `bounds` - Clamping interval for every iterate
/// * `config` - Solver configuration
///
/// # Errors
///
/// - [`MathError::DegenerateStep`] if `|x1 - x0|` drops to machine epsilon
///   before convergence
/// - [`MathError::DivisionByZero`] if the chord is flat
/// - [`MathError::ConvergenceFailed`] if the iteration cap is reached
///
/// # Example
///
/// ```rust
/// use stepwise_math::solvers::{secant, SecantBounds, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let config = SolverConfig::default().with_tolerance(1e-12);
///
/// let result = secant(f, 1.0, 2.0, &SecantBounds::default(), &config).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn secant<F>(
    f: F,
    x0: f64,
    x1: f64,
    bounds: &SecantBounds,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut x_prev = bounds.clamp(x0);
    let mut x_curr = bounds.clamp(x1);
    let mut f_prev = f(x_prev);
    let mut f_curr = f(x_curr);

    for iteration in 0..config.max_iterations {
        if f_curr.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x_curr,
                iterations: iteration,
                residual: f_curr,
            });
        }

        if (x_curr - x_prev).abs() <= f64::EPSILON {
            return Err(MathError::degenerate_step(x_prev, x_curr));
        }

        let slope = (f_curr - f_prev) / (x_curr - x_prev);
        if slope == 0.0 || !slope.is_finite() {
            return Err(MathError::DivisionByZero { value: slope });
        }

        let x_next = bounds.clamp(x_curr - f_curr / slope);

        x_prev = x_curr;
        f_prev = f_curr;
        x_curr = x_next;
        f_curr = f(x_curr);

        log::trace!("secant iteration {iteration}: x = {x_curr:.17e}, f = {f_curr:.3e}");
    }

    if f_curr.abs() < config.tolerance {
        return Ok(SolverResult {
            root: x_curr,
            iterations: config.max_iterations,
            residual: f_curr,
        });
    }

    log::warn!(
        "secant failed to converge after {} iterations (residual {:.3e})",
        config.max_iterations,
        f_curr.abs()
    );
    Err(MathError::convergence_failed(
        config.max_iterations,
        f_curr.abs(),
    ))
}

/// Secant method started from a single guess.
///
/// The second point is `x0 * bump` when `f(x0) > 0` and `x0 / bump`
/// otherwise, so for a decreasing residual (a present value as a function of
/// rate) the second point moves toward the root. When that leaves the point
/// unchanged (`x0 == 0`) it is offset by `bump - 1` instead.
///
/// # Errors
///
/// Returns [`MathError::InvalidInput`] if `bump` is not a finite number
/// greater than one, otherwise the errors of [`secant`].
pub fn secant_from_guess<F>(
    f: F,
    x0: f64,
    bump: f64,
    bounds: &SecantBounds,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    if !bump.is_finite() || bump <= 1.0 {
        return Err(MathError::invalid_input(format!(
            "secant bump factor must exceed 1, got {bump}"
        )));
    }

    let y0 = f(x0);
    if y0.abs() < config.tolerance {
        return Ok(SolverResult {
            root: x0,
            iterations: 0,
            residual: y0,
        });
    }

    let mut x1 = if y0 > 0.0 { x0 * bump } else { x0 / bump };
    if x1 == x0 {
        x1 += bump - 1.0;
    }

    secant(f, x0, x1, bounds, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tight() -> SolverConfig {
        SolverConfig::default().with_tolerance(1e-12)
    }

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;

        let result = secant(f, 1.0, 2.0, &SecantBounds::default(), &tight()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_sin_near_pi() {
        let f = |x: f64| x.sin();

        let result = secant(f, 3.0, 3.5, &SecantBounds::default(), &tight()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::PI, epsilon = 1e-10);
    }

    #[test]
    fn test_clamped_iterates_stay_in_bounds() {
        // Chord from (0, -1) and (0.1, -0.99) overshoots far to the right
        let f = |x: f64| x * x - 1.0;
        let bounds = SecantBounds::new(0.0, 2.0);

        let result = secant(f, 0.0, 0.1, &bounds, &tight()).unwrap();

        assert_relative_eq!(result.root, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_identical_points_are_degenerate() {
        let f = |x: f64| x - 1.0;

        let result = secant(f, 0.5, 0.5, &SecantBounds::default(), &tight());

        assert!(matches!(result, Err(MathError::DegenerateStep { .. })));
    }

    #[test]
    fn test_flat_chord_is_division_by_zero() {
        let f = |_: f64| 1.0;

        let result = secant(f, 0.0, 1.0, &SecantBounds::default(), &tight());

        assert!(matches!(result, Err(MathError::DivisionByZero { .. })));
    }

    #[test]
    fn test_iteration_cap_is_an_error() {
        let f = |x: f64| (-2.0 * x).exp() - 0.5;
        let config = tight().with_max_iterations(1);

        let result = secant(f, 0.0, 0.01, &SecantBounds::default(), &config);

        assert!(matches!(
            result,
            Err(MathError::ConvergenceFailed { iterations: 1, .. })
        ));
    }

    #[test]
    fn test_from_guess_bumps_toward_root() {
        // Decreasing residual, positive at the guess: bump upward
        let f = |r: f64| (-2.0 * r).exp() - 0.9;

        let result = secant_from_guess(f, 0.01, 1.01, &SecantBounds::default(), &tight()).unwrap();

        assert_relative_eq!(result.root, -(0.9_f64).ln() / 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_from_zero_guess_offsets() {
        let f = |r: f64| (-r).exp() - 0.95;

        let result = secant_from_guess(f, 0.0, 1.01, &SecantBounds::default(), &tight()).unwrap();

        assert_relative_eq!(result.root, -(0.95_f64).ln(), epsilon = 1e-10);
    }

    #[test]
    fn test_from_guess_rejects_bad_bump() {
        let f = |x: f64| x;

        let result = secant_from_guess(f, 1.0, 1.0, &SecantBounds::default(), &tight());

        assert!(matches!(result, Err(MathError::InvalidInput { .. })));
    }
}
