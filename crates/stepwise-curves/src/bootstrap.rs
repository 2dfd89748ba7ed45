//! Sequential bootstrap of a piecewise-flat forward curve.
//!
//! Each instrument extends the curve by one segment: the forward rate on
//! `(t_last, maturity]` is solved so that the instrument reprices to its
//! target price given the knots already committed.
//!
//! # Paths
//!
//! | Instrument                  | Method                                   |
//! |-----------------------------|------------------------------------------|
//! | one flow (cash deposit)     | closed form, see [`bootstrap_deposit`]   |
//! | two flows at zero price     | closed form, see [`bootstrap_fra`]       |
//! | anything else               | [`bootstrap_newton`] or [`bootstrap_secant`] |
//!
//! The iterative paths split the flows at `t_last`. Flows at or before the
//! last knot are "covered" and valued once on the committed curve; the rest
//! are valued on a trial view whose extrapolation rate is the unknown. A flow
//! exactly at `t_last` has the same discount factor under either reading, so
//! the choice does not move the solved rate.

use stepwise_math::solvers::{NewtonSolver, RootFinder, SolverConfig};

use crate::config::{BootstrapConfig, SolverKind};
use crate::curve::{ForwardCurve, ForwardRateCurve};
use crate::error::{CurveError, CurveResult};
use crate::instrument::Instrument;
use crate::valuation::{duration, present_value};

/// Last knot of `curve`, or 0 when it is empty.
fn last_knot(curve: &ForwardCurve<'_>) -> f64 {
    curve.last_time().unwrap_or(0.0)
}

fn ensure_extends(curve: &ForwardCurve<'_>, maturity: f64) -> CurveResult<f64> {
    let last = last_knot(curve);
    if maturity > last {
        Ok(last)
    } else {
        Err(CurveError::non_monotonic_maturity(maturity, last))
    }
}

/// Forward rate implied by a cash deposit.
///
/// The deposit pays `-1` at time 0 and `cash_flow` at `time`, so repricing to
/// zero means `cash_flow · D(time) = 1`:
///
/// ```text
/// rate = ln(cash_flow · D(t_last)) / (time - t_last)
/// ```
///
/// # Errors
///
/// - [`CurveError::NonMonotonicMaturity`] if `time` is not beyond the last knot
/// - [`CurveError::Arbitrage`] if `cash_flow` is not positive
///
/// # Example
///
/// ```rust
/// use stepwise_curves::bootstrap::bootstrap_deposit;
/// use stepwise_curves::curve::ForwardCurve;
///
/// let rate = bootstrap_deposit(&ForwardCurve::default(), 0.5, 1.02).unwrap();
/// assert!((rate - 2.0 * 1.02_f64.ln()).abs() < 1e-15);
/// ```
pub fn bootstrap_deposit(curve: &ForwardCurve<'_>, time: f64, cash_flow: f64) -> CurveResult<f64> {
    deposit_rate(curve, time, cash_flow, 0.0)
}

/// Deposit closed form repricing to `price`: `cash_flow · D(time) = 1 + price`.
fn deposit_rate(
    curve: &ForwardCurve<'_>,
    time: f64,
    cash_flow: f64,
    price: f64,
) -> CurveResult<f64> {
    if !(time.is_finite() && cash_flow.is_finite() && price.is_finite()) {
        return Err(CurveError::invalid_instrument(
            "deposit time, cash flow and price must be finite",
        ));
    }
    let last = ensure_extends(curve, time)?;
    if cash_flow <= 0.0 {
        return Err(CurveError::arbitrage(cash_flow));
    }
    if 1.0 + price <= 0.0 {
        return Err(CurveError::invalid_instrument(format!(
            "deposit price {price} must exceed -1"
        )));
    }

    let d0 = curve.discount(last);
    let rate = (cash_flow * d0 / (1.0 + price)).ln() / (time - last);

    log::debug!("deposit shortcut: ({last}, {time}] -> {rate:.12}");
    Ok(rate)
}

/// Forward rate implied by a two-flow forward rate agreement at zero price.
///
/// With `d = -c1 / c0`, the zero-price equation `c0 D(t0) + c1 D(t1) = 0`
/// solves in closed form:
///
/// ```text
/// overlap  (t0 <  t_last):  rate = ln(d · D(t_last) / D(t0)) / (t1 - t_last)
/// underlap (t0 >= t_last):  rate = ln(d) / (t1 - t0)
/// ```
///
/// On an empty curve the unknown rate applies everywhere, which is the
/// underlap case.
///
/// # Errors
///
/// - [`CurveError::InvalidInstrument`] if the flows have the same sign or
///   `t0 >= t1`
/// - [`CurveError::NonMonotonicMaturity`] if `t1` is not beyond the last knot
pub fn bootstrap_fra(
    curve: &ForwardCurve<'_>,
    t0: f64,
    c0: f64,
    t1: f64,
    c1: f64,
) -> CurveResult<f64> {
    if !(t0.is_finite() && c0.is_finite() && t1.is_finite() && c1.is_finite()) {
        return Err(CurveError::invalid_instrument(
            "FRA times and cash flows must be finite",
        ));
    }
    if c0 * c1 >= 0.0 {
        return Err(CurveError::invalid_instrument(format!(
            "FRA cash flows {c0} and {c1} must have opposite signs"
        )));
    }
    if t0 >= t1 {
        return Err(CurveError::invalid_instrument(format!(
            "FRA start {t0} must precede its end {t1}"
        )));
    }
    let last = ensure_extends(curve, t1)?;

    let d = -c1 / c0;
    let rate = if !curve.is_empty() && t0 < last {
        (d * curve.discount(last) / curve.discount(t0)).ln() / (t1 - last)
    } else {
        d.ln() / (t1 - t0)
    };

    log::debug!("FRA shortcut: ({last}, {t1}] -> {rate:.12}");
    Ok(rate)
}

/// Repricing residual of the flows beyond the last knot.
///
/// ```text
/// F(r)  = p0 - price + PV(new flows, curve with extrapolation r)
/// F'(r) = duration(new flows, curve with extrapolation r, t_last)
/// ```
///
/// where `p0` is the present value of the covered flows on the committed
/// curve. `F` is decreasing in `r` for positive new flows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepricingResidual<'c, 'i> {
    curve: ForwardCurve<'c>,
    new_flows: Instrument<'i>,
    pivot: f64,
    offset: f64,
}

impl<'c, 'i> RepricingResidual<'c, 'i> {
    /// Builds the residual of `instrument` at target `price`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::NonMonotonicMaturity`] if the instrument does not
    /// mature beyond the last knot.
    pub fn new(
        curve: &ForwardCurve<'c>,
        instrument: &Instrument<'i>,
        price: f64,
    ) -> CurveResult<Self> {
        let maturity = instrument
            .maturity()
            .ok_or_else(|| CurveError::invalid_instrument("instrument has no cash flows"))?;
        if !price.is_finite() {
            return Err(CurveError::invalid_instrument("target price must be finite"));
        }
        let pivot = ensure_extends(curve, maturity)?;

        let (covered, new_flows) = instrument.split_at(pivot);
        let covered_value = present_value(&covered, curve);

        Ok(Self {
            curve: *curve,
            new_flows,
            pivot,
            offset: covered_value - price,
        })
    }

    /// Residual at trial rate `rate`.
    #[must_use]
    pub fn value(&self, rate: f64) -> f64 {
        self.offset + present_value(&self.new_flows, &self.curve.with_extrapolation(rate))
    }

    /// Analytic derivative of [`value`](Self::value).
    #[must_use]
    pub fn derivative(&self, rate: f64) -> f64 {
        duration(
            &self.new_flows,
            &self.curve.with_extrapolation(rate),
            self.pivot,
        )
    }

    /// Last knot the flows were split at.
    #[must_use]
    pub fn pivot(&self) -> f64 {
        self.pivot
    }

    /// Flows valued on the trial curve.
    #[must_use]
    pub fn new_flows(&self) -> Instrument<'i> {
        self.new_flows
    }
}

fn initial_guess(curve: &ForwardCurve<'_>, guess: Option<f64>, config: &BootstrapConfig) -> f64 {
    guess
        .or_else(|| curve.last_rate())
        .unwrap_or(config.default_guess)
}

fn solve<R: RootFinder>(
    solver: &R,
    residual: &RepricingResidual<'_, '_>,
    guess: f64,
    config: &SolverConfig,
) -> CurveResult<f64> {
    let result = solver
        .find_root(
            |r| residual.value(r),
            |r| residual.derivative(r),
            guess,
            config,
        )
        .map_err(|e| {
            log::warn!(
                "{} bootstrap beyond {} failed from guess {guess}: {e}",
                solver.name(),
                residual.pivot()
            );
            CurveError::from(e)
        })?;

    log::debug!(
        "{} bootstrap beyond {}: rate {:.12} after {} iterations (residual {:.3e})",
        solver.name(),
        residual.pivot(),
        result.root,
        result.iterations,
        result.residual
    );
    Ok(result.root)
}

/// General bootstrap by Newton-Raphson on the [`RepricingResidual`].
///
/// Starts from `guess`, else the last knot's rate, else
/// `config.default_guess`.
///
/// # Errors
///
/// Returns [`CurveError::NonMonotonicMaturity`] for an instrument inside the
/// curve, [`CurveError::CalibrationFailure`] if Newton does not converge and
/// [`CurveError::MathError`] if the derivative vanishes.
pub fn bootstrap_newton(
    curve: &ForwardCurve<'_>,
    instrument: &Instrument<'_>,
    price: f64,
    guess: Option<f64>,
    config: &BootstrapConfig,
) -> CurveResult<f64> {
    let residual = RepricingResidual::new(curve, instrument, price)?;
    solve(
        &NewtonSolver,
        &residual,
        initial_guess(curve, guess, config),
        &config.solver_config,
    )
}

/// General bootstrap by the secant method on the [`RepricingResidual`].
///
/// The second starting point is the guess bumped by `config.secant_bump`
/// toward the root; iterates are clamped to `config.secant_bounds`.
///
/// # Errors
///
/// As [`bootstrap_newton`], plus [`CurveError::MathError`] when successive
/// iterates collapse before the residual tolerance is met.
pub fn bootstrap_secant(
    curve: &ForwardCurve<'_>,
    instrument: &Instrument<'_>,
    price: f64,
    guess: Option<f64>,
    config: &BootstrapConfig,
) -> CurveResult<f64> {
    let residual = RepricingResidual::new(curve, instrument, price)?;
    solve(
        &config.secant_solver(),
        &residual,
        initial_guess(curve, guess, config),
        &config.solver_config,
    )
}

/// Solves the forward rate beyond the last knot that reprices `instrument`
/// to `price`.
///
/// Single flows take the deposit closed form (the initiating `-1` at time 0
/// is implicit, so the target is `cash_flow · D(t) = 1 + price`). Two flows
/// at zero price take the FRA closed form. Everything else goes to the root
/// finder selected by `config.solver`.
///
/// # Errors
///
/// See [`bootstrap_deposit`], [`bootstrap_fra`] and [`bootstrap_newton`].
pub fn bootstrap_instrument(
    curve: &ForwardCurve<'_>,
    instrument: &Instrument<'_>,
    price: f64,
    guess: Option<f64>,
    config: &BootstrapConfig,
) -> CurveResult<f64> {
    let rate = match (instrument.times(), instrument.flows()) {
        (&[t], &[c]) => deposit_rate(curve, t, c, price)?,
        (&[t0, t1], &[c0, c1]) if price == 0.0 => bootstrap_fra(curve, t0, c0, t1, c1)?,
        _ => match config.solver {
            SolverKind::Newton => bootstrap_newton(curve, instrument, price, guess, config)?,
            SolverKind::Secant => bootstrap_secant(curve, instrument, price, guess, config)?,
        },
    };

    if rate.is_finite() {
        Ok(rate)
    } else {
        Err(CurveError::math_error(format!(
            "bootstrapped forward rate is not finite: {rate}"
        )))
    }
}
