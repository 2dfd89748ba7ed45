//! Valuation of fixed cash flows against a forward curve.
//!
//! All functions are generic over [`ForwardRateCurve`], so they work equally
//! with committed curves and with trial views produced by
//! [`ForwardCurve::with_extrapolation`](crate::curve::ForwardCurve::with_extrapolation).
//!
//! # Credit risk
//!
//! The recovery variants weight each discounted flow by
//! `r + (1 - r) S(t)`, where `r` is the recovery rate and `S(t)` is the
//! caller-supplied probability of survival past `t`. With `r = 1` or
//! `S ≡ 1` they reduce to the risk-free values.

use crate::curve::ForwardRateCurve;
use crate::error::{CurveError, CurveResult};
use crate::instrument::Instrument;

/// Present value `Σ c_j D(t_j)`.
///
/// # Example
///
/// ```rust
/// use stepwise_curves::curve::ForwardCurve;
/// use stepwise_curves::instrument::Instrument;
/// use stepwise_curves::valuation::present_value;
///
/// let curve = ForwardCurve::flat(0.05);
/// let zero = Instrument::new(&[2.0], &[1.0]).unwrap();
///
/// assert!((present_value(&zero, &curve) - (-0.1_f64).exp()).abs() < 1e-15);
/// ```
#[must_use]
pub fn present_value<C>(instrument: &Instrument<'_>, curve: &C) -> f64
where
    C: ForwardRateCurve + ?Sized,
{
    instrument
        .iter()
        .map(|(t, c)| c * curve.discount(t))
        .sum()
}

/// Present value with recovery `r` and survival function `survival`.
#[must_use]
pub fn present_value_with_recovery<C, S>(
    instrument: &Instrument<'_>,
    curve: &C,
    recovery: f64,
    survival: S,
) -> f64
where
    C: ForwardRateCurve + ?Sized,
    S: Fn(f64) -> f64,
{
    instrument
        .iter()
        .map(|(t, c)| c * curve.discount(t) * credit_weight(recovery, survival(t)))
        .sum()
}

/// Sensitivity of present value to a parallel shift of the forward rate
/// beyond `pivot`:
///
/// ```text
/// Σ_{t_j > pivot} -(t_j - pivot) c_j D(t_j)
/// ```
///
/// Flows at or before the pivot contribute nothing. When `pivot` is the
/// last knot of the curve this is the exact derivative of the present value
/// with respect to the extrapolation rate.
#[must_use]
pub fn duration<C>(instrument: &Instrument<'_>, curve: &C, pivot: f64) -> f64
where
    C: ForwardRateCurve + ?Sized,
{
    instrument
        .iter()
        .filter(|&(t, _)| t > pivot)
        .map(|(t, c)| -(t - pivot) * c * curve.discount(t))
        .sum()
}

#[inline]
fn credit_weight(recovery: f64, survival: f64) -> f64 {
    recovery + (1.0 - recovery) * survival
}

fn check_schedule(from: f64, times: &[f64]) -> CurveResult<()> {
    if !from.is_finite() || times.iter().any(|t| !t.is_finite()) {
        return Err(CurveError::invalid_instrument("leg times must be finite"));
    }
    let mut prev = from;
    for (index, &t) in times.iter().enumerate() {
        if t <= prev {
            return Err(CurveError::non_monotonic_tenors(index, prev, t));
        }
        prev = t;
    }
    Ok(())
}

/// Fixed-rate coupon leg on unit notional.
///
/// Coupon `i` pays `coupon · α_i` at `times[i]`, with accrual
/// `α_i = times[i] - times[i-1]` and `times[-1] = start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLeg<'a> {
    start: f64,
    times: &'a [f64],
    coupon: f64,
}

impl<'a> FixedLeg<'a> {
    /// Creates a fixed leg accruing from `start`.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no payments, payment times are not
    /// strictly increasing after `start`, or a value is not finite.
    pub fn new(start: f64, times: &'a [f64], coupon: f64) -> CurveResult<Self> {
        if times.is_empty() {
            return Err(CurveError::invalid_instrument("fixed leg has no payments"));
        }
        if !coupon.is_finite() {
            return Err(CurveError::invalid_instrument("coupon must be finite"));
        }
        check_schedule(start, times)?;
        Ok(Self {
            start,
            times,
            coupon,
        })
    }

    /// Accrual start.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Payment times.
    #[must_use]
    pub fn times(&self) -> &'a [f64] {
        self.times
    }

    /// Coupon rate.
    #[must_use]
    pub fn coupon(&self) -> f64 {
        self.coupon
    }

    /// Iterator over `(payment time, accrual)` pairs.
    pub fn accruals(&self) -> impl Iterator<Item = (f64, f64)> + 'a {
        let start = self.start;
        self.times.iter().scan(start, |prev, &t| {
            let alpha = t - *prev;
            *prev = t;
            Some((t, alpha))
        })
    }

    /// Annuity `Σ α_i D(t_i)`: the value of a unit coupon.
    #[must_use]
    pub fn annuity<C>(&self, curve: &C) -> f64
    where
        C: ForwardRateCurve + ?Sized,
    {
        self.accruals().map(|(t, a)| a * curve.discount(t)).sum()
    }

    /// Present value `Σ coupon · α_i D(t_i)`.
    #[must_use]
    pub fn present_value<C>(&self, curve: &C) -> f64
    where
        C: ForwardRateCurve + ?Sized,
    {
        self.coupon * self.annuity(curve)
    }

    /// Credit-risky present value.
    #[must_use]
    pub fn present_value_with_recovery<C, S>(&self, curve: &C, recovery: f64, survival: S) -> f64
    where
        C: ForwardRateCurve + ?Sized,
        S: Fn(f64) -> f64,
    {
        self.accruals()
            .map(|(t, a)| {
                self.coupon * a * curve.discount(t) * credit_weight(recovery, survival(t))
            })
            .sum()
    }
}

/// Floating leg on unit notional paying the curve's own forward rate.
///
/// `times[0]` is the first reset; every later time is a payment date which
/// also resets the next period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatLeg<'a> {
    times: &'a [f64],
}

impl<'a> FloatLeg<'a> {
    /// Creates a floating leg from reset/payment times.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than two times, or they are not
    /// strictly increasing and finite.
    pub fn new(times: &'a [f64]) -> CurveResult<Self> {
        match times.split_first() {
            Some((&first, rest)) if !rest.is_empty() => {
                check_schedule(first, rest)?;
                Ok(Self { times })
            }
            _ => Err(CurveError::invalid_instrument(
                "floating leg needs a reset and at least one payment",
            )),
        }
    }

    /// Reset/payment times.
    #[must_use]
    pub fn times(&self) -> &'a [f64] {
        self.times
    }

    /// Present value `D(t_0) - D(t_n)`.
    #[must_use]
    pub fn present_value<C>(&self, curve: &C) -> f64
    where
        C: ForwardRateCurve + ?Sized,
    {
        match (self.times.first(), self.times.last()) {
            (Some(&first), Some(&last)) => curve.discount(first) - curve.discount(last),
            _ => 0.0,
        }
    }

    /// Credit-risky present value
    /// `Σ (D(t_{i-1}) - D(t_i)) (r + (1 - r) S(t_i))`.
    #[must_use]
    pub fn present_value_with_recovery<C, S>(&self, curve: &C, recovery: f64, survival: S) -> f64
    where
        C: ForwardRateCurve + ?Sized,
        S: Fn(f64) -> f64,
    {
        self.times
            .windows(2)
            .map(|w| {
                (curve.discount(w[0]) - curve.discount(w[1]))
                    * credit_weight(recovery, survival(w[1]))
            })
            .sum()
    }
}
