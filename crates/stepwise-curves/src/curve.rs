//! Piecewise-flat instantaneous forward curves.
//!
//! A [`ForwardCurve`] is a left-continuous step function over borrowed knot
//! arrays:
//!
//! ```text
//! f(u) = rates[i]        for times[i-1] < u <= times[i]   (times[-1] = 0)
//! f(u) = extrapolation   for u > times[n-1]
//! ```
//!
//! Because the forward rate is piecewise constant, its integral (and hence
//! every discount factor) is computed exactly as a running sum.
//!
//! The view never owns its knots. Trial rates for the segment beyond the last
//! knot are probed with [`ForwardCurve::with_extrapolation`], which returns a
//! new view and leaves the committed knots alone.

use crate::error::{CurveError, CurveResult};

/// Below this magnitude [`ForwardRateCurve::spot`] returns the forward rate.
pub const SPOT_TOLERANCE: f64 = 1.490_116_119_384_765_6e-8; // sqrt(f64::EPSILON)

/// Capability of an instantaneous forward-rate curve.
///
/// Implementors supply the forward rate and its integral; discount factors
/// and continuously compounded spot rates follow from them.
pub trait ForwardRateCurve {
    /// Instantaneous forward rate at time `u` (years).
    fn value(&self, u: f64) -> f64;

    /// Integral of the forward rate from 0 to `u`.
    fn integral(&self, u: f64) -> f64;

    /// Discount factor `exp(-∫₀ᵘ f(s) ds)`.
    fn discount(&self, u: f64) -> f64 {
        (-self.integral(u)).exp()
    }

    /// Continuously compounded spot rate `∫₀ᵘ f(s) ds / u`.
    ///
    /// At `u = 0` this is the removable-singularity limit, the forward rate
    /// of the first segment.
    fn spot(&self, u: f64) -> f64 {
        if u.abs() < SPOT_TOLERANCE {
            self.value(u)
        } else {
            self.integral(u) / u
        }
    }
}

/// A piecewise-flat forward curve borrowing its knot arrays.
///
/// # Example
///
/// ```rust
/// use stepwise_curves::curve::{ForwardCurve, ForwardRateCurve};
///
/// let times = [1.0, 2.0, 3.0];
/// let rates = [0.1, 0.2, 0.3];
/// let curve = ForwardCurve::new(&times, &rates, 0.4).unwrap();
///
/// assert_eq!(curve.value(2.0), 0.2);
/// assert_eq!(curve.value(5.0), 0.4);
/// assert!((curve.integral(1.5) - 0.2).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardCurve<'a> {
    times: &'a [f64],
    rates: &'a [f64],
    extrapolation: f64,
}

impl Default for ForwardCurve<'_> {
    fn default() -> Self {
        Self::flat(0.0)
    }
}

impl<'a> ForwardCurve<'a> {
    /// Creates a curve over the given knots.
    ///
    /// # Errors
    ///
    /// - [`CurveError::LengthMismatch`] if `times` and `rates` differ in length
    /// - [`CurveError::NonMonotonicTenors`] if times are not strictly
    ///   increasing from a positive first knot
    /// - [`CurveError::InvalidInstrument`] if any time or rate is not finite
    pub fn new(times: &'a [f64], rates: &'a [f64], extrapolation: f64) -> CurveResult<Self> {
        if times.len() != rates.len() {
            return Err(CurveError::length_mismatch(times.len(), rates.len()));
        }
        if times.iter().chain(rates).any(|x| !x.is_finite()) {
            return Err(CurveError::invalid_instrument(
                "curve knots and rates must be finite",
            ));
        }
        let mut prev = 0.0;
        for (index, &t) in times.iter().enumerate() {
            if t <= prev {
                return Err(CurveError::non_monotonic_tenors(index, prev, t));
            }
            prev = t;
        }

        Ok(Self::from_knots(times, rates, extrapolation))
    }

    /// Creates a curve with no knots: the forward rate is `rate` everywhere.
    #[must_use]
    pub fn flat(rate: f64) -> ForwardCurve<'static> {
        ForwardCurve {
            times: &[],
            rates: &[],
            extrapolation: rate,
        }
    }

    /// Wraps knots whose invariants the caller already maintains.
    pub(crate) fn from_knots(times: &'a [f64], rates: &'a [f64], extrapolation: f64) -> Self {
        debug_assert_eq!(times.len(), rates.len());
        Self {
            times,
            rates,
            extrapolation,
        }
    }

    /// Returns a view over the same knots with a trial extrapolation rate.
    #[must_use]
    pub fn with_extrapolation(&self, rate: f64) -> Self {
        Self {
            extrapolation: rate,
            ..*self
        }
    }

    /// Number of knots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns true if the curve has no knots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Knot times.
    #[must_use]
    pub fn times(&self) -> &'a [f64] {
        self.times
    }

    /// Forward rates, one per knot.
    #[must_use]
    pub fn rates(&self) -> &'a [f64] {
        self.rates
    }

    /// Knot time `i`.
    #[must_use]
    pub fn time(&self, i: usize) -> Option<f64> {
        self.times.get(i).copied()
    }

    /// Forward rate of segment `i`.
    #[must_use]
    pub fn rate(&self, i: usize) -> Option<f64> {
        self.rates.get(i).copied()
    }

    /// Last knot time.
    #[must_use]
    pub fn last_time(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// Forward rate of the last segment.
    #[must_use]
    pub fn last_rate(&self) -> Option<f64> {
        self.rates.last().copied()
    }

    /// Extrapolation rate beyond the last knot.
    #[must_use]
    pub fn extrapolation(&self) -> f64 {
        self.extrapolation
    }

    /// Iterator over `(time, rate)` knots.
    pub fn knots(&self) -> impl Iterator<Item = (f64, f64)> + 'a {
        self.times.iter().copied().zip(self.rates.iter().copied())
    }
}

impl ForwardRateCurve for ForwardCurve<'_> {
    fn value(&self, u: f64) -> f64 {
        // Lower bound: first knot with t >= u
        let i = self.times.partition_point(|&t| t < u);
        self.rates.get(i).copied().unwrap_or(self.extrapolation)
    }

    fn integral(&self, u: f64) -> f64 {
        let covered = self.times.partition_point(|&t| t <= u);

        let mut sum = 0.0;
        let mut t0 = 0.0;
        for (&t, &f) in self.times[..covered].iter().zip(self.rates) {
            sum += f * (t - t0);
            t0 = t;
        }

        let rate = self.rates.get(covered).copied().unwrap_or(self.extrapolation);
        sum + rate * (u - t0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const T: [f64; 3] = [1.0, 2.0, 3.0];
    const F: [f64; 3] = [0.1, 0.2, 0.3];

    #[test]
    fn test_empty_curve_uses_extrapolation() {
        let curve = ForwardCurve::default();
        assert!(curve.is_empty());
        assert_eq!(curve.value(-1.0), 0.0);
        assert_eq!(curve.value(1.0), 0.0);

        let curve = curve.with_extrapolation(2.0);
        assert_eq!(curve.value(-1.0), 2.0);
        assert_eq!(curve.value(1.0), 2.0);
        assert_eq!(curve.integral(1.5), 3.0);
    }

    #[test]
    fn test_value_is_left_continuous() {
        let curve = ForwardCurve::new(&T, &F, 1.23).unwrap();

        assert_eq!(curve.value(-1.0), F[0]);
        assert_eq!(curve.value(0.9), F[0]);
        assert_eq!(curve.value(1.0), F[0]);
        assert_eq!(curve.value(1.1), F[1]);
        assert_eq!(curve.value(2.0), F[1]);
        assert_eq!(curve.value(3.0), F[2]);
        assert_eq!(curve.value(4.0), 1.23);

        for (t, f) in curve.knots() {
            assert_eq!(curve.value(t), f);
        }
    }

    #[test]
    fn test_trial_extrapolation_leaves_knots() {
        let base = ForwardCurve::new(&T, &F, 0.4).unwrap();
        let trial = base.with_extrapolation(0.5);

        assert_eq!(base.value(4.0), 0.4);
        assert_eq!(trial.value(4.0), 0.5);
        assert_eq!(trial.times(), base.times());
        assert_eq!(trial.rates(), base.rates());
    }

    #[test]
    fn test_integral() {
        let curve = ForwardCurve::new(&T, &F, 0.0).unwrap();

        assert_eq!(curve.integral(1.0), F[0]);
        assert_eq!(curve.integral(1.5), F[0] + F[1] * 0.5);
        assert_eq!(curve.integral(2.0), F[0] + F[1]);
        assert_relative_eq!(curve.integral(2.5), F[0] + F[1] + F[2] * 0.5, epsilon = 1e-15);
        assert_relative_eq!(curve.integral(3.0), F[0] + F[1] + F[2], epsilon = 1e-15);
        // Zero extrapolation adds nothing past the last knot
        assert_relative_eq!(curve.integral(4.0), F[0] + F[1] + F[2], epsilon = 1e-15);

        let curve = curve.with_extrapolation(0.4);
        assert_relative_eq!(
            curve.integral(3.5),
            F[0] + F[1] + F[2] + 0.4 * 0.5,
            epsilon = 1e-15
        );
        assert_relative_eq!(
            curve.integral(4.0),
            F[0] + F[1] + F[2] + 0.4 * 1.0,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_flat_curve_discount_and_spot() {
        let curve = ForwardCurve::flat(0.1);

        assert_eq!(curve.discount(1.0), (-0.1_f64).exp());
        assert_eq!(curve.spot(1.0), 0.1);
        assert_eq!(curve.spot(0.0), 0.1);
    }

    #[test]
    fn test_spot_at_zero_is_first_forward() {
        let curve = ForwardCurve::new(&T, &F, 0.4).unwrap();

        assert_eq!(curve.spot(0.0), F[0]);
        assert_relative_eq!(curve.spot(2.0), (F[0] + F[1]) / 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_accessors() {
        let curve = ForwardCurve::new(&T, &F, 0.4).unwrap();

        assert_eq!(curve.len(), 3);
        assert_eq!(curve.time(1), Some(2.0));
        assert_eq!(curve.rate(2), Some(0.3));
        assert_eq!(curve.rate(3), None);
        assert_eq!(curve.last_time(), Some(3.0));
        assert_eq!(curve.last_rate(), Some(0.3));
        assert_eq!(curve.extrapolation(), 0.4);
        assert_eq!(ForwardCurve::default().last_time(), None);
    }

    #[test]
    fn test_new_rejects_bad_knots() {
        assert!(matches!(
            ForwardCurve::new(&[1.0, 2.0], &[0.1], 0.0),
            Err(CurveError::LengthMismatch { .. })
        ));
        assert!(matches!(
            ForwardCurve::new(&[1.0, 1.0], &[0.1, 0.2], 0.0),
            Err(CurveError::NonMonotonicTenors { index: 1, .. })
        ));
        assert!(matches!(
            ForwardCurve::new(&[0.0, 1.0], &[0.1, 0.2], 0.0),
            Err(CurveError::NonMonotonicTenors { index: 0, .. })
        ));
        assert!(ForwardCurve::new(&[1.0], &[f64::NAN], 0.0).is_err());
    }

    fn knots() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
        prop::collection::vec((0.01f64..2.0, -0.05f64..0.2), 0..12).prop_map(|segments| {
            let mut t = 0.0;
            segments
                .into_iter()
                .map(|(dt, f)| {
                    t += dt;
                    (t, f)
                })
                .unzip::<f64, f64, Vec<f64>, Vec<f64>>()
        })
    }

    proptest! {
        #[test]
        fn prop_discount_at_zero_is_one((times, rates) in knots(), ext in -0.05f64..0.2) {
            let curve = ForwardCurve::new(&times, &rates, ext).unwrap();
            prop_assert_eq!(curve.discount(0.0), 1.0);
        }

        #[test]
        fn prop_value_at_knots((times, rates) in knots(), ext in -0.05f64..0.2) {
            let curve = ForwardCurve::new(&times, &rates, ext).unwrap();
            for i in 0..curve.len() {
                prop_assert_eq!(curve.value(times[i]), rates[i]);
            }
            if let Some(last) = curve.last_time() {
                prop_assert_eq!(curve.value(last + 1.0), ext);
            }
        }

        #[test]
        fn prop_integral_is_additive((times, rates) in knots(), ext in -0.05f64..0.2, u in 0.0f64..30.0, h in 0.0f64..1.0) {
            // Over (u, u + h] the integrand is bounded by the extreme rates
            let curve = ForwardCurve::new(&times, &rates, ext).unwrap();
            let lo = rates.iter().copied().fold(ext, f64::min);
            let hi = rates.iter().copied().fold(ext, f64::max);
            let delta = curve.integral(u + h) - curve.integral(u);
            prop_assert!(delta >= lo * h - 1e-12);
            prop_assert!(delta <= hi * h + 1e-12);
        }
    }
}
