//! Incrementally bootstrapped yield curve.
//!
//! [`YieldCurve`] owns the solved knots. Every `add_*` call bootstraps one
//! instrument against the curve built so far and appends one knot. A failed
//! add returns the error and leaves the knots exactly as they were.
//!
//! # Example
//!
//! ```rust
//! use stepwise_curves::prelude::*;
//!
//! let mut curve = YieldCurve::new();
//! curve
//!     .add_deposit(0.25, 1.0 + 0.03 * 0.25)?
//!     .add_fra(0.25, -1.0, 0.5, 1.0 + 0.032 * 0.25)?
//!     .add_fixed(&InterestRateSwap::new(0.0, 2.0, Frequency::SemiAnnual)?, 0.035)?;
//!
//! assert_eq!(curve.len(), 3);
//! assert_eq!(curve.maturity(), Some(2.0));
//! # Ok::<(), stepwise_curves::CurveError>(())
//! ```

use crate::bootstrap::{bootstrap_deposit, bootstrap_fra, bootstrap_instrument};
use crate::config::{BootstrapConfig, ExtrapolationType};
use crate::curve::ForwardCurve;
use crate::error::{CurveError, CurveResult};
use crate::instrument::Instrument;
use crate::instruments::FixCashFlows;
use crate::snapshot::CurveSnapshot;
use crate::valuation::present_value;

/// Piecewise-flat forward curve grown one instrument at a time.
///
/// Instruments must be added in strictly increasing maturity order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YieldCurve {
    times: Vec<f64>,
    rates: Vec<f64>,
    config: BootstrapConfig,
}

impl YieldCurve {
    /// Creates an empty curve with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty curve with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidConfig`](crate::CurveError::InvalidConfig)
    /// if the configuration does not validate.
    pub fn with_config(config: BootstrapConfig) -> CurveResult<Self> {
        config.validate()?;
        Ok(Self {
            times: Vec::new(),
            rates: Vec::new(),
            config,
        })
    }

    /// Bootstrap configuration.
    #[must_use]
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Removes every knot.
    pub fn reset(&mut self) {
        self.times.clear();
        self.rates.clear();
    }

    /// Number of knots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns true if nothing has been bootstrapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Last knot time.
    #[must_use]
    pub fn maturity(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// Knot times.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Forward rate of each segment.
    #[must_use]
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Borrowed view of the current curve.
    ///
    /// Beyond the last knot the view extrapolates according to
    /// [`BootstrapConfig::extrapolation`].
    #[must_use]
    pub fn forward_curve(&self) -> ForwardCurve<'_> {
        let extrapolation = match self.config.extrapolation {
            ExtrapolationType::Flat => self.rates.last().copied().unwrap_or(0.0),
            ExtrapolationType::Constant(rate) => rate,
        };
        ForwardCurve::from_knots(&self.times, &self.rates, extrapolation)
    }

    /// Owned copy of the current curve.
    #[must_use]
    pub fn snapshot(&self) -> CurveSnapshot {
        CurveSnapshot::from(&self.forward_curve())
    }

    /// Present value of `instrument` on the current curve.
    #[must_use]
    pub fn reprice(&self, instrument: &Instrument<'_>) -> f64 {
        present_value(instrument, &self.forward_curve())
    }

    /// The committed knots, for bootstrapping against.
    fn committed(&self) -> ForwardCurve<'_> {
        ForwardCurve::from_knots(&self.times, &self.rates, 0.0)
    }

    fn push(&mut self, time: f64, rate: f64) -> &mut Self {
        log::debug!("knot {}: ({time}, {rate:.12})", self.times.len());
        self.times.push(time);
        self.rates.push(rate);
        self
    }

    /// Adds a cash deposit paying `cash_flow` at `time` for an implicit unit
    /// outlay at time 0.
    ///
    /// # Errors
    ///
    /// See [`bootstrap_deposit`]. The curve is unchanged on error.
    pub fn add_deposit(&mut self, time: f64, cash_flow: f64) -> CurveResult<&mut Self> {
        let rate = bootstrap_deposit(&self.committed(), time, cash_flow)?;
        Ok(self.push(time, rate))
    }

    /// Adds a forward rate agreement with flows `c0` at `t0` and `c1` at `t1`.
    ///
    /// # Errors
    ///
    /// See [`bootstrap_fra`]. The curve is unchanged on error.
    pub fn add_fra(&mut self, t0: f64, c0: f64, t1: f64, c1: f64) -> CurveResult<&mut Self> {
        let rate = bootstrap_fra(&self.committed(), t0, c0, t1, c1)?;
        Ok(self.push(t1, rate))
    }

    /// Adds a zero-price cash-flow stream given as parallel arrays.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed arrays or a failed bootstrap. The
    /// curve is unchanged on error.
    pub fn add_cash_flows(&mut self, times: &[f64], flows: &[f64]) -> CurveResult<&mut Self> {
        let instrument = Instrument::new(times, flows)?;
        self.add_instrument(&instrument, 0.0, None)
    }

    /// Adds an instrument repricing to `price`, optionally starting the
    /// root finder from `guess`.
    ///
    /// # Errors
    ///
    /// See [`bootstrap_instrument`]. The curve is unchanged on error.
    pub fn add_instrument(
        &mut self,
        instrument: &Instrument<'_>,
        price: f64,
        guess: Option<f64>,
    ) -> CurveResult<&mut Self> {
        let maturity = instrument
            .maturity()
            .ok_or_else(|| CurveError::invalid_instrument("instrument has no cash flows"))?;
        let rate =
            bootstrap_instrument(&self.committed(), instrument, price, guess, &self.config)?;
        Ok(self.push(maturity, rate))
    }

    /// Fixes `generator` at `rate` and adds the resulting flows at zero price.
    ///
    /// # Errors
    ///
    /// Returns the generator's error or the bootstrap's. The curve is
    /// unchanged on error.
    pub fn add_fixed<G>(&mut self, generator: &G, rate: f64) -> CurveResult<&mut Self>
    where
        G: FixCashFlows + ?Sized,
    {
        let flows = generator.fix(rate)?;
        self.add_instrument(&flows.as_instrument(), 0.0, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverKind;
    use crate::curve::ForwardRateCurve;
    use crate::instruments::{CashDeposit, ForwardRateAgreement, Frequency, InterestRateSwap};
    use approx::assert_relative_eq;

    #[test]
    fn test_views_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<YieldCurve>();
        assert_send_sync::<crate::curve::ForwardCurve<'static>>();
        assert_send_sync::<crate::instrument::Instrument<'static>>();
    }

    /// `(-1, e, ..., e, 1 + e)` at `0..=n` with `e = exp(f0) - 1`.
    fn par_flows(f0: f64, n: usize) -> (Vec<f64>, Vec<f64>) {
        let e = f0.exp_m1();
        let times: Vec<f64> = (0..=n).map(|i| i as f64).collect();
        let mut flows = vec![e; n + 1];
        flows[0] = -1.0;
        flows[n] += 1.0;
        (times, flows)
    }

    #[test]
    fn test_flat_forward_scenario() {
        let f0 = 0.04;
        let mut curve = YieldCurve::new();

        for n in 1..=10 {
            let (times, flows) = par_flows(f0, n);
            curve.add_cash_flows(&times, &flows).unwrap();
            assert_relative_eq!(curve.rates()[n - 1], f0, epsilon = 1e-12);
        }
        assert_eq!(curve.len(), 10);
        assert_eq!(curve.maturity(), Some(10.0));

        // Same again with an explicit guess through the general path
        curve.reset();
        assert!(curve.is_empty());
        for n in 1..=10 {
            let (times, flows) = par_flows(f0, n);
            let inst = Instrument::new(&times, &flows).unwrap();
            curve.add_instrument(&inst, 0.0, Some(0.02)).unwrap();
            assert_relative_eq!(curve.rates()[n - 1], f0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_flat_forward_scenario_with_secant() {
        let f0 = 0.04;
        let config = BootstrapConfig::default()
            .with_solver(SolverKind::Secant)
            .with_tolerance(1e-13);
        let mut curve = YieldCurve::with_config(config).unwrap();

        for n in 1..=8 {
            let (times, flows) = par_flows(f0, n);
            curve.add_cash_flows(&times, &flows).unwrap();
            assert_relative_eq!(curve.rates()[n - 1], f0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_reprice_invariant() {
        let mut curve = YieldCurve::new();
        curve.add_deposit(0.5, 1.0 + 0.03 * 0.5).unwrap();
        curve.add_fra(0.5, -1.0, 1.0, 1.0 + 0.035 * 0.5).unwrap();

        let times = [0.0, 1.0, 2.0, 3.0];
        let flows = [-1.0, 0.04, 0.04, 1.04];
        let inst = Instrument::new(&times, &flows).unwrap();
        curve.add_instrument(&inst, 0.0, None).unwrap();
        assert_relative_eq!(curve.reprice(&inst), 0.0, epsilon = 1e-14);

        let times = [0.0, 2.0, 4.0];
        let flows = [-1.0, 0.09, 1.09];
        let inst = Instrument::new(&times, &flows).unwrap();
        curve.add_instrument(&inst, 0.015, None).unwrap();
        assert_relative_eq!(curve.reprice(&inst), 0.015, epsilon = 1e-14);

        // Earlier instruments still reprice
        let deposit = Instrument::new(&[0.0, 0.5], &[-1.0, 1.0 + 0.03 * 0.5]).unwrap();
        assert_relative_eq!(curve.reprice(&deposit), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_failed_add_leaves_curve_unchanged() {
        let mut curve = YieldCurve::new();
        curve.add_deposit(1.0, 1.05).unwrap();
        curve.add_deposit(2.0, 1.1).unwrap();
        let before = curve.clone();

        assert!(matches!(
            curve.add_deposit(2.0, 1.2),
            Err(CurveError::NonMonotonicMaturity { .. })
        ));
        assert!(matches!(
            curve.add_fra(0.5, -1.0, 1.5, 1.02),
            Err(CurveError::NonMonotonicMaturity { .. })
        ));
        assert!(curve.add_cash_flows(&[0.0, 1.0], &[-1.0]).is_err());
        assert!(curve
            .add_cash_flows(&[0.0, 1.0, 1.5], &[-1.0, 0.1, 1.1])
            .is_err());

        assert_eq!(curve, before);
    }

    #[test]
    fn test_convergence_failure_leaves_curve_unchanged() {
        let config = BootstrapConfig::default().with_max_iterations(1);
        let mut curve = YieldCurve::with_config(config).unwrap();
        curve.add_deposit(1.0, 1.05).unwrap();
        let before = curve.clone();

        let times = [0.0, 1.0, 2.0, 3.0];
        let flows = [-1.0, 0.2, 0.2, 1.2];
        let inst = Instrument::new(&times, &flows).unwrap();
        assert!(matches!(
            curve.add_instrument(&inst, 0.0, Some(-0.5)),
            Err(CurveError::CalibrationFailure { .. })
        ));
        assert_eq!(curve, before);
    }

    #[test]
    fn test_generators() {
        let mut curve = YieldCurve::new();
        curve
            .add_fixed(&CashDeposit::new(0.0, 0.25).unwrap(), 0.03)
            .unwrap()
            .add_fixed(&ForwardRateAgreement::new(0.25, 0.5).unwrap(), 0.032)
            .unwrap()
            .add_fixed(
                &InterestRateSwap::new(0.0, 2.0, Frequency::SemiAnnual).unwrap(),
                0.035,
            )
            .unwrap();

        assert_eq!(curve.times(), &[0.25, 0.5, 2.0]);

        let swap = InterestRateSwap::new(0.0, 2.0, Frequency::SemiAnnual)
            .unwrap()
            .fix(0.035)
            .unwrap();
        assert_relative_eq!(curve.reprice(&swap.as_instrument()), 0.0, epsilon = 1e-14);

        let f = curve.forward_curve();
        assert_relative_eq!(f.discount(0.25), 1.0 / (1.0 + 0.03 * 0.25), epsilon = 1e-15);
    }

    #[test]
    fn test_deposit_then_fra_closed_forms() {
        let mut curve = YieldCurve::new();
        curve.add_deposit(1.0, 1.05).unwrap();
        curve.add_fra(1.0, -1.0, 2.0, 1.06).unwrap();

        assert_relative_eq!(curve.rates()[0], 1.05_f64.ln(), epsilon = 1e-15);
        assert_relative_eq!(curve.rates()[1], 1.06_f64.ln(), epsilon = 1e-15);
    }

    #[test]
    fn test_extrapolation_policy() {
        let mut curve = YieldCurve::new();
        assert_eq!(curve.forward_curve().value(1.0), 0.0);

        curve.add_deposit(1.0, 1.05).unwrap();
        let last = curve.rates()[0];
        assert_eq!(curve.forward_curve().value(5.0), last);

        let config =
            BootstrapConfig::default().with_extrapolation(ExtrapolationType::Constant(0.07));
        let mut curve = YieldCurve::with_config(config).unwrap();
        curve.add_deposit(1.0, 1.05).unwrap();
        assert_eq!(curve.forward_curve().value(5.0), 0.07);
        assert_eq!(curve.snapshot().extrapolation, 0.07);
    }

    #[test]
    fn test_snapshot_matches_knots() {
        let mut curve = YieldCurve::new();
        curve.add_deposit(0.5, 1.02).unwrap();
        curve.add_deposit(1.0, 1.045).unwrap();

        let snapshot = curve.snapshot();
        assert_eq!(snapshot.times, curve.times());
        assert_eq!(snapshot.rates, curve.rates());
        assert_eq!(snapshot.as_forward_curve().unwrap(), curve.forward_curve());
    }

    #[test]
    fn test_with_config_validates() {
        let config = BootstrapConfig::default().with_tolerance(-1.0);
        assert!(matches!(
            YieldCurve::with_config(config),
            Err(CurveError::InvalidConfig { .. })
        ));
    }
}
