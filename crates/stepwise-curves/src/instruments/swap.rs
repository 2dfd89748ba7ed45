//! Interest rate swap.
//!
//! Swaps are the primary instruments for the medium-to-long end of the
//! curve. On a single curve the floating leg plus principal exchange is worth
//! par at the effective time, so the swap bootstraps as a fixed-coupon bond
//! priced at par.

use super::{FixCashFlows, Frequency};
use crate::error::{CurveError, CurveResult};
use crate::instrument::CashFlows;

/// Final periods shorter than this are folded into the previous one.
const STUB_TOLERANCE: f64 = 1e-9;

/// Interest rate swap on unit notional, seen from the fixed leg.
///
/// # Cash Flows
///
/// ```text
/// (effective, -1)
/// (T_i, rate × (T_i - T_{i-1}))      for each coupon date
/// (maturity, 1 + rate × (maturity - T_{n-1}))
/// ```
///
/// Coupon dates step from `effective` by `1 / periods_per_year`. If the
/// schedule does not land on `maturity` the final period is a short stub.
///
/// # Example
///
/// ```rust
/// use stepwise_curves::instruments::{FixCashFlows, Frequency, InterestRateSwap};
///
/// let swap = InterestRateSwap::new(0.0, 2.0, Frequency::Annual).unwrap();
/// let flows = swap.fix(0.05).unwrap();
///
/// assert_eq!(flows.times(), &[0.0, 1.0, 2.0]);
/// assert_eq!(flows.flows(), &[-1.0, 0.05, 1.05]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterestRateSwap {
    effective: f64,
    maturity: f64,
    frequency: Frequency,
}

impl InterestRateSwap {
    /// Creates a swap.
    ///
    /// # Errors
    ///
    /// Returns an error if `effective` is negative or not before `maturity`.
    pub fn new(effective: f64, maturity: f64, frequency: Frequency) -> CurveResult<Self> {
        if !(effective.is_finite() && maturity.is_finite()) {
            return Err(CurveError::invalid_instrument(
                "swap effective and maturity must be finite",
            ));
        }
        if effective < 0.0 || maturity <= effective {
            return Err(CurveError::invalid_instrument(format!(
                "swap must run forward from a non-negative effective time, got [{effective}, {maturity}]"
            )));
        }
        Ok(Self {
            effective,
            maturity,
            frequency,
        })
    }

    /// Effective (start) time.
    #[must_use]
    pub fn effective(&self) -> f64 {
        self.effective
    }

    /// Fixed leg payment frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Coupon payment times, ending at maturity.
    #[must_use]
    pub fn payment_times(&self) -> Vec<f64> {
        let per_year = f64::from(self.frequency.periods_per_year());
        let mut times: Vec<f64> = (1u32..)
            .map(|k| self.effective + f64::from(k) / per_year)
            .take_while(|&t| t < self.maturity - STUB_TOLERANCE)
            .collect();
        times.push(self.maturity);
        times
    }
}

impl FixCashFlows for InterestRateSwap {
    fn fix(&self, rate: f64) -> CurveResult<CashFlows> {
        if !rate.is_finite() {
            return Err(CurveError::invalid_instrument("rate must be finite"));
        }

        let payments = self.payment_times();
        let mut times = Vec::with_capacity(payments.len() + 1);
        let mut flows = Vec::with_capacity(payments.len() + 1);
        times.push(self.effective);
        flows.push(-1.0);

        let mut prev = self.effective;
        for t in payments {
            times.push(t);
            flows.push(rate * (t - prev));
            prev = t;
        }

        // Principal
        if let Some(last) = flows.last_mut() {
            *last += 1.0;
            if *last <= 0.0 {
                return Err(CurveError::arbitrage(*last));
            }
        }

        CashFlows::new(times, flows)
    }

    fn maturity(&self) -> f64 {
        self.maturity
    }
}
