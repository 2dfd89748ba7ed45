//! Cash deposit.
//!
//! A deposit is the simplest instrument for curve bootstrap, used for the
//! short end of the curve.

use super::{check_period, single_period, FixCashFlows};
use crate::error::CurveResult;
use crate::instrument::CashFlows;

/// A spot-starting cash deposit on unit notional.
///
/// # Cash Flows
///
/// ```text
/// (start, -1), (end, 1 + rate × α)
/// ```
///
/// where α is the accrual fraction, by default `end - start`.
///
/// # Example
///
/// ```rust
/// use stepwise_curves::instruments::{CashDeposit, FixCashFlows};
///
/// let deposit = CashDeposit::new(0.0, 0.25).unwrap();
/// let flows = deposit.fix(0.04).unwrap();
///
/// assert_eq!(flows.flows(), &[-1.0, 1.01]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashDeposit {
    start: f64,
    end: f64,
    accrual: f64,
}

impl CashDeposit {
    /// Creates a deposit accruing over `end - start`.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is negative or not before `end`.
    pub fn new(start: f64, end: f64) -> CurveResult<Self> {
        Self::with_accrual(start, end, end - start)
    }

    /// Creates a deposit with an explicit accrual fraction.
    pub fn with_accrual(start: f64, end: f64, accrual: f64) -> CurveResult<Self> {
        check_period(start, end, accrual)?;
        Ok(Self {
            start,
            end,
            accrual,
        })
    }

    /// Settlement time.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Maturity time.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Accrual fraction.
    #[must_use]
    pub fn accrual(&self) -> f64 {
        self.accrual
    }
}

impl FixCashFlows for CashDeposit {
    fn fix(&self, rate: f64) -> CurveResult<CashFlows> {
        single_period(self.start, self.end, self.accrual, rate)
    }

    fn maturity(&self) -> f64 {
        self.end
    }
}
