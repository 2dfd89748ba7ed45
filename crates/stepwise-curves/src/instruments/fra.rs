//! Forward Rate Agreement.
//!
//! Covers a single future period; with deposits and swaps it fills the gap
//! between the money-market and swap segments of the curve.

use super::{check_period, single_period, FixCashFlows};
use crate::error::CurveResult;
use crate::instrument::CashFlows;

/// Forward Rate Agreement on unit notional.
///
/// # Cash Flows
///
/// ```text
/// (start, -1), (end, 1 + rate × α)
/// ```
///
/// Zero present value at the fair rate means
/// `D(end) = D(start) / (1 + rate × α)`, which the bootstrap solves in closed
/// form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardRateAgreement {
    start: f64,
    end: f64,
    accrual: f64,
}

impl ForwardRateAgreement {
    /// Creates an FRA accruing over `end - start`.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is negative or not before `end`.
    pub fn new(start: f64, end: f64) -> CurveResult<Self> {
        Self::with_accrual(start, end, end - start)
    }

    /// Creates an FRA with an explicit accrual fraction.
    pub fn with_accrual(start: f64, end: f64, accrual: f64) -> CurveResult<Self> {
        check_period(start, end, accrual)?;
        Ok(Self {
            start,
            end,
            accrual,
        })
    }

    /// Start of the forward period.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End of the forward period.
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

impl FixCashFlows for ForwardRateAgreement {
    fn fix(&self, rate: f64) -> CurveResult<CashFlows> {
        single_period(self.start, self.end, self.accrual, rate)
    }

    fn maturity(&self) -> f64 {
        self.end
    }
}
