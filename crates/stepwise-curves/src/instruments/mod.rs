//! Cash-flow generators for bootstrap instruments.
//!
//! Generators turn quoted rates into the `(times, amounts)` arrays consumed by
//! the bootstrap. Times are year fractions from the valuation date; calendar
//! and day-count conventions are the caller's concern and enter only through
//! the accrual fractions.
//!
//! # Available Instruments
//!
//! - [`CashDeposit`]: spot-starting deposit
//! - [`ForwardRateAgreement`]: forward-starting deposit
//! - [`InterestRateSwap`]: fixed leg of a par swap with principal exchange

mod deposit;
mod fra;
mod swap;

pub use deposit::CashDeposit;
pub use fra::ForwardRateAgreement;
pub use swap::InterestRateSwap;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};
use crate::instrument::CashFlows;

/// Generator of fixed cash flows given a quoted rate.
pub trait FixCashFlows {
    /// Produces the instrument's cash flows at `rate`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::Arbitrage`] if the redemption flow is not
    /// positive, or [`CurveError::InvalidInstrument`] for a non-finite rate.
    fn fix(&self, rate: f64) -> CurveResult<CashFlows>;

    /// Time of the final cash flow.
    fn maturity(&self) -> f64;
}

/// Coupon payment frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// Annual payments (1 per year)
    Annual,
    /// Semi-annual payments (2 per year)
    #[default]
    SemiAnnual,
    /// Quarterly payments (4 per year)
    Quarterly,
    /// Monthly payments (12 per year)
    Monthly,
}

impl Frequency {
    /// Returns the number of periods per year.
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
        }
    }

    /// Returns the length of one period in years.
    #[must_use]
    pub fn period(&self) -> f64 {
        1.0 / f64::from(self.periods_per_year())
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
        };
        write!(f, "{name}")
    }
}

/// Validates the accrual period `[start, end]` with fraction `accrual`.
fn check_period(start: f64, end: f64, accrual: f64) -> CurveResult<()> {
    if !(start.is_finite() && end.is_finite() && accrual.is_finite()) {
        return Err(CurveError::invalid_instrument(
            "period bounds and accrual must be finite",
        ));
    }
    if start < 0.0 {
        return Err(CurveError::invalid_instrument(format!(
            "start {start} precedes the valuation date"
        )));
    }
    if end <= start {
        return Err(CurveError::invalid_instrument(format!(
            "end {end} must follow start {start}"
        )));
    }
    if accrual <= 0.0 {
        return Err(CurveError::invalid_instrument(format!(
            "accrual fraction {accrual} must be positive"
        )));
    }
    Ok(())
}

/// `[(start, -1), (end, 1 + rate · accrual)]`.
fn single_period(start: f64, end: f64, accrual: f64, rate: f64) -> CurveResult<CashFlows> {
    if !rate.is_finite() {
        return Err(CurveError::invalid_instrument("rate must be finite"));
    }
    let redemption = 1.0 + rate * accrual;
    if redemption <= 0.0 {
        return Err(CurveError::arbitrage(redemption));
    }
    CashFlows::new(vec![start, end], vec![-1.0, redemption])
}
