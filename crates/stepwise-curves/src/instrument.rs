//! Fixed cash-flow instruments.
//!
//! An instrument is nothing more than an ordered sequence of
//! `(time, amount)` pairs: times in years from the valuation date
//! (non-decreasing), amounts sign-carrying. The first flow is conventionally
//! the negative price paid at or near time 0.
//!
//! [`Instrument`] borrows caller-owned arrays; [`CashFlows`] owns them and is
//! what the cash-flow generators in [`crate::instruments`] produce.

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// A borrowed view of an instrument's cash flows.
///
/// # Example
///
/// ```rust
/// use stepwise_curves::instrument::Instrument;
///
/// let times = [0.0, 1.0, 2.0];
/// let flows = [-1.0, 0.05, 1.05];
/// let bond = Instrument::new(&times, &flows).unwrap();
///
/// assert_eq!(bond.len(), 3);
/// assert_eq!(bond.maturity(), Some(2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instrument<'a> {
    times: &'a [f64],
    flows: &'a [f64],
}

impl<'a> Instrument<'a> {
    /// Creates an instrument from parallel time and amount arrays.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidInstrument`] if there are no flows, the
    /// arrays differ in length, a value is not finite, or times decrease.
    pub fn new(times: &'a [f64], flows: &'a [f64]) -> CurveResult<Self> {
        if times.is_empty() {
            return Err(CurveError::invalid_instrument("instrument has no cash flows"));
        }
        if times.len() != flows.len() {
            return Err(CurveError::invalid_instrument(format!(
                "{} cash-flow times but {} amounts",
                times.len(),
                flows.len()
            )));
        }
        if times.iter().chain(flows).any(|x| !x.is_finite()) {
            return Err(CurveError::invalid_instrument(
                "cash-flow times and amounts must be finite",
            ));
        }
        if let Some(i) = times.windows(2).position(|w| w[1] < w[0]) {
            return Err(CurveError::invalid_instrument(format!(
                "cash-flow times decrease at index {}: {} < {}",
                i + 1,
                times[i + 1],
                times[i]
            )));
        }

        Ok(Self { times, flows })
    }

    /// Sub-view whose ordering the caller guarantees.
    fn slice(times: &'a [f64], flows: &'a [f64]) -> Self {
        Self { times, flows }
    }

    /// Number of cash flows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns true if the view holds no flows.
    ///
    /// Only sub-views produced by [`split_at`](Self::split_at) or
    /// [`advance`](Self::advance) can be empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Cash-flow times.
    #[must_use]
    pub fn times(&self) -> &'a [f64] {
        self.times
    }

    /// Cash-flow amounts.
    #[must_use]
    pub fn flows(&self) -> &'a [f64] {
        self.flows
    }

    /// Time of flow `i`.
    #[must_use]
    pub fn time(&self, i: usize) -> Option<f64> {
        self.times.get(i).copied()
    }

    /// Amount of flow `i`.
    #[must_use]
    pub fn flow(&self, i: usize) -> Option<f64> {
        self.flows.get(i).copied()
    }

    /// Time of the final cash flow.
    #[must_use]
    pub fn maturity(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// Iterator over `(time, amount)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + 'a {
        self.times.iter().copied().zip(self.flows.iter().copied())
    }

    /// Splits into flows at or before `t` and flows strictly after `t`.
    #[must_use]
    pub fn split_at(&self, t: f64) -> (Self, Self) {
        let i = self.times.partition_point(|&u| u <= t);
        let (t_covered, t_new) = self.times.split_at(i);
        let (c_covered, c_new) = self.flows.split_at(i);
        (Self::slice(t_covered, c_covered), Self::slice(t_new, c_new))
    }

    /// Flows on or after `t`.
    #[must_use]
    pub fn advance(&self, t: f64) -> Self {
        let i = self.times.partition_point(|&u| u < t);
        Self::slice(&self.times[i..], &self.flows[i..])
    }
}

/// Owned cash flows, as produced by a schedule generator.
///
/// Deserialization goes through [`CashFlows::new`], so a decoded schedule
/// satisfies the same invariants as a constructed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCashFlows")]
pub struct CashFlows {
    times: Vec<f64>,
    flows: Vec<f64>,
}

#[derive(Deserialize)]
struct RawCashFlows {
    times: Vec<f64>,
    flows: Vec<f64>,
}

impl TryFrom<RawCashFlows> for CashFlows {
    type Error = CurveError;

    fn try_from(raw: RawCashFlows) -> CurveResult<Self> {
        Self::new(raw.times, raw.flows)
    }
}

impl CashFlows {
    /// Creates owned cash flows, validated like [`Instrument::new`].
    pub fn new(times: Vec<f64>, flows: Vec<f64>) -> CurveResult<Self> {
        Instrument::new(&times, &flows)?;
        Ok(Self { times, flows })
    }

    /// Borrowed instrument view.
    #[must_use]
    pub fn as_instrument(&self) -> Instrument<'_> {
        Instrument::slice(&self.times, &self.flows)
    }

    /// Number of cash flows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false: construction rejects empty schedules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Cash-flow times.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Cash-flow amounts.
    #[must_use]
    pub fn flows(&self) -> &[f64] {
        &self.flows
    }

    /// Consumes the schedule, returning `(times, amounts)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.times, self.flows)
    }
}
