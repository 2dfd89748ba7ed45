//! Owned curve interchange format.
//!
//! A [`CurveSnapshot`] is the `(times, rates, extrapolation)` triple that
//! fully describes a piecewise-flat forward curve. It owns its arrays, so it
//! can outlive the [`YieldCurve`](crate::yield_curve::YieldCurve) it was taken
//! from and be stored as JSON.

use serde::{Deserialize, Serialize};

use crate::curve::ForwardCurve;
use crate::error::CurveResult;

/// Owned copy of a forward curve's knots.
///
/// # Example
///
/// ```rust
/// use stepwise_curves::curve::ForwardRateCurve;
/// use stepwise_curves::snapshot::CurveSnapshot;
///
/// let json = r#"{"times":[1.0,2.0],"rates":[0.03,0.04],"extrapolation":0.04}"#;
/// let snapshot = CurveSnapshot::from_json(json).unwrap();
/// let curve = snapshot.as_forward_curve().unwrap();
///
/// assert_eq!(curve.value(1.5), 0.04);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSnapshot {
    /// Knot times, strictly increasing and positive.
    pub times: Vec<f64>,
    /// Forward rate of each segment.
    pub rates: Vec<f64>,
    /// Forward rate beyond the last knot.
    pub extrapolation: f64,
}

impl CurveSnapshot {
    /// Creates a snapshot, checking the curve invariants.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`ForwardCurve::new`].
    pub fn new(times: Vec<f64>, rates: Vec<f64>, extrapolation: f64) -> CurveResult<Self> {
        ForwardCurve::new(&times, &rates, extrapolation)?;
        Ok(Self {
            times,
            rates,
            extrapolation,
        })
    }

    /// Borrowed curve view over the snapshot.
    ///
    /// The fields are public and may have been deserialized, so the knots
    /// are validated again.
    pub fn as_forward_curve(&self) -> CurveResult<ForwardCurve<'_>> {
        ForwardCurve::new(&self.times, &self.rates, self.extrapolation)
    }

    /// Serializes to JSON.
    pub fn to_json(&self) -> CurveResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserializes from JSON and validates the knots.
    pub fn from_json(json: &str) -> CurveResult<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.as_forward_curve()?;
        Ok(snapshot)
    }
}

impl From<&ForwardCurve<'_>> for CurveSnapshot {
    fn from(curve: &ForwardCurve<'_>) -> Self {
        Self {
            times: curve.times().to_vec(),
            rates: curve.rates().to_vec(),
            extrapolation: curve.extrapolation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::ForwardRateCurve;
    use crate::error::CurveError;

    #[test]
    fn test_json_restores_identical_curve() {
        let times = [0.25, 1.0, 5.0];
        let rates = [0.031, 0.0345, 0.041];
        let curve = ForwardCurve::new(&times, &rates, 0.043).unwrap();

        let json = CurveSnapshot::from(&curve).to_json().unwrap();
        let restored = CurveSnapshot::from_json(&json).unwrap();
        let view = restored.as_forward_curve().unwrap();

        assert_eq!(view, curve);
        for u in [0.0, 0.1, 0.25, 0.7, 3.0, 5.0, 8.0] {
            assert_eq!(view.discount(u), curve.discount(u));
        }
    }

    #[test]
    fn test_rejects_invalid_knots() {
        assert!(matches!(
            CurveSnapshot::new(vec![1.0, 0.5], vec![0.01, 0.02], 0.0),
            Err(CurveError::NonMonotonicTenors { .. })
        ));

        let json = r#"{"times":[1.0],"rates":[],"extrapolation":0.0}"#;
        assert!(matches!(
            CurveSnapshot::from_json(json),
            Err(CurveError::LengthMismatch { .. })
        ));

        assert!(matches!(
            CurveSnapshot::from_json("{"),
            Err(CurveError::Serialization { .. })
        ));
    }
}
