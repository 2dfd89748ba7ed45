//! # Stepwise Curves
//!
//! Piecewise-flat forward curves bootstrapped from market instruments.
//!
//! This crate provides:
//!
//! - **Curve**: [`ForwardCurve`], a left-continuous step function of the
//!   instantaneous forward rate, with exact integrals and discount factors
//! - **Valuation**: present value, credit-risky present value and duration of
//!   fixed cash flows; fixed and floating legs
//! - **Bootstrap**: closed forms for deposits and FRAs, Newton and secant
//!   solves for everything else
//! - **Yield Curve**: [`YieldCurve`], the accumulator that grows a curve one
//!   instrument at a time
//! - **Instruments**: cash-flow generators for deposits, FRAs and swaps
//!
//! ## Quick Start
//!
//! ```rust
//! use stepwise_curves::prelude::*;
//!
//! let f0: f64 = 0.04;
//! let e = f0.exp_m1();
//!
//! let mut curve = YieldCurve::new();
//! curve.add_cash_flows(&[0.0, 1.0], &[-1.0, 1.0 + e])?;
//! curve.add_cash_flows(&[0.0, 1.0, 2.0], &[-1.0, e, 1.0 + e])?;
//!
//! let f = curve.forward_curve();
//! assert!((f.value(1.5) - f0).abs() < 1e-12);
//! assert!((f.discount(2.0) - (-2.0 * f0).exp()).abs() < 1e-12);
//! # Ok::<(), CurveError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::float_cmp)]

pub mod bootstrap;
pub mod config;
pub mod curve;
pub mod error;
pub mod instrument;
pub mod instruments;
pub mod snapshot;
pub mod valuation;
pub mod yield_curve;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bootstrap::{
        bootstrap_deposit, bootstrap_fra, bootstrap_instrument, bootstrap_newton,
        bootstrap_secant, RepricingResidual,
    };
    pub use crate::config::{BootstrapConfig, ExtrapolationType, SolverKind};
    pub use crate::curve::{ForwardCurve, ForwardRateCurve};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::instrument::{CashFlows, Instrument};
    pub use crate::instruments::{
        CashDeposit, FixCashFlows, ForwardRateAgreement, Frequency, InterestRateSwap,
    };
    pub use crate::snapshot::CurveSnapshot;
    pub use crate::valuation::{
        duration, present_value, present_value_with_recovery, FixedLeg, FloatLeg,
    };
    pub use crate::yield_curve::YieldCurve;
}

pub use curve::{ForwardCurve, ForwardRateCurve};
pub use error::{CurveError, CurveResult};
pub use yield_curve::YieldCurve;
