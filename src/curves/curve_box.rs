//! Static dispatch across the enabled curve families.

use crate::config::CurveKind;
use crate::domain::{Amount, ReserveState};
use crate::error::Result;
use crate::traits::{CurveContext, PricingCurve};

#[cfg(feature = "linear")]
use super::linear::LinearCurve;
#[cfg(feature = "logarithmic")]
use super::logarithmic::LogarithmicCurve;

/// Enum wrapper over all enabled curve families.
///
/// Provides zero-cost static dispatch without `dyn` trait objects. The
/// variant is chosen once, from the [`CurveKind`] in the engine's
/// configuration, and never changes for the lifetime of the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveBox {
    /// Squared-log2 pricing.
    #[cfg(feature = "logarithmic")]
    Logarithmic(LogarithmicCurve),
    /// Constant-ratio pricing with growth scalars.
    #[cfg(feature = "linear")]
    Linear(LinearCurve),
}

impl CurveBox {
    /// Instantiates the curve for the configured kind.
    #[must_use]
    pub const fn for_kind(kind: CurveKind) -> Self {
        match kind {
            #[cfg(feature = "logarithmic")]
            CurveKind::Logarithmic => Self::Logarithmic(LogarithmicCurve),
            #[cfg(feature = "linear")]
            CurveKind::Linear => Self::Linear(LinearCurve),
        }
    }
}

impl PricingCurve for CurveBox {
    fn purchase_return(
        &self,
        reserves: &ReserveState,
        amount_in: Amount,
        ctx: &CurveContext,
    ) -> Result<Amount> {
        match self {
            #[cfg(feature = "logarithmic")]
            Self::Logarithmic(curve) => curve.purchase_return(reserves, amount_in, ctx),
            #[cfg(feature = "linear")]
            Self::Linear(curve) => curve.purchase_return(reserves, amount_in, ctx),
        }
    }

    fn sale_return(
        &self,
        reserves: &ReserveState,
        token_amount: Amount,
        ctx: &CurveContext,
    ) -> Result<Amount> {
        match self {
            #[cfg(feature = "logarithmic")]
            Self::Logarithmic(curve) => curve.sale_return(reserves, token_amount, ctx),
            #[cfg(feature = "linear")]
            Self::Linear(curve) => curve.sale_return(reserves, token_amount, ctx),
        }
    }

    fn spot_price_wad(&self, reserves: &ReserveState) -> Result<Amount> {
        match self {
            #[cfg(feature = "logarithmic")]
            Self::Logarithmic(curve) => curve.spot_price_wad(reserves),
            #[cfg(feature = "linear")]
            Self::Linear(curve) => curve.spot_price_wad(reserves),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Amount;

    fn seeded() -> ReserveState {
        let Ok(r) = ReserveState::new(Amount::new(15_500_000_000), Amount::new(100_000)) else {
            panic!("valid reserves");
        };
        r
    }

    #[cfg(feature = "linear")]
    #[test]
    fn dispatches_to_linear() {
        let curve = CurveBox::for_kind(CurveKind::Linear);
        let direct = LinearCurve.purchase_return(
            &seeded(),
            Amount::new(100),
            &CurveContext::neutral(),
        );
        let boxed = curve.purchase_return(&seeded(), Amount::new(100), &CurveContext::neutral());
        assert_eq!(direct, boxed);
    }

    #[cfg(feature = "logarithmic")]
    #[test]
    fn dispatches_to_logarithmic() {
        let curve = CurveBox::for_kind(CurveKind::Logarithmic);
        let direct = LogarithmicCurve.purchase_return(
            &seeded(),
            Amount::new(50_000),
            &CurveContext::neutral(),
        );
        let boxed =
            curve.purchase_return(&seeded(), Amount::new(50_000), &CurveContext::neutral());
        assert_eq!(direct, boxed);
    }
}
