//! Feature-gated curve families and the [`CurveBox`] dispatch enum.
//!
//! Each family is behind its own Cargo feature flag. [`CurveBox`]
//! provides static dispatch across all enabled families, so the engine
//! carries no `dyn` indirection on its hot path.
//!
//! | Feature | Curve | Shape |
//! |---------|-------|-------|
//! | `logarithmic` | [`LogarithmicCurve`] | squared log2 delta |
//! | `linear` | [`LinearCurve`] | constant ratio with growth scalars |

#[cfg(feature = "linear")]
mod linear;
#[cfg(feature = "logarithmic")]
mod logarithmic;

mod curve_box;

pub use curve_box::CurveBox;
#[cfg(feature = "linear")]
pub use linear::LinearCurve;
#[cfg(feature = "logarithmic")]
pub use logarithmic::LogarithmicCurve;
