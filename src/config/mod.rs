//! Declarative engine blueprints and runtime-tunable parameters.

mod sale_config;

pub use sale_config::{
    CurveKind, MutableParams, ParameterChange, RateLimit, SaleConfig, TradeBounds,
    HARD_IMPACT_CEILING,
};
