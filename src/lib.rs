//! # Ember Curve
//!
//! Bonding-curve token-sale engine: price and issue a fungible asset
//! against native-currency deposits through an algorithmic reserve curve,
//! then migrate the remaining supply and collected funds — once and
//! irreversibly — into an external liquidity venue.
//!
//! The crate is a library. The fungible ledger, outbound currency
//! custody, and the AMM venue are injected through narrow traits; the
//! engine owns only its own state: virtual reserves, per-account records,
//! growth metrics, and the migration flag.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std` | yes | `std::error::Error` impl |
//! | `all-curves` | yes | Enables both curve families |
//! | `logarithmic` | no | Squared-log2 curve family |
//! | `linear` | no | Constant-ratio curve family with growth scalars |
//! | `serde` | no | Serde derives on config, metrics and events |
//!
//! # Quick Start
//!
//! ```rust
//! use ember_curve::config::{CurveKind, RateLimit, SaleConfig, TradeBounds};
//! use ember_curve::domain::{AccountId, Amount, Timestamp};
//! use ember_curve::engine::CurveEngine;
//! use ember_curve::traits::{
//!     LedgerError, LiquidityRequest, LiquidityVenue, TokenLedger,
//!     TransferError, Treasury, VenueError, VenueReceipt,
//! };
//!
//! // Host-side collaborators (a real integration wires these to its
//! // ledger, custody and AMM).
//! #[derive(Default)]
//! struct Ledger(std::collections::BTreeMap<AccountId, u128>);
//! impl TokenLedger for Ledger {
//!     fn mint(&mut self, to: AccountId, amount: Amount) -> Result<(), LedgerError> {
//!         *self.0.entry(to).or_default() += amount.get();
//!         Ok(())
//!     }
//!     fn burn(&mut self, from: AccountId, amount: Amount) -> Result<(), LedgerError> {
//!         let b = self.0.entry(from).or_default();
//!         *b = b.checked_sub(amount.get()).ok_or(LedgerError::new("short"))?;
//!         Ok(())
//!     }
//!     fn balance_of(&self, a: AccountId) -> Amount {
//!         Amount::new(self.0.get(&a).copied().unwrap_or(0))
//!     }
//!     fn transfer(&mut self, f: AccountId, t: AccountId, a: Amount) -> Result<(), LedgerError> {
//!         self.burn(f, a)?;
//!         self.mint(t, a)
//!     }
//!     fn approve(&mut self, _: AccountId, _: AccountId, _: Amount) -> Result<(), LedgerError> {
//!         Ok(())
//!     }
//! }
//! struct Custody;
//! impl Treasury for Custody {
//!     fn pay(&mut self, _: AccountId, _: Amount) -> Result<(), TransferError> {
//!         Ok(())
//!     }
//! }
//! struct Amm;
//! impl LiquidityVenue for Amm {
//!     fn add_liquidity(&mut self, r: &LiquidityRequest) -> Result<VenueReceipt, VenueError> {
//!         Ok(VenueReceipt::new(
//!             AccountId::from_bytes([9; 32]),
//!             r.currency_amount(),
//!             r.token_amount(),
//!         ))
//!     }
//! }
//!
//! // 1. Describe the sale.
//! let config = SaleConfig::new(
//!     CurveKind::Linear,
//!     Amount::new(1_000_000_000_000),          // supply cap
//!     Amount::new(15_500_000_000),             // initial token reserve
//!     Amount::new(100_000),                    // initial currency reserve
//!     Amount::new(900_000_000_000),            // migration threshold
//!     Amount::new(100),                        // migration fee
//!     TradeBounds::new(Amount::new(10), Amount::new(10_000)).expect("bounds"),
//!     10,                                      // price impact limit, percent
//!     RateLimit::new(3_600, 5).expect("rate limit"),
//!     Some(500),                               // active-user cap
//!     CurveKind::Linear.default_buffer(),
//! )
//! .expect("valid config");
//!
//! // 2. Construct the engine; the admin capability comes back with it.
//! let (mut engine, _admin) = CurveEngine::new(
//!     config,
//!     Ledger::default(),
//!     Custody,
//!     Amm,
//!     AccountId::from_bytes([0xee; 32]),
//!     AccountId::from_bytes([0xef; 32]),
//! )
//! .expect("engine");
//!
//! // 3. Trade.
//! let alice = AccountId::from_bytes([1; 32]);
//! let receipt = engine
//!     .buy(alice, Amount::new(100), Timestamp::new(1_000))
//!     .expect("buy");
//! assert!(receipt.amount_out().get() > 0);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │    Host      │  deposits currency, drains events
//! └──────┬──────┘
//!        │ buy / sell / withdraw
//!        ▼
//! ┌─────────────┐
//! │   Engine     │  guard pipeline → curve quote → commit → migrate?
//! └──────┬──────┘
//!        │ CurveBox (enum dispatch)        │ injected traits
//!        ▼                                 ▼
//! ┌─────────────┐                   ┌─────────────┐
//! │   Curves     │ Logarithmic,     │ Collaborators│ TokenLedger,
//! │              │ Linear           │              │ Treasury, Venue
//! └─────────────┘                   └─────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`ReserveState`](domain::ReserveState), [`Timestamp`](domain::Timestamp), … |
//! | [`traits`] | Seams: [`PricingCurve`](traits::PricingCurve), [`TokenLedger`](traits::TokenLedger), [`Treasury`](traits::Treasury), [`LiquidityVenue`](traits::LiquidityVenue) |
//! | [`config`] | [`SaleConfig`](config::SaleConfig) blueprint, [`MutableParams`](config::MutableParams), audit log entries |
//! | [`curves`] | Feature-gated curve families and [`CurveBox`](curves::CurveBox) dispatch |
//! | [`engine`] | [`CurveEngine`](engine::CurveEngine): guards, withdrawal queue, migration, metrics, events |
//! | [`math`] | Checked arithmetic, fixed-point log2 |
//! | [`error`] | [`EngineError`](error::EngineError) unified error enum |
//! | [`prelude`] | Convenience re-exports |

#[cfg(not(any(feature = "logarithmic", feature = "linear")))]
compile_error!("enable at least one curve family: `logarithmic` or `linear`");

pub mod config;
pub mod curves;
pub mod domain;
pub mod engine;
pub mod error;
pub mod math;
pub mod prelude;
pub mod traits;
