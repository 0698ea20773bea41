//! Arithmetic utilities for curve calculations.
//!
//! This module provides [`CheckedArithmetic`] for overflow-safe operations
//! on domain types and the fixed-point [`log2_wad`] primitive the
//! logarithmic curve family is built on.

mod checked;
mod log2;

pub use checked::CheckedArithmetic;
pub use log2::{log2_wad, WAD};
