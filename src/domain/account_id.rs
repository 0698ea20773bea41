//! Opaque participant and collaborator identifier.

use core::fmt;

/// A 32-byte opaque identifier for any party the engine deals with:
/// trade callers, the engine's own ledger account, the liquidity venue,
/// and the pool the venue returns after migration.
///
/// The engine never interprets the bytes; equality and ordering are all it
/// needs to key its account table.
///
/// # Examples
///
/// ```
/// use ember_curve::domain::AccountId;
///
/// let alice = AccountId::from_bytes([1u8; 32]);
/// let bob = AccountId::from_bytes([2u8; 32]);
/// assert_ne!(alice, bob);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccountId([u8; 32]);

impl AccountId {
    /// Creates an `AccountId` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for AccountId {
    /// Formats as `0x` followed by the first four bytes in hex — enough to
    /// tell accounts apart in logs without flooding them.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:02x}{:02x}{:02x}{:02x}…",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}
