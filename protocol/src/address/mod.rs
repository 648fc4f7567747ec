//! # Addresses
//!
//! Every account on the ledger is identified by 32 opaque bytes. For a
//! wallet those bytes are its Ed25519 public key; for a program-owned
//! account they are a digest that provably is *not* a public key (see
//! [`derive`]). Either way, user-facing rendering is base58.
//!
//! The [`Address`] type stays deliberately dumb: no knowledge of what the
//! account holds, just identity, ordering, and encoding. Account semantics
//! live with the account data, not the key that names it.

pub mod derive;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::ADDRESS_LENGTH;
use crate::crypto::keys::OrbitPublicKey;

pub use derive::{derive_program_address, lookup_program_address, DeriveError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from address decoding.
#[derive(Debug, Error)]
pub enum AddressError {
    /// The base58 string failed to decode.
    #[error("address is not valid base58")]
    InvalidBase58,

    /// Decoded bytes were not exactly 32 bytes long.
    #[error("address must decode to {ADDRESS_LENGTH} bytes, got {0}")]
    InvalidLength(usize),
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 32-byte ledger account identifier.
///
/// `Ord` is derived so addresses can key ordered maps: anything that
/// iterates accounts into signed or hashed bytes must do so in a
/// deterministic order, and sorting by address is that order.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Wraps raw bytes as an address.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// The address of a wallet is its public key, byte for byte.
    pub fn from_public_key(key: &OrbitPublicKey) -> Self {
        Self(*key.as_bytes())
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Base58 rendering.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }

    /// Parses a base58-encoded address.
    pub fn from_base58(s: &str) -> Result<Self, AddressError> {
        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|_| AddressError::InvalidBase58)?;
        let bytes: [u8; ADDRESS_LENGTH] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| AddressError::InvalidLength(decoded.len()))?;
        Ok(Self(bytes))
    }
}

impl From<&OrbitPublicKey> for Address {
    fn from(key: &OrbitPublicKey) -> Self {
        Self::from_public_key(key)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b58 = self.to_base58();
        write!(f, "Address({}..)", &b58[..b58.len().min(8)])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::OrbitKeypair;

    #[test]
    fn wallet_address_is_its_public_key() {
        let kp = OrbitKeypair::generate();
        let addr = Address::from_public_key(&kp.public_key());
        assert_eq!(addr.as_bytes(), kp.public_key().as_bytes());
    }

    #[test]
    fn base58_roundtrip() {
        let addr = Address::new([42u8; 32]);
        let parsed: Address = addr.to_base58().parse().unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn rejects_garbage_base58() {
        assert!(matches!(
            Address::from_base58("not-base58-0OIl"),
            Err(AddressError::InvalidBase58)
        ));
    }

    #[test]
    fn rejects_wrong_length() {
        // Valid base58, but only 4 bytes of payload.
        let short = bs58::encode([1u8, 2, 3, 4]).into_string();
        assert!(matches!(
            Address::from_base58(&short),
            Err(AddressError::InvalidLength(4))
        ));
    }

    #[test]
    fn ordering_is_byte_ordering() {
        let lo = Address::new([0u8; 32]);
        let hi = Address::new([255u8; 32]);
        assert!(lo < hi);
    }
}
