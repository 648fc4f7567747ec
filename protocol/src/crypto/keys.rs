//! # Keypairs
//!
//! Ed25519 keypairs for Orbit wallets. A wallet *is* its keypair: the
//! public half doubles as the wallet's address, and the secret half is the
//! only thing that can authorize debits from accounts the wallet owns.
//!
//! Ed25519 because the signatures are deterministic (no per-signature
//! nonce to mismanage), compact (64 bytes), and fast to verify. Also
//! because the ledger's signer set is defined over this curve, which is
//! what makes the off-curve trick in [`crate::address::derive`] possible
//! at all.
//!
//! ## Handling rules
//!
//! - Secret key bytes cross an API boundary only through the explicit
//!   [`OrbitKeypair::secret_bytes`] call. The type deliberately does not
//!   implement `Serialize`; accidental key export should not compile.
//! - `Debug` output never contains secret material.
//! - Key generation uses the OS RNG and nothing else.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::{SECRET_KEY_LENGTH, SIGNATURE_LENGTH};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from key construction and decoding.
///
/// Deliberately terse: error messages about key material should say *that*
/// something failed, not leak hints about *what* the bytes were.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Secret key bytes were the wrong length or failed to decode.
    #[error("invalid secret key")]
    InvalidSecretKey,

    /// Public key bytes do not describe a valid Ed25519 point.
    #[error("invalid public key")]
    InvalidPublicKey,

    /// Signature bytes were not exactly 64 bytes or failed to decode.
    #[error("invalid signature encoding")]
    InvalidSignature,
}

// ---------------------------------------------------------------------------
// OrbitKeypair
// ---------------------------------------------------------------------------

/// An Ed25519 keypair identifying one Orbit wallet.
///
/// Every transaction that debits a wallet-owned account must carry this
/// keypair's signature over the exact compiled message bytes.
pub struct OrbitKeypair {
    signing_key: SigningKey,
}

impl OrbitKeypair {
    /// Generates a fresh keypair from the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Builds a keypair deterministically from a 32-byte seed.
    ///
    /// In Ed25519 the seed is the secret key. Callers feeding this from a
    /// KDF or test fixture own the entropy question.
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Reconstructs a keypair from a byte slice of secret key material.
    pub fn try_from_secret_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let seed: [u8; SECRET_KEY_LENGTH] =
            bytes.try_into().map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_seed(&seed))
    }

    /// The public half of this keypair.
    pub fn public_key(&self) -> OrbitPublicKey {
        OrbitPublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Signs a message, producing a deterministic 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> OrbitSignature {
        let sig = self.signing_key.sign(message);
        OrbitSignature {
            bytes: sig.to_bytes(),
        }
    }

    /// Exports the raw secret key bytes.
    ///
    /// The one sanctioned exit for secret material. Call sites for this
    /// method get extra scrutiny in review; there should be very few.
    pub fn secret_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }
}

impl Clone for OrbitKeypair {
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
        }
    }
}

impl fmt::Debug for OrbitKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Public half only. Secret bytes never reach a formatter.
        write!(f, "OrbitKeypair({})", self.public_key())
    }
}

impl PartialEq for OrbitKeypair {
    /// Identity comparison: two keypairs are the same wallet if their
    /// public keys match. Secret bytes are never compared.
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for OrbitKeypair {}

// ---------------------------------------------------------------------------
// OrbitPublicKey
// ---------------------------------------------------------------------------

/// The shareable half of a wallet identity.
///
/// Rendered base58 everywhere a human sees it, which also makes it the
/// wallet's address string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrbitPublicKey {
    bytes: [u8; 32],
}

impl OrbitPublicKey {
    /// Wraps raw public key bytes without a curve check.
    ///
    /// For bytes of unverified provenance use [`try_from_slice`](Self::try_from_slice),
    /// which rejects encodings that are not valid curve points.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Validates and wraps a byte slice as a public key.
    ///
    /// Checks both the length and that the bytes decompress to a valid
    /// Ed25519 point, rejecting degenerate encodings up front instead of
    /// letting them fail obscurely inside verification later.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; 32] = slice.try_into().map_err(|_| KeyError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Verifies a signature over `message` against this key.
    ///
    /// Boolean result: callers on the validation path want yes/no, and a
    /// malformed signature is just another "no".
    pub fn verify(&self, message: &[u8], signature: &OrbitSignature) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let sig = DalekSignature::from_bytes(&signature.bytes);
        key.verify(message, &sig).is_ok()
    }

    /// Base58 rendering, identical to the wallet's address string.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.bytes).into_string()
    }

    /// Parses a base58-encoded public key.
    pub fn from_base58(s: &str) -> Result<Self, KeyError> {
        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|_| KeyError::InvalidPublicKey)?;
        Self::try_from_slice(&decoded)
    }
}

impl fmt::Display for OrbitPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for OrbitPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrbitPublicKey({})", hex::encode(&self.bytes[..8]))
    }
}

// ---------------------------------------------------------------------------
// OrbitSignature
// ---------------------------------------------------------------------------

/// A 64-byte Ed25519 signature.
///
/// Fixed-size internally; anything that is not exactly 64 bytes is refused
/// at the decoding boundary rather than carried around as a time bomb.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct OrbitSignature {
    bytes: [u8; SIGNATURE_LENGTH],
}

impl OrbitSignature {
    /// Wraps a raw 64-byte signature.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Decodes a signature from a byte slice, enforcing the length.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; SIGNATURE_LENGTH] =
            slice.try_into().map_err(|_| KeyError::InvalidSignature)?;
        Ok(Self { bytes })
    }

    /// Raw signature bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.bytes
    }

    /// Base58 rendering. This is the form users paste into explorers, so
    /// it doubles as the transaction identifier encoding.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.bytes).into_string()
    }

    /// Parses a base58-encoded signature.
    pub fn from_base58(s: &str) -> Result<Self, KeyError> {
        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|_| KeyError::InvalidSignature)?;
        Self::try_from_slice(&decoded)
    }
}

impl Serialize for OrbitSignature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for OrbitSignature {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base58(&s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for OrbitSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for OrbitSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b58 = self.to_base58();
        write!(f, "OrbitSignature({}..)", &b58[..b58.len().min(8)])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_verify_roundtrip() {
        let kp = OrbitKeypair::generate();
        let msg = b"stake 1 unit";
        let sig = kp.sign(msg);
        assert!(kp.public_key().verify(msg, &sig));
    }

    #[test]
    fn tampered_message_fails_verification() {
        let kp = OrbitKeypair::generate();
        let sig = kp.sign(b"stake 1 unit");
        assert!(!kp.public_key().verify(b"stake 2 units", &sig));
    }

    #[test]
    fn foreign_key_fails_verification() {
        let kp = OrbitKeypair::generate();
        let other = OrbitKeypair::generate();
        let sig = kp.sign(b"message");
        assert!(!other.public_key().verify(b"message", &sig));
    }

    #[test]
    fn signatures_are_deterministic() {
        let kp = OrbitKeypair::generate();
        assert_eq!(
            kp.sign(b"same bytes").as_bytes(),
            kp.sign(b"same bytes").as_bytes()
        );
    }

    #[test]
    fn seed_derivation_is_deterministic() {
        let seed = [7u8; 32];
        assert_eq!(
            OrbitKeypair::from_seed(&seed).public_key(),
            OrbitKeypair::from_seed(&seed).public_key()
        );
    }

    #[test]
    fn secret_bytes_roundtrip() {
        let kp = OrbitKeypair::generate();
        let restored = OrbitKeypair::try_from_secret_bytes(&kp.secret_bytes()).unwrap();
        assert_eq!(kp, restored);
    }

    #[test]
    fn secret_bytes_wrong_length_rejected() {
        assert!(OrbitKeypair::try_from_secret_bytes(&[0u8; 16]).is_err());
    }

    #[test]
    fn public_key_base58_roundtrip() {
        let pk = OrbitKeypair::generate().public_key();
        let restored = OrbitPublicKey::from_base58(&pk.to_base58()).unwrap();
        assert_eq!(pk, restored);
    }

    #[test]
    fn public_key_rejects_short_slice() {
        assert!(OrbitPublicKey::try_from_slice(&[1u8; 31]).is_err());
    }

    #[test]
    fn signature_base58_roundtrip() {
        let sig = OrbitKeypair::generate().sign(b"roundtrip");
        let restored = OrbitSignature::from_base58(&sig.to_base58()).unwrap();
        assert_eq!(sig, restored);
    }

    #[test]
    fn signature_rejects_wrong_length() {
        assert!(OrbitSignature::try_from_slice(&[0u8; 63]).is_err());
        assert!(OrbitSignature::try_from_slice(&[0u8; 65]).is_err());
    }

    #[test]
    fn debug_never_prints_secret_material() {
        let kp = OrbitKeypair::generate();
        let secret_hex = hex::encode(kp.secret_bytes());
        let debug = format!("{:?}", kp);
        assert!(!debug.contains(&secret_hex));
        assert!(debug.starts_with("OrbitKeypair("));
    }

    #[test]
    fn generated_keypairs_are_distinct() {
        assert_ne!(
            OrbitKeypair::generate().public_key(),
            OrbitKeypair::generate().public_key()
        );
    }
}
