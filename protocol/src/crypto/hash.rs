//! # Hashing Utilities
//!
//! Orbit uses exactly two hash functions, each with a fixed job:
//!
//! - **SHA-256** — program-address derivation. Derived addresses must be
//!   comparable across every client implementation that talks to the same
//!   ledger, and SHA-256 is the construction the ledger's derivation
//!   contract specifies.
//! - **BLAKE3** — protocol-native identifiers: message ids and freshness
//!   token values. Faster than SHA-256 on every platform we run on, and
//!   there is no interoperability constraint forcing the slower choice.
//!
//! A third hash function requires a design discussion, not a pull request.

use sha2::{Digest, Sha256};

/// SHA-256 digest as a fixed 32-byte array.
///
/// Used on the program-address derivation path, where the digest feeds a
/// curve-point check and fixed-size arrays propagate naturally.
pub fn sha256_array(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// BLAKE3 digest as a fixed 32-byte array.
///
/// The workhorse for Orbit-internal identifiers. Single-threaded
/// performance is what matters at our input sizes (messages are well under
/// a kilobyte), and it comfortably beats SHA-256 there.
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}
