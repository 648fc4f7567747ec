//! # Cryptographic Primitives
//!
//! Keypairs and hashing for the Orbit protocol. Two modules, two concerns:
//!
//! ```text
//! keys.rs — Ed25519 keypairs: generation, signing, verification
//! hash.rs — SHA-256 (address derivation) and BLAKE3 (message ids)
//! ```
//!
//! Nothing in this module invents cryptography. Keys are ed25519-dalek,
//! hashes are the sha2 and blake3 crates, randomness is the OS RNG. The
//! only local decisions are which primitive is used where, and those are
//! documented at the call sites.

pub mod hash;
pub mod keys;

pub use hash::{blake3_hash, sha256_array};
pub use keys::{KeyError, OrbitKeypair, OrbitPublicKey, OrbitSignature};
