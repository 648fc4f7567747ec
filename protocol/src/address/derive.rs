//! # Program-Address Derivation
//!
//! Programs own custody accounts, and a program cannot hold a private key.
//! The solution is an address that *provably has no key*: derive 32 bytes
//! from the seed tuple and require that they fail Ed25519 point
//! decompression. A signature can only exist for a valid curve point, so an
//! off-curve address can never be authorized by a signer, only by the
//! program logic the ledger runs on its behalf.
//!
//! Derivation is a search. The candidate for bump `b` is
//!
//! ```text
//! SHA-256( seed_0 ‖ … ‖ seed_n ‖ [b] ‖ program_id ‖ DERIVE_DOMAIN_TAG )
//! ```
//!
//! walking `b` from 255 downward and returning the first off-curve hit.
//! Roughly half of all digests decompress, so the search practically always
//! succeeds within a few probes. But "practically always" is not "always",
//! and exhaustion is a checked error, not an assumption.

use curve25519_dalek::edwards::CompressedEdwardsY;
use thiserror::Error;

use super::Address;
use crate::config::{DERIVE_DOMAIN_TAG, MAX_BUMP, MAX_SEEDS, MAX_SEED_LENGTH};
use crate::crypto::hash::sha256_array;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from program-address derivation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeriveError {
    /// All 256 bump values produced on-curve candidates.
    ///
    /// Statistically this needs ~2^-256 luck, but the search is finite and
    /// the failure case therefore exists.
    #[error("no off-curve address found for the given seeds")]
    AddressDerivationFailure,

    /// A single seed exceeded [`MAX_SEED_LENGTH`] bytes.
    #[error("seed {index} is {len} bytes, maximum is {MAX_SEED_LENGTH}")]
    SeedTooLong { index: usize, len: usize },

    /// The seed tuple exceeded [`MAX_SEEDS`] entries.
    #[error("{0} seeds supplied, maximum is {MAX_SEEDS}")]
    TooManySeeds(usize),
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Derives the canonical program-owned address for a seed tuple.
///
/// Deterministic: identical `(seeds, program_id)` always yields the
/// identical `(address, bump)` pair, on every client, forever. The
/// returned bump is the highest value whose candidate digest is off-curve.
pub fn derive_program_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<(Address, u8), DeriveError> {
    validate_seeds(seeds)?;

    for bump in (0..=MAX_BUMP).rev() {
        let candidate = candidate_bytes(seeds, bump, program_id);
        if is_off_curve(&candidate) {
            return Ok((Address::new(candidate), bump));
        }
    }

    Err(DeriveError::AddressDerivationFailure)
}

/// Recomputes the address for a seed tuple and a *known* bump.
///
/// Programs store the bump alongside their state so later calls can verify
/// an address without rerunning the search. A stored bump whose candidate
/// lands on the curve was never produced by [`derive_program_address`] and
/// is rejected.
pub fn lookup_program_address(
    seeds: &[&[u8]],
    bump: u8,
    program_id: &Address,
) -> Result<Address, DeriveError> {
    validate_seeds(seeds)?;

    let candidate = candidate_bytes(seeds, bump, program_id);
    if is_off_curve(&candidate) {
        Ok(Address::new(candidate))
    } else {
        Err(DeriveError::AddressDerivationFailure)
    }
}

fn validate_seeds(seeds: &[&[u8]]) -> Result<(), DeriveError> {
    if seeds.len() > MAX_SEEDS {
        return Err(DeriveError::TooManySeeds(seeds.len()));
    }
    for (index, seed) in seeds.iter().enumerate() {
        if seed.len() > MAX_SEED_LENGTH {
            return Err(DeriveError::SeedTooLong {
                index,
                len: seed.len(),
            });
        }
    }
    Ok(())
}

fn candidate_bytes(seeds: &[&[u8]], bump: u8, program_id: &Address) -> [u8; 32] {
    let mut preimage =
        Vec::with_capacity(seeds.iter().map(|s| s.len()).sum::<usize>() + 33 + DERIVE_DOMAIN_TAG.len());
    for seed in seeds {
        preimage.extend_from_slice(seed);
    }
    preimage.push(bump);
    preimage.extend_from_slice(program_id.as_bytes());
    preimage.extend_from_slice(DERIVE_DOMAIN_TAG);
    sha256_array(&preimage)
}

/// `true` if the bytes do not decompress to an Ed25519 point, i.e. no
/// keypair can ever exist for this address.
fn is_off_curve(bytes: &[u8; 32]) -> bool {
    CompressedEdwardsY(*bytes).decompress().is_none()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
