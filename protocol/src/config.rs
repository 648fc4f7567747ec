//! # Protocol Configuration & Constants
//!
//! Every magic number in Orbit lives here. A constant hardcoded anywhere
//! else in the workspace is a bug report waiting to be filed.
//!
//! Most of these values are contractual: they appear inside signed bytes or
//! derived addresses, so changing them invalidates every transaction and
//! custody address built under the old values. Treat edits accordingly.

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519 secret key length in bytes. The 32-byte seed *is* the key.
pub const SECRET_KEY_LENGTH: usize = 32;

/// Ed25519 public key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Address length in bytes. A wallet address is its Ed25519 public key;
/// a program-owned address is a 32-byte digest forced off the curve.
pub const ADDRESS_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Program-Address Derivation
// ---------------------------------------------------------------------------

/// Domain-separation tag appended to every program-address preimage.
///
/// Keeps derived addresses out of any other SHA-256 construction's image:
/// a collision would require the other construction to embed this exact
/// suffix, which no signing path does.
pub const DERIVE_DOMAIN_TAG: &[u8] = b"OrbitProgramAddress";

/// Bump search starts here and walks downward to zero.
///
/// Descending order matches the convention callers expect: the canonical
/// bump for a seed tuple is the *highest* value producing an off-curve
/// address.
pub const MAX_BUMP: u8 = u8::MAX;

/// Hard cap on the byte length of a single derivation seed.
pub const MAX_SEED_LENGTH: usize = 32;

/// Hard cap on the number of seeds in one derivation tuple (the bump is
/// appended on top of these and does not count against the limit).
pub const MAX_SEEDS: usize = 16;

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// Message format version, first field of the signable bytes.
pub const MESSAGE_VERSION: u16 = 1;

/// Upper bound on instructions per message. Generous; the deepest chain
/// the protocol itself produces (create account, initialize mint, write
/// metadata) is three.
pub const MAX_INSTRUCTIONS_PER_MESSAGE: usize = 64;

/// How many ledger heights a freshness token remains valid after the
/// height it was minted at. Past this window the ledger refuses the
/// transaction and the caller must rebuild against fresh state.
pub const FRESHNESS_WINDOW_HEIGHTS: u64 = 150;

// ---------------------------------------------------------------------------
// Rent Model
// ---------------------------------------------------------------------------

/// Flat component of the rent-exempt minimum, covering per-account
/// bookkeeping overhead on the ledger side.
pub const RENT_EXEMPT_BASE: u64 = 890_880;

/// Per-byte component of the rent-exempt minimum.
pub const RENT_PER_BYTE: u64 = 6_960;

/// Rent-exempt minimum balance for an account of `size_bytes` of state.
///
/// The ledger's own answer (via `get_minimum_rent_exempt_balance`) is
/// authoritative; this mirror exists so pure code and tests can size
/// deposits without a client handle.
pub const fn rent_exempt_minimum(size_bytes: usize) -> u64 {
    RENT_EXEMPT_BASE + (size_bytes as u64) * RENT_PER_BYTE
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Default decimal scale for newly registered mints. Nine decimals keeps
/// one whole token at `1_000_000_000` smallest units.
pub const DEFAULT_MINT_DECIMALS: u8 = 9;
