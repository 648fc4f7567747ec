//! Account state and the program's address space.
//!
//! Three derived addresses make up the program's footprint:
//!
//! ```text
//! vault                      derive(["vault"])
//! per-wallet stake record    derive(["stake_info", wallet])
//! per-wallet escrow          derive(["token", wallet])
//! ```
//!
//! The seed strings are wire contract: every client that talks to this
//! program derives the same addresses from them, so they change never.

use serde::{Deserialize, Serialize};

use orbit_protocol::address::{derive_program_address, Address, DeriveError};

// ---------------------------------------------------------------------------
// Program identity
// ---------------------------------------------------------------------------

/// The staking program's address on the ledger.
pub const STAKING_PROGRAM_ID: Address = Address::new([
    0x0c, 0x6f, 0x72, 0x62, 0x69, 0x74, 0x2d, 0x73, 0x74, 0x61, 0x6b, 0x69, 0x6e, 0x67, 0x2d,
    0x70, 0x72, 0x6f, 0x67, 0x72, 0x61, 0x6d, 0x2d, 0x76, 0x31, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x9d,
]);

/// Seed for the singleton vault account.
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed prefix for per-wallet stake records.
pub const STAKE_RECORD_SEED: &[u8] = b"stake_info";

/// Seed prefix for per-wallet escrow token accounts.
pub const ESCROW_SEED: &[u8] = b"token";

/// The vault's derived address and bump.
pub fn vault_address() -> Result<(Address, u8), DeriveError> {
    derive_program_address(&[VAULT_SEED], &STAKING_PROGRAM_ID)
}

/// The stake record address for `wallet`.
pub fn stake_record_address(wallet: &Address) -> Result<(Address, u8), DeriveError> {
    derive_program_address(&[STAKE_RECORD_SEED, wallet.as_bytes()], &STAKING_PROGRAM_ID)
}

/// The escrow token-account address for `wallet`.
pub fn escrow_address(wallet: &Address) -> Result<(Address, u8), DeriveError> {
    derive_program_address(&[ESCROW_SEED, wallet.as_bytes()], &STAKING_PROGRAM_ID)
}

// ---------------------------------------------------------------------------
// StakeRecord
// ---------------------------------------------------------------------------

/// Per-wallet staking state.
///
/// Created lazily on the wallet's first stake and kept forever after,
/// possibly at zero. The stored `bump` lets the program re-verify the
/// record's own address without rerunning the derivation search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRecord {
    /// The wallet this record belongs to.
    pub owner: Address,
    /// Currently staked amount in the mint's smallest unit.
    pub amount_staked: u64,
    /// Derivation nonce of this record's address.
    pub bump: u8,
}

impl StakeRecord {
    /// A fresh record for `owner` with nothing staked yet.
    pub fn new(owner: Address, bump: u8) -> Self {
        Self {
            owner,
            amount_staked: 0,
            bump,
        }
    }

    /// Whether the wallet currently has stake in custody.
    pub fn is_active(&self) -> bool {
        self.amount_staked > 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_protocol::address::lookup_program_address;
    use orbit_protocol::crypto::keys::OrbitKeypair;

    fn wallet() -> Address {
        Address::from_public_key(&OrbitKeypair::generate().public_key())
    }

    #[test]
    fn the_three_addresses_are_distinct() {
        let w = wallet();
        let (vault, _) = vault_address().unwrap();
        let (record, _) = stake_record_address(&w).unwrap();
        let (escrow, _) = escrow_address(&w).unwrap();
        assert_ne!(vault, record);
        assert_ne!(vault, escrow);
        assert_ne!(record, escrow);
    }

    #[test]
    fn wallets_get_disjoint_address_pairs() {
        let (a, b) = (wallet(), wallet());
        assert_ne!(
            stake_record_address(&a).unwrap().0,
            stake_record_address(&b).unwrap().0
        );
        assert_ne!(escrow_address(&a).unwrap().0, escrow_address(&b).unwrap().0);
    }

    #[test]
    fn stored_bump_reverifies_the_record_address() {
        let w = wallet();
        let (record_addr, bump) = stake_record_address(&w).unwrap();
        let record = StakeRecord::new(w, bump);
        let rechecked = lookup_program_address(
            &[STAKE_RECORD_SEED, w.as_bytes()],
            record.bump,
            &STAKING_PROGRAM_ID,
        )
        .unwrap();
        assert_eq!(record_addr, rechecked);
    }

    #[test]
    fn fresh_record_is_inactive() {
        let record = StakeRecord::new(wallet(), 254);
        assert!(!record.is_active());
        assert_eq!(record.amount_staked, 0);
    }

    #[test]
    fn record_bincode_roundtrip() {
        let record = StakeRecord {
            owner: wallet(),
            amount_staked: 42,
            bump: 253,
        };
        let bytes = bincode::serialize(&record).unwrap();
        let recovered: StakeRecord = bincode::deserialize(&bytes).unwrap();
        assert_eq!(record, recovered);
    }
}
