//! Vocabulary types for transaction construction.
//!
//! An [`Instruction`] names a program, the accounts it may touch (with
//! signer/writable flags), and an opaque data payload the program decodes.
//! A [`FreshnessToken`] anchors a message to recent ledger state so stale
//! bytes cannot be replayed indefinitely.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::Address;

// ---------------------------------------------------------------------------
// AccountMeta
// ---------------------------------------------------------------------------

/// One account an instruction touches, with its access flags.
///
/// `is_signer` makes the account part of the transaction's required-signer
/// set; `is_writable` declares intent to mutate, which the ledger uses to
/// schedule conflicting transactions against each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMeta {
    /// The account's address.
    pub address: Address,
    /// Whether this account must sign the enclosing transaction.
    pub is_signer: bool,
    /// Whether the instruction may mutate this account.
    pub is_writable: bool,
}

impl AccountMeta {
    /// A writable account entry.
    pub fn writable(address: Address, is_signer: bool) -> Self {
        Self {
            address,
            is_signer,
            is_writable: true,
        }
    }

    /// A read-only account entry.
    pub fn readonly(address: Address, is_signer: bool) -> Self {
        Self {
            address,
            is_signer,
            is_writable: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Instruction
// ---------------------------------------------------------------------------

/// A single program invocation inside a transaction.
///
/// The account list is positional: the target program documents which
/// account it expects at each index, and the builder preserves exactly the
/// order given here. `data` is whatever encoding the program specifies;
/// this layer never interprets it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// The program that executes this instruction.
    pub program_id: Address,
    /// Accounts the program may read or write, in the program's order.
    pub accounts: Vec<AccountMeta>,
    /// Opaque instruction payload, decoded by the program.
    pub data: Vec<u8>,
}

impl Instruction {
    /// Assembles an instruction.
    pub fn new(program_id: Address, accounts: Vec<AccountMeta>, data: Vec<u8>) -> Self {
        Self {
            program_id,
            accounts,
            data,
        }
    }
}

// ---------------------------------------------------------------------------
// FreshnessToken
// ---------------------------------------------------------------------------

/// A bounded-validity reference to recent ledger state.
///
/// Obtained from [`crate::client::LedgerClient::get_freshness_token`] and
/// compiled verbatim into the message. The ledger accepts the transaction
/// only while its current height is within
/// [`crate::config::FRESHNESS_WINDOW_HEIGHTS`] of `height`. The builder
/// tags, the ledger enforces.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessToken {
    /// Digest of the referenced ledger state.
    pub value: [u8; 32],
    /// Ledger height the token was minted at.
    pub height: u64,
}

impl FreshnessToken {
    /// Wraps a state digest and the height it was observed at.
    pub fn new(value: [u8; 32], height: u64) -> Self {
        Self { value, height }
    }

    /// Whether the token is still inside its validity window at
    /// `current_height`.
    pub fn is_fresh_at(&self, current_height: u64, window: u64) -> bool {
        current_height.saturating_sub(self.height) <= window
    }
}

impl fmt::Debug for FreshnessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FreshnessToken(h={}, {}..)",
            self.height,
            hex::encode(&self.value[..4])
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(fill: u8) -> Address {
        Address::new([fill; 32])
    }

    #[test]
    fn account_meta_constructors_set_flags() {
        let w = AccountMeta::writable(addr(1), true);
        assert!(w.is_writable && w.is_signer);

        let r = AccountMeta::readonly(addr(2), false);
        assert!(!r.is_writable && !r.is_signer);
    }

    #[test]
    fn freshness_window_edges() {
        let token = FreshnessToken::new([0u8; 32], 100);
        assert!(token.is_fresh_at(100, 150));
        assert!(token.is_fresh_at(250, 150)); // exactly at the window edge
        assert!(!token.is_fresh_at(251, 150)); // one past
    }

    #[test]
    fn freshness_tolerates_height_behind_token() {
        // A client may race the ledger and observe a height below the
        // token's; saturating subtraction keeps that fresh, not ancient.
        let token = FreshnessToken::new([0u8; 32], 100);
        assert!(token.is_fresh_at(99, 150));
    }

    #[test]
    fn instruction_serde_roundtrip() {
        let ix = Instruction::new(
            addr(7),
            vec![
                AccountMeta::writable(addr(1), true),
                AccountMeta::readonly(addr(2), false),
            ],
            vec![0xDE, 0xAD],
        );
        let bytes = bincode::serialize(&ix).unwrap();
        let recovered: Instruction = bincode::deserialize(&bytes).unwrap();
        assert_eq!(ix, recovered);
    }
}
