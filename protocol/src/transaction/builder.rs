//! Message compilation.
//!
//! [`TransactionBuilder`] turns an ordered instruction list, a fee payer,
//! and a freshness token into an unsigned [`Message`] with a canonical
//! byte encoding. Two properties carry all the weight here:
//!
//! 1. **Order preservation.** Later instructions observe account state as
//!    mutated by earlier ones inside the same atomic unit, so the compiled
//!    order is exactly the supplied order. The builder never reorders,
//!    dedups, or "optimizes" the list.
//! 2. **Determinism.** Identical inputs compile to byte-identical output.
//!    Signatures are over these bytes; reproducible bytes are what make
//!    signatures auditable after the fact.
//!
//! Signing is a separate step ([`super::signing`]); compilation needs no
//! key material.

use serde::{Deserialize, Serialize};

use super::types::{FreshnessToken, Instruction};
use crate::address::Address;
use crate::config::{MAX_INSTRUCTIONS_PER_MESSAGE, MESSAGE_VERSION};
use crate::crypto::hash::blake3_hash;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from message compilation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// The instruction list was empty. An atomic unit of nothing is a
    /// caller bug, not a transaction.
    #[error("transaction contains no instructions")]
    EmptyTransaction,

    /// The instruction list exceeded [`MAX_INSTRUCTIONS_PER_MESSAGE`].
    #[error("{0} instructions exceeds the per-message maximum of {MAX_INSTRUCTIONS_PER_MESSAGE}")]
    TooManyInstructions(usize),
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A compiled, unsigned transaction message.
///
/// Immutable once built. The signable bytes returned by
/// [`signable_bytes`](Self::signable_bytes) are the exact bytes every
/// required signer signs and the ledger verifies against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message format version.
    pub version: u16,
    /// The account charged for execution; always the first required signer.
    pub payer: Address,
    /// Recent-state anchor, compiled verbatim from the builder input.
    pub freshness_token: FreshnessToken,
    /// The instructions, in exactly the order supplied.
    pub instructions: Vec<Instruction>,
}

impl Message {
    /// Canonical byte encoding: fixed-width little-endian integers,
    /// u32 length prefixes, no maps anywhere on the path.
    ///
    /// Layout:
    ///
    /// ```text
    /// version            u16 LE
    /// payer              32 bytes
    /// freshness value    32 bytes
    /// freshness height   u64 LE
    /// instruction count  u32 LE
    /// per instruction:
    ///   program_id       32 bytes
    ///   account count    u32 LE
    ///   per account:     32 bytes + flags byte (bit0 signer, bit1 writable)
    ///   data length      u32 LE
    ///   data             raw bytes
    /// ```
    pub fn signable_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128 + self.instructions.len() * 96);

        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.extend_from_slice(self.payer.as_bytes());
        buf.extend_from_slice(&self.freshness_token.value);
        buf.extend_from_slice(&self.freshness_token.height.to_le_bytes());

        buf.extend_from_slice(&(self.instructions.len() as u32).to_le_bytes());
        for ix in &self.instructions {
            buf.extend_from_slice(ix.program_id.as_bytes());

            buf.extend_from_slice(&(ix.accounts.len() as u32).to_le_bytes());
            for meta in &ix.accounts {
                buf.extend_from_slice(meta.address.as_bytes());
                let flags = (meta.is_signer as u8) | ((meta.is_writable as u8) << 1);
                buf.push(flags);
            }

            buf.extend_from_slice(&(ix.data.len() as u32).to_le_bytes());
            buf.extend_from_slice(&ix.data);
        }

        buf
    }

    /// Message identifier: hex-encoded BLAKE3 of the signable bytes.
    ///
    /// Stable across signing (signatures are not part of the preimage), so
    /// it can be logged before submission and correlated after.
    pub fn id(&self) -> String {
        hex::encode(blake3_hash(&self.signable_bytes()))
    }

    /// Every address that must sign this message: the payer first, then
    /// each instruction's signer accounts in first-appearance order,
    /// deduplicated.
    ///
    /// The order is part of the wire contract: signature lists are
    /// positional against it.
    pub fn required_signers(&self) -> Vec<Address> {
        let mut signers = vec![self.payer];
        for ix in &self.instructions {
            for meta in &ix.accounts {
                if meta.is_signer && !signers.contains(&meta.address) {
                    signers.push(meta.address);
                }
            }
        }
        signers
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Builder for unsigned [`Message`]s.
///
/// # Usage
///
/// ```rust,no_run
/// use orbit_protocol::address::Address;
/// use orbit_protocol::transaction::{FreshnessToken, Instruction, TransactionBuilder};
///
/// # fn demo(payer: Address, token: FreshnessToken, create: Instruction, fund: Instruction) {
/// let message = TransactionBuilder::new(payer, token)
///     .instruction(create)
///     .instruction(fund)
///     .build()
///     .expect("non-empty transaction");
/// # }
/// ```
pub struct TransactionBuilder {
    payer: Address,
    freshness_token: FreshnessToken,
    instructions: Vec<Instruction>,
}

impl TransactionBuilder {
    /// Starts a builder for the given payer and freshness anchor.
    ///
    /// Both are mandatory inputs, so they are constructor arguments rather
    /// than optional setters that `build` would have to police.
    pub fn new(payer: Address, freshness_token: FreshnessToken) -> Self {
        Self {
            payer,
            freshness_token,
            instructions: Vec::new(),
        }
    }

    /// Appends one instruction. Order of calls is order of execution.
    pub fn instruction(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    /// Appends a batch of instructions, preserving iterator order.
    pub fn instructions(mut self, batch: impl IntoIterator<Item = Instruction>) -> Self {
        self.instructions.extend(batch);
        self
    }

    /// Compiles the message.
    ///
    /// # Errors
    ///
    /// [`BuildError::EmptyTransaction`] on an empty instruction list;
    /// [`BuildError::TooManyInstructions`] past the configured cap.
    pub fn build(self) -> Result<Message, BuildError> {
        if self.instructions.is_empty() {
            return Err(BuildError::EmptyTransaction);
        }
        if self.instructions.len() > MAX_INSTRUCTIONS_PER_MESSAGE {
            return Err(BuildError::TooManyInstructions(self.instructions.len()));
        }

        Ok(Message {
            version: MESSAGE_VERSION,
            payer: self.payer,
            freshness_token: self.freshness_token,
            instructions: self.instructions,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::types::AccountMeta;

    fn addr(fill: u8) -> Address {
        Address::new([fill; 32])
    }

    fn token() -> FreshnessToken {
        FreshnessToken::new([9u8; 32], 77)
    }

    fn transfer_ix(from: u8, to: u8) -> Instruction {
        Instruction::new(
            addr(100),
            vec![
                AccountMeta::writable(addr(from), true),
                AccountMeta::writable(addr(to), false),
            ],
            vec![1, 2, 3],
        )
    }

    #[test]
    fn identical_inputs_compile_to_identical_bytes() {
        let build = || {
            TransactionBuilder::new(addr(1), token())
                .instruction(transfer_ix(2, 3))
                .instruction(transfer_ix(3, 4))
                .build()
                .unwrap()
        };
        assert_eq!(build().signable_bytes(), build().signable_bytes());
        assert_eq!(build().id(), build().id());
    }

    #[test]
    fn instruction_order_is_preserved_and_significant() {
        let ab = TransactionBuilder::new(addr(1), token())
            .instruction(transfer_ix(2, 3))
            .instruction(transfer_ix(4, 5))
            .build()
            .unwrap();
        let ba = TransactionBuilder::new(addr(1), token())
            .instruction(transfer_ix(4, 5))
            .instruction(transfer_ix(2, 3))
            .build()
            .unwrap();

        assert_eq!(ab.instructions[0], ba.instructions[1]);
        assert_ne!(ab.signable_bytes(), ba.signable_bytes());
    }

    #[test]
    fn empty_transaction_is_rejected() {
        assert_eq!(
            TransactionBuilder::new(addr(1), token()).build(),
            Err(BuildError::EmptyTransaction)
        );
    }

    #[test]
    fn instruction_cap_is_enforced() {
        let mut builder = TransactionBuilder::new(addr(1), token());
        for _ in 0..=MAX_INSTRUCTIONS_PER_MESSAGE {
            builder = builder.instruction(transfer_ix(2, 3));
        }
        assert_eq!(
            builder.build(),
            Err(BuildError::TooManyInstructions(
                MAX_INSTRUCTIONS_PER_MESSAGE + 1
            ))
        );
    }

    #[test]
    fn freshness_token_is_compiled_verbatim() {
        let t = FreshnessToken::new([0xAB; 32], 123_456);
        let msg = TransactionBuilder::new(addr(1), t)
            .instruction(transfer_ix(2, 3))
            .build()
            .unwrap();
        assert_eq!(msg.freshness_token, t);

        // And it is part of the signed bytes: a different token changes them.
        let other = TransactionBuilder::new(addr(1), FreshnessToken::new([0xAB; 32], 123_457))
            .instruction(transfer_ix(2, 3))
            .build()
            .unwrap();
        assert_ne!(msg.signable_bytes(), other.signable_bytes());
    }

    #[test]
    fn payer_leads_the_required_signer_list() {
        let msg = TransactionBuilder::new(addr(1), token())
            .instruction(transfer_ix(2, 3))
            .build()
            .unwrap();
        assert_eq!(msg.required_signers(), vec![addr(1), addr(2)]);
    }

    #[test]
    fn required_signers_dedup_preserves_first_appearance() {
        // Payer also appears as an instruction signer; a third signer
        // appears twice across instructions. Each address once, in order.
        let msg = TransactionBuilder::new(addr(2), token())
            .instruction(transfer_ix(2, 3))
            .instruction(transfer_ix(5, 6))
            .instruction(transfer_ix(5, 2))
            .build()
            .unwrap();
        assert_eq!(msg.required_signers(), vec![addr(2), addr(5)]);
    }

    #[test]
    fn account_flags_affect_the_encoding() {
        let signer = Instruction::new(addr(100), vec![AccountMeta::writable(addr(2), true)], vec![]);
        let plain = Instruction::new(addr(100), vec![AccountMeta::writable(addr(2), false)], vec![]);

        let a = TransactionBuilder::new(addr(1), token())
            .instruction(signer)
            .build()
            .unwrap();
        let b = TransactionBuilder::new(addr(1), token())
            .instruction(plain)
            .build()
            .unwrap();
        assert_ne!(a.signable_bytes(), b.signable_bytes());
    }

    #[test]
    fn message_serde_roundtrip() {
        let msg = TransactionBuilder::new(addr(1), token())
            .instruction(transfer_ix(2, 3))
            .build()
            .unwrap();
        let json = serde_json::to_string(&msg).unwrap();
        let recovered: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, recovered);
        assert_eq!(msg.signable_bytes(), recovered.signable_bytes());
    }
}
