//! The program's instruction set and its wire encoding.
//!
//! [`StakeInstruction`] is what travels in the `data` field of a pipeline
//! [`Instruction`]; the builder functions below pair each variant with the
//! positional account list the processor expects. Account order is wire
//! contract: the processor addresses accounts by index, exactly like the
//! program on the real ledger would.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use orbit_protocol::address::{Address, DeriveError};
use orbit_protocol::transaction::{AccountMeta, Instruction};

use crate::state::{escrow_address, stake_record_address, vault_address, STAKING_PROGRAM_ID};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from instruction encoding and decoding.
#[derive(Debug, Error)]
pub enum InstructionError {
    /// The data payload did not decode as a [`StakeInstruction`].
    #[error("instruction data did not decode: {0}")]
    InvalidData(String),

    /// Address derivation failed while assembling the account list.
    #[error(transparent)]
    Derive(#[from] DeriveError),
}

// ---------------------------------------------------------------------------
// StakeInstruction
// ---------------------------------------------------------------------------

/// Every operation the staking program executes.
///
/// Serialized with bincode into the instruction data payload. Variant
/// order is wire contract: bincode encodes the discriminant positionally,
/// so reordering variants is a breaking change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeInstruction {
    /// Create the singleton vault bound to the program's mint.
    ///
    /// Accounts: `[payer (signer, writable), vault (writable),
    /// mint (readonly)]`
    Initialize,

    /// Move `amount` from the wallet's token account into its escrow.
    ///
    /// Accounts: `[stake_record (writable), escrow (writable),
    /// wallet_token_account (writable), mint (readonly),
    /// wallet (signer, writable)]`
    Stake { amount: u64 },

    /// Return the wallet's full staked amount and zero its record.
    ///
    /// Accounts: `[stake_record (writable), escrow (writable),
    /// wallet_token_account (writable), mint (readonly),
    /// wallet (signer, writable), vault (writable)]`
    Destake,
}

impl StakeInstruction {
    /// Encodes into the instruction data payload.
    pub fn pack(&self) -> Vec<u8> {
        // bincode over an enum of unit/u64 variants cannot fail.
        bincode::serialize(self).unwrap_or_default()
    }

    /// Decodes an instruction data payload.
    pub fn unpack(data: &[u8]) -> Result<Self, InstructionError> {
        bincode::deserialize(data).map_err(|e| InstructionError::InvalidData(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Instruction builders
// ---------------------------------------------------------------------------

/// Builds the `Initialize` instruction for `payer`.
pub fn initialize(payer: &Address, mint: &Address) -> Result<Instruction, InstructionError> {
    let (vault, _) = vault_address()?;
    Ok(Instruction::new(
        STAKING_PROGRAM_ID,
        vec![
            AccountMeta::writable(*payer, true),
            AccountMeta::writable(vault, false),
            AccountMeta::readonly(*mint, false),
        ],
        StakeInstruction::Initialize.pack(),
    ))
}

/// Builds a `Stake` instruction moving `amount` from `wallet`'s token
/// account into its escrow.
pub fn stake(
    wallet: &Address,
    mint: &Address,
    amount: u64,
) -> Result<Instruction, InstructionError> {
    let (record, _) = stake_record_address(wallet)?;
    let (escrow, _) = escrow_address(wallet)?;
    Ok(Instruction::new(
        STAKING_PROGRAM_ID,
        vec![
            AccountMeta::writable(record, false),
            AccountMeta::writable(escrow, false),
            AccountMeta::writable(*wallet, false),
            AccountMeta::readonly(*mint, false),
            AccountMeta::writable(*wallet, true),
        ],
        StakeInstruction::Stake { amount }.pack(),
    ))
}

/// Builds a `Destake` instruction returning `wallet`'s full stake.
pub fn destake(wallet: &Address, mint: &Address) -> Result<Instruction, InstructionError> {
    let (record, _) = stake_record_address(wallet)?;
    let (escrow, _) = escrow_address(wallet)?;
    let (vault, _) = vault_address()?;
    Ok(Instruction::new(
        STAKING_PROGRAM_ID,
        vec![
            AccountMeta::writable(record, false),
            AccountMeta::writable(escrow, false),
            AccountMeta::writable(*wallet, false),
            AccountMeta::readonly(*mint, false),
            AccountMeta::writable(*wallet, true),
            AccountMeta::writable(vault, false),
        ],
        StakeInstruction::Destake.pack(),
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
