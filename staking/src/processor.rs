//! Instruction dispatch into the state machine.
//!
//! [`process_instruction`] is the program's entrypoint as the ledger sees
//! it: decode the data payload, re-verify that the derived accounts the
//! transaction names are the ones this program would derive, and hand the
//! operation to the [`VaultLedger`] together with the transaction's signer
//! set. Derivation re-verification matters: account lists arrive from
//! the wire, and a client pointing a stake at someone else's record must
//! fail here, not corrupt state there.

use thiserror::Error;

use orbit_protocol::address::{Address, DeriveError};
use orbit_protocol::transaction::Instruction;

use crate::instruction::{InstructionError, StakeInstruction};
use crate::state::{escrow_address, stake_record_address, STAKING_PROGRAM_ID};
use crate::vault_ledger::{StakeError, VaultLedger};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from instruction processing.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The instruction was addressed to a different program.
    #[error("instruction targets program {0}, not the staking program")]
    WrongProgram(Address),

    /// The account list was shorter than the operation requires.
    #[error("expected at least {expected} accounts, got {got}")]
    NotEnoughAccounts { expected: usize, got: usize },

    /// A derived account in the list does not match this program's own
    /// derivation for the named wallet.
    #[error("account {got} is not the derived {role} account (expected {expected})")]
    WrongDerivedAccount {
        role: &'static str,
        expected: Address,
        got: Address,
    },

    /// The data payload failed to decode.
    #[error(transparent)]
    Instruction(#[from] InstructionError),

    /// The state machine refused the transition.
    #[error(transparent)]
    Stake(#[from] StakeError),

    /// Address derivation failed during verification.
    #[error(transparent)]
    Derive(#[from] DeriveError),
}

impl ProcessError {
    /// Stable rejection code carried in ledger errors. State-machine
    /// refusals use their own codes; structural failures map below 6000,
    /// outside the program error range.
    pub fn code(&self) -> u32 {
        match self {
            Self::Stake(err) => err.code(),
            Self::WrongProgram(_) => 100,
            Self::NotEnoughAccounts { .. } => 101,
            Self::WrongDerivedAccount { .. } => 102,
            Self::Instruction(_) => 103,
            Self::Derive(_) => 104,
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Executes one instruction against the vault ledger.
///
/// `signers` is the verified signer set of the enclosing transaction.
/// Signature checking happened before execution, which is why this layer
/// can treat membership as authorization.
pub fn process_instruction(
    ledger: &mut VaultLedger,
    instruction: &Instruction,
    signers: &[Address],
) -> Result<(), ProcessError> {
    if instruction.program_id != STAKING_PROGRAM_ID {
        return Err(ProcessError::WrongProgram(instruction.program_id));
    }

    match StakeInstruction::unpack(&instruction.data)? {
        StakeInstruction::Initialize => {
            let payer = account_at(instruction, 0, 3)?;
            ledger.initialize(&payer, signers)?;
        }
        StakeInstruction::Stake { amount } => {
            let wallet = account_at(instruction, 4, 5)?;
            verify_derived(instruction, 0, "stake record", stake_record_address(&wallet)?.0)?;
            verify_derived(instruction, 1, "escrow", escrow_address(&wallet)?.0)?;
            ledger.stake(&wallet, amount, signers)?;
        }
        StakeInstruction::Destake => {
            let wallet = account_at(instruction, 4, 6)?;
            verify_derived(instruction, 0, "stake record", stake_record_address(&wallet)?.0)?;
            verify_derived(instruction, 1, "escrow", escrow_address(&wallet)?.0)?;
            ledger.destake(&wallet, signers)?;
        }
    }

    Ok(())
}

fn account_at(
    instruction: &Instruction,
    index: usize,
    expected_len: usize,
) -> Result<Address, ProcessError> {
    if instruction.accounts.len() < expected_len {
        return Err(ProcessError::NotEnoughAccounts {
            expected: expected_len,
            got: instruction.accounts.len(),
        });
    }
    Ok(instruction.accounts[index].address)
}

fn verify_derived(
    instruction: &Instruction,
    index: usize,
    role: &'static str,
    expected: Address,
) -> Result<(), ProcessError> {
    let got = instruction.accounts[index].address;
    if got != expected {
        return Err(ProcessError::WrongDerivedAccount {
            role,
            expected,
            got,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
