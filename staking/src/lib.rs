// Copyright (c) 2026 Orbit Labs. MIT License.
// See LICENSE for details.

//! # Orbit Staking Program
//!
//! A token escrow/staking protocol over the Orbit transaction pipeline.
//! Wallets stake fungible tokens into program-controlled escrow accounts
//! and later destake them in full; custody is guarded by deterministically
//! derived addresses no private key can sign for.
//!
//! - **state** — account shapes and the program's address space: the
//!   singleton vault, per-wallet stake records, per-wallet escrows.
//! - **vault_ledger** — the state-transition function: Initialize, Stake,
//!   Destake (plus mint registration and funding support). Pure logic,
//!   no I/O; the external ledger executes it, tests drive it directly.
//! - **instruction** — the wire-level instruction set and builders that
//!   produce pipeline-ready [`orbit_protocol::transaction::Instruction`]s.
//! - **processor** — decodes instructions and dispatches them into the
//!   state machine, re-verifying derived accounts on the way in.
//!
//! ## Design Principles
//!
//! 1. Custody is per wallet. Each staker gets an independently addressed
//!    escrow, so no wallet's withdrawal contends with another's: an arena
//!    of accounts keyed by derived address, never a pooled singleton.
//! 2. Checked arithmetic on every balance and counter. Wrapping and money
//!    do not mix.
//! 3. Authorization is an explicit signer-set check on every transition.
//! 4. State transitions are enum-dispatched and exhaustively tested.

pub mod instruction;
pub mod processor;
pub mod state;
pub mod vault_ledger;

pub use instruction::StakeInstruction;
pub use processor::{process_instruction, ProcessError};
pub use state::{
    escrow_address, stake_record_address, vault_address, StakeRecord, STAKING_PROGRAM_ID,
};
pub use vault_ledger::{StakeError, VaultLedger};
