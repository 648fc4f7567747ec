//! # Transaction Module
//!
//! Construction and signing of atomic instruction bundles.
//!
//! ## Architecture
//!
//! ```text
//! types.rs   — Instruction vocabulary: AccountMeta, Instruction, FreshnessToken
//! builder.rs — TransactionBuilder → deterministic unsigned Message
//! signing.rs — sign_transaction → fully signed SignedTransaction, or nothing
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Assemble** — the caller collects instructions in dependency order
//!    (create before initialize before write; the builder will not reorder
//!    for you and the ledger executes exactly what was compiled).
//! 2. **Build** — [`TransactionBuilder`] compiles instructions + payer +
//!    freshness token into a [`Message`] with canonical bytes.
//! 3. **Sign** — [`sign_transaction`] covers those exact bytes with one
//!    signature per required signer.
//! 4. **Submit** — hand the [`SignedTransaction`] to
//!    [`crate::client::SubmissionClient`]; nothing in this module touches
//!    the network.
//!
//! ## Design Decisions
//!
//! - The freshness token is compiled verbatim and *not* validated at build
//!   time: expiry is a property of when the ledger sees the bytes, not of
//!   when they were compiled.
//! - Required signers are positional and payer-first; the signature list
//!   of a signed transaction indexes against that order.
//! - All-or-nothing signing: there is no type for a partially signed unit.

pub mod builder;
pub mod signing;
pub mod types;

pub use builder::{BuildError, Message, TransactionBuilder};
pub use signing::{sign_transaction, SignedTransaction, SigningError, TransactionSignature};
pub use types::{AccountMeta, FreshnessToken, Instruction};
