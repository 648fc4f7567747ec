//! The ledger capability boundary.
//!
//! Everything this crate knows about the external ledger fits in the
//! [`LedgerClient`] trait: four read operations and one submit. Transport,
//! endpoints, retries, and authentication all live behind an
//! implementation of this trait, never in front of it.
//!
//! The trait is deliberately small and explicit. A "do anything" dynamic
//! client object would smuggle the whole RPC surface back into scope; five
//! named operations keep the dependency honest and make the in-memory
//! test implementations trivial to audit.

use async_trait::async_trait;
use thiserror::Error;

use crate::address::Address;
use crate::transaction::{FreshnessToken, SignedTransaction, TransactionSignature};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by a [`LedgerClient`] implementation.
///
/// `Rejected` is the ledger speaking (validation or program failure, with
/// whatever code the program returned); the other variants are the
/// boundary itself failing to deliver a verdict.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger examined the transaction and refused it.
    #[error("transaction rejected by the ledger: code {code} ({message})")]
    Rejected {
        /// Program or validation error code. The external program owns
        /// this namespace; this core only carries it.
        code: u32,
        /// Human-readable rejection context.
        message: String,
        /// Signature extracted from the rejection payload, when the
        /// ledger logged the transaction before refusing it.
        signature: Option<TransactionSignature>,
    },

    /// The transaction's freshness token fell outside the validity window.
    #[error("freshness token expired: minted at height {token_height}, ledger at {ledger_height}")]
    StaleFreshnessToken {
        token_height: u64,
        ledger_height: u64,
    },

    /// No verdict arrived in time. The transaction may or may not have
    /// been applied.
    #[error("ledger boundary timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// The boundary could not be reached at all. Still indeterminate from
    /// the caller's side: an at-least-once boundary does not prove
    /// non-delivery just because the response path broke.
    #[error("transport failure: {0}")]
    Transport(String),
}

// ---------------------------------------------------------------------------
// LedgerClient
// ---------------------------------------------------------------------------

/// The five operations this core needs from the external ledger.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Raw account bytes at `address`, or `None` for an address that
    /// holds no account state.
    async fn get_account_info(&self, address: &Address) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Native balance of `address` in smallest units.
    async fn get_balance(&self, address: &Address) -> Result<u64, LedgerError>;

    /// Minimum deposit for an account of `size_bytes` of state to be
    /// exempt from rent collection.
    async fn get_minimum_rent_exempt_balance(&self, size_bytes: usize)
        -> Result<u64, LedgerError>;

    /// A reference to recent ledger state, valid for a bounded window of
    /// heights.
    async fn get_freshness_token(&self) -> Result<FreshnessToken, LedgerError>;

    /// Hands a fully signed transaction to the ledger. One call, one
    /// attempt; retry policy belongs to the caller, who alone knows
    /// whether resubmission is safe.
    async fn submit(
        &self,
        transaction: &SignedTransaction,
    ) -> Result<TransactionSignature, LedgerError>;
}
