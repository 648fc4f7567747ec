//! Transaction submission and outcome classification.
//!
//! [`SubmissionClient`] is the last step of the pipeline. It does three
//! things, in order:
//!
//! 1. **Fail fast locally.** A unit missing a required signature, or
//!    carrying one that does not verify, is rejected before any network
//!    traffic. The ledger would refuse it anyway and the round trip
//!    teaches nothing.
//! 2. **Submit once.** Exactly one `submit` call per invocation. The
//!    boundary is at-least-once from our side; blind resubmission of the
//!    same bytes is the caller's decision to make, not ours, because only
//!    the caller knows whether the ledger deduplicates by signature.
//! 3. **Classify the outcome.** Success returns the signature for status
//!    lookup. A rejection is final for these exact bytes. A timeout is
//!    *indeterminate* and says so in the type: reconcile by querying
//!    signature status, never by guessing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::ledger::{LedgerClient, LedgerError};
use crate::address::Address;
use crate::transaction::{SignedTransaction, SigningError, TransactionSignature};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Classified submission outcomes that are not success.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The unit failed local signature checks; the ledger was never
    /// contacted.
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// The ledger examined and refused the transaction. Not retryable
    /// without changing the inputs.
    #[error("submission rejected: code {code} ({message})")]
    Rejected {
        /// Program or validation error code, namespace owned by the
        /// external program.
        code: u32,
        /// Human-readable rejection context from the ledger.
        message: String,
        /// Best-effort signature extracted from the rejection payload.
        /// `Some` means the ledger logged the transaction before refusing
        /// confirmation, and the signature is worth polling.
        signature: Option<TransactionSignature>,
    },

    /// The freshness token expired before the ledger executed the
    /// transaction. Rebuild against fresh state and re-sign; resubmitting
    /// the same bytes can only fail again.
    #[error("freshness token expired (minted at height {token_height}, ledger at {ledger_height})")]
    StaleFreshnessToken {
        token_height: u64,
        ledger_height: u64,
    },

    /// No verdict. The transaction may have been applied. The carried
    /// signature is the one to reconcile with via status lookup.
    #[error("submission outcome unknown: {reason}")]
    Timeout {
        /// What went wrong on the boundary (timeout or transport failure).
        reason: String,
        /// The transaction's own signature, known locally before
        /// submission; the key for out-of-band reconciliation.
        possible_signature: TransactionSignature,
    },
}

// ---------------------------------------------------------------------------
// SubmissionReceipt
// ---------------------------------------------------------------------------

/// Audit record of an accepted submission.
///
/// Everything a caller needs to file, display, or reconcile later: the
/// signature to poll, the message id it belongs to, and when this client
/// handed the bytes over. The timestamp is client-local wall clock;
/// protocol logic never reads it, audit trails do.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Signature identifier returned by the ledger.
    pub signature: TransactionSignature,
    /// BLAKE3 id of the submitted message.
    pub message_id: String,
    /// The account that paid for execution.
    pub payer: Address,
    /// When this client completed the submission.
    pub submitted_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// SubmissionClient
// ---------------------------------------------------------------------------

/// Submits signed transactions through a [`LedgerClient`] and classifies
/// what comes back.
///
/// Stateless apart from the client handle; one instance can serve any
/// number of independent submissions.
pub struct SubmissionClient<C> {
    client: C,
}

impl<C: LedgerClient> SubmissionClient<C> {
    /// Wraps a ledger client.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// The wrapped client, for read operations alongside submission.
    pub fn ledger(&self) -> &C {
        &self.client
    }

    /// Submits one signed transaction and classifies the outcome.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Signing`] — incomplete or invalid signatures,
    ///   caught before any network call.
    /// - [`SubmitError::Rejected`] — the ledger refused the transaction.
    /// - [`SubmitError::StaleFreshnessToken`] — rebuild and re-sign.
    /// - [`SubmitError::Timeout`] — indeterminate; reconcile out of band.
    pub async fn submit(
        &self,
        transaction: &SignedTransaction,
    ) -> Result<TransactionSignature, SubmitError> {
        self.check_signatures_locally(transaction)?;

        let id = transaction.signature();
        debug!(message_id = %transaction.message.id(), payer = %transaction.message.payer,
               "submitting transaction");

        match self.client.submit(transaction).await {
            Ok(signature) => {
                info!(%signature, "transaction accepted");
                Ok(signature)
            }
            Err(LedgerError::Rejected {
                code,
                message,
                signature,
            }) => {
                warn!(code, %message, "transaction rejected");
                Err(SubmitError::Rejected {
                    code,
                    message,
                    signature,
                })
            }
            Err(LedgerError::StaleFreshnessToken {
                token_height,
                ledger_height,
            }) => {
                warn!(token_height, ledger_height, "freshness token expired");
                Err(SubmitError::StaleFreshnessToken {
                    token_height,
                    ledger_height,
                })
            }
            Err(err @ (LedgerError::Timeout { .. } | LedgerError::Transport(_))) => {
                warn!(%id, error = %err, "submission outcome unknown");
                Err(SubmitError::Timeout {
                    reason: err.to_string(),
                    possible_signature: id,
                })
            }
        }
    }

    /// Like [`submit`](Self::submit), additionally wrapping an accepted
    /// outcome into a timestamped [`SubmissionReceipt`] for audit trails.
    pub async fn submit_with_receipt(
        &self,
        transaction: &SignedTransaction,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let signature = self.submit(transaction).await?;
        Ok(SubmissionReceipt {
            signature,
            message_id: transaction.message.id(),
            payer: transaction.message.payer,
            submitted_at: Utc::now(),
        })
    }

    /// Pre-submission signature checks: every required signer present, and
    /// every attached signature verifies over the compiled bytes.
    fn check_signatures_locally(&self, transaction: &SignedTransaction) -> Result<(), SubmitError> {
        let attached: Vec<_> = transaction.signatures.iter().map(|(a, _)| *a).collect();
        for required in transaction.message.required_signers() {
            if !attached.contains(&required) {
                return Err(SigningError::MissingSignature(required).into());
            }
        }
        transaction.verify_signatures()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
