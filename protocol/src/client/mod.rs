//! # Ledger Client Boundary
//!
//! The near side of the network. Two pieces:
//!
//! ```text
//! ledger.rs     — LedgerClient: the five-operation capability the external
//!                 ledger must provide (reads + submit)
//! submission.rs — SubmissionClient: fail-fast local checks, one submit,
//!                 classified outcome
//! ```
//!
//! Everything past `LedgerClient` (transport, endpoints, serialization of
//! RPC envelopes) is out of scope by design. Implement the trait, get the
//! pipeline.

pub mod ledger;
pub mod submission;

pub use ledger::{LedgerClient, LedgerError};
pub use submission::{SubmissionClient, SubmissionReceipt, SubmitError};
