//! Signature coordination.
//!
//! [`sign_transaction`] takes a compiled [`Message`] and the keypairs the
//! caller holds, and produces a [`SignedTransaction`] carrying one
//! signature per required signer, or fails on the first requirement it
//! cannot satisfy. There is deliberately no partially-signed intermediate:
//! a unit either carries its full signer set or it does not exist, which
//! keeps "collect signatures over time" workflows (hardware wallets,
//! multi-party approval) outside this core where they belong.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::builder::Message;
use crate::address::Address;
use crate::crypto::keys::{OrbitKeypair, OrbitPublicKey, OrbitSignature};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from signing and signature verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SigningError {
    /// A required signer has no matching keypair. Reports the first
    /// unsatisfied requirement in required-signer order.
    #[error("no keypair provided for required signer {0}")]
    MissingSignature(Address),

    /// An attached signature does not verify against its address.
    #[error("signature for {0} does not verify against the message bytes")]
    InvalidSignature(Address),
}

// ---------------------------------------------------------------------------
// TransactionSignature
// ---------------------------------------------------------------------------

/// The identifier a submitted transaction is looked up by.
///
/// By convention this is the payer's signature (the first entry of the
/// signature list) rendered base58. Unique per transaction because the
/// signed bytes embed the freshness token and full instruction list.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignature(OrbitSignature);

impl TransactionSignature {
    /// The underlying signature.
    pub fn as_signature(&self) -> &OrbitSignature {
        &self.0
    }
}

impl fmt::Display for TransactionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TransactionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionSignature({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// A message plus its complete, positionally-ordered signature list.
///
/// `signatures[i]` belongs to `message.required_signers()[i]`; the pairing
/// is stored explicitly so verification never has to re-derive it.
/// Immutable once produced: rebuild and re-sign rather than patching.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// The compiled message the signatures cover.
    pub message: Message,
    /// One `(signer, signature)` entry per required signer, in
    /// required-signer order.
    pub signatures: Vec<(Address, OrbitSignature)>,
}

impl SignedTransaction {
    /// The transaction's submission identifier (the payer's signature).
    pub fn signature(&self) -> TransactionSignature {
        // Construction guarantees at least the payer entry.
        TransactionSignature(self.signatures[0].1)
    }

    /// Wire encoding of the complete signed unit, for handing to a
    /// transport or persisting in a submission queue.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Decodes a signed unit from its wire encoding. Decoding does not
    /// verify; run [`verify_signatures`](Self::verify_signatures) before
    /// trusting the result.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    /// Verifies every attached signature against the exact message bytes.
    ///
    /// Used ledger-side before execution and in tests; a wallet address
    /// doubles as its public key, so verification needs nothing beyond the
    /// transaction itself.
    pub fn verify_signatures(&self) -> Result<(), SigningError> {
        let bytes = self.message.signable_bytes();
        for (address, signature) in &self.signatures {
            let key = OrbitPublicKey::from_bytes(*address.as_bytes());
            if !key.verify(&bytes, signature) {
                return Err(SigningError::InvalidSignature(*address));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Signs a message with every required signer, or fails listing the first
/// address that has no keypair among `keypairs`.
///
/// Each signature covers the exact compiled bytes of
/// [`Message::signable_bytes`]. Extra keypairs that no instruction
/// requires are ignored, not an error: callers often hold a keyring
/// wider than any single transaction's signer set.
pub fn sign_transaction(
    message: &Message,
    keypairs: &[&OrbitKeypair],
) -> Result<SignedTransaction, SigningError> {
    let bytes = message.signable_bytes();
    let mut signatures = Vec::new();

    for required in message.required_signers() {
        let keypair = keypairs
            .iter()
            .find(|kp| Address::from_public_key(&kp.public_key()) == required)
            .ok_or(SigningError::MissingSignature(required))?;
        signatures.push((required, keypair.sign(&bytes)));
    }

    Ok(SignedTransaction {
        message: message.clone(),
        signatures,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::builder::TransactionBuilder;
    use crate::transaction::types::{AccountMeta, FreshnessToken, Instruction};

    fn wallet_addr(kp: &OrbitKeypair) -> Address {
        Address::from_public_key(&kp.public_key())
    }

    /// A message whose payer is `payer` and which additionally requires
    /// `co_signer` via an instruction account.
    fn two_signer_message(payer: &OrbitKeypair, co_signer: &OrbitKeypair) -> Message {
        let ix = Instruction::new(
            Address::new([100u8; 32]),
            vec![
                AccountMeta::writable(wallet_addr(co_signer), true),
                AccountMeta::readonly(Address::new([5u8; 32]), false),
            ],
            vec![7],
        );
        TransactionBuilder::new(wallet_addr(payer), FreshnessToken::new([1u8; 32], 10))
            .instruction(ix)
            .build()
            .unwrap()
    }

    #[test]
    fn full_signer_set_produces_verified_transaction() {
        let payer = OrbitKeypair::generate();
        let co = OrbitKeypair::generate();
        let msg = two_signer_message(&payer, &co);

        let tx = sign_transaction(&msg, &[&payer, &co]).unwrap();
        assert_eq!(tx.signatures.len(), 2);
        assert_eq!(tx.signatures[0].0, wallet_addr(&payer));
        tx.verify_signatures().unwrap();
    }

    #[test]
    fn missing_co_signer_reports_its_address() {
        let payer = OrbitKeypair::generate();
        let co = OrbitKeypair::generate();
        let msg = two_signer_message(&payer, &co);

        assert_eq!(
            sign_transaction(&msg, &[&payer]),
            Err(SigningError::MissingSignature(wallet_addr(&co)))
        );
    }

    #[test]
    fn missing_payer_reports_payer_first() {
        // Both signatures are absent; the payer is the first unsatisfied
        // requirement and must be the one reported.
        let payer = OrbitKeypair::generate();
        let co = OrbitKeypair::generate();
        let msg = two_signer_message(&payer, &co);

        assert_eq!(
            sign_transaction(&msg, &[]),
            Err(SigningError::MissingSignature(wallet_addr(&payer)))
        );
    }

    #[test]
    fn surplus_keypairs_are_ignored() {
        let payer = OrbitKeypair::generate();
        let co = OrbitKeypair::generate();
        let bystander = OrbitKeypair::generate();
        let msg = two_signer_message(&payer, &co);

        let tx = sign_transaction(&msg, &[&bystander, &co, &payer]).unwrap();
        assert_eq!(tx.signatures.len(), 2);
        tx.verify_signatures().unwrap();
    }

    #[test]
    fn signing_is_deterministic() {
        let payer = OrbitKeypair::generate();
        let co = OrbitKeypair::generate();
        let msg = two_signer_message(&payer, &co);

        let a = sign_transaction(&msg, &[&payer, &co]).unwrap();
        let b = sign_transaction(&msg, &[&payer, &co]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.signature().to_string(), b.signature().to_string());
    }

    #[test]
    fn tampering_breaks_verification() {
        let payer = OrbitKeypair::generate();
        let co = OrbitKeypair::generate();
        let mut tx = sign_transaction(&two_signer_message(&payer, &co), &[&payer, &co]).unwrap();

        // Flip one data byte after signing.
        tx.message.instructions[0].data[0] ^= 0xFF;

        assert!(matches!(
            tx.verify_signatures(),
            Err(SigningError::InvalidSignature(_))
        ));
    }

    #[test]
    fn swapped_signatures_fail_their_addresses() {
        let payer = OrbitKeypair::generate();
        let co = OrbitKeypair::generate();
        let mut tx = sign_transaction(&two_signer_message(&payer, &co), &[&payer, &co]).unwrap();

        let sig0 = tx.signatures[0].1;
        tx.signatures[0].1 = tx.signatures[1].1;
        tx.signatures[1].1 = sig0;

        assert!(tx.verify_signatures().is_err());
    }

    #[test]
    fn wire_roundtrip_preserves_the_unit() {
        let payer = OrbitKeypair::generate();
        let co = OrbitKeypair::generate();
        let tx = sign_transaction(&two_signer_message(&payer, &co), &[&payer, &co]).unwrap();

        let decoded = SignedTransaction::from_bytes(&tx.to_bytes().unwrap()).unwrap();
        assert_eq!(tx, decoded);
        decoded.verify_signatures().unwrap();
    }

    #[test]
    fn transaction_signature_is_payer_signature() {
        let payer = OrbitKeypair::generate();
        let co = OrbitKeypair::generate();
        let tx = sign_transaction(&two_signer_message(&payer, &co), &[&payer, &co]).unwrap();

        assert_eq!(tx.signature().as_signature(), &tx.signatures[0].1);
    }
}
