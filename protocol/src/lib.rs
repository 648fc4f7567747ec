// Copyright (c) 2026 Orbit Labs. MIT License.
// See LICENSE for details.

//! # Orbit Protocol — Core Library
//!
//! Orbit is a client protocol for a ledger-based execution environment:
//! it builds atomic multi-instruction transactions, signs them with every
//! required keypair, and hands them to the ledger boundary exactly once,
//! classifying whatever comes back.
//!
//! The ledger itself (consensus, fee market, account storage) is someone
//! else's problem, reached through the [`client::LedgerClient`] capability.
//! What lives here is everything a correct caller needs on the near side of
//! that boundary, plus the deterministic address derivation that lets
//! program logic (and only program logic) control custody accounts.
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the pipeline a transaction
//! travels through:
//!
//! - **crypto** — Ed25519 keypairs and the two hash functions we allow.
//! - **address** — 32-byte addresses and program-address derivation.
//! - **token** — Mints, token accounts, and display metadata.
//! - **transaction** — Instructions, message compilation, and signing.
//! - **client** — The ledger capability trait and the submission client.
//! - **config** — Protocol constants. All of them. In one place.
//!
//! ## Design Philosophy
//!
//! 1. Determinism everywhere a byte is signed: identical inputs compile to
//!    byte-identical messages, or auditing is theater.
//! 2. Fail before the network when failure is knowable locally.
//! 3. Outcomes are classified, never guessed: a timeout is indeterminate,
//!    not a failure, and the types say so.
//! 4. If it moves token balances, it has tests.

pub mod address;
pub mod client;
pub mod config;
pub mod crypto;
pub mod token;
pub mod transaction;
