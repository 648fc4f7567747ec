//! # Token Data Model
//!
//! Mints and token accounts: the two account shapes the staking program
//! moves value between. A [`Mint`] defines a fungible token type; a
//! [`TokenAccount`] holds a balance of exactly one mint for exactly one
//! owner. All arithmetic is checked `u64` in the mint's smallest unit; the
//! `decimals` field exists for display and never enters a computation.
//!
//! The ledger persists both shapes as opaque account bytes. This module is
//! the client-side view of those bytes, plus the balance arithmetic a
//! state machine needs to mutate them safely.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::address::Address;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from token-account arithmetic and mint bookkeeping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Debit larger than the account balance.
    #[error("insufficient funds: account {account} holds {available}, requested {requested}")]
    InsufficientFunds {
        account: Address,
        available: u64,
        requested: u64,
    },

    /// Credit would overflow the `u64` balance.
    #[error("balance overflow on account {account}: current {current}, credit {credit}")]
    BalanceOverflow {
        account: Address,
        current: u64,
        credit: u64,
    },

    /// Two accounts in a transfer hold different mints.
    #[error("mint mismatch: source holds {source_mint}, destination holds {destination_mint}")]
    MintMismatch {
        source_mint: Address,
        destination_mint: Address,
    },

    /// Minting would overflow the mint's total supply counter.
    #[error("supply overflow on mint {mint}")]
    SupplyOverflow { mint: Address },
}

// ---------------------------------------------------------------------------
// TokenMetadata
// ---------------------------------------------------------------------------

/// Display metadata attached to a mint at registration.
///
/// Purely informational: wallets and explorers render it, the protocol
/// never branches on it. The `uri` conventionally points at a JSON
/// document with richer display fields (image, description).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Human-readable token name, e.g. `"Orbit Gold"`.
    pub name: String,
    /// Short ticker, e.g. `"OG"`.
    pub symbol: String,
    /// Off-ledger metadata document location.
    pub uri: String,
}

impl TokenMetadata {
    /// Builds metadata from the three display fields.
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            uri: uri.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Mint
// ---------------------------------------------------------------------------

/// A fungible token type.
///
/// The decimal scale is fixed at creation and never changes; every other
/// field is bookkeeping that moves with supply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mint {
    /// The mint's own account address.
    pub address: Address,
    /// Decimal scale for display. `9` means one whole token is 10^9 units.
    pub decimals: u8,
    /// Total units ever minted minus units burned.
    pub supply: u64,
    /// The only authority allowed to mint new supply.
    pub mint_authority: Address,
    /// Optional display metadata.
    pub metadata: Option<TokenMetadata>,
}

impl Mint {
    /// Registers a new mint with zero supply.
    pub fn new(
        address: Address,
        decimals: u8,
        mint_authority: Address,
        metadata: Option<TokenMetadata>,
    ) -> Self {
        Self {
            address,
            decimals,
            supply: 0,
            mint_authority,
            metadata,
        }
    }

    /// Records newly minted supply, guarding the counter against overflow.
    pub fn record_minted(&mut self, amount: u64) -> Result<(), TokenError> {
        self.supply = self
            .supply
            .checked_add(amount)
            .ok_or(TokenError::SupplyOverflow { mint: self.address })?;
        Ok(())
    }

    /// Renders an amount of this mint's smallest units with the decimal
    /// point in place, e.g. `1_500_000_000` at 9 decimals → `"1.500000000"`.
    pub fn display_amount(&self, amount: u64) -> String {
        if self.decimals == 0 {
            return amount.to_string();
        }
        let divisor = 10u64.pow(self.decimals as u32);
        format!(
            "{}.{:0>width$}",
            amount / divisor,
            amount % divisor,
            width = self.decimals as usize
        )
    }
}

impl fmt::Display for Mint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.metadata {
            Some(meta) => write!(f, "{} ({})", meta.symbol, self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

// ---------------------------------------------------------------------------
// TokenAccount
// ---------------------------------------------------------------------------

/// A balance of one mint held for one owner.
///
/// The `owner` decides who must sign to debit the account: a wallet
/// address means that wallet's keypair; a program address means program
/// logic only, because no key for it can exist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccount {
    /// This account's own address.
    pub address: Address,
    /// The mint whose units this account holds.
    pub mint: Address,
    /// The authority that controls debits.
    pub owner: Address,
    /// Balance in the mint's smallest unit.
    pub amount: u64,
}

impl TokenAccount {
    /// Opens an empty account for `mint` under `owner`'s authority.
    pub fn new(address: Address, mint: Address, owner: Address) -> Self {
        Self {
            address,
            mint,
            owner,
            amount: 0,
        }
    }

    /// Credits the account, refusing to wrap.
    pub fn credit(&mut self, amount: u64) -> Result<(), TokenError> {
        self.amount = self
            .amount
            .checked_add(amount)
            .ok_or(TokenError::BalanceOverflow {
                account: self.address,
                current: self.amount,
                credit: amount,
            })?;
        Ok(())
    }

    /// Debits the account, refusing to go negative.
    pub fn debit(&mut self, amount: u64) -> Result<(), TokenError> {
        if self.amount < amount {
            return Err(TokenError::InsufficientFunds {
                account: self.address,
                available: self.amount,
                requested: amount,
            });
        }
        self.amount -= amount;
        Ok(())
    }

    /// Checks that `other` holds the same mint before a transfer touches
    /// either side.
    pub fn check_same_mint(&self, other: &TokenAccount) -> Result<(), TokenError> {
        if self.mint != other.mint {
            return Err(TokenError::MintMismatch {
                source_mint: self.mint,
                destination_mint: other.mint,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(fill: u8) -> Address {
        Address::new([fill; 32])
    }

    fn account(fill: u8, amount: u64) -> TokenAccount {
        let mut acct = TokenAccount::new(addr(fill), addr(200), addr(fill));
        acct.amount = amount;
        acct
    }

    #[test]
    fn credit_then_debit_restores_balance() {
        let mut acct = account(1, 100);
        acct.credit(50).unwrap();
        acct.debit(50).unwrap();
        assert_eq!(acct.amount, 100);
    }

    #[test]
    fn debit_beyond_balance_fails() {
        let mut acct = account(1, 10);
        let err = acct.debit(11).unwrap_err();
        assert!(matches!(
            err,
            TokenError::InsufficientFunds {
                available: 10,
                requested: 11,
                ..
            }
        ));
        // The failed debit must not have touched the balance.
        assert_eq!(acct.amount, 10);
    }

    #[test]
    fn credit_overflow_fails() {
        let mut acct = account(1, u64::MAX - 1);
        assert!(matches!(
            acct.credit(2),
            Err(TokenError::BalanceOverflow { .. })
        ));
        assert_eq!(acct.amount, u64::MAX - 1);
    }

    #[test]
    fn mint_mismatch_is_detected() {
        let a = TokenAccount::new(addr(1), addr(10), addr(1));
        let b = TokenAccount::new(addr(2), addr(20), addr(2));
        assert!(matches!(
            a.check_same_mint(&b),
            Err(TokenError::MintMismatch { .. })
        ));
    }

    #[test]
    fn supply_tracks_minted_amounts() {
        let mut mint = Mint::new(addr(9), 9, addr(1), None);
        mint.record_minted(1_000_000_000).unwrap();
        mint.record_minted(5).unwrap();
        assert_eq!(mint.supply, 1_000_000_005);
    }

    #[test]
    fn supply_overflow_is_checked() {
        let mut mint = Mint::new(addr(9), 9, addr(1), None);
        mint.record_minted(u64::MAX).unwrap();
        assert!(matches!(
            mint.record_minted(1),
            Err(TokenError::SupplyOverflow { .. })
        ));
    }

    #[test]
    fn display_amount_places_the_point() {
        let mint = Mint::new(addr(9), 9, addr(1), None);
        assert_eq!(mint.display_amount(1_500_000_000), "1.500000000");
        assert_eq!(mint.display_amount(1), "0.000000001");

        let whole = Mint::new(addr(9), 0, addr(1), None);
        assert_eq!(whole.display_amount(42), "42");
    }

    #[test]
    fn metadata_serde_roundtrip() {
        let meta = TokenMetadata::new("Orbit Gold", "OG", "https://meta.orbit/og.json");
        let json = serde_json::to_string(&meta).unwrap();
        let recovered: TokenMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(meta, recovered);
    }
}
