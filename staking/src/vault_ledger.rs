//! The staking state machine.
//!
//! [`VaultLedger`] is the program's state-transition function over an
//! arena of token accounts and stake records. It owns no I/O and knows
//! nothing about transactions: the external ledger (or a test) hands it an
//! operation plus the set of addresses that signed the enclosing
//! transaction, and it either mutates the arena or returns a classified
//! error with the arena untouched.
//!
//! Per wallet the machine has two states:
//!
//! ```text
//! Unstaked (no record, or amount_staked == 0)
//!     │  stake(amount > 0)        — lazily creates record + escrow
//!     ▼
//! Staked (amount_staked > 0)
//!     │  destake()                — full amount back, record reset to 0
//!     ▼
//! Unstaked
//! ```
//!
//! Custody invariant, checked by tests at every observation point: the sum
//! of `amount_staked` over all records never exceeds the total balance
//! held in program-owned accounts.
//!
//! Every operation validates all preconditions before the first mutation,
//! so a returned error implies an unchanged arena.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use orbit_protocol::address::{Address, DeriveError};
use orbit_protocol::token::{Mint, TokenAccount, TokenError, TokenMetadata};

use crate::state::{
    escrow_address, stake_record_address, vault_address, StakeRecord, STAKING_PROGRAM_ID,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from staking state transitions.
///
/// `code` values are stable and appear in ledger rejections; see
/// [`StakeError::code`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StakeError {
    /// `initialize` was called against a vault that already exists.
    /// A second initialization must fail loudly, not succeed silently.
    #[error("vault is already initialized")]
    AlreadyInitialized,

    /// The mint (or the vault, for operations that need it) has not been
    /// set up yet.
    #[error("staking program is not initialized")]
    NotInitialized,

    /// A transition required `required` among the transaction's signers.
    #[error("operation requires signature of {required}")]
    Unauthorized { required: Address },

    /// Stake amount must be strictly positive.
    #[error("stake amount must be greater than zero")]
    ZeroAmount,

    /// The wallet's source account cannot cover the requested stake.
    #[error("insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds { available: u64, requested: u64 },

    /// Destake with no record, or a record holding nothing.
    #[error("wallet has no active stake")]
    NoActiveStake,

    /// No token account exists at the given address.
    #[error("unknown account {0}")]
    UnknownAccount(Address),

    /// Minting directly into a program-owned account is not a sanctioned
    /// operation; custody changes only through stake and destake.
    #[error("account {0} is in program custody; mint to a wallet account instead")]
    ProgramCustody(Address),

    /// Token-account arithmetic failed (overflow, mint mismatch).
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Address derivation failed while creating program accounts.
    #[error(transparent)]
    Derive(#[from] DeriveError),
}

impl StakeError {
    /// Stable numeric code for ledger rejections, in the program error
    /// range (6000+) so they cannot collide with the ledger's own
    /// validation codes.
    pub fn code(&self) -> u32 {
        match self {
            Self::AlreadyInitialized => 6000,
            Self::NotInitialized => 6001,
            Self::Unauthorized { .. } => 6002,
            Self::ZeroAmount => 6003,
            Self::InsufficientFunds { .. } => 6004,
            Self::NoActiveStake => 6005,
            Self::UnknownAccount(_) => 6006,
            Self::ProgramCustody(_) => 6007,
            Self::Token(_) => 6008,
            Self::Derive(_) => 6009,
        }
    }
}

// ---------------------------------------------------------------------------
// VaultLedger
// ---------------------------------------------------------------------------

/// The staking program's complete state: one mint, one vault, and a
/// per-wallet arena of escrows and stake records.
///
/// Stake records are keyed by their derived record address; token accounts
/// (user accounts, escrows, the vault) share one arena keyed by account
/// address. Wallet token accounts use the wallet's own address; the
/// arena holds only token accounts, so the reuse is unambiguous.
#[derive(Clone, Debug, Default)]
pub struct VaultLedger {
    mint: Option<Mint>,
    accounts: HashMap<Address, TokenAccount>,
    stake_records: HashMap<Address, StakeRecord>,
}

impl VaultLedger {
    /// An empty arena: no mint, no vault, no stakers.
    pub fn new() -> Self {
        Self::default()
    }

    // -- setup ---------------------------------------------------------

    /// Registers the fungible token this program escrows.
    ///
    /// One mint per program instance; a second registration fails with
    /// [`StakeError::AlreadyInitialized`].
    pub fn register_mint(
        &mut self,
        address: Address,
        decimals: u8,
        mint_authority: Address,
        metadata: Option<TokenMetadata>,
    ) -> Result<(), StakeError> {
        if self.mint.is_some() {
            return Err(StakeError::AlreadyInitialized);
        }
        debug!(mint = %address, decimals, "registering mint");
        self.mint = Some(Mint::new(address, decimals, mint_authority, metadata));
        Ok(())
    }

    /// Creates the singleton vault account, bound to the registered mint
    /// and owned by the program.
    ///
    /// Explicitly not idempotent: the second call fails with
    /// [`StakeError::AlreadyInitialized`] even though it would be a
    /// no-op. Silent success here has historically masked double-deploy
    /// bugs.
    pub fn initialize(&mut self, payer: &Address, signers: &[Address]) -> Result<(), StakeError> {
        require_signer(payer, signers)?;
        let mint = self.mint.as_ref().ok_or(StakeError::NotInitialized)?;
        let (vault, _bump) = vault_address()?;
        if self.accounts.contains_key(&vault) {
            return Err(StakeError::AlreadyInitialized);
        }

        debug!(%vault, mint = %mint.address, "initializing vault");
        self.accounts
            .insert(vault, TokenAccount::new(vault, mint.address, STAKING_PROGRAM_ID));
        Ok(())
    }

    /// Opens a token account for `wallet`, using the wallet address as the
    /// account address. Idempotent on purpose: "get or create" is the
    /// calling convention every client uses.
    pub fn create_token_account(&mut self, wallet: &Address) -> Result<(), StakeError> {
        let mint = self.mint.as_ref().ok_or(StakeError::NotInitialized)?;
        self.accounts
            .entry(*wallet)
            .or_insert_with(|| TokenAccount::new(*wallet, mint.address, *wallet));
        Ok(())
    }

    /// Mints new supply into a *wallet-owned* account.
    ///
    /// Requires the mint authority's signature. Program-owned destinations
    /// are refused: escrows and the vault are funded by [`stake`](Self::stake)
    /// alone, so custody always has a matching stake record.
    pub fn mint_to(
        &mut self,
        destination: &Address,
        amount: u64,
        signers: &[Address],
    ) -> Result<(), StakeError> {
        let mint = self.mint.as_ref().ok_or(StakeError::NotInitialized)?;
        require_signer(&mint.mint_authority, signers)?;

        let account = self
            .accounts
            .get(destination)
            .ok_or(StakeError::UnknownAccount(*destination))?;
        if account.owner == STAKING_PROGRAM_ID {
            return Err(StakeError::ProgramCustody(*destination));
        }

        // Checks done; mutate. Supply first so a balance overflow cannot
        // leave the counter ahead of the books.
        let mint = self.mint.as_mut().ok_or(StakeError::NotInitialized)?;
        mint.record_minted(amount)?;
        let account = self
            .accounts
            .get_mut(destination)
            .ok_or(StakeError::UnknownAccount(*destination))?;
        account.credit(amount)?;

        debug!(destination = %destination, amount, "minted supply");
        Ok(())
    }

    // -- transitions ---------------------------------------------------

    /// Moves `amount` from the wallet's token account into that wallet's
    /// escrow, creating the stake record and escrow on first use.
    pub fn stake(
        &mut self,
        wallet: &Address,
        amount: u64,
        signers: &[Address],
    ) -> Result<(), StakeError> {
        if amount == 0 {
            return Err(StakeError::ZeroAmount);
        }
        require_signer(wallet, signers)?;
        let mint = self.mint.as_ref().ok_or(StakeError::NotInitialized)?;
        let mint_address = mint.address;

        let source = self
            .accounts
            .get(wallet)
            .ok_or(StakeError::UnknownAccount(*wallet))?;
        if source.amount < amount {
            return Err(StakeError::InsufficientFunds {
                available: source.amount,
                requested: amount,
            });
        }

        let (record_addr, record_bump) = stake_record_address(wallet)?;
        let (escrow_addr, _) = escrow_address(wallet)?;

        if let Some(escrow) = self.accounts.get(&escrow_addr) {
            source.check_same_mint(escrow)?;
        }

        let current_staked = self
            .stake_records
            .get(&record_addr)
            .map(|r| r.amount_staked)
            .unwrap_or(0);
        let new_staked = current_staked.checked_add(amount).ok_or(StakeError::Token(
            TokenError::BalanceOverflow {
                account: record_addr,
                current: current_staked,
                credit: amount,
            },
        ))?;

        // All preconditions hold; apply the transfer.
        self.accounts
            .entry(escrow_addr)
            .or_insert_with(|| TokenAccount::new(escrow_addr, mint_address, STAKING_PROGRAM_ID));
        self.stake_records
            .entry(record_addr)
            .or_insert_with(|| StakeRecord::new(*wallet, record_bump))
            .amount_staked = new_staked;

        // Debit cannot fail (balance checked above) and the escrow credit
        // mirrors the record add that just passed, but both stay checked.
        self.accounts
            .get_mut(wallet)
            .ok_or(StakeError::UnknownAccount(*wallet))?
            .debit(amount)?;
        self.accounts
            .get_mut(&escrow_addr)
            .ok_or(StakeError::UnknownAccount(escrow_addr))?
            .credit(amount)?;

        debug!(wallet = %wallet, amount, escrow = %escrow_addr, "stake applied");
        Ok(())
    }

    /// Returns the wallet's full staked amount from escrow and resets the
    /// record to zero. The record and escrow persist for the next stake.
    pub fn destake(&mut self, wallet: &Address, signers: &[Address]) -> Result<(), StakeError> {
        require_signer(wallet, signers)?;

        let (record_addr, _) = stake_record_address(wallet)?;
        let (escrow_addr, _) = escrow_address(wallet)?;

        let staked = match self.stake_records.get(&record_addr) {
            Some(record) if record.is_active() => record.amount_staked,
            _ => return Err(StakeError::NoActiveStake),
        };

        let destination = self
            .accounts
            .get(wallet)
            .ok_or(StakeError::UnknownAccount(*wallet))?;
        if let Some(escrow) = self.accounts.get(&escrow_addr) {
            escrow.check_same_mint(destination)?;
        }
        destination.amount.checked_add(staked).ok_or(StakeError::Token(
            TokenError::BalanceOverflow {
                account: *wallet,
                current: destination.amount,
                credit: staked,
            },
        ))?;

        self.accounts
            .get_mut(&escrow_addr)
            .ok_or(StakeError::UnknownAccount(escrow_addr))?
            .debit(staked)?;
        self.accounts
            .get_mut(wallet)
            .ok_or(StakeError::UnknownAccount(*wallet))?
            .credit(staked)?;
        if let Some(record) = self.stake_records.get_mut(&record_addr) {
            record.amount_staked = 0;
        }

        debug!(wallet = %wallet, amount = staked, "destake applied");
        Ok(())
    }

    // -- reads ---------------------------------------------------------

    /// The registered mint, if any.
    pub fn mint(&self) -> Option<&Mint> {
        self.mint.as_ref()
    }

    /// Whether the vault exists.
    pub fn is_initialized(&self) -> bool {
        vault_address()
            .map(|(vault, _)| self.accounts.contains_key(&vault))
            .unwrap_or(false)
    }

    /// The token account at `address`, if any.
    pub fn account(&self, address: &Address) -> Option<&TokenAccount> {
        self.accounts.get(address)
    }

    /// Balance of the token account at `address`; zero for a missing one.
    pub fn balance(&self, address: &Address) -> u64 {
        self.accounts.get(address).map(|a| a.amount).unwrap_or(0)
    }

    /// The wallet's currently staked amount; zero without a record.
    pub fn staked_amount(&self, wallet: &Address) -> u64 {
        stake_record_address(wallet)
            .ok()
            .and_then(|(addr, _)| self.stake_records.get(&addr))
            .map(|r| r.amount_staked)
            .unwrap_or(0)
    }

    /// The wallet's stake record, if one was ever created.
    pub fn stake_record(&self, wallet: &Address) -> Option<&StakeRecord> {
        let (addr, _) = stake_record_address(wallet).ok()?;
        self.stake_records.get(&addr)
    }

    /// Balance of the wallet's escrow account; zero before the first stake.
    pub fn escrow_balance(&self, wallet: &Address) -> u64 {
        escrow_address(wallet)
            .map(|(addr, _)| self.balance(&addr))
            .unwrap_or(0)
    }

    /// Sum of `amount_staked` across every stake record.
    pub fn total_staked(&self) -> u64 {
        self.stake_records.values().map(|r| r.amount_staked).sum()
    }

    /// Total balance held in program-owned accounts (escrows + vault).
    pub fn custody_balance(&self) -> u64 {
        self.accounts
            .values()
            .filter(|a| a.owner == STAKING_PROGRAM_ID)
            .map(|a| a.amount)
            .sum()
    }

    /// Serialized state of whatever lives at `address` (token account,
    /// stake record, or the mint). Backs `get_account_info` at the ledger
    /// boundary in tests.
    pub fn account_info(&self, address: &Address) -> Option<Vec<u8>> {
        if let Some(account) = self.accounts.get(address) {
            return bincode::serialize(account).ok();
        }
        if let Some(record) = self.stake_records.get(address) {
            return bincode::serialize(record).ok();
        }
        match &self.mint {
            Some(mint) if mint.address == *address => bincode::serialize(mint).ok(),
            _ => None,
        }
    }
}

fn require_signer(required: &Address, signers: &[Address]) -> Result<(), StakeError> {
    if signers.contains(required) {
        Ok(())
    } else {
        Err(StakeError::Unauthorized {
            required: *required,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
