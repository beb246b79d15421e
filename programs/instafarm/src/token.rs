//! Fungible-token collaborator.
//!
//! The engine consumes [`TokenInterface`]; it never implements token
//! semantics itself. An implementation is bound to the engine's custody
//! identity: `transfer` moves out of custody, and `transfer_from` spends an
//! allowance granted to custody.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::{AccountId, AssetId};

/// Failures reported by the token collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("allowance too low: needed {needed}, approved {approved}")]
    InsufficientAllowance { needed: u64, approved: u64 },

    #[error("balance too low: needed {needed}, available {available}")]
    InsufficientBalance { needed: u64, available: u64 },

    #[error("balance overflow")]
    Overflow,
}

pub trait TokenInterface {
    /// Identity this handle acts as; staked assets are held here.
    fn custody(&self) -> &AccountId;

    fn balance_of(&self, asset: &AssetId, holder: &AccountId) -> u64;

    /// Move `amount` from `from` to `to`, spending the allowance `from` granted
    /// to the engine's custody identity.
    fn transfer_from(
        &mut self,
        asset: &AssetId,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
    ) -> Result<(), TokenError>;

    /// Move `amount` out of custody to `to`.
    fn transfer(&mut self, asset: &AssetId, to: &AccountId, amount: u64) -> Result<(), TokenError>;
}

// ─── In-memory ledger ─────────────────────────────────────────────────────────

/// Balance/allowance ledger held in memory. Serializable so hosts can persist
/// it next to the farm state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryToken {
    /// Identity the engine spends as
    custody: AccountId,
    balances: BTreeMap<AssetId, BTreeMap<AccountId, u64>>,
    /// asset → owner → spender → remaining allowance
    allowances: BTreeMap<AssetId, BTreeMap<AccountId, BTreeMap<AccountId, u64>>>,
}

impl MemoryToken {
    pub fn new(custody: AccountId) -> Self {
        Self {
            custody,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
        }
    }

    /// Credit `amount` of `asset` to `holder` out of thin air.
    pub fn mint(&mut self, asset: &AssetId, holder: &AccountId, amount: u64) -> Result<(), TokenError> {
        let balance = self.balance_mut(asset, holder);
        *balance = balance.checked_add(amount).ok_or(TokenError::Overflow)?;
        Ok(())
    }

    /// Set the allowance `owner` grants `spender` (replaces any previous one).
    pub fn approve(&mut self, asset: &AssetId, owner: &AccountId, spender: &AccountId, amount: u64) {
        self.allowances
            .entry(asset.clone())
            .or_default()
            .entry(owner.clone())
            .or_default()
            .insert(spender.clone(), amount);
    }

    pub fn allowance(&self, asset: &AssetId, owner: &AccountId, spender: &AccountId) -> u64 {
        self.allowances
            .get(asset)
            .and_then(|owners| owners.get(owner))
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    fn balance_mut(&mut self, asset: &AssetId, holder: &AccountId) -> &mut u64 {
        self.balances
            .entry(asset.clone())
            .or_default()
            .entry(holder.clone())
            .or_default()
    }

    fn move_balance(
        &mut self,
        asset: &AssetId,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
    ) -> Result<(), TokenError> {
        let available = self.balance_of(asset, from);
        if available < amount {
            return Err(TokenError::InsufficientBalance { needed: amount, available });
        }
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(asset, to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        *self.balance_mut(asset, from) = available - amount;
        *self.balance_mut(asset, to) = credited;
        Ok(())
    }
}

impl TokenInterface for MemoryToken {
    fn custody(&self) -> &AccountId {
        &self.custody
    }

    fn balance_of(&self, asset: &AssetId, holder: &AccountId) -> u64 {
        self.balances
            .get(asset)
            .and_then(|holders| holders.get(holder))
            .copied()
            .unwrap_or(0)
    }

    fn transfer_from(
        &mut self,
        asset: &AssetId,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
    ) -> Result<(), TokenError> {
        let spender = self.custody.clone();
        let approved = self.allowance(asset, from, &spender);
        if approved < amount {
            return Err(TokenError::InsufficientAllowance { needed: amount, approved });
        }
        self.move_balance(asset, from, to, amount)?;
        self.approve(asset, from, &spender, approved - amount);
        debug!(%asset, %from, %to, amount, "transfer_from");
        Ok(())
    }

    fn transfer(&mut self, asset: &AssetId, to: &AccountId, amount: u64) -> Result<(), TokenError> {
        let from = self.custody.clone();
        self.move_balance(asset, &from, to, amount)?;
        debug!(%asset, %from, %to, amount, "transfer");
        Ok(())
    }
}
