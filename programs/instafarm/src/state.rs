use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable pool identifier, assigned in creation order starting at
/// [`FIRST_POOL_ID`](crate::constants::FIRST_POOL_ID).
pub type PoolId = u64;

// ─── Identities ───────────────────────────────────────────────────────────────

/// Opaque identity of a token holder: a farmer, the treasury, the admin or
/// the engine's custody account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a fungible asset (stake asset or reward asset).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Pool ─────────────────────────────────────────────────────────────────────

/// Asset class a pool accepts. Display only; accrual math ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    /// A single fungible token.
    #[default]
    SingleAsset,
    /// A paired-liquidity share token.
    Liquidity,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolKind::SingleAsset => f.write_str("single-asset"),
            PoolKind::Liquidity => f.write_str("liquidity"),
        }
    }
}

/// A weighted bucket of stake sharing the global emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    pub stake_asset: AssetId,
    /// Share of the global emission relative to `RewardSchedule::total_weight`
    pub weight: u64,
    pub kind: PoolKind,
    /// Sum of every position's `amount` in this pool
    pub total_staked: u64,
    /// Cumulative reward per staked unit, scaled by `REWARD_PRECISION`
    pub acc_reward_per_share: u128,
    /// Time unit at which the accumulator was last refreshed
    pub last_update: u64,
}

impl Pool {
    pub fn new(id: PoolId, stake_asset: AssetId, weight: u64, kind: PoolKind, now: u64) -> Self {
        Self {
            id,
            stake_asset,
            weight,
            kind,
            total_staked: 0,
            acc_reward_per_share: 0,
            last_update: now,
        }
    }
}

// ─── Position ─────────────────────────────────────────────────────────────────

/// One farmer's stake in one pool. Never deleted, only drained to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub pool_id: PoolId,
    pub farmer: AccountId,
    /// Staked units of the pool's stake asset
    pub amount: u64,
    /// Pool `acc_reward_per_share` when this position was last settled
    pub acc_checkpoint: u128,
    /// Settled reward the treasury could not pay out yet
    pub reward_owed: u64,
}

impl Position {
    pub fn empty(pool_id: PoolId, farmer: AccountId) -> Self {
        Self {
            pool_id,
            farmer,
            amount: 0,
            acc_checkpoint: 0,
            reward_owed: 0,
        }
    }
}

// ─── RewardSchedule ───────────────────────────────────────────────────────────

/// Process-wide emission parameters. Written once by `initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSchedule {
    /// Reward units emitted per elapsed time unit across all pools
    pub reward_per_time_unit: u64,
    /// Holder of the reward supply; payouts are pulled from here
    pub treasury: AccountId,
    pub reward_asset: AssetId,
    /// Identity that initialized the farm
    pub admin: AccountId,
    /// Sum of all pool weights
    pub total_weight: u64,
    pub next_pool_id: PoolId,
}

// ─── Query results ────────────────────────────────────────────────────────────

/// Read-only view of a farmer's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FarmerInfo {
    pub amount: u64,
    pub pending_reward: u64,
}

/// Outcome of a deposit or withdraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeReceipt {
    /// Stake units moved by the operation
    pub amount: u64,
    /// Farmer's stake after the operation
    pub staked: u64,
    /// Reward paid from the treasury as part of the operation
    pub reward_paid: u64,
    /// Reward settled but still unpaid (treasury short). The stake movement
    /// is committed regardless; only this payout is deferred to a later
    /// harvest, so a deposit or withdraw is not all-or-nothing in this case.
    pub reward_owed: u64,
}
