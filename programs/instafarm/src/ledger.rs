//! Farmer positions: pending reward and accumulator checkpoints.

use crate::{
    capabilities::{Authorizer, Clock},
    engine::FarmEngine,
    error::{FarmError, Result},
    instructions::accrual_math::{accumulator_at, pending_since_sync},
    state::{AccountId, FarmerInfo, PoolId, Position},
    store::LedgerStore,
    token::TokenInterface,
};

/// Reward the position could claim against accumulator `acc`, including
/// anything already settled but unpaid.
pub fn pending(position: &Position, acc: u128) -> Result<u64> {
    pending_since_sync(position.amount, acc, position.acc_checkpoint)?
        .checked_add(position.reward_owed)
        .ok_or(FarmError::MathOverflow)
}

/// Mark everything up to `acc` as accounted for the current stake.
pub fn sync(position: &mut Position, acc: u128) {
    position.acc_checkpoint = acc;
}

// Call before any change to position.amount, with the refreshed accumulator.
pub fn settle(position: &mut Position, acc: u128) -> Result<()> {
    let earned = pending_since_sync(position.amount, acc, position.acc_checkpoint)?;
    position.reward_owed = position
        .reward_owed
        .checked_add(earned)
        .ok_or(FarmError::MathOverflow)?;
    sync(position, acc);
    Ok(())
}

impl<S, T, C, A> FarmEngine<S, T, C, A>
where
    S: LedgerStore,
    T: TokenInterface,
    C: Clock,
    A: Authorizer,
{
    /// Reward `farmer` could harvest from `pool_id` right now. Read-only: the
    /// accumulator is previewed, never written.
    pub fn pending_reward(&self, pool_id: PoolId, farmer: &AccountId) -> Result<u64> {
        Ok(self.query_farmer_info(pool_id, farmer)?.pending_reward)
    }

    /// Stake and pending reward of `farmer` in `pool_id`. An absent position
    /// reads as zeros.
    pub fn query_farmer_info(&self, pool_id: PoolId, farmer: &AccountId) -> Result<FarmerInfo> {
        let pool = self.load_pool(pool_id)?;
        let Some(position) = self.store.position(pool_id, farmer) else {
            return Ok(FarmerInfo::default());
        };
        let schedule = self.schedule()?;
        let acc = accumulator_at(&pool, &schedule, self.now())?;
        Ok(FarmerInfo {
            amount: position.amount,
            pending_reward: pending(&position, acc)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::REWARD_PRECISION;

    fn position(amount: u64) -> Position {
        let mut pos = Position::empty(1, AccountId::from("farmer"));
        pos.amount = amount;
        pos
    }

    #[test]
    fn settle_moves_pending_into_owed() {
        let mut pos = position(20);
        let acc = 25 * REWARD_PRECISION;

        settle(&mut pos, acc).unwrap();

        assert_eq!(pos.reward_owed, 500);
        assert_eq!(pos.acc_checkpoint, acc);
        assert_eq!(pending(&pos, acc).unwrap(), 500);
    }

    #[test]
    fn sync_after_payout_zeroes_pending() {
        let mut pos = position(20);
        let acc = 25 * REWARD_PRECISION;
        sync(&mut pos, acc);
        assert_eq!(pending(&pos, acc).unwrap(), 0);
        assert_eq!(pending(&pos, acc + REWARD_PRECISION).unwrap(), 20);
    }

    #[test]
    fn zero_stake_accrues_nothing() {
        let pos = position(0);
        assert_eq!(pending(&pos, u128::MAX / 2).unwrap(), 0);
    }
}
