use tracing::{info, warn};

use crate::{
    capabilities::{Authorizer, Clock},
    engine::FarmEngine,
    error::{FarmError, Result},
    ledger::{settle, sync},
    registry::update_accumulator,
    state::{AccountId, PoolId, StakeReceipt},
    store::LedgerStore,
    token::TokenInterface,
};

impl<S, T, C, A> FarmEngine<S, T, C, A>
where
    S: LedgerStore,
    T: TokenInterface,
    C: Clock,
    A: Authorizer,
{
    /// Return `amount` of staked asset to `farmer`, paying out the reward
    /// earned so far.
    ///
    /// The stake check runs before the accumulator is touched: a rejected
    /// withdraw leaves pool and position exactly as they were.
    pub fn withdraw(&mut self, farmer: &AccountId, pool_id: PoolId, amount: u64) -> Result<StakeReceipt> {
        if amount == 0 {
            return Err(FarmError::ZeroAmount);
        }
        let schedule = self.schedule()?;
        let mut pool = self.load_pool(pool_id)?;
        let mut position = self.load_position(pool_id, farmer);
        if position.amount < amount {
            warn!(pool = pool_id, %farmer, amount, staked = position.amount, "withdraw rejected");
            return Err(FarmError::InsufficientStake {
                requested: amount,
                staked: position.amount,
            });
        }

        update_accumulator(&mut pool, &schedule, self.now())?;
        let acc = pool.acc_reward_per_share;
        settle(&mut position, acc)?;

        position.amount -= amount;
        // total_staked >= position.amount always
        pool.total_staked = pool
            .total_staked
            .checked_sub(amount)
            .ok_or(FarmError::MathOverflow)?;
        sync(&mut position, acc);

        // Push stake from custody back to farmer
        self.token
            .transfer(&pool.stake_asset, farmer, amount)
            .map_err(|err| {
                warn!(pool = pool_id, %farmer, amount, %err, "custody transfer failed");
                FarmError::from(err)
            })?;

        self.store.put_pool(pool);
        let reward_paid = self.pay_owed(&schedule, &mut position);
        let receipt = StakeReceipt {
            amount,
            staked: position.amount,
            reward_paid,
            reward_owed: position.reward_owed,
        };
        self.store.put_position(position);

        info!(
            pool = pool_id,
            %farmer,
            amount,
            staked = receipt.staked,
            reward_paid,
            "withdraw"
        );
        Ok(receipt)
    }
}
