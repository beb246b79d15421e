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
    /// Stake `amount` of the pool's asset for `farmer`.
    ///
    /// Reward earned on the old stake is settled before the stake changes, so
    /// the new units earn nothing for time that already elapsed. If the stake
    /// pull fails nothing is written.
    pub fn deposit(&mut self, farmer: &AccountId, pool_id: PoolId, amount: u64) -> Result<StakeReceipt> {
        if amount == 0 {
            return Err(FarmError::ZeroAmount);
        }
        let schedule = self.schedule()?;
        let mut pool = self.load_pool(pool_id)?;
        let mut position = self.load_position(pool_id, farmer);

        update_accumulator(&mut pool, &schedule, self.now())?;
        let acc = pool.acc_reward_per_share;
        settle(&mut position, acc)?;

        position.amount = position
            .amount
            .checked_add(amount)
            .ok_or(FarmError::MathOverflow)?;
        pool.total_staked = pool
            .total_staked
            .checked_add(amount)
            .ok_or(FarmError::MathOverflow)?;
        sync(&mut position, acc);

        // Pull stake from farmer into custody
        let custody = self.token.custody().clone();
        self.token
            .transfer_from(&pool.stake_asset, farmer, &custody, amount)
            .map_err(|err| {
                warn!(pool = pool_id, %farmer, amount, %err, "deposit rejected");
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
            "deposit"
        );
        Ok(receipt)
    }
}
