use tracing::{info, warn};

use crate::{
    capabilities::{Authorizer, Clock},
    engine::FarmEngine,
    error::{FarmError, Result},
    ledger::{pending, sync},
    registry::update_accumulator,
    state::{AccountId, PoolId},
    store::LedgerStore,
    token::{TokenError, TokenInterface},
};

impl<S, T, C, A> FarmEngine<S, T, C, A>
where
    S: LedgerStore,
    T: TokenInterface,
    C: Clock,
    A: Authorizer,
{
    /// Pay `farmer` every reward unit earned in `pool_id` and return the
    /// amount paid.
    ///
    /// The accumulator refresh is committed even when the payout fails: that
    /// emission has already happened. On failure the position is untouched
    /// and the reward stays pending.
    pub fn harvest(&mut self, farmer: &AccountId, pool_id: PoolId) -> Result<u64> {
        let schedule = self.schedule()?;
        let mut pool = self.load_pool(pool_id)?;
        update_accumulator(&mut pool, &schedule, self.now())?;
        let acc = pool.acc_reward_per_share;
        self.store.put_pool(pool);

        let Some(mut position) = self.store.position(pool_id, farmer) else {
            return Ok(0);
        };
        let reward = pending(&position, acc)?;
        if reward == 0 {
            return Ok(0);
        }

        position.reward_owed = 0;
        sync(&mut position, acc);

        // Pull reward from treasury to farmer
        self.token
            .transfer_from(&schedule.reward_asset, &schedule.treasury, farmer, reward)
            .map_err(|err| {
                warn!(pool = pool_id, %farmer, reward, %err, "harvest payout failed");
                match err {
                    TokenError::Overflow => FarmError::MathOverflow,
                    TokenError::InsufficientAllowance { .. }
                    | TokenError::InsufficientBalance { .. } => {
                        FarmError::TreasuryInsufficient { requested: reward }
                    }
                }
            })?;
        self.store.put_position(position);

        info!(pool = pool_id, %farmer, reward, "harvest");
        Ok(reward)
    }
}
