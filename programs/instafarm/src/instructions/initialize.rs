use tracing::info;

use crate::{
    capabilities::{Authorizer, Clock},
    constants::FIRST_POOL_ID,
    engine::FarmEngine,
    error::{FarmError, Result},
    state::{AccountId, AssetId, RewardSchedule},
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
    /// Write the reward schedule. One time only; `caller` becomes the
    /// recorded admin.
    pub fn initialize(
        &mut self,
        caller: &AccountId,
        reward_per_time_unit: u64,
        treasury: AccountId,
        reward_asset: AssetId,
    ) -> Result<RewardSchedule> {
        self.ensure_admin(caller)?;
        if self.store.schedule().is_some() {
            return Err(FarmError::AlreadyInitialized);
        }
        if reward_per_time_unit == 0 {
            return Err(FarmError::ZeroRewardRate);
        }

        let schedule = RewardSchedule {
            reward_per_time_unit,
            treasury,
            reward_asset,
            admin: caller.clone(),
            total_weight: 0,
            next_pool_id: FIRST_POOL_ID,
        };
        self.store.put_schedule(schedule.clone());

        info!(
            rate = reward_per_time_unit,
            treasury = %schedule.treasury,
            reward_asset = %schedule.reward_asset,
            custody = %self.token.custody(),
            "farm initialized"
        );
        Ok(schedule)
    }
}
