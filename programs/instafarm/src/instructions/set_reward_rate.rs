use tracing::info;

use crate::{
    capabilities::{Authorizer, Clock},
    engine::FarmEngine,
    error::{FarmError, Result},
    state::AccountId,
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
    /// Change the global emission rate.
    ///
    /// Every pool is settled at the old rate up to now before the switch, so
    /// the new rate never applies to time that already elapsed.
    pub fn set_reward_rate(&mut self, caller: &AccountId, reward_per_time_unit: u64) -> Result<()> {
        self.ensure_admin(caller)?;
        let mut schedule = self.schedule()?;
        if reward_per_time_unit == 0 {
            return Err(FarmError::ZeroRewardRate);
        }

        let now = self.now();
        self.refresh_all_pools(&schedule, now)?;

        let previous = schedule.reward_per_time_unit;
        schedule.reward_per_time_unit = reward_per_time_unit;
        self.store.put_schedule(schedule);
        info!(from = previous, to = reward_per_time_unit, "reward rate changed");
        Ok(())
    }
}
