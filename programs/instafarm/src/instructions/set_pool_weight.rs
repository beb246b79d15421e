use tracing::info;

use crate::{
    capabilities::{Authorizer, Clock},
    engine::FarmEngine,
    error::{FarmError, Result},
    state::{AccountId, PoolId},
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
    /// Reweight a pool. Zero pauses its emission without removing it.
    pub fn set_pool_weight(&mut self, caller: &AccountId, pool_id: PoolId, weight: u64) -> Result<()> {
        self.ensure_admin(caller)?;
        let mut schedule = self.schedule()?;
        let previous = self.load_pool(pool_id)?.weight;

        let total_weight = schedule
            .total_weight
            .checked_sub(previous)
            .and_then(|w| w.checked_add(weight))
            .ok_or(FarmError::MathOverflow)?;

        // Settle every pool under the old weights first.
        let now = self.now();
        self.refresh_all_pools(&schedule, now)?;
        schedule.total_weight = total_weight;

        let mut pool = self.load_pool(pool_id)?;
        pool.weight = weight;
        self.store.put_pool(pool);
        self.store.put_schedule(schedule);
        info!(pool = pool_id, from = previous, to = weight, "pool weight changed");
        Ok(())
    }
}
