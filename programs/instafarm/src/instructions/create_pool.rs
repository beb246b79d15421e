use tracing::info;

use crate::{
    capabilities::{Authorizer, Clock},
    engine::FarmEngine,
    error::{FarmError, Result},
    state::{AccountId, AssetId, Pool, PoolId, PoolKind},
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
    /// Append a pool and return its id.
    ///
    /// Existing pools are refreshed first so the larger total weight only
    /// dilutes emission from now on.
    pub fn create_pool(
        &mut self,
        caller: &AccountId,
        stake_asset: AssetId,
        weight: u64,
        kind: PoolKind,
    ) -> Result<PoolId> {
        self.ensure_admin(caller)?;
        let mut schedule = self.schedule()?;
        if weight == 0 {
            return Err(FarmError::ZeroWeight);
        }

        let id = schedule.next_pool_id;
        let next_pool_id = id.checked_add(1).ok_or(FarmError::MathOverflow)?;
        let total_weight = schedule
            .total_weight
            .checked_add(weight)
            .ok_or(FarmError::MathOverflow)?;

        let now = self.now();
        self.refresh_all_pools(&schedule, now)?;
        schedule.next_pool_id = next_pool_id;
        schedule.total_weight = total_weight;

        let pool = Pool::new(id, stake_asset, weight, kind, now);
        info!(pool = id, stake_asset = %pool.stake_asset, weight, %kind, "pool created");
        self.store.put_pool(pool);
        self.store.put_schedule(schedule);
        Ok(id)
    }
}
