//! Pool table: listing and accumulator refresh.

use tracing::debug;

use crate::{
    capabilities::{Authorizer, Clock},
    engine::FarmEngine,
    error::Result,
    instructions::accrual_math::accumulator_at,
    state::{Pool, RewardSchedule},
    store::LedgerStore,
    token::TokenInterface,
};

/// Bring `pool`'s accumulator up to `now`.
///
/// Emission into an empty pool is dropped. `last_update` never moves
/// backwards, even if the clock does.
pub fn update_accumulator(pool: &mut Pool, schedule: &RewardSchedule, now: u64) -> Result<()> {
    let acc = accumulator_at(pool, schedule, now)?;
    if acc != pool.acc_reward_per_share {
        debug!(
            pool = pool.id,
            from = pool.last_update,
            to = now,
            delta = acc - pool.acc_reward_per_share,
            "accumulator advanced"
        );
    }
    pool.acc_reward_per_share = acc;
    pool.last_update = pool.last_update.max(now);
    Ok(())
}

impl<S, T, C, A> FarmEngine<S, T, C, A>
where
    S: LedgerStore,
    T: TokenInterface,
    C: Clock,
    A: Authorizer,
{
    pub fn list_pools(&self) -> Vec<Pool> {
        self.store
            .pool_ids()
            .into_iter()
            .filter_map(|id| self.store.pool(id))
            .collect()
    }

    /// Refresh every pool's accumulator at the current time. Changes no
    /// economics, so any caller may run it.
    pub fn mass_update_pools(&mut self) -> Result<()> {
        let schedule = self.schedule()?;
        let now = self.now();
        self.refresh_all_pools(&schedule, now)
    }

    /// Refresh every pool under `schedule`. Nothing is written unless every
    /// pool refreshes cleanly.
    pub(crate) fn refresh_all_pools(&mut self, schedule: &RewardSchedule, now: u64) -> Result<()> {
        let mut refreshed = Vec::new();
        for mut pool in self.list_pools() {
            update_accumulator(&mut pool, schedule, now)?;
            refreshed.push(pool);
        }
        for pool in refreshed {
            self.store.put_pool(pool);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::REWARD_PRECISION;
    use crate::state::{AccountId, AssetId, PoolKind};

    fn schedule() -> RewardSchedule {
        RewardSchedule {
            reward_per_time_unit: 100,
            treasury: AccountId::from("treasury"),
            reward_asset: AssetId::from("IST"),
            admin: AccountId::from("admin"),
            total_weight: 10,
            next_pool_id: 2,
        }
    }

    #[test]
    fn empty_pool_only_moves_clock() {
        let mut pool = Pool::new(1, AssetId::from("LP"), 10, PoolKind::SingleAsset, 0);
        update_accumulator(&mut pool, &schedule(), 9).unwrap();
        assert_eq!(pool.acc_reward_per_share, 0);
        assert_eq!(pool.last_update, 9);
    }

    #[test]
    fn staked_pool_accrues() {
        let mut pool = Pool::new(1, AssetId::from("LP"), 10, PoolKind::SingleAsset, 0);
        pool.total_staked = 20;
        update_accumulator(&mut pool, &schedule(), 5).unwrap();
        assert_eq!(pool.acc_reward_per_share, 25 * REWARD_PRECISION);
    }

    #[test]
    fn clock_regression_is_clamped() {
        let mut pool = Pool::new(1, AssetId::from("LP"), 10, PoolKind::SingleAsset, 30);
        pool.total_staked = 20;
        pool.acc_reward_per_share = 4;
        update_accumulator(&mut pool, &schedule(), 12).unwrap();
        assert_eq!(pool.acc_reward_per_share, 4);
        assert_eq!(pool.last_update, 30);
    }
}
