use crate::{
    constants::REWARD_PRECISION,
    error::{FarmError, Result},
    state::{Pool, RewardSchedule},
};

/// Reward a pool earns over `elapsed` time units:
/// `elapsed × rate × weight / total_weight`.
///
/// Zero when the pool has no weight or no pool has any weight.
pub fn pool_emission(elapsed: u64, rate: u64, weight: u64, total_weight: u64) -> Result<u128> {
    if elapsed == 0 || weight == 0 || total_weight == 0 {
        return Ok(0);
    }
    let gross = (elapsed as u128)
        .checked_mul(rate as u128)
        .ok_or(FarmError::MathOverflow)?
        .checked_mul(weight as u128)
        .ok_or(FarmError::MathOverflow)?;
    Ok(gross / total_weight as u128)
}

/// Accumulator increase for `emission` spread over `total_staked` units,
/// scaled by `REWARD_PRECISION`. Emission into an empty pool is dropped.
pub fn accumulator_delta(emission: u128, total_staked: u64) -> Result<u128> {
    if total_staked == 0 || emission == 0 {
        return Ok(0);
    }
    // Divide-first split keeps `emission × PRECISION` inside u128 for longer:
    // q * P + r * P / staked
    let staked = total_staked as u128;
    let q = emission / staked;
    let r = emission % staked;
    q.checked_mul(REWARD_PRECISION)
        .ok_or(FarmError::MathOverflow)?
        .checked_add(r * REWARD_PRECISION / staked)
        .ok_or(FarmError::MathOverflow)
}

/// Accumulator value of `pool` as of `now`, without touching the pool.
///
/// A clock reading behind `pool.last_update` counts as zero elapsed time.
pub fn accumulator_at(pool: &Pool, schedule: &RewardSchedule, now: u64) -> Result<u128> {
    let elapsed = now.saturating_sub(pool.last_update);
    let emission = pool_emission(
        elapsed,
        schedule.reward_per_time_unit,
        pool.weight,
        schedule.total_weight,
    )?;
    let delta = accumulator_delta(emission, pool.total_staked)?;
    pool.acc_reward_per_share
        .checked_add(delta)
        .ok_or(FarmError::MathOverflow)
}

/// Whole reward units earned since the position was checkpointed:
/// `amount × (acc − checkpoint) / REWARD_PRECISION`.
///
/// Only the growth since the checkpoint is multiplied, so the size of the
/// accumulator itself never limits how much can be staked.
pub fn pending_since_sync(amount: u64, acc: u128, checkpoint: u128) -> Result<u64> {
    let growth = acc.saturating_sub(checkpoint);
    let earned = (amount as u128)
        .checked_mul(growth)
        .ok_or(FarmError::MathOverflow)?
        / REWARD_PRECISION;
    u64::try_from(earned).map_err(|_| FarmError::MathOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AccountId, AssetId, PoolKind};

    fn schedule(rate: u64, total_weight: u64) -> RewardSchedule {
        RewardSchedule {
            reward_per_time_unit: rate,
            treasury: AccountId::from("treasury"),
            reward_asset: AssetId::from("IST"),
            admin: AccountId::from("admin"),
            total_weight,
            next_pool_id: 2,
        }
    }

    fn pool(weight: u64, staked: u64, last_update: u64) -> Pool {
        let mut pool = Pool::new(1, AssetId::from("LP"), weight, PoolKind::SingleAsset, last_update);
        pool.total_staked = staked;
        pool
    }

    #[test]
    fn emission_splits_by_weight() {
        assert_eq!(pool_emission(5, 100, 10, 10).unwrap(), 500);
        assert_eq!(pool_emission(5, 100, 10, 40).unwrap(), 125);
        assert_eq!(pool_emission(5, 100, 0, 40).unwrap(), 0);
        assert_eq!(pool_emission(5, 100, 10, 0).unwrap(), 0);
        assert_eq!(pool_emission(0, 100, 10, 10).unwrap(), 0);
    }

    #[test]
    fn single_unit_stake_does_not_truncate() {
        let delta = accumulator_delta(1, 1).unwrap();
        assert_eq!(delta, REWARD_PRECISION);
        assert_eq!(pending_since_sync(1, delta, 0).unwrap(), 1);
    }

    #[test]
    fn empty_pool_drops_emission() {
        assert_eq!(accumulator_delta(500, 0).unwrap(), 0);
    }

    #[test]
    fn sole_staker_collects_whole_emission() {
        // weight 10 as the only pool, rate 100, 20 staked from t=0, read at t=5
        let p = pool(10, 20, 0);
        let acc = accumulator_at(&p, &schedule(100, 10), 5).unwrap();
        assert_eq!(pending_since_sync(20, acc, 0).unwrap(), 500);
    }

    #[test]
    fn regressed_clock_previews_no_growth() {
        let mut p = pool(10, 20, 50);
        p.acc_reward_per_share = 7;
        assert_eq!(accumulator_at(&p, &schedule(100, 10), 40).unwrap(), 7);
    }

    #[test]
    fn checkpoint_at_acc_zeroes_pending() {
        let acc = 3 * REWARD_PRECISION + 17;
        assert_eq!(pending_since_sync(40, acc, acc).unwrap(), 0);
        assert_eq!(pending_since_sync(40, acc + REWARD_PRECISION, acc).unwrap(), 40);
    }

    #[test]
    fn huge_accumulator_does_not_limit_new_stake() {
        // 1e27 accumulated per share; a fresh 1e12 stake checkpointed at it
        let acc = 1_000_000_000_000_000_000_000_000_000u128;
        assert_eq!(pending_since_sync(1_000_000_000_000, acc, acc).unwrap(), 0);
        assert_eq!(
            pending_since_sync(1_000_000_000_000, acc + REWARD_PRECISION, acc).unwrap(),
            1_000_000_000_000
        );
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(pool_emission(u64::MAX, u64::MAX, u64::MAX, 1), Err(FarmError::MathOverflow));
        assert_eq!(pending_since_sync(u64::MAX, u128::MAX, 0), Err(FarmError::MathOverflow));
    }
}
