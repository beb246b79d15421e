/// Fixed-point scale of `acc_reward_per_share` and position checkpoints.
///
/// A stake of 1 earning one time unit of emission at rate 1 moves the
/// accumulator by exactly this much, so small stakes never truncate to zero.
pub const REWARD_PRECISION: u128 = 1_000_000_000_000;

/// Id handed to the first pool. Id 0 is never a valid pool.
pub const FIRST_POOL_ID: u64 = 1;

/// Identity of the engine's own token account (holds every staked asset).
pub const DEFAULT_CUSTODY: &str = "instafarm-custody";
