pub mod accrual_math;
pub mod initialize;
pub mod create_pool;
pub mod set_reward_rate;
pub mod set_pool_weight;
pub mod deposit;
pub mod withdraw;
pub mod harvest;
