//! Engine error type.

use crate::state::PoolId;
use crate::token::TokenError;

/// All errors returned by the farm engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FarmError {
    // ── Lookup ───────────────────────────────────────────────────────────────
    #[error("Pool {0} does not exist")]
    UnknownPool(PoolId),

    // ── Stake movement ───────────────────────────────────────────────────────
    #[error("Withdraw of {requested} exceeds staked amount {staked}")]
    InsufficientStake { requested: u64, staked: u64 },

    /// The stake pull was not approved for enough.
    #[error("Token allowance too low: needed {needed}, approved {approved}")]
    InsufficientAllowance { needed: u64, approved: u64 },

    #[error("Token balance too low: needed {needed}, available {available}")]
    InsufficientBalance { needed: u64, available: u64 },

    /// Reward payout could not be pulled from the treasury.
    #[error("Treasury cannot cover reward payout of {requested}")]
    TreasuryInsufficient { requested: u64 },

    // ── Authorization / lifecycle ────────────────────────────────────────────
    #[error("Caller is not authorized for this operation")]
    Unauthorized,

    #[error("Farm has not been initialized")]
    NotInitialized,

    #[error("Farm is already initialized")]
    AlreadyInitialized,

    // ── Validation ───────────────────────────────────────────────────────────
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Pool weight must be greater than zero")]
    ZeroWeight,

    #[error("Reward rate must be greater than zero")]
    ZeroRewardRate,

    #[error("Math overflow")]
    MathOverflow,
}

impl From<TokenError> for FarmError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InsufficientAllowance { needed, approved } => {
                FarmError::InsufficientAllowance { needed, approved }
            }
            TokenError::InsufficientBalance { needed, available } => {
                FarmError::InsufficientBalance { needed, available }
            }
            TokenError::Overflow => FarmError::MathOverflow,
        }
    }
}

/// Convenience alias so every module can write `Result<T>`.
pub type Result<T> = std::result::Result<T, FarmError>;
