//! InstaFarm — multi-pool staking ledger with weighted reward emission.
//!
//! A fixed reward quantity is emitted per time unit and split across pools by
//! weight, then across the farmers of each pool by stake. Accounting is O(1)
//! per operation: each pool carries an accumulated-reward-per-share value and
//! each position a checkpoint of it taken at its last settlement.
//!
//! Operations:
//!   initialize        — write the reward schedule (rate, treasury, reward asset)
//!   create_pool       — admin: append a weighted pool for a stake asset
//!   set_reward_rate   — admin: change emission after settling every pool
//!   set_pool_weight   — admin: reweight (or pause with 0) a pool
//!   mass_update_pools — refresh every pool's accumulator
//!   deposit           — stake into a pool; settles reward first
//!   withdraw          — unstake from a pool; settles reward first
//!   harvest           — pay out pending reward from the treasury
//!   query_farmer_info / pending_reward / list_pools — read-only views
//!
//! ```
//! use instafarm::{
//!     AccountId, AssetId, FarmEngine, ManualClock, MemoryStore, MemoryToken, PoolKind,
//!     StaticAdmin,
//! };
//!
//! let admin = AccountId::from("ops");
//! let farmer = AccountId::from("alice");
//! let treasury = AccountId::from("treasury");
//! let custody = AccountId::from("custody");
//! let (lp, ist) = (AssetId::from("LP"), AssetId::from("IST"));
//!
//! let clock = ManualClock::at(0);
//! let mut token = MemoryToken::new(custody.clone());
//! token.mint(&lp, &farmer, 20).unwrap();
//! token.approve(&lp, &farmer, &custody, 20);
//! token.mint(&ist, &treasury, 1_000).unwrap();
//! token.approve(&ist, &treasury, &custody, 1_000);
//!
//! let mut farm = FarmEngine::new(MemoryStore::new(), token, clock.clone(), StaticAdmin(admin.clone()));
//! farm.initialize(&admin, 100, treasury, ist).unwrap();
//! let pool = farm.create_pool(&admin, lp, 10, PoolKind::SingleAsset).unwrap();
//!
//! farm.deposit(&farmer, pool, 20).unwrap();
//! clock.set(5);
//! assert_eq!(farm.pending_reward(pool, &farmer).unwrap(), 500);
//! assert_eq!(farm.harvest(&farmer, pool).unwrap(), 500);
//! ```

pub mod capabilities;
pub mod constants;
pub mod engine;
pub mod error;
pub mod instructions;
pub mod ledger;
pub mod registry;
pub mod state;
pub mod store;
pub mod token;

pub use capabilities::{Authorizer, Clock, ManualClock, StaticAdmin};
pub use constants::*;
pub use engine::FarmEngine;
pub use error::{FarmError, Result};
pub use state::*;
pub use store::{LedgerStore, MemoryStore};
pub use token::{MemoryToken, TokenError, TokenInterface};
