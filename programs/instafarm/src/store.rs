//! Durable key-value state behind the engine.
//!
//! Three tables: the schedule record, pools keyed by id, and positions keyed
//! by `(pool id, farmer)`. Reads hand out owned copies; the engine mutates
//! its copies and writes them back once an operation commits.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::{AccountId, Pool, PoolId, Position, RewardSchedule};

pub trait LedgerStore {
    fn schedule(&self) -> Option<RewardSchedule>;
    fn put_schedule(&mut self, schedule: RewardSchedule);

    fn pool(&self, id: PoolId) -> Option<Pool>;
    fn put_pool(&mut self, pool: Pool);
    /// Every pool id, ascending.
    fn pool_ids(&self) -> Vec<PoolId>;

    fn position(&self, pool_id: PoolId, farmer: &AccountId) -> Option<Position>;
    fn put_position(&mut self, position: Position);
    /// Every position recorded for a pool. Never used on the hot path.
    fn positions(&self, pool_id: PoolId) -> Vec<Position>;
}

/// `BTreeMap`-backed store. Serializes to a stable JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    schedule: Option<RewardSchedule>,
    pools: BTreeMap<PoolId, Pool>,
    positions: BTreeMap<PoolId, BTreeMap<AccountId, Position>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryStore {
    fn schedule(&self) -> Option<RewardSchedule> {
        self.schedule.clone()
    }

    fn put_schedule(&mut self, schedule: RewardSchedule) {
        self.schedule = Some(schedule);
    }

    fn pool(&self, id: PoolId) -> Option<Pool> {
        self.pools.get(&id).cloned()
    }

    fn put_pool(&mut self, pool: Pool) {
        self.pools.insert(pool.id, pool);
    }

    fn pool_ids(&self) -> Vec<PoolId> {
        self.pools.keys().copied().collect()
    }

    fn position(&self, pool_id: PoolId, farmer: &AccountId) -> Option<Position> {
        self.positions
            .get(&pool_id)
            .and_then(|farmers| farmers.get(farmer))
            .cloned()
    }

    fn put_position(&mut self, position: Position) {
        self.positions
            .entry(position.pool_id)
            .or_default()
            .insert(position.farmer.clone(), position);
    }

    fn positions(&self, pool_id: PoolId) -> Vec<Position> {
        self.positions
            .get(&pool_id)
            .map(|farmers| farmers.values().cloned().collect())
            .unwrap_or_default()
    }
}
