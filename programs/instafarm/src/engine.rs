//! [`FarmEngine`] — owns the ledger tables and the injected collaborators.
//!
//! Every mutating operation takes `&mut self`, so the
//! refresh → settle → transfer → commit sequence of one call can never
//! interleave with another.

use tracing::warn;

use crate::{
    capabilities::{Authorizer, Clock},
    error::{FarmError, Result},
    state::{AccountId, Pool, PoolId, Position, RewardSchedule},
    store::LedgerStore,
    token::TokenInterface,
};

pub struct FarmEngine<S, T, C, A> {
    pub(crate) store: S,
    pub(crate) token: T,
    pub(crate) clock: C,
    pub(crate) auth: A,
}

impl<S, T, C, A> FarmEngine<S, T, C, A>
where
    S: LedgerStore,
    T: TokenInterface,
    C: Clock,
    A: Authorizer,
{
    pub fn new(store: S, token: T, clock: C, auth: A) -> Self {
        Self { store, token, clock, auth }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn token(&self) -> &T {
        &self.token
    }

    /// Direct access to the token collaborator, for hosts that fund accounts
    /// or grant allowances outside the engine.
    pub fn token_mut(&mut self) -> &mut T {
        &mut self.token
    }

    /// Hand the persisted parts back to the host.
    pub fn into_parts(self) -> (S, T) {
        (self.store, self.token)
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn schedule(&self) -> Result<RewardSchedule> {
        self.store.schedule().ok_or(FarmError::NotInitialized)
    }

    /// Every pool in id order, as last committed.
    pub fn query_all_pools(&self) -> Vec<Pool> {
        self.list_pools()
    }

    // ── Shared plumbing ───────────────────────────────────────────────────────

    pub(crate) fn now(&self) -> u64 {
        self.clock.now()
    }

    pub(crate) fn ensure_admin(&self, caller: &AccountId) -> Result<()> {
        if self.auth.is_admin(caller) {
            Ok(())
        } else {
            warn!(%caller, "rejected admin operation");
            Err(FarmError::Unauthorized)
        }
    }

    pub(crate) fn load_pool(&self, pool_id: PoolId) -> Result<Pool> {
        self.store.pool(pool_id).ok_or(FarmError::UnknownPool(pool_id))
    }

    pub(crate) fn load_position(&self, pool_id: PoolId, farmer: &AccountId) -> Position {
        self.store
            .position(pool_id, farmer)
            .unwrap_or_else(|| Position::empty(pool_id, farmer.clone()))
    }

    /// Try to pay the position's settled reward from the treasury.
    ///
    /// A short treasury leaves the reward in `reward_owed`; it is paid by a
    /// later harvest. Returns the amount actually paid.
    pub(crate) fn pay_owed(&mut self, schedule: &RewardSchedule, position: &mut Position) -> u64 {
        let owed = position.reward_owed;
        if owed == 0 {
            return 0;
        }
        match self.token.transfer_from(
            &schedule.reward_asset,
            &schedule.treasury,
            &position.farmer,
            owed,
        ) {
            Ok(()) => {
                position.reward_owed = 0;
                owed
            }
            Err(err) => {
                warn!(
                    pool = position.pool_id,
                    farmer = %position.farmer,
                    owed,
                    %err,
                    "treasury payout deferred"
                );
                0
            }
        }
    }
}
