//! Capabilities injected by the host: a time source and an admin check.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::state::AccountId;

/// Monotonic time source, in the same unit the reward rate is expressed in.
///
/// The engine tolerates regressions (elapsed time clamps to zero) but the
/// accrual is only meaningful for non-decreasing readings.
pub trait Clock {
    fn now(&self) -> u64;
}

/// Decides whether a caller may run admin-only operations.
pub trait Authorizer {
    fn is_admin(&self, caller: &AccountId) -> bool;
}

// ─── Clocks ───────────────────────────────────────────────────────────────────

/// Host-driven clock. Clones share the same reading, so a host (or test) can
/// keep a handle and advance time after handing the clock to the engine.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn at(now: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(now)),
        }
    }

    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, delta: u64) {
        self.now.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

// ─── Authorizers ──────────────────────────────────────────────────────────────

/// A single fixed admin identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAdmin(pub AccountId);

impl Authorizer for StaticAdmin {
    fn is_admin(&self, caller: &AccountId) -> bool {
        *caller == self.0
    }
}
