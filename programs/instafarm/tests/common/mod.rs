#![allow(dead_code)]

use instafarm::{
    AccountId, AssetId, FarmEngine, ManualClock, MemoryStore, MemoryToken, PoolId, PoolKind,
    StaticAdmin, TokenInterface,
};

pub type Farm = FarmEngine<MemoryStore, MemoryToken, ManualClock, StaticAdmin>;

pub const RATE: u64 = 100;
pub const TREASURY_SUPPLY: u64 = 1_000_000_000;

pub struct Harness {
    pub farm: Farm,
    pub clock: ManualClock,
    pub admin: AccountId,
    pub treasury: AccountId,
    pub custody: AccountId,
    pub reward: AssetId,
    pub lp: AssetId,
}

impl Harness {
    /// Initialized farm at t=0, rate 100, with a funded and approved treasury.
    pub fn new() -> Self {
        let admin = AccountId::from("ops");
        let treasury = AccountId::from("treasury");
        let custody = AccountId::from("custody");
        let reward = AssetId::from("IST");
        let lp = AssetId::from("IST-LP");

        let clock = ManualClock::at(0);
        let mut token = MemoryToken::new(custody.clone());
        token.mint(&reward, &treasury, TREASURY_SUPPLY).unwrap();
        token.approve(&reward, &treasury, &custody, TREASURY_SUPPLY);

        let mut farm = FarmEngine::new(
            MemoryStore::new(),
            token,
            clock.clone(),
            StaticAdmin(admin.clone()),
        );
        farm.initialize(&admin, RATE, treasury.clone(), reward.clone())
            .unwrap();

        Self { farm, clock, admin, treasury, custody, reward, lp }
    }

    pub fn pool(&mut self, weight: u64) -> PoolId {
        let admin = self.admin.clone();
        let lp = self.lp.clone();
        self.farm
            .create_pool(&admin, lp, weight, PoolKind::SingleAsset)
            .unwrap()
    }

    /// Mint `amount` stake tokens to `name` and approve custody for all of it.
    pub fn farmer(&mut self, name: &str, amount: u64) -> AccountId {
        let farmer = AccountId::from(name);
        let (lp, custody) = (self.lp.clone(), self.custody.clone());
        let token = self.farm.token_mut();
        token.mint(&lp, &farmer, amount).unwrap();
        let approved = token.allowance(&lp, &farmer, &custody);
        token.approve(&lp, &farmer, &custody, approved + amount);
        farmer
    }

    pub fn at(&self, now: u64) {
        self.clock.set(now);
    }

    pub fn stake_balance(&self, holder: &AccountId) -> u64 {
        self.farm.token().balance_of(&self.lp, holder)
    }

    pub fn reward_balance(&self, holder: &AccountId) -> u64 {
        self.farm.token().balance_of(&self.reward, holder)
    }

    pub fn pending(&self, pool: PoolId, farmer: &AccountId) -> u64 {
        self.farm.pending_reward(pool, farmer).unwrap()
    }

    /// Shrink the treasury allowance so payouts fail.
    pub fn freeze_treasury(&mut self) {
        let (reward, treasury, custody) =
            (self.reward.clone(), self.treasury.clone(), self.custody.clone());
        self.farm.token_mut().approve(&reward, &treasury, &custody, 0);
    }

    pub fn thaw_treasury(&mut self) {
        let (reward, treasury, custody) =
            (self.reward.clone(), self.treasury.clone(), self.custody.clone());
        self.farm
            .token_mut()
            .approve(&reward, &treasury, &custody, TREASURY_SUPPLY);
    }
}
