mod common;

use common::{Harness, RATE};
use instafarm::{AccountId, FarmError, LedgerStore, PoolId};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Deposit { farmer: usize, pool: usize, amount: u64 },
    Withdraw { farmer: usize, pool: usize, amount: u64 },
    Harvest { farmer: usize, pool: usize },
    Advance(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..3, 0usize..2, 1u64..5_000)
            .prop_map(|(farmer, pool, amount)| Op::Deposit { farmer, pool, amount }),
        (0usize..3, 0usize..2, 1u64..5_000)
            .prop_map(|(farmer, pool, amount)| Op::Withdraw { farmer, pool, amount }),
        (0usize..3, 0usize..2).prop_map(|(farmer, pool)| Op::Harvest { farmer, pool }),
        (0u64..50).prop_map(Op::Advance),
    ]
}

fn check_conservation(h: &Harness, pools: &[PoolId]) {
    let mut staked_everywhere = 0u64;
    for pool in h.farm.list_pools() {
        let sum: u64 = h.farm.store().positions(pool.id).iter().map(|p| p.amount).sum();
        assert_eq!(sum, pool.total_staked, "pool {} total drifted", pool.id);
        staked_everywhere += pool.total_staked;
    }
    assert_eq!(pools.len(), h.farm.list_pools().len());
    assert_eq!(h.stake_balance(&h.custody), staked_everywhere);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    #[test]
    fn ledger_invariants_hold_for_any_sequence(ops in proptest::collection::vec(op(), 1..60)) {
        let mut h = Harness::new();
        let pools = vec![h.pool(10), h.pool(30)];
        let farmers: Vec<AccountId> = (0..3)
            .map(|i| h.farmer(&format!("farmer-{i}"), 1_000_000))
            .collect();

        let mut now = 0u64;
        let mut paid = 0u64;
        let mut last: Vec<(u128, u64)> = h
            .farm
            .list_pools()
            .iter()
            .map(|p| (p.acc_reward_per_share, p.last_update))
            .collect();

        for op in ops {
            match op {
                Op::Deposit { farmer, pool, amount } => {
                    let receipt = h.farm.deposit(&farmers[farmer], pools[pool], amount).unwrap();
                    paid += receipt.reward_paid;
                }
                Op::Withdraw { farmer, pool, amount } => {
                    let staked = h.farm.query_farmer_info(pools[pool], &farmers[farmer]).unwrap().amount;
                    match h.farm.withdraw(&farmers[farmer], pools[pool], amount) {
                        Ok(receipt) => paid += receipt.reward_paid,
                        Err(err) => {
                            prop_assert!(amount > staked);
                            prop_assert_eq!(err, FarmError::InsufficientStake { requested: amount, staked });
                        }
                    }
                }
                Op::Harvest { farmer, pool } => {
                    paid += h.farm.harvest(&farmers[farmer], pools[pool]).unwrap();
                }
                Op::Advance(dt) => {
                    now += dt;
                    h.at(now);
                }
            }

            check_conservation(&h, &pools);
            let current: Vec<(u128, u64)> = h
                .farm
                .list_pools()
                .iter()
                .map(|p| (p.acc_reward_per_share, p.last_update))
                .collect();
            for (before, after) in last.iter().zip(&current) {
                prop_assert!(after.0 >= before.0, "accumulator decreased");
                prop_assert!(after.1 >= before.1, "last_update decreased");
            }
            last = current;
        }

        // Nobody is ever paid more than was emitted.
        let outstanding: u64 = pools
            .iter()
            .flat_map(|&pool| farmers.iter().map(move |f| (pool, f)))
            .map(|(pool, f)| h.pending(pool, f))
            .sum();
        prop_assert!(paid + outstanding <= now * RATE);
    }

    #[test]
    fn equal_time_rewards_follow_stake_ratio(
        a in 1u64..1_000_000,
        b in 1u64..1_000_000,
        elapsed in 1u64..1_000,
    ) {
        let mut h = Harness::new();
        let pool = h.pool(10);
        let fa = h.farmer("a", a);
        let fb = h.farmer("b", b);
        h.farm.deposit(&fa, pool, a).unwrap();
        h.farm.deposit(&fb, pool, b).unwrap();

        h.at(elapsed);
        let emission = (elapsed * RATE) as u128;
        let exact_a = emission * a as u128 / (a + b) as u128;
        let exact_b = emission * b as u128 / (a + b) as u128;

        let pa = h.pending(pool, &fa) as u128;
        let pb = h.pending(pool, &fb) as u128;
        prop_assert!(exact_a - pa <= 1, "a: {} vs {}", pa, exact_a);
        prop_assert!(exact_b - pb <= 1, "b: {} vs {}", pb, exact_b);
    }

    #[test]
    fn second_harvest_at_same_time_is_zero(stake in 1u64..1_000_000, at in 0u64..10_000) {
        let mut h = Harness::new();
        let pool = h.pool(7);
        let f = h.farmer("f", stake);
        h.farm.deposit(&f, pool, stake).unwrap();
        h.at(at);
        h.farm.harvest(&f, pool).unwrap();
        prop_assert_eq!(h.farm.harvest(&f, pool).unwrap(), 0);
    }
}
