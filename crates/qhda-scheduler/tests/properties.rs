//! Property tests for scheduling invariants

use proptest::prelude::*;
use qhda_scheduler::fixtures::OrderGenerator;
use qhda_scheduler::{ColorerKind, ConflictGraph, Order, Scheduler, SchedulerConfig};
use std::collections::HashSet;

const KEYS: [&str; 6] = ["pool_A", "pool_B", "pool_C", "account_1", "account_2", "account_3"];

fn order_strategy() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    (
        prop::collection::vec(0..KEYS.len(), 0..3),
        prop::collection::vec(0..KEYS.len(), 0..3),
    )
}

fn batch_strategy(max: usize) -> impl Strategy<Value = Vec<Order>> {
    prop::collection::vec(order_strategy(), 0..max).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (reads, writes))| {
                let mut order = Order::new(format!("order_{i}"));
                for r in reads {
                    order = order.reading(KEYS[r]);
                }
                for w in writes {
                    order = order.writing(KEYS[w]);
                }
                order
            })
            .collect()
    })
}

fn colorer_strategy() -> impl Strategy<Value = ColorerKind> {
    prop_oneof![
        Just(ColorerKind::Greedy),
        Just(ColorerKind::Dsatur),
        Just(ColorerKind::Annealing),
    ]
}

/// Property: every order lands in exactly one slot, and no slot is empty
#[test]
fn prop_exactly_once_coverage() {
    proptest!(|(orders in batch_strategy(40), kind in colorer_strategy())| {
        let scheduler = Scheduler::new(SchedulerConfig::default().with_colorer(kind));
        let report = scheduler.schedule(&orders).unwrap();

        let mut seen = HashSet::new();
        for slot in report.schedule.slots() {
            prop_assert!(!slot.is_empty(), "empty slot {}", slot.label());
            for id in &slot.orders {
                prop_assert!(seen.insert(id.clone()), "{} scheduled twice", id);
            }
        }
        prop_assert_eq!(seen.len(), orders.len());
    });
}

/// Property: no two conflicting orders share a slot
#[test]
fn prop_slot_safety() {
    proptest!(|(orders in batch_strategy(40), kind in colorer_strategy())| {
        let scheduler = Scheduler::new(SchedulerConfig::default().with_colorer(kind));
        let report = scheduler.schedule(&orders).unwrap();

        for slot in report.schedule.slots() {
            let members: Vec<&Order> = orders
                .iter()
                .filter(|o| slot.orders.contains(&o.id))
                .collect();
            for (i, a) in members.iter().enumerate() {
                for b in &members[i + 1..] {
                    prop_assert!(!a.conflicts_with(b), "{} and {} share a slot", a.id, b.id);
                }
            }
        }
        prop_assert_eq!(report.comparison.achieved_conflicts_remaining, 0);
    });
}

/// Property: never more slots than orders, reduction within [0, 100]
#[test]
fn prop_bounded_slot_count() {
    proptest!(|(orders in batch_strategy(40), kind in colorer_strategy())| {
        let scheduler = Scheduler::new(SchedulerConfig::default().with_colorer(kind));
        let report = scheduler.schedule(&orders).unwrap();

        prop_assert!(report.total_slots <= orders.len());
        prop_assert!(!orders.is_empty() || report.total_slots == 0);
        prop_assert!((0.0..=100.0).contains(&report.comparison.reduction_pct));
    });
}

/// Property: identical input gives identical schedules
#[test]
fn prop_deterministic() {
    proptest!(|(orders in batch_strategy(30), kind in colorer_strategy())| {
        let config = SchedulerConfig::default().with_colorer(kind);
        let first = Scheduler::new(config.clone()).schedule(&orders).unwrap();
        let second = Scheduler::new(config).schedule(&orders).unwrap();
        prop_assert_eq!(first.schedule, second.schedule);
    });
}

/// Property: the conflict predicate is symmetric
#[test]
fn prop_conflict_symmetry() {
    proptest!(|(orders in batch_strategy(12))| {
        for a in &orders {
            for b in &orders {
                prop_assert_eq!(a.conflicts_with(b), b.conflicts_with(a));
            }
        }
    });
}

/// Property: indexed and pairwise construction find the same edges
#[test]
fn prop_indexed_matches_pairwise() {
    proptest!(|(orders in batch_strategy(60), parallel in any::<bool>())| {
        let pairwise = ConflictGraph::build_pairwise(&orders, parallel);
        let indexed = ConflictGraph::build_indexed(&orders, parallel);
        prop_assert_eq!(pairwise, indexed);
    });
}

/// Property: read-only generated batches fit in a single slot
#[test]
fn prop_read_only_batches_use_one_slot() {
    proptest!(|(count in 1usize..50, pools in 1usize..8, seed in any::<u64>())| {
        let orders = OrderGenerator::new()
            .with_pool_count(pools)
            .with_read_only_ratio(1.0)
            .with_seed(seed)
            .generate(count);
        let report = Scheduler::default().schedule(&orders).unwrap();
        prop_assert_eq!(report.total_conflicts, 0);
        prop_assert_eq!(report.total_slots, 1);
    });
}
