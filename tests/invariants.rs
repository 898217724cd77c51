//! Property-style checks for the invariants in spec §8. Each test targets
//! one numbered invariant; where a stage already has focused unit tests
//! in its own module, these instead check the property end to end across
//! stage boundaries.

use brickbuy::builtin::Cancellation;
use brickbuy::config::{Mode, Options};
use brickbuy::core::Core;
use brickbuy::item::{Condition, Item};
use brickbuy::offer::{Offer, OfferCondition};
use brickbuy::parts::PartsNeeded;
use rust_decimal_macros::dec;
use std::collections::HashSet;

fn offer(shop: &str, price: rust_decimal::Decimal, qty: u32) -> Offer {
    Offer::new(shop, price, qty, OfferCondition::New, "US", dec!(0))
}

/// Invariant 1: the final allocation supplies at least as much of every
/// item as was demanded.
#[test]
fn invariant_allocation_covers_demand() {
    let item = Item::part("3001", Condition::New, 5);
    let mut parts = PartsNeeded::new();
    parts.add(item.clone(), 7);

    let options = Options::builder().mode(Mode::Builtin).consider_shops(5).build();
    let result = Core::new(parts, options)
        .unwrap()
        .filter(|_| vec![offer("X", dec!(1.00), 20), offer("Y", dec!(1.10), 20)])
        .unwrap()
        .select_pool()
        .unwrap()
        .solve(&Cancellation::new())
        .unwrap()
        .into_result();

    let supplied: u32 = result
        .allocation
        .iter()
        .filter(|line| line.item_key == item.to_string())
        .map(|line| line.quantity)
        .sum();
    assert!(supplied >= 7);
}

/// Invariant 2: every shop named in the allocation is a member of the
/// candidate pool (critical or supplemental), never an unselected seller.
#[test]
fn invariant_allocation_uses_only_pool_sellers() {
    let item = Item::part("3001", Condition::New, 5);
    let mut parts = PartsNeeded::new();
    parts.add(item.clone(), 2);

    let options = Options::builder().mode(Mode::Builtin).consider_shops(2).build();
    let filtered = brickbuy::filter::filter_offers(
        &parts,
        |_| {
            vec![
                offer("Cheapest", dec!(1.00), 10),
                offer("Pricier", dec!(1.50), 10),
                offer("NeverConsidered", dec!(2.00), 10),
            ]
        },
        &options,
    )
    .unwrap();
    let pool = brickbuy::selector::select_candidates(&filtered, &parts, &options).unwrap();
    let allowed = pool.shop_names();

    let restricted = filtered.restricted_to(&allowed);
    let solution = brickbuy::builtin::solve(&pool, &restricted, &parts, 1, &Cancellation::new()).unwrap();

    for shop in &solution.shops_used {
        assert!(allowed.contains(shop));
    }
}

/// Invariant 3: solving the same inputs twice produces the same grand
/// total (the builtin optimizer is deterministic).
#[test]
fn invariant_grand_total_is_reproducible() {
    let item = Item::part("3001", Condition::New, 5);
    let mut parts = PartsNeeded::new();
    parts.add(item.clone(), 3);

    let run = || {
        let options = Options::builder().mode(Mode::Builtin).consider_shops(5).build();
        Core::new(parts.clone(), options)
            .unwrap()
            .filter(|_| vec![offer("X", dec!(1.00), 10), offer("Y", dec!(0.90), 10)])
            .unwrap()
            .select_pool()
            .unwrap()
            .solve(&Cancellation::new())
            .unwrap()
            .into_result()
            .grand_net_total()
    };

    assert_eq!(run(), run());
}

/// Invariant 4: the built-in optimizer finds the true minimum over every
/// subset of a small candidate pool, not just a greedy approximation.
#[test]
fn invariant_builtin_finds_global_minimum() {
    let item = Item::part("3001", Condition::New, 5);
    let mut parts = PartsNeeded::new();
    parts.add(item.clone(), 5);

    let options = Options::builder().mode(Mode::Builtin).consider_shops(10).build();
    let filtered = brickbuy::filter::filter_offers(
        &parts,
        |_| {
            vec![
                offer("Mid", dec!(1.00), 10),
                offer("Cheapest", dec!(0.50), 10),
                offer("Expensive", dec!(3.00), 10),
            ]
        },
        &options,
    )
    .unwrap();
    let pool = brickbuy::selector::select_candidates(&filtered, &parts, &options).unwrap();

    let solution = brickbuy::builtin::solve(&pool, &filtered, &parts, 1, &Cancellation::new()).unwrap();
    assert_eq!(solution.net_total, dec!(2.50));
}

/// Invariant 5: filtering an already-filtered offer list is a no-op.
#[test]
fn invariant_filter_is_idempotent() {
    let item = Item::part("3001", Condition::New, 5);
    let mut parts = PartsNeeded::new();
    parts.add(item.clone(), 1);

    let options = Options::builder().build();
    let raw = |_: &Item| vec![offer("X", dec!(1.00), 5), offer("Y", dec!(0.90), 5)];

    let once = brickbuy::filter::filter_offers(&parts, raw, &options).unwrap();
    let twice_input: Vec<Offer> = once.get(&item).to_vec();
    let twice = brickbuy::filter::filter_offers(&parts, move |_| twice_input.clone(), &options).unwrap();

    assert_eq!(once.offer_count(&item), twice.offer_count(&item));
}

/// Invariant 6: the parts aggregator never lets a subtracted quantity go
/// negative, and zeroed items disappear from the result entirely.
#[test]
fn invariant_subtract_floors_at_zero_and_drops_empty_entries() {
    let item = Item::part("3001", Condition::New, 5);
    let mut demand = PartsNeeded::new();
    demand.add(item.clone(), 3);
    let mut inventory = PartsNeeded::new();
    inventory.add(item.clone(), 100);

    let remaining = demand.subtract(&inventory);
    assert_eq!(remaining.get(&item), 0);
    assert!(!remaining.items().any(|i| i == &item));
}

/// Invariant 7: selecting a candidate pool from the same filtered offers
/// twice produces the same critical/supplemental classification.
#[test]
fn invariant_candidate_selection_is_deterministic() {
    let item = Item::part("3001", Condition::New, 5);
    let mut parts = PartsNeeded::new();
    parts.add(item.clone(), 2);

    let options = Options::builder().consider_shops(3).build();
    let raw = |_: &Item| vec![offer("X", dec!(1.00), 5), offer("Y", dec!(1.10), 5), offer("Z", dec!(1.20), 5)];
    let filtered = brickbuy::filter::filter_offers(&parts, raw, &options).unwrap();

    let pool_a = brickbuy::selector::select_candidates(&filtered, &parts, &options).unwrap();
    let pool_b = brickbuy::selector::select_candidates(&filtered, &parts, &options).unwrap();

    let critical_a: HashSet<String> = pool_a.critical().map(|s| s.shop_name.clone()).collect();
    let critical_b: HashSet<String> = pool_b.critical().map(|s| s.shop_name.clone()).collect();
    assert_eq!(critical_a, critical_b);
}

/// Invariant 8: two LP solves over identical inputs and `cachedir` hash to
/// the same model filename, so the second run can reuse the first's
/// artifact instead of re-emitting and re-solving.
#[test]
fn invariant_lp_cache_key_is_stable_across_runs() {
    let item = Item::part("3001", Condition::New, 5);
    let mut parts = PartsNeeded::new();
    parts.add(item.clone(), 2);

    let options = Options::builder().consider_shops(5).build();
    let filtered = brickbuy::filter::filter_offers(
        &parts,
        |_| vec![offer("X", dec!(1.00), 10)],
        &options,
    )
    .unwrap();
    let pool = brickbuy::selector::select_candidates(&filtered, &parts, &options).unwrap();

    let digest_a = brickbuy::lp::digest_for(&pool, &filtered, &parts, &options);
    let digest_b = brickbuy::lp::digest_for(&pool, &filtered, &parts, &options);
    assert_eq!(digest_a, digest_b);
}
