//! End-to-end scenarios exercising the full `Core` pipeline against the
//! builtin optimizer and the LP model emitter, one test per scenario in
//! spec §8.

use brickbuy::builtin::Cancellation;
use brickbuy::config::{Mode, Options};
use brickbuy::core::Core;
use brickbuy::item::{Condition, Item};
use brickbuy::offer::{Offer, OfferCondition};
use brickbuy::parts::PartsNeeded;
use rust_decimal_macros::dec;

fn offer(shop: &str, price: rust_decimal::Decimal, qty: u32) -> Offer {
    Offer::new(shop, price, qty, OfferCondition::New, "US", dec!(0))
}

fn offer_with_min_buy(shop: &str, price: rust_decimal::Decimal, qty: u32, min_buy: rust_decimal::Decimal) -> Offer {
    Offer::new(shop, price, qty, OfferCondition::New, "US", min_buy)
}

/// S1: a single item with a single seller is bought entirely from that
/// seller at its listed price.
#[test]
fn s1_single_item_single_seller() {
    let item = Item::part("3001", Condition::New, 5);
    let mut parts = PartsNeeded::new();
    parts.add(item.clone(), 4);

    let options = Options::builder().mode(Mode::Builtin).consider_shops(5).build();
    let core = Core::new(parts, options)
        .unwrap()
        .filter(|_| vec![offer("OnlyShop", dec!(0.50), 10)])
        .unwrap()
        .select_pool()
        .unwrap()
        .solve(&Cancellation::new())
        .unwrap();
    let result = core.into_result();

    assert_eq!(result.shops_used(), vec!["OnlyShop".to_string()]);
    assert_eq!(result.grand_net_total(), dec!(2.00));
}

/// S2: two items each available from only one (different) seller forces a
/// two-shop allocation even though that means paying two fixed costs.
#[test]
fn s2_two_items_one_seller_each_forces_split() {
    let a = Item::part("A", Condition::New, 1);
    let b = Item::part("B", Condition::New, 1);
    let mut parts = PartsNeeded::new();
    parts.add(a.clone(), 1);
    parts.add(b.clone(), 1);

    let options = Options::builder().mode(Mode::Builtin).consider_shops(5).build();
    let core = Core::new(parts, options)
        .unwrap()
        .filter(move |item| {
            if *item == a {
                vec![offer("ShopA", dec!(1.00), 5)]
            } else {
                vec![offer("ShopB", dec!(1.00), 5)]
            }
        })
        .unwrap()
        .select_pool()
        .unwrap()
        .solve(&Cancellation::new())
        .unwrap();
    let result = core.into_result();

    assert_eq!(result.shops_used().len(), 2);
}

/// S3: when one seller is slightly pricier per unit but avoids a second
/// shop's fixed cost, the single-shop total (goods + one fixed cost)
/// should beat splitting — this test checks the gross total accounts for
/// the fixed cost per shop used, not just goods price.
#[test]
fn s3_shop_fix_cost_is_counted_once_per_shop_used() {
    let item = Item::part("3001", Condition::New, 5);
    let mut parts = PartsNeeded::new();
    parts.add(item.clone(), 10);

    let options = Options::builder()
        .mode(Mode::Builtin)
        .consider_shops(5)
        .shop_fix_cost(dec!(5.00))
        .build();
    let core = Core::new(parts, options)
        .unwrap()
        .filter(|_| vec![offer("Cheap", dec!(1.00), 20)])
        .unwrap()
        .select_pool()
        .unwrap()
        .solve(&Cancellation::new())
        .unwrap();
    let result = core.into_result();

    assert_eq!(result.grand_net_total(), dec!(10.00));
    assert_eq!(result.gross_total(), dec!(15.00));
}

/// S4: a seller's `min_buy` threshold shows up in the emitted LP model as
/// a per-shop constraint, so the solver (not this core) is responsible
/// for rejecting allocations that fall under it.
#[test]
fn s4_min_buy_appears_in_emitted_lp_model() {
    let item = Item::part("3001", Condition::New, 5);
    let mut parts = PartsNeeded::new();
    parts.add(item.clone(), 2);

    let options = Options::builder()
        .mode(Mode::Glpk)
        .consider_shops(5)
        .cachedir(std::env::temp_dir())
        .build();
    let filtered = brickbuy::filter::filter_offers(
        &parts,
        |_| vec![offer_with_min_buy("BigMinBuy", dec!(1.00), 10, dec!(25.00))],
        &options,
    )
    .unwrap();
    let pool = brickbuy::selector::select_candidates(&filtered, &parts, &options).unwrap();

    let path = std::env::temp_dir().join("brickbuy-s4-test.mod");
    brickbuy::lp::write_model(&path, &pool, &filtered, &parts, &options).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();

    assert!(text.contains("min_buy_met"));
    assert!(text.contains("25.00"));
    let _ = std::fs::remove_file(&path);
}

/// S5: with three items of differing rarity, the candidate selector picks
/// the rarest item's cheapest seller into the critical set first.
#[test]
fn s5_rarity_first_critical_pick() {
    let rare = Item::part("Rare", Condition::New, 1);
    let common = Item::part("Common", Condition::New, 1);
    let mut parts = PartsNeeded::new();
    parts.add(rare.clone(), 1);
    parts.add(common.clone(), 1);

    let options = Options::builder().consider_shops(10).build();
    let filtered = brickbuy::filter::filter_offers(
        &parts,
        move |item| {
            if *item == rare {
                vec![offer("SoleSupplier", dec!(3.00), 5)]
            } else {
                vec![
                    offer("CommonA", dec!(1.00), 5),
                    offer("CommonB", dec!(1.10), 5),
                    offer("CommonC", dec!(1.20), 5),
                ]
            }
        },
        &options,
    )
    .unwrap();
    let pool = brickbuy::selector::select_candidates(&filtered, &parts, &options).unwrap();

    assert!(pool.critical().any(|s| s.shop_name == "SoleSupplier"));
}

/// S6: cancelling the built-in optimizer before it starts still returns a
/// result rather than hanging or panicking.
#[test]
fn s6_cancellation_returns_best_so_far() {
    let item = Item::part("3001", Condition::New, 5);
    let mut parts = PartsNeeded::new();
    parts.add(item.clone(), 1);

    let options = Options::builder().mode(Mode::Builtin).consider_shops(5).build();
    let cancellation = Cancellation::new();
    cancellation.cancel();

    let core = Core::new(parts, options)
        .unwrap()
        .filter(|_| vec![offer("OnlyShop", dec!(1.00), 5)])
        .unwrap()
        .select_pool()
        .unwrap()
        .solve(&cancellation)
        .unwrap();
    let result = core.into_result();

    assert_eq!(result.shops_used(), vec!["OnlyShop".to_string()]);
}
