//! Built-in combinatorial optimizer (spec §4.3): exhaustively enumerates
//! every non-empty subset of the candidate pool's shops as a bitmask,
//! keeping the cheapest subset that covers every item's demand from
//! offers already present in the pool.
//!
//! Work is partitioned across `rayon` into `P = jobs * 10` chunks of the
//! `[1, 2^n)` mask range, mirroring the teacher's data-parallel benchmarks
//! (`examples/knapsack.rs`, `examples/random_rounding.rs`): each worker
//! scans its chunk independently and the results are reduced with a
//! cheapest-wins, smallest-popcount-breaks-ties fold.

use crate::filter::FilteredOffers;
use crate::parts::PartsNeeded;
use crate::selector::CandidatePool;
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};

/// A candidate allocation: which shops (by bitmask position) were used and
/// the net price (goods only, no shipping) of buying every item from the
/// cheapest covering offer among those shops.
#[derive(Debug, Clone)]
pub struct BuiltinSolution {
    pub mask: u32,
    pub shops_used: Vec<String>,
    pub net_total: Decimal,
    pub allocation: Vec<(String, String, u32, Decimal)>,
}

/// Lets a caller stop an in-flight search early (e.g. on a wall-clock
/// budget) and still get back the best subset found so far.
#[derive(Debug, Default)]
pub struct Cancellation(AtomicBool);

impl Cancellation {
    pub fn new() -> Self {
        Cancellation(AtomicBool::new(false))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

struct ShopOffer {
    item_index: usize,
    unit_price: Decimal,
    quantity: u32,
}

/// Runs the built-in optimizer over `pool`, returning the cheapest
/// full-coverage subset of shops (spec invariant 4: the built-in optimizer
/// always returns the true minimum over the candidate pool, modulo an
/// early cancellation).
///
/// Returns `None` if no subset of the pool covers every item's demand
/// (should not happen once the candidate selector has run, since the
/// critical set alone covers every item) or if the search is cancelled
/// before any subset is scanned.
pub fn solve(
    pool: &CandidatePool,
    offers: &FilteredOffers,
    parts_needed: &PartsNeeded,
    jobs: usize,
    cancellation: &Cancellation,
) -> Option<BuiltinSolution> {
    let shops: Vec<String> = pool.ordered_shop_names();
    let n = shops.len();
    if n == 0 || n > 31 {
        tracing::debug!(shop_count = n, "candidate pool size unsuitable for bitmask search");
        return None;
    }

    let items: Vec<_> = parts_needed.items().cloned().collect();
    let demand: Vec<u32> = items.iter().map(|i| parts_needed.get(i)).collect();

    // offers_by_shop[shop_index] = list of (item_index, price, qty)
    let offers_by_shop: Vec<Vec<ShopOffer>> = shops
        .iter()
        .map(|shop| {
            items
                .iter()
                .enumerate()
                .filter_map(|(item_index, item)| {
                    offers
                        .get(item)
                        .iter()
                        .find(|o| &o.shop_name == shop)
                        .map(|o| ShopOffer {
                            item_index,
                            unit_price: o.unit_price,
                            quantity: o.quantity_available,
                        })
                })
                .collect()
        })
        .collect();

    // Bitmask of items each shop can supply, for fast coverage pruning.
    let coverage_bits: Vec<u32> = offers_by_shop
        .iter()
        .map(|shop_offers| {
            shop_offers
                .iter()
                .fold(0u32, |acc, o| acc | (1 << o.item_index))
        })
        .collect();
    let full_coverage: u32 = if items.len() >= 32 {
        u32::MAX
    } else {
        (1u32 << items.len()) - 1
    };

    let total_masks = 1u64 << n;
    let worker_count = jobs.max(1);
    let chunk_count = (worker_count * 10).max(1);
    let chunk_size = (total_masks / chunk_count as u64).max(1);

    let chunks: Vec<(u64, u64)> = (0..chunk_count as u64)
        .map(|c| {
            let start = (c * chunk_size).max(1);
            let end = if c == chunk_count as u64 - 1 {
                total_masks
            } else {
                ((c + 1) * chunk_size).min(total_masks)
            };
            (start, end)
        })
        .filter(|(start, end)| start < end)
        .collect();

    let best = chunks
        .par_iter()
        .filter_map(|&(start, end)| {
            let mut local_best: Option<(u32, Decimal)> = None;
            for mask in start..end {
                if cancellation.is_cancelled() {
                    break;
                }
                let mask = mask as u32;
                if mask.count_ones() as u64 > n as u64 {
                    continue;
                }
                let covered = (0..n)
                    .filter(|b| mask & (1 << b) != 0)
                    .fold(0u32, |acc, b| acc | coverage_bits[b]);
                if covered & full_coverage != full_coverage {
                    continue;
                }
                let price = subset_net_price(mask, n, &offers_by_shop, &demand);
                let Some(price) = price else { continue };
                local_best = Some(match local_best {
                    None => (mask, price),
                    Some((best_mask, best_price)) => {
                        if price < best_price
                            || (price == best_price && mask.count_ones() < best_mask.count_ones())
                            || (price == best_price
                                && mask.count_ones() == best_mask.count_ones()
                                && mask < best_mask)
                        {
                            (mask, price)
                        } else {
                            (best_mask, best_price)
                        }
                    }
                });
            }
            local_best
        })
        .reduce(
            || None,
            |a, b| match (a, b) {
                (None, x) => x,
                (x, None) => x,
                (Some((am, ap)), Some((bm, bp))) => {
                    if bp < ap || (bp == ap && bm.count_ones() < am.count_ones()) || (bp == ap && bm.count_ones() == am.count_ones() && bm < am) {
                        Some((bm, bp))
                    } else {
                        Some((am, ap))
                    }
                }
            },
        );

    let (mask, net_total) = best?;
    let shops_used: Vec<String> = (0..n)
        .filter(|b| mask & (1 << b) != 0)
        .map(|b| shops[b].clone())
        .collect();

    let allocation = allocate_for_mask(mask, n, &shops, &offers_by_shop, &items, &demand);

    Some(BuiltinSolution {
        mask,
        shops_used,
        net_total,
        allocation,
    })
}

/// Cheapest per-item choice among the shops active in `mask`, or `None` if
/// any item's cheapest-active-offer quantity can't cover demand.
fn subset_net_price(
    mask: u32,
    n: usize,
    offers_by_shop: &[Vec<ShopOffer>],
    demand: &[u32],
) -> Option<Decimal> {
    let mut best_per_item: Vec<Option<Decimal>> = vec![None; demand.len()];
    for shop_index in 0..n {
        if mask & (1 << shop_index) == 0 {
            continue;
        }
        for offer in &offers_by_shop[shop_index] {
            if offer.quantity < demand[offer.item_index] {
                continue;
            }
            let slot = &mut best_per_item[offer.item_index];
            *slot = Some(match slot {
                Some(existing) if *existing <= offer.unit_price => *existing,
                _ => offer.unit_price,
            });
        }
    }
    let mut total = Decimal::ZERO;
    for (item_index, price) in best_per_item.into_iter().enumerate() {
        let price = price?;
        total += price * Decimal::from(demand[item_index]);
    }
    Some(total)
}

fn allocate_for_mask(
    mask: u32,
    n: usize,
    shops: &[String],
    offers_by_shop: &[Vec<ShopOffer>],
    items: &[crate::item::Item],
    demand: &[u32],
) -> Vec<(String, String, u32, Decimal)> {
    let mut best_per_item: Vec<Option<(usize, Decimal)>> = vec![None; items.len()];
    for shop_index in 0..n {
        if mask & (1 << shop_index) == 0 {
            continue;
        }
        for offer in &offers_by_shop[shop_index] {
            if offer.quantity < demand[offer.item_index] {
                continue;
            }
            let slot = &mut best_per_item[offer.item_index];
            let better = match slot {
                None => true,
                Some((_, existing_price)) => offer.unit_price < *existing_price,
            };
            if better {
                *slot = Some((shop_index, offer.unit_price));
            }
        }
    }

    best_per_item
        .into_iter()
        .enumerate()
        .filter_map(|(item_index, choice)| {
            choice.map(|(shop_index, price)| {
                (
                    shops[shop_index].clone(),
                    items[item_index].to_string(),
                    demand[item_index],
                    price,
                )
            })
        })
        .collect()
}
