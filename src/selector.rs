use crate::config::Options;
use crate::error::CoreError;
use crate::filter::FilteredOffers;
use crate::offer::{Seller, SellerRole};
use crate::parts::PartsNeeded;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};

/// The sellers the optimizer will search over: a minimal critical set that
/// guarantees every item has at least one offer, plus the best-scoring
/// supplemental sellers up to `consider_shops`.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    sellers: BTreeMap<String, Seller>,
}

impl CandidatePool {
    pub fn sellers(&self) -> impl Iterator<Item = &Seller> {
        self.sellers.values()
    }

    pub fn get(&self, shop_name: &str) -> Option<&Seller> {
        self.sellers.get(shop_name)
    }

    pub fn len(&self) -> usize {
        self.sellers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sellers.is_empty()
    }

    pub fn critical(&self) -> impl Iterator<Item = &Seller> {
        self.sellers
            .values()
            .filter(|s| s.role == SellerRole::Critical)
    }

    pub fn supplemental(&self) -> impl Iterator<Item = &Seller> {
        self.sellers
            .values()
            .filter(|s| s.role == SellerRole::Supplemental)
    }

    /// Shop names in critical ∪ supplemental — the pool the optimizer
    /// actually searches over (`unselected` sellers are reported but never
    /// reach the optimizer).
    pub fn shop_names(&self) -> HashSet<String> {
        self.sellers
            .values()
            .filter(|s| s.role != SellerRole::Unselected)
            .map(|s| s.shop_name.clone())
            .collect()
    }

    /// Stable order used to index sellers as bitmask positions in the
    /// built-in optimizer.
    pub fn ordered_shop_names(&self) -> Vec<String> {
        self.sellers
            .values()
            .filter(|s| s.role != SellerRole::Unselected)
            .map(|s| s.shop_name.clone())
            .collect()
    }
}

/// Builds the candidate pool from spec §4.2: critical set by rarity, then
/// supplemental sellers ranked by a savings-amortized score.
///
/// Sellers not in critical ∪ supplemental are kept in the pool with
/// `SellerRole::Unselected` so invariant 3 (critical ∪ supplemental ∪
/// unselected = every seller seen in `FilteredOffers`) always holds.
pub fn select_candidates(
    offers: &FilteredOffers,
    parts_needed: &PartsNeeded,
    options: &Options,
) -> Result<CandidatePool, CoreError> {
    let mut items_by_rarity: Vec<_> = offers.items().cloned().collect();
    items_by_rarity.sort_by_key(|item| offers.offer_count(item));

    let mut critical: BTreeMap<String, Seller> = BTreeMap::new();

    for item in &items_by_rarity {
        let item_offers = offers.get(item);
        let already_covered = item_offers
            .iter()
            .any(|o| critical.contains_key(&o.shop_name));
        if already_covered {
            continue;
        }
        let cheapest = item_offers
            .iter()
            .find(|o| !options.exclude_shops.contains(&o.shop_name))
            .expect("filter_offers guarantees a non-empty, rule-satisfying offer list");
        critical.insert(
            cheapest.shop_name.clone(),
            Seller {
                shop_name: cheapest.shop_name.clone(),
                min_buy: cheapest.min_buy,
                location: cheapest.location.clone(),
                role: SellerRole::Critical,
                score: None,
            },
        );
    }

    if critical.len() >= options.consider_shops {
        return Err(CoreError::PoolTooSmall {
            critical: critical.len(),
            consider_shops: options.consider_shops,
        });
    }

    let mut scores: BTreeMap<String, (f64, Decimal, String)> = BTreeMap::new();
    let shop_fix_cost = options.shop_fix_cost.to_f64().unwrap_or(0.0);
    let base_score = 10.0 * (critical.len() as f64 * shop_fix_cost) / items_by_rarity.len() as f64;

    for item in &items_by_rarity {
        let item_offers = offers.get(item);
        let existing_price = item_offers
            .iter()
            .filter(|o| critical.contains_key(&o.shop_name))
            .map(|o| o.unit_price)
            .min();
        let Some(existing_price) = existing_price else {
            continue;
        };
        let demand = parts_needed.get(item) as f64;
        let n_offers = item_offers.len() as f64;

        for offer in item_offers {
            if options.exclude_shops.contains(&offer.shop_name) || critical.contains_key(&offer.shop_name) {
                continue;
            }
            let contrib = base_score / (n_offers + 1.0).ln()
                + (existing_price - offer.unit_price).to_f64().unwrap_or(0.0) * demand;
            if contrib > 0.0 {
                let entry = scores.entry(offer.shop_name.clone()).or_insert((
                    0.0,
                    offer.min_buy,
                    offer.location.clone(),
                ));
                entry.0 -= contrib;
            } else {
                scores
                    .entry(offer.shop_name.clone())
                    .or_insert((0.0, offer.min_buy, offer.location.clone()));
            }
        }
    }

    let mut ranked: Vec<(String, f64, Decimal, String)> = scores
        .into_iter()
        .map(|(name, (score, min_buy, location))| (name, score, min_buy, location))
        .collect();
    ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let take = options.consider_shops - critical.len();
    let mut sellers = critical;
    for (shop_name, score, min_buy, location) in ranked.into_iter().take(take) {
        sellers.insert(
            shop_name.clone(),
            Seller {
                shop_name,
                min_buy,
                location,
                role: SellerRole::Supplemental,
                score: Some(score),
            },
        );
    }

    // Every remaining seller seen anywhere in FilteredOffers is unselected.
    let mut all_sellers: BTreeMap<String, Seller> = BTreeMap::new();
    for item in offers.items() {
        for offer in offers.get(item) {
            all_sellers.entry(offer.shop_name.clone()).or_insert_with(|| Seller {
                shop_name: offer.shop_name.clone(),
                min_buy: offer.min_buy,
                location: offer.location.clone(),
                role: SellerRole::Unselected,
                score: None,
            });
        }
    }
    for (name, seller) in sellers {
        all_sellers.insert(name, seller);
    }

    tracing::debug!(
        pool_size = all_sellers
            .values()
            .filter(|s| s.role != SellerRole::Unselected)
            .count(),
        "candidate pool selected"
    );

    Ok(CandidatePool {
        sellers: all_sellers,
    })
}
