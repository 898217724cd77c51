//! Result model (spec §4.7): the final report handed back to a caller —
//! what was bought, from whom, and what it cost, plus the seller
//! classifications the candidate selector produced along the way.

use crate::filter::FilteredOffers;
use crate::offer::SellerRole;
use crate::parts::PartsNeeded;
use crate::selector::CandidatePool;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// One line of the final purchase plan: an item bought from a shop at a
/// given unit price and quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationLine {
    pub shop_name: String,
    pub item_key: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// The finished optimization result: totals, the allocation, and which
/// role each seller in the candidate pool ended up playing.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub parts_needed: PartsNeeded,
    pub allocation: Vec<AllocationLine>,
    pub critical_shops: Vec<String>,
    pub supplemental_shops: Vec<String>,
    pub unselected_shops: Vec<String>,
    pub shop_fix_cost: Decimal,
}

impl OptimizationResult {
    pub fn from_pool_and_allocation(
        pool: &CandidatePool,
        allocation: Vec<AllocationLine>,
        parts_needed: PartsNeeded,
        shop_fix_cost: Decimal,
    ) -> Self {
        let mut critical_shops: Vec<String> = pool.critical().map(|s| s.shop_name.clone()).collect();
        let mut supplemental_shops: Vec<String> =
            pool.supplemental().map(|s| s.shop_name.clone()).collect();
        let mut unselected_shops: Vec<String> = pool
            .sellers()
            .filter(|s| s.role == SellerRole::Unselected)
            .map(|s| s.shop_name.clone())
            .collect();
        critical_shops.sort();
        supplemental_shops.sort();
        unselected_shops.sort();

        OptimizationResult {
            parts_needed,
            allocation,
            critical_shops,
            supplemental_shops,
            unselected_shops,
            shop_fix_cost,
        }
    }

    pub fn total_bricks_needed(&self) -> u32 {
        self.parts_needed.total_quantity()
    }

    pub fn offer_counts(&self, offers: &FilteredOffers) -> BTreeMap<String, usize> {
        self.parts_needed
            .items()
            .map(|item| (item.to_string(), offers.offer_count(item)))
            .collect()
    }

    /// Unit price actually paid for `item_key` at `shop_name`, or `None` if
    /// the allocation doesn't include that pair.
    pub fn unit_price(&self, shop_name: &str, item_key: &str) -> Option<Decimal> {
        self.allocation
            .iter()
            .find(|line| line.shop_name == shop_name && line.item_key == item_key)
            .map(|line| line.unit_price)
    }

    /// Goods-only subtotal for one shop (no shipping, no fixed cost).
    pub fn shop_net_total(&self, shop_name: &str) -> Decimal {
        self.allocation
            .iter()
            .filter(|line| line.shop_name == shop_name)
            .map(|line| line.unit_price * Decimal::from(line.quantity))
            .sum()
    }

    pub fn shops_used(&self) -> Vec<String> {
        let mut shops: Vec<String> = self
            .allocation
            .iter()
            .map(|line| line.shop_name.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        shops.sort();
        shops
    }

    /// Sum of every line's goods cost, across every shop used.
    pub fn grand_net_total(&self) -> Decimal {
        self.allocation
            .iter()
            .map(|line| line.unit_price * Decimal::from(line.quantity))
            .sum()
    }

    /// Grand net total plus `shop_fix_cost` per distinct shop used —
    /// spec's stand-in for real per-shop shipping, which this core does
    /// not model directly.
    pub fn gross_total(&self) -> Decimal {
        self.grand_net_total() + self.shop_fix_cost * Decimal::from(self.shops_used().len() as u64)
    }
}
