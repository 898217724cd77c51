use rust_decimal::Decimal;
use std::fmt;

/// A seller's new/used classification for an offer. Offers are always
/// `New` or `Used`; `Condition::Any` (in `crate::item`) only ever appears on
/// the demand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OfferCondition {
    New,
    Used,
}

/// One seller's listing for one item: price, quantity on hand, condition,
/// location, and the seller's own minimum-purchase threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    pub unit_price: Decimal,
    pub quantity_available: u32,
    pub condition: OfferCondition,
    pub location: String,
    pub min_buy: Decimal,
    pub shop_name: String,
}

impl Offer {
    pub fn new(
        shop_name: impl Into<String>,
        unit_price: Decimal,
        quantity_available: u32,
        condition: OfferCondition,
        location: impl Into<String>,
        min_buy: Decimal,
    ) -> Self {
        Offer {
            unit_price,
            quantity_available,
            condition,
            location: location.into(),
            min_buy,
            shop_name: shop_name.into(),
        }
    }
}

/// The role a seller ended up playing in the final candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellerRole {
    Critical,
    Supplemental,
    Unselected,
}

/// A seller identified by `shop_name`, carrying the attributes the selector
/// and optimizer need: its minimum purchase, location, and (once the
/// candidate pool has been chosen) its role and score.
#[derive(Debug, Clone, PartialEq)]
pub struct Seller {
    pub shop_name: String,
    pub min_buy: Decimal,
    pub location: String,
    pub role: SellerRole,
    pub score: Option<f64>,
}

impl fmt::Display for Seller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.shop_name)
    }
}

/// Deduplicates a raw offer list for one item: when the same seller appears
/// twice, the listing with the larger available quantity wins. The
/// surviving offers are returned sorted ascending by `unit_price`, matching
/// the input contract in spec §6.
pub fn dedup_and_sort(mut offers: Vec<Offer>) -> Vec<Offer> {
    offers.sort_by(|a, b| b.quantity_available.cmp(&a.quantity_available));
    let mut seen = std::collections::HashSet::new();
    offers.retain(|o| seen.insert(o.shop_name.clone()));
    offers.sort_by(|a, b| a.unit_price.cmp(&b.unit_price));
    offers
}
