use crate::config::Options;
use crate::error::CoreError;
use crate::item::Item;
use crate::offer::{dedup_and_sort, Offer, OfferCondition};
use crate::parts::PartsNeeded;
use std::collections::BTreeMap;

/// Offers per item after deduplication and the quantity/condition/seller/
/// country rules have been applied. Every item in `PartsNeeded` is
/// guaranteed to have a non-empty entry here, or filtering failed.
#[derive(Debug, Clone, Default)]
pub struct FilteredOffers {
    by_item: BTreeMap<Item, Vec<Offer>>,
}

impl FilteredOffers {
    pub fn get(&self, item: &Item) -> &[Offer] {
        self.by_item.get(item).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.by_item.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Item, &[Offer])> {
        self.by_item.iter().map(|(i, v)| (i, v.as_slice()))
    }

    pub fn offer_count(&self, item: &Item) -> usize {
        self.get(item).len()
    }

    /// Narrows every item's offer list down to offers from sellers in
    /// `pool`. Used once the candidate selector has picked the final pool.
    pub fn restricted_to(&self, pool: &std::collections::HashSet<String>) -> FilteredOffers {
        let by_item = self
            .by_item
            .iter()
            .map(|(item, offers)| {
                let narrowed = offers
                    .iter()
                    .filter(|o| pool.contains(&o.shop_name))
                    .cloned()
                    .collect();
                (item.clone(), narrowed)
            })
            .collect();
        FilteredOffers { by_item }
    }
}

/// Applies spec §4.1's offer filter: deduplicate per seller, then keep only
/// offers that satisfy quantity, condition, seller, and country rules.
///
/// Fails fast (spec §7) the moment an item's surviving offer list is empty,
/// naming that item — filtering never silently proceeds with a
/// partially-infeasible input.
pub fn filter_offers(
    parts_needed: &PartsNeeded,
    raw_offers: impl Fn(&Item) -> Vec<Offer>,
    options: &Options,
) -> Result<FilteredOffers, CoreError> {
    let mut by_item = BTreeMap::new();

    for item in parts_needed.items() {
        let demand = parts_needed.get(item);
        let deduped = dedup_and_sort(raw_offers(item));
        let item_key = item.to_string();

        let kept: Vec<Offer> = deduped
            .into_iter()
            .filter(|o| o.quantity_available >= demand)
            .filter(|o| condition_acceptable(item, o, &item_key, options))
            .filter(|o| seller_acceptable(o, options))
            .filter(|o| country_acceptable(o, options))
            .collect();

        if kept.is_empty() {
            return Err(CoreError::NoOffers { item: item.clone() });
        }

        by_item.insert(item.clone(), kept);
    }

    tracing::debug!(items = by_item.len(), "offer filter produced offer lists");
    Ok(FilteredOffers { by_item })
}

fn condition_acceptable(
    item: &Item,
    offer: &Offer,
    item_key: &str,
    options: &Options,
) -> bool {
    match offer.condition {
        OfferCondition::New => true,
        OfferCondition::Used => {
            item.condition() == crate::item::Condition::Any || options.allows_used(item_key)
        }
    }
}

fn seller_acceptable(offer: &Offer, options: &Options) -> bool {
    (options.include_shops.is_empty() || options.include_shops.contains(&offer.shop_name))
        && !options.exclude_shops.contains(&offer.shop_name)
}

fn country_acceptable(offer: &Offer, options: &Options) -> bool {
    if options.dont_exclude_shops.contains(&offer.shop_name) {
        return true;
    }
    (options.include_countries.is_empty() || options.include_countries.contains(&offer.location))
        && !options.exclude_countries.contains(&offer.location)
}
