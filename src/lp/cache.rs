//! Stable-hash cache key for LP artifacts (spec §4.5): two calls with the
//! same parts, filtered offers, and relevant options produce the same
//! digest, so the emitted `.mod`/`.sol` pair is reused instead of
//! re-solved. Offers and parts are walked in `BTreeMap` order so the
//! digest never depends on hashmap iteration order.

use crate::config::Options;
use crate::filter::FilteredOffers;
use crate::parts::PartsNeeded;
use crate::selector::CandidatePool;

const FNV_OFFSET_BASIS: u32 = 0x811c9dc5;
const FNV_PRIME: u32 = 0x01000193;

fn fnv1a(bytes: &[u8], state: u32) -> u32 {
    bytes.iter().fold(state, |h, &b| (h ^ b as u32).wrapping_mul(FNV_PRIME))
}

/// 32-bit FNV-1a digest over the candidate pool's shops, every item's
/// filtered offers, demand quantities, and the options fields that affect
/// the emitted model (`multiple`, `shop_fix_cost`, `max_shops`).
pub fn digest_for(
    pool: &CandidatePool,
    offers: &FilteredOffers,
    parts_needed: &PartsNeeded,
    options: &Options,
) -> u32 {
    let mut h = FNV_OFFSET_BASIS;

    let mut shops = pool.ordered_shop_names();
    shops.sort();
    for shop in &shops {
        h = fnv1a(shop.as_bytes(), h);
    }

    for item in parts_needed.items() {
        h = fnv1a(item.to_string().as_bytes(), h);
        h = fnv1a(&parts_needed.get(item).to_le_bytes(), h);
        for offer in offers.get(item) {
            h = fnv1a(offer.shop_name.as_bytes(), h);
            h = fnv1a(offer.unit_price.to_string().as_bytes(), h);
            h = fnv1a(&offer.quantity_available.to_le_bytes(), h);
        }
    }

    h = fnv1a(&options.multiple.to_le_bytes(), h);
    h = fnv1a(options.shop_fix_cost.to_string().as_bytes(), h);
    h = fnv1a(&(options.max_shops as u64).to_le_bytes(), h);

    h
}
