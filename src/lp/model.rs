//! AMPL model emission for spec §4.4's mixed-integer formulation: one
//! binary `use_shop[s]` per candidate seller, one integer `order_brick[b,s]`
//! per (item, seller) offer, minimizing goods cost plus `shop_fix_cost`
//! per opened shop subject to per-item demand coverage and per-shop
//! minimum-buy constraints.

use crate::config::Options;
use crate::error::CoreError;
use crate::filter::FilteredOffers;
use crate::parts::PartsNeeded;
use crate::selector::CandidatePool;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Unit price AMPL sees for a (item, shop) pair with no real offer —
/// effectively infinite, but finite so the solver can still reason about
/// the variable instead of rejecting the model.
pub const AMPL_UNAVAILABLE_PRICE: u32 = 1000;

/// Upper bound on units of one brick orderable from a single shop; keeps
/// the integer variables bounded without constraining any real order.
pub const MAX_BRICKS_FROM_SHOP: u32 = 10_000;

fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\\\""))
}

/// Writes the AMPL model text for `pool`/`offers`/`parts_needed` to
/// `path`, creating `cachedir` if needed.
pub fn write_model(
    path: &Path,
    pool: &CandidatePool,
    offers: &FilteredOffers,
    parts_needed: &PartsNeeded,
    options: &Options,
) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| CoreError::ArtifactIo {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut shops: Vec<String> = pool.ordered_shop_names();
    shops.sort();
    let items: Vec<_> = parts_needed.items().cloned().collect();

    let mut model = String::new();
    writeln!(model, "set SHOPS;").unwrap();
    writeln!(model, "set BRICKS;").unwrap();
    writeln!(model, "param demand{{BRICKS}} >= 0;").unwrap();
    writeln!(model, "param price{{BRICKS,SHOPS}} >= 0;").unwrap();
    writeln!(model, "param min_buy{{SHOPS}} >= 0;").unwrap();
    writeln!(model, "param shop_fix_cost >= 0;").unwrap();
    writeln!(model).unwrap();
    writeln!(model, "var use_shop{{SHOPS}} binary;").unwrap();
    writeln!(
        model,
        "var order_brick{{BRICKS,SHOPS}} integer >= 0 <= {MAX_BRICKS_FROM_SHOP};"
    )
    .unwrap();
    writeln!(model).unwrap();
    writeln!(
        model,
        "minimize total_cost: sum {{b in BRICKS, s in SHOPS}} price[b,s] * order_brick[b,s] + sum {{s in SHOPS}} shop_fix_cost * use_shop[s];"
    )
    .unwrap();
    writeln!(model).unwrap();
    writeln!(
        model,
        "subject to demand_met {{b in BRICKS}}: sum {{s in SHOPS}} order_brick[b,s] >= demand[b];"
    )
    .unwrap();
    writeln!(
        model,
        "subject to shop_used {{b in BRICKS, s in SHOPS}}: order_brick[b,s] <= {MAX_BRICKS_FROM_SHOP} * use_shop[s];"
    )
    .unwrap();
    writeln!(
        model,
        "subject to min_buy_met {{s in SHOPS}}: sum {{b in BRICKS}} price[b,s] * order_brick[b,s] >= min_buy[s] * use_shop[s];"
    )
    .unwrap();
    writeln!(model).unwrap();

    writeln!(model, "set SHOPS := {};", shops.iter().map(|s| quote(s)).collect::<Vec<_>>().join(" ")).unwrap();
    writeln!(
        model,
        "set BRICKS := {};",
        items.iter().map(|i| quote(&i.to_string())).collect::<Vec<_>>().join(" ")
    )
    .unwrap();
    writeln!(model, "param shop_fix_cost := {};", options.shop_fix_cost).unwrap();

    writeln!(model, "param min_buy :=").unwrap();
    for shop in &shops {
        let min_buy = pool
            .get(shop)
            .map(|s| s.min_buy)
            .unwrap_or_default();
        writeln!(model, "  {} {}", quote(shop), min_buy).unwrap();
    }
    writeln!(model, ";").unwrap();

    writeln!(model, "param demand :=").unwrap();
    for item in &items {
        writeln!(model, "  {} {}", quote(&item.to_string()), parts_needed.get(item)).unwrap();
    }
    writeln!(model, ";").unwrap();

    writeln!(model, "param price :=").unwrap();
    for item in &items {
        let item_offers = offers.get(item);
        for shop in &shops {
            let price = item_offers
                .iter()
                .find(|o| &o.shop_name == shop)
                .map(|o| o.unit_price.to_string())
                .unwrap_or_else(|| AMPL_UNAVAILABLE_PRICE.to_string());
            writeln!(model, "  {} {} {}", quote(&item.to_string()), quote(shop), price).unwrap();
        }
    }
    writeln!(model, ";").unwrap();
    writeln!(model, "end;").unwrap();

    fs::write(path, model).map_err(|source| CoreError::ArtifactIo {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), shops = shops.len(), items = items.len(), "wrote LP model");
    Ok(())
}
