//! Purchasing-optimization core: given a wanted-list of items and a way to
//! fetch each item's current seller offers, picks a small pool of
//! sellers and a per-seller allocation that minimizes price plus a
//! per-shop fixed cost, subject to seller minimum-purchase thresholds.
//!
//! The pipeline runs in four stages, enforced at compile time by
//! [`core::Core`]'s typestate: load demand, filter offers, select a
//! candidate pool of sellers, then solve for an allocation with either
//! the built-in combinatorial optimizer or an external MIP solver.

pub mod builtin;
pub mod config;
pub mod core;
pub mod error;
pub mod filter;
pub mod item;
pub mod lp;
pub mod offer;
pub mod parts;
pub mod result;
pub mod selector;

pub use builtin::Cancellation;
pub use config::{Mode, Options, OptionsBuilder};
pub use core::Core;
pub use error::CoreError;
pub use filter::FilteredOffers;
pub use item::{Condition, Item, Kind};
pub use offer::{Offer, OfferCondition, Seller, SellerRole};
pub use parts::PartsNeeded;
pub use result::{AllocationLine, OptimizationResult};
pub use selector::CandidatePool;

/// Installs a `tracing` subscriber reading its filter from `RUST_LOG`,
/// defaulting to `info`. Mirrors the teacher's `main.rs` logging setup;
/// library consumers embedding this crate are free to install their own
/// subscriber instead and skip this entirely.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
}
