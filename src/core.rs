//! Typestate pipeline tying the core's stages together (spec §4): demand
//! is loaded, offers are filtered, a candidate pool is selected, and
//! finally an allocation is solved — each stage's output is the only
//! input the next stage accepts, so a caller cannot skip or reorder a
//! step. Modeled on the teacher's `Model<State>` typestate (`model.rs`),
//! generalized from SCIP's solve-loop states to this pipeline's stages.

use crate::builtin::Cancellation;
use crate::config::{Mode, Options};
use crate::error::CoreError;
use crate::filter::{self, FilteredOffers};
use crate::item::Item;
use crate::offer::Offer;
use crate::parts::PartsNeeded;
use crate::result::{AllocationLine, OptimizationResult};
use crate::selector::{self, CandidatePool};
use crate::{builtin, lp};
use std::marker::PhantomData;

pub struct Loaded;
pub struct Filtered;
pub struct PoolSelected;
pub struct Solved;

/// The pipeline's state, parameterized by which stage it has reached.
/// Each stage holds exactly the data produced so far; a stage's
/// transition method consumes `self` and returns the next stage.
pub struct Core<State> {
    parts_needed: PartsNeeded,
    options: Options,
    offers: Option<FilteredOffers>,
    pool: Option<CandidatePool>,
    result: Option<OptimizationResult>,
    _state: PhantomData<State>,
}

impl Core<Loaded> {
    /// Loads demand and applies `options.multiple` up front, so every
    /// later stage (filtering, selection, solving) sees the final
    /// per-build-multiple quantities without re-scaling.
    pub fn new(parts_needed: PartsNeeded, options: Options) -> Result<Self, CoreError> {
        if parts_needed.is_empty() {
            return Err(CoreError::EmptyDemand);
        }
        let parts_needed = parts_needed.scaled(options.multiple);
        Ok(Core {
            parts_needed,
            options,
            offers: None,
            pool: None,
            result: None,
            _state: PhantomData,
        })
    }

    pub fn filter(self, raw_offers: impl Fn(&Item) -> Vec<Offer>) -> Result<Core<Filtered>, CoreError> {
        let offers = filter::filter_offers(&self.parts_needed, raw_offers, &self.options)?;
        Ok(Core {
            parts_needed: self.parts_needed,
            options: self.options,
            offers: Some(offers),
            pool: None,
            result: None,
            _state: PhantomData,
        })
    }
}

impl Core<Filtered> {
    pub fn offers(&self) -> &FilteredOffers {
        self.offers.as_ref().expect("Filtered state always carries offers")
    }

    pub fn select_pool(self) -> Result<Core<PoolSelected>, CoreError> {
        let offers = self.offers.expect("Filtered state always carries offers");
        let pool = selector::select_candidates(&offers, &self.parts_needed, &self.options)?;
        Ok(Core {
            parts_needed: self.parts_needed,
            options: self.options,
            offers: Some(offers),
            pool: Some(pool),
            result: None,
            _state: PhantomData,
        })
    }
}

impl Core<PoolSelected> {
    pub fn pool(&self) -> &CandidatePool {
        self.pool.as_ref().expect("PoolSelected state always carries a pool")
    }

    /// Restricts the filtered offers to the selected pool and dispatches
    /// to the built-in optimizer or the LP solver per `options.mode`.
    pub fn solve(self, cancellation: &Cancellation) -> Result<Core<Solved>, CoreError> {
        let offers = self.offers.expect("PoolSelected state always carries offers");
        let pool = self.pool.expect("PoolSelected state always carries a pool");
        let restricted = offers.restricted_to(&pool.shop_names());

        let allocation = match self.options.mode {
            Mode::Builtin => {
                let solution = builtin::solve(
                    &pool,
                    &restricted,
                    &self.parts_needed,
                    self.options.jobs,
                    cancellation,
                );
                solution
                    .map(|s| {
                        s.allocation
                            .into_iter()
                            .map(|(shop_name, item_key, quantity, unit_price)| AllocationLine {
                                shop_name,
                                item_key,
                                quantity,
                                unit_price,
                            })
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default()
            }
            Mode::Glpk => {
                let lp_solution = lp::solve(&pool, &restricted, &self.parts_needed, &self.options)?;
                lp_solution
                    .allocation
                    .into_iter()
                    .map(|(shop_name, item_key, quantity)| {
                        let unit_price = restricted
                            .items()
                            .find(|i| i.to_string() == item_key)
                            .and_then(|item| {
                                restricted
                                    .get(item)
                                    .iter()
                                    .find(|o| o.shop_name == shop_name)
                            })
                            .map(|o| o.unit_price)
                            .unwrap_or_default();
                        AllocationLine {
                            shop_name,
                            item_key,
                            quantity,
                            unit_price,
                        }
                    })
                    .collect()
            }
        };

        let result = OptimizationResult::from_pool_and_allocation(
            &pool,
            allocation,
            self.parts_needed.clone(),
            self.options.shop_fix_cost,
        );

        Ok(Core {
            parts_needed: self.parts_needed,
            options: self.options,
            offers: Some(restricted),
            pool: Some(pool),
            result: Some(result),
            _state: PhantomData,
        })
    }
}

impl Core<Solved> {
    pub fn into_result(self) -> OptimizationResult {
        self.result.expect("Solved state always carries a result")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Condition, Item};
    use crate::offer::OfferCondition;
    use rust_decimal_macros::dec;

    #[test]
    fn pipeline_runs_end_to_end_with_builtin_mode() {
        let item = Item::part("3001", Condition::New, 5);
        let mut parts = PartsNeeded::new();
        parts.add(item.clone(), 2);

        let options = Options::builder().mode(Mode::Builtin).consider_shops(5).build();
        let core = Core::new(parts, options).unwrap();
        let core = core
            .filter(|_| vec![Offer::new("X", dec!(1.00), 10, OfferCondition::New, "US", dec!(0))])
            .unwrap();
        let core = core.select_pool().unwrap();
        let core = core.solve(&Cancellation::new()).unwrap();
        let result = core.into_result();

        assert_eq!(result.grand_net_total(), dec!(2.00));
    }

    #[test]
    fn empty_demand_fails_immediately() {
        let parts = PartsNeeded::new();
        let options = Options::builder().build();
        assert!(matches!(Core::new(parts, options), Err(CoreError::EmptyDemand)));
    }
}
