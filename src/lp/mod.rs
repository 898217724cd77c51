//! LP-mode optimizer (spec §4.4–§4.6): emits an AMPL model for the
//! candidate pool, invokes an external MIP solver, and parses the result
//! back into an allocation. Mirrors the teacher's FFI-boundary split
//! (`scip.rs` wraps the C call surface, `model.rs` wraps the user-facing
//! API) by keeping model emission, process invocation, and solution
//! parsing in separate files under one module.

mod cache;
mod model;
mod parse;
mod solve;

pub use cache::digest_for;
pub use model::{write_model, AMPL_UNAVAILABLE_PRICE, MAX_BRICKS_FROM_SHOP};
pub use parse::parse_solution;
pub use solve::{run_glpsol, LpSolution};

use crate::config::Options;
use crate::error::CoreError;
use crate::filter::FilteredOffers;
use crate::parts::PartsNeeded;
use crate::selector::CandidatePool;

/// Runs the full LP pipeline: emit the model (skipping emission on a cache
/// hit unless `rerun_solver` is set), invoke `glpsol`, and parse its
/// output file into an `LpSolution`.
pub fn solve(
    pool: &CandidatePool,
    offers: &FilteredOffers,
    parts_needed: &PartsNeeded,
    options: &Options,
) -> Result<LpSolution, CoreError> {
    let digest = cache::digest_for(pool, offers, parts_needed, options);
    let model_path = options.cachedir.join(format!("brickbuy.{digest:08x}.ampl"));
    let output_path = options.cachedir.join(format!("brickbuy.{digest:08x}.solution"));

    if options.rerun_solver || !model_path.exists() {
        model::write_model(&model_path, pool, offers, parts_needed, options)?;
    } else {
        tracing::debug!(path = %model_path.display(), "reusing cached LP model");
    }

    solve::run_glpsol(&model_path, &output_path, options)?;
    parse::parse_solution(&output_path)
}
