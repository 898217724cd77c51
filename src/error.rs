use crate::item::Item;
use std::path::PathBuf;

/// Everything that can go wrong while filtering offers, selecting a
/// candidate pool, or solving for an allocation.
///
/// Every fallible stage of the core returns `Result<_, CoreError>` rather
/// than a family of per-stage error types — filtering and pool selection
/// fail fast, the optimizer only fails on solver error (cancellation is not
/// an error), and no variant here is retried or silently swallowed.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// `PartsNeeded` was empty; there is nothing to buy.
    #[error("parts needed is empty, nothing to optimize")]
    EmptyDemand,

    /// An item in `PartsNeeded` has no surviving offer after filtering.
    #[error("no offers remain for {item} after filtering (wrong catalog mapping, or the item does not exist in this color)")]
    NoOffers { item: Item },

    /// The critical set alone already saturates `consider_shops`.
    #[error(
        "candidate pool too small: {critical} critical sellers already reach consider_shops={consider_shops}; raise consider_shops to at least {critical}"
    )]
    PoolTooSmall {
        critical: usize,
        consider_shops: usize,
    },

    /// The external solver binary could not be located or spawned.
    #[error("could not run solver {path:?}: {source}")]
    SolverNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external solver ran but produced no usable solution file.
    #[error("solver exited with status {status:?} and left no solution file at {solution_path:?}")]
    SolverFailed {
        status: Option<i32>,
        solution_path: PathBuf,
    },

    /// The solver's solution file could not be parsed into an allocation.
    #[error("could not parse solver solution at {path:?}: {reason}")]
    UnparseableSolution { path: PathBuf, reason: String },

    /// I/O failure writing/reading LP artifacts under `cachedir`.
    #[error("I/O error on LP artifact {path:?}: {source}")]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}
