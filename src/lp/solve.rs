//! External solver invocation (spec §4.5): shells out to `glpsol`, passing
//! the wall-clock budget as its native `--tmlim` flag rather than
//! implementing a subprocess timeout in Rust — the same delegate-to-the-tool
//! approach the teacher's own external-process integrations use.

use crate::config::Options;
use crate::error::CoreError;
use std::path::Path;
use std::process::Command;

/// A solved LP/MIP allocation: which shops were opened and how many units
/// of each item each shop supplies.
#[derive(Debug, Clone, Default)]
pub struct LpSolution {
    pub allocation: Vec<(String, String, u32)>,
}

pub fn run_glpsol(model_path: &Path, output_path: &Path, options: &Options) -> Result<(), CoreError> {
    tracing::debug!(
        model = %model_path.display(),
        tmlim = options.glpk_limit_seconds,
        "invoking glpsol"
    );

    let status = Command::new("glpsol")
        .arg("--model")
        .arg(model_path)
        .arg("--output")
        .arg(output_path)
        .arg("--tmlim")
        .arg(options.glpk_limit_seconds.to_string())
        .status()
        .map_err(|source| CoreError::SolverNotFound {
            path: std::path::PathBuf::from("glpsol"),
            source,
        })?;

    if !status.success() {
        return Err(CoreError::SolverFailed {
            status: status.code(),
            solution_path: output_path.to_path_buf(),
        });
    }
    Ok(())
}
