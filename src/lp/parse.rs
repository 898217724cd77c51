//! Parses a GLPK `--output` solution file back into an allocation (spec
//! §4.6). GLPK's plain-text writer prints each variable's name on its own
//! line and the chosen value on the line that follows, prefixed with
//! whitespace and an asterisk-leading activity column. Three line shapes
//! matter: `order_shop[NAME]` (which shops got opened — informational,
//! since the allocation itself implies which shops are used),
//! `order_brick[BRICK,NAME]` (the actual per-item-per-shop quantities),
//! and any other line, which clears whatever variable name was pending.

use crate::error::CoreError;
use std::fs;
use std::path::Path;

use super::solve::LpSolution;

/// Unquotes a GLPK-emitted set element, e.g. `"Some Shop"` -> `Some Shop`.
fn unquote(raw: &str) -> String {
    raw.trim().trim_matches('"').replace("\\\"", "\"")
}

pub fn parse_solution(path: &Path) -> Result<LpSolution, CoreError> {
    let text = fs::read_to_string(path).map_err(|source| CoreError::ArtifactIo {
        path: path.to_path_buf(),
        source,
    })?;

    let mut allocation = Vec::new();
    let mut pending_brick: Option<(String, String)> = None;

    for line in text.lines() {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("order_brick[") {
            let Some(close) = rest.find(']') else {
                pending_brick = None;
                continue;
            };
            let pair = &rest[..close];
            let Some((brick, shop)) = pair.split_once(',') else {
                pending_brick = None;
                continue;
            };
            pending_brick = Some((unquote(brick), unquote(shop)));
            continue;
        }

        if trimmed.starts_with("order_shop[") {
            // Which shops got opened is already implied by the brick-level
            // allocation; this line shape is recognized only so it doesn't
            // fall through to the catch-all scope-clearing below.
            pending_brick = None;
            continue;
        }

        if let Some((brick, shop)) = pending_brick.take() {
            if let Some(value) = extract_star_value(trimmed) {
                if value > 0 {
                    allocation.push((shop, brick, value));
                }
            }
        }
    }

    if allocation.is_empty() {
        return Err(CoreError::UnparseableSolution {
            path: path.to_path_buf(),
            reason: "no order_brick entries with positive activity found".to_string(),
        });
    }

    tracing::debug!(path = %path.display(), rows = allocation.len(), "parsed LP solution");
    Ok(LpSolution { allocation })
}

/// GLPK prints an activity line as `<index> <name> * <value> ...`; this
/// looks for the `* <digits>` fragment and returns the integer value.
fn extract_star_value(line: &str) -> Option<u32> {
    let star = line.find('*')?;
    let after = line[star + 1..].trim_start();
    let digits: String = after.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}
