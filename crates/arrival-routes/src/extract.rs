//! Build-time extraction of route paths from a front-end source document
//!
//! Each route is written in the source as
//!
//! ```text
//! sanctuary: {
//!     name: 'Park',
//!     ...
//!     path: [[52.35, 4.86], [52.351, 4.861],] as [number, number][]
//! }
//! ```
//!
//! For every expected key the first `<key>: { ... path: [` header is located,
//! the array's extent is found by bracket balance alone, and the captured
//! literal is parsed by [`crate::literal`]. Routes are independent: a missing
//! or malformed route is reported and the others are still extracted.

use crate::artifact::{self, ArtifactError};
use crate::catalog::RouteKey;
use crate::coordinate::CoordinatePath;
use crate::literal::{self, LiteralError};
use regex::Regex;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("could not find path for {0}")]
    NotFound(RouteKey),

    #[error("failed to parse {key}: {source}")]
    Parse {
        key: RouteKey,
        #[source]
        source: LiteralError,
    },

    #[error("failed to write {key}: {source}")]
    Write {
        key: RouteKey,
        #[source]
        source: ArtifactError,
    },
}

/// Outcome of extracting a single route
#[derive(Debug)]
pub struct RouteOutcome {
    pub key: RouteKey,
    /// Written file and point count, or the reason the route was skipped
    pub result: Result<(PathBuf, usize), ExtractError>,
}

/// Per-route results of one extraction run
#[derive(Debug, Default)]
pub struct ExtractionReport {
    pub outcomes: Vec<RouteOutcome>,
}

impl ExtractionReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &RouteOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &RouteOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn outcome(&self, key: RouteKey) -> Option<&RouteOutcome> {
        self.outcomes.iter().find(|o| o.key == key)
    }
}

fn header_pattern(key: RouteKey) -> Regex {
    // Keys are plain lowercase identifiers, so the escaped pattern always compiles.
    Regex::new(&format!(
        r"(?s)\b{}:\s*\{{.*?path:\s*\[",
        regex::escape(key.as_str())
    ))
    .unwrap_or_else(|e| unreachable!("route header pattern is valid: {e}"))
}

/// Locate the path literal for `key`, including its outer brackets
///
/// Scanning starts just after the header's `[` with depth 1 and ends at the
/// bracket that brings depth back to 0.
pub fn find_path_literal(source: &str, key: RouteKey) -> Result<&str, ExtractError> {
    let header = header_pattern(key)
        .find(source)
        .ok_or(ExtractError::NotFound(key))?;

    let open = header.end() - 1;
    let mut depth = 1usize;
    for (offset, byte) in source.as_bytes()[header.end()..].iter().enumerate() {
        match byte {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    let close = header.end() + offset;
                    return Ok(&source[open..=close]);
                }
            }
            _ => {}
        }
    }

    Err(ExtractError::Parse {
        key,
        source: LiteralError::UnbalancedBrackets { depth },
    })
}

/// Extract and parse the coordinate path for `key` without writing anything
pub fn extract_path(source: &str, key: RouteKey) -> Result<CoordinatePath, ExtractError> {
    let literal = find_path_literal(source, key)?;
    literal::parse_coordinate_literal(literal).map_err(|source| ExtractError::Parse { key, source })
}

/// Extract every key in `keys` from `source` into `out_dir`
///
/// The output directory is created if needed; failing to create it is the
/// only error that stops the whole run. Artifacts of failed routes are left
/// as they were.
pub fn extract_routes(
    source: &str,
    keys: &[RouteKey],
    out_dir: &Path,
) -> Result<ExtractionReport, ArtifactError> {
    #[cfg(feature = "profiling")]
    profiling::scope!("extract::extract_routes");

    artifact::ensure_output_dir(out_dir)?;

    let outcomes = keys
        .iter()
        .map(|&key| {
            let result = extract_path(source, key).and_then(|path| {
                artifact::write_artifact(out_dir, key, &path)
                    .map(|file| (file, path.len()))
                    .map_err(|source| ExtractError::Write { key, source })
            });

            match &result {
                Ok((file, points)) => {
                    tracing::info!("Extracted {key} to {} ({points} points)", file.display())
                }
                Err(e) => tracing::error!("{e}"),
            }

            RouteOutcome { key, result }
        })
        .collect();

    Ok(ExtractionReport { outcomes })
}

/// Read `source_file` and extract `keys` into `out_dir`
pub fn extract_routes_from_file(
    source_file: &Path,
    keys: &[RouteKey],
    out_dir: &Path,
) -> Result<ExtractionReport, ArtifactError> {
    let source = std::fs::read_to_string(source_file).map_err(|source| ArtifactError::Io {
        path: source_file.to_path_buf(),
        source,
    })?;
    extract_routes(&source, keys, out_dir)
}
