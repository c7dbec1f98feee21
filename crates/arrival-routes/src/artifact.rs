//! Per-route coordinate artifacts
//!
//! One `<key>.json` file per route containing the minified
//! `[[lat,lon],...]` array.

use crate::catalog::RouteKey;
use crate::coordinate::CoordinatePath;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid coordinate artifact: {0}")]
    Json(#[from] serde_json::Error),
}

/// File name of the artifact for `key`
pub fn artifact_file_name(key: RouteKey) -> String {
    format!("{}.json", key.as_str())
}

/// Create `out_dir` (and parents) if missing
pub fn ensure_output_dir(out_dir: &Path) -> Result<(), ArtifactError> {
    std::fs::create_dir_all(out_dir).map_err(|source| ArtifactError::Io {
        path: out_dir.to_path_buf(),
        source,
    })
}

/// Write `path` as the artifact for `key`, replacing any previous file
///
/// Returns the written file path.
pub fn write_artifact(
    out_dir: &Path,
    key: RouteKey,
    path: &CoordinatePath,
) -> Result<PathBuf, ArtifactError> {
    let file = out_dir.join(artifact_file_name(key));
    let json = path.to_minified_json()?;
    std::fs::write(&file, json).map_err(|source| ArtifactError::Io {
        path: file.clone(),
        source,
    })?;
    Ok(file)
}

/// Parse artifact bytes as fetched at runtime
pub fn parse_artifact(bytes: &[u8]) -> Result<CoordinatePath, ArtifactError> {
    Ok(serde_json::from_slice(bytes)?)
}
