//! Import route shapes from GPX recordings
//!
//! Every track point of every track segment becomes one coordinate, in file
//! order. Waypoints and GPX routes are ignored.

use crate::coordinate::{Coordinate, CoordinatePath};
use std::io::BufRead;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum GpxImportError {
    #[error("GPX parsing error: {0}")]
    Parse(#[from] gpx::errors::GpxError),

    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no track points found")]
    NoTrackPoints,
}

/// Convert already parsed GPX data into a coordinate path
pub fn path_from_gpx(gpx: &gpx::Gpx) -> Result<CoordinatePath, GpxImportError> {
    let path: CoordinatePath = gpx
        .tracks
        .iter()
        .flat_map(|track| &track.segments)
        .flat_map(|segment| &segment.points)
        .map(|waypoint| Coordinate::from(waypoint.point()))
        .collect();

    if path.is_empty() {
        return Err(GpxImportError::NoTrackPoints);
    }
    Ok(path)
}

/// Parse GPX from a reader
pub fn read_gpx_path<R: BufRead>(reader: R) -> Result<CoordinatePath, GpxImportError> {
    let gpx = gpx::read(reader)?;
    path_from_gpx(&gpx)
}

/// Parse the GPX file at `path`
pub fn load_gpx_file(path: &Path) -> Result<CoordinatePath, GpxImportError> {
    let file = std::fs::File::open(path).map_err(|source| GpxImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_gpx_path(std::io::BufReader::new(file))
}
