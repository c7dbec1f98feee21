//! Arrival Routes - Core library for the Arrival running companion
//!
//! This library owns everything about the predefined running routes, from the
//! build-time extraction of their coordinates to the runtime state behind the
//! map view.
//!
//! # Architecture
//!
//! - **[`RouteKey`] / [`RouteDefinition`]**: the compiled-in route catalog
//! - **[`extract`]**: pulls coordinate literals out of a source document into
//!   per-route JSON artifacts
//! - **[`gpx_import`]**: builds the same artifacts from GPX recordings
//! - **[`RouteSource`]**: runtime retrieval of artifacts (directory or HTTP)
//! - **[`MapViewModel`]**: active route, fetched path and user location, with
//!   stale fetch results discarded
//! - **[`jetlag`] / [`rules`]**: the Recover and Info screens' content

pub mod artifact;
mod catalog;
mod coordinate;
pub mod extract;
pub mod gpx_import;
pub mod jetlag;
pub mod literal;
pub mod location;
pub mod rules;
pub mod source;
mod view_model;

// Public API exports
pub use artifact::ArtifactError;
pub use catalog::{ROUTES, RouteDefinition, RouteKey, UnknownRouteKey};
pub use coordinate::{Coordinate, CoordinatePath};
pub use extract::{ExtractError, ExtractionReport};
pub use location::{FixedLocation, GeolocationError, LocationProvider};
pub use source::{DirRouteSource, FetchError, HttpRouteSource, RouteSource};
pub use view_model::{CameraCommand, EventOutcome, LOCATE_ZOOM, MapViewModel, Notifier};
