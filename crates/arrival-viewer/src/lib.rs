//! Arrival - Application Library
//!
//! Desktop front end for the Arrival running companion: a map of the
//! predefined routes, a jet-lag recovery helper and a page of local running
//! rules, optionally behind a password gate.

mod app;
mod entrypoints;

pub use app::ArrivalApp;
pub use app::settings::Settings;
pub use entrypoints::{LaunchError, run_native, setup_logging};
