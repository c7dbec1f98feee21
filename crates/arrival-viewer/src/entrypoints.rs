//! Native startup: logging, async runtime and the eframe window

use crate::app::ArrivalApp;
use crate::app::settings::Settings;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const APP_NAME: &str = "Arrival";

#[cfg(debug_assertions)]
const DEFAULT_LOG_FILTER: &str =
    "debug,eframe::native=warn,hyper_util=info,walkers=info,egui::context=warn,reqwest::connect=info";
#[cfg(not(debug_assertions))]
const DEFAULT_LOG_FILTER: &str = "info,eframe::native=warn,egui::context=warn";

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("Window error: {0}")]
    Eframe(String),
}

/// Log to stderr, honouring `RUST_LOG` when it is set.
pub fn setup_logging() {
    let (filter, defaulted) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, false),
        Err(_) => (EnvFilter::new(DEFAULT_LOG_FILTER), true),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if defaulted {
        tracing::debug!("RUST_LOG not set, using {DEFAULT_LOG_FILTER}");
    }
}

fn log_version_info() {
    tracing::info!(
        "{} v{} ({})",
        APP_NAME,
        env!("CARGO_PKG_VERSION"),
        if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        }
    );
}

/// Parse the command line and run the app until its window closes.
///
/// Route fetches and location lookups are spawned onto a multi-threaded
/// tokio runtime; the UI itself runs on the calling thread.
pub fn run_native() -> Result<(), LaunchError> {
    setup_logging();
    let settings = Settings::from_cli();
    log_version_info();

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(async move {
        let native_options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(APP_NAME)
                .with_inner_size([420.0, 820.0])
                .with_min_inner_size([320.0, 480.0]),
            ..Default::default()
        };

        eframe::run_native(
            APP_NAME,
            native_options,
            Box::new(|cc| Ok(Box::new(ArrivalApp::new(cc, settings)))),
        )
    })
    .map_err(|e| LaunchError::Eframe(e.to_string()))
}
