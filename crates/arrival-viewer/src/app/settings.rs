use arrival_routes::location::parse_lat_lon;
use arrival_routes::{Coordinate, HttpRouteSource, RouteKey};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Arrival - running routes, jet lag recovery and local rules for travelling runners
pub struct Settings {
    /// Directory that contains `data/routes/<route>.json`
    #[clap(long, env = "ARRIVAL_DATA_DIR", default_value = "public")]
    pub data_dir: PathBuf,

    /// Fetch route data over HTTP from this base URL instead of the data directory
    #[clap(long, env = "ARRIVAL_BASE_URL")]
    pub base_url: Option<String>,

    /// HTTP fetch timeout in seconds
    #[clap(
        long,
        default_value_t = HttpRouteSource::DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub fetch_timeout: u64,

    /// Route shown when the map opens
    #[clap(short, long, default_value_t = RouteKey::DEFAULT)]
    pub route: RouteKey,

    /// Position reported by "locate me", as `lat,lon`. Locating is unsupported without it
    #[clap(long, env = "ARRIVAL_LOCATION", value_name = "LAT,LON", value_parser = parse_lat_lon)]
    pub location: Option<Coordinate>,

    /// Require this password before showing the app
    #[clap(long, env = "ARRIVAL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Where to remember a successful login (defaults to the user config directory)
    #[clap(long, value_name = "FILE")]
    pub storage_file: Option<PathBuf>,

    /// Route line width in pixels
    #[clap(long, default_value = "4.0")]
    pub line_width: f32,
}

impl Settings {
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}
