use super::{CommandError, CommandResult};
use arrival_routes::{RouteKey, extract};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Source document containing the route definitions
    #[arg(short, long, value_name = "FILE")]
    pub source: PathBuf,

    /// Directory to write `<route>.json` files into (created if missing)
    #[arg(short, long, value_name = "DIR", default_value = "public/data/routes")]
    pub out_dir: PathBuf,

    /// Routes to extract (default: all)
    #[arg(short, long = "route", value_name = "ROUTE")]
    pub routes: Vec<RouteKey>,
}

impl ExtractArgs {
    fn keys(&self) -> Vec<RouteKey> {
        if self.routes.is_empty() {
            RouteKey::ALL.to_vec()
        } else {
            self.routes.clone()
        }
    }
}

/// Every requested route is attempted; the command fails afterwards if any did
pub fn run(args: ExtractArgs) -> CommandResult {
    let keys = args.keys();
    tracing::debug!(
        "Extracting {} routes from {} into {}",
        keys.len(),
        args.source.display(),
        args.out_dir.display()
    );

    let report = extract::extract_routes_from_file(&args.source, &keys, &args.out_dir)?;

    let failed = report.failed().count();
    if failed > 0 {
        return Err(CommandError::PartialExtraction {
            failed,
            total: report.outcomes.len(),
        });
    }
    Ok(())
}
