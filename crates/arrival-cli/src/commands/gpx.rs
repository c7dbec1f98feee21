use super::{CommandError, CommandResult};
use arrival_routes::{RouteKey, artifact, gpx_import};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct GpxArgs {
    /// GPX file to read track points from
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Write the result as this route's artifact instead of printing it
    #[arg(short, long, requires = "out_dir")]
    pub route: Option<RouteKey>,

    /// Directory for the route artifact
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

pub fn run(args: GpxArgs) -> CommandResult {
    let path = gpx_import::load_gpx_file(&args.file)?;
    tracing::info!(
        "Read {} track points ({:.2} km) from {}",
        path.len(),
        path.length_meters() / 1000.0,
        args.file.display()
    );
    if let Some(center) = path.center() {
        tracing::info!("Track centered at {:.4},{:.4}", center.lat, center.lon);
    }

    match (args.route, &args.out_dir) {
        (Some(key), Some(out_dir)) => {
            artifact::ensure_output_dir(out_dir)?;
            let file = artifact::write_artifact(out_dir, key, &path)?;
            tracing::info!("Wrote {key} to {}", file.display());
            Ok(())
        }
        (None, None) => {
            println!("{}", serde_json::to_string_pretty(&path)?);
            Ok(())
        }
        _ => Err(CommandError::IncompleteOutput),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><trkseg>
    <trkpt lat="52.35" lon="4.91"></trkpt>
    <trkpt lat="52.36" lon="4.92"></trkpt>
  </trkseg></trk>
</gpx>"#;

    #[test]
    fn test_writes_route_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("river.gpx");
        std::fs::write(&file, TRACK).unwrap();

        let args = GpxArgs {
            file,
            route: Some(RouteKey::River),
            out_dir: Some(dir.path().join("routes")),
        };
        run(args).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("routes").join("river.json")).unwrap(),
            "[[52.35,4.91],[52.36,4.92]]"
        );
    }

    #[test]
    fn test_out_dir_without_route_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("loop.gpx");
        std::fs::write(&file, TRACK).unwrap();

        let args = GpxArgs {
            file,
            route: None,
            out_dir: Some(dir.path().to_path_buf()),
        };
        assert!(matches!(run(args), Err(CommandError::IncompleteOutput)));
    }

    #[test]
    fn test_missing_file() {
        let args = GpxArgs {
            file: "does-not-exist.gpx".into(),
            route: None,
            out_dir: None,
        };
        assert!(matches!(run(args), Err(CommandError::GpxImport(_))));
    }
}
