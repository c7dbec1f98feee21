pub mod extract;
pub mod gpx;

/// Errors surfaced by CLI commands
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Artifact(#[from] arrival_routes::ArtifactError),

    #[error(transparent)]
    GpxImport(#[from] arrival_routes::gpx_import::GpxImportError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{failed} of {total} routes failed to extract")]
    PartialExtraction { failed: usize, total: usize },

    #[error("--route and --out-dir must be given together")]
    IncompleteOutput,
}

pub type CommandResult = Result<(), CommandError>;
