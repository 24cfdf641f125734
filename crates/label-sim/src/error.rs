use std::path::PathBuf;

/// Failures while loading or running a scene
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Label(#[from] tile_labels::LabelError),

    #[error("Invalid scene: {0}")]
    Scene(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
