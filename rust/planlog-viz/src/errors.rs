use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VizError {
    #[error("no run folders in {}", .base.display())]
    NoRuns { base: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    // Drawing into a String cannot fail; kept for sinks whose backend can.
    #[error("render failed: {0}")]
    Render(String),
}

impl VizError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VizError::Io { path: path.into(), source }
    }

    /// True for missing runs or a missing log file.
    pub fn is_not_found(&self) -> bool {
        match self {
            VizError::NoRuns { .. } => true,
            VizError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
