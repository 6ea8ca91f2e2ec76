use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::VizError;
use crate::models::{PlanRequest, PlanResponse};

pub const REQUEST_FILE: &str = "request.json";
pub const RESPONSE_FILE: &str = "response.json";

/// One planning invocation as logged on disk.
#[derive(Debug, Clone)]
pub struct RunLog {
    pub dir: PathBuf,
    pub request: PlanRequest,
    pub response: PlanResponse,
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, VizError> {
    // read_to_string closes the file before parsing starts
    let text = fs::read_to_string(path).map_err(|e| VizError::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| VizError::Parse { path: path.to_path_buf(), source })
}

pub fn load_run(dir: &Path) -> Result<RunLog, VizError> {
    let request: PlanRequest = load_json(&dir.join(REQUEST_FILE))?;
    let response: PlanResponse = load_json(&dir.join(RESPONSE_FILE))?;
    debug!(
        dir=%dir.display(),
        obstacles=request.ox.len(),
        ok=response.ok,
        path_len=response.x.len(),
        "loaded run"
    );
    Ok(RunLog { dir: dir.to_path_buf(), request, response })
}
