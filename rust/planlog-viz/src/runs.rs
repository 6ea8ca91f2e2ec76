use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::errors::VizError;

#[derive(Debug, Clone)]
pub struct RunEntry {
    pub name: String,
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Immediate subdirectories of `base`, newest first.
///
/// The sort is stable, so runs sharing a modification time keep the order
/// the directory listing produced them in.
pub fn list_runs(base: &Path) -> Result<Vec<RunEntry>, VizError> {
    let entries = fs::read_dir(base).map_err(|e| VizError::io(base, e))?;
    let mut runs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| VizError::io(base, e))?;
        let path = entry.path();
        // follows symlinks, like a plain is_dir check
        let meta = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                debug!(path=%path.display(), error=%e, "skipping unreadable entry");
                continue;
            }
        };
        if !meta.is_dir() {
            continue;
        }
        let modified = meta.modified().map_err(|e| VizError::io(&path, e))?;
        runs.push(RunEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            modified,
        });
    }
    runs.sort_by(|a, b| b.modified.cmp(&a.modified));
    Ok(runs)
}

pub fn find_latest_run(base: &Path) -> Result<PathBuf, VizError> {
    let runs = list_runs(base)?;
    let latest = runs
        .into_iter()
        .next()
        .ok_or_else(|| VizError::NoRuns { base: base.to_path_buf() })?;
    debug!(run=%latest.name, "selected latest run");
    Ok(latest.path)
}

/// `base/run` when a name is given (not checked for existence), else the latest run.
pub fn resolve_run_dir(base: &Path, run: Option<&str>) -> Result<PathBuf, VizError> {
    match run {
        Some(name) if !name.is_empty() => Ok(base.join(name)),
        _ => find_latest_run(base),
    }
}

/// One run name per line, newest first.
pub fn write_run_list<W: Write>(base: &Path, out: &mut W) -> Result<(), VizError> {
    for run in list_runs(base)? {
        writeln!(out, "{}", run.name).map_err(|e| VizError::io(base, e))?;
    }
    Ok(())
}
