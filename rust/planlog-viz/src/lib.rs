use std::path::{Path, PathBuf};

use tracing::info;

pub mod config;
pub mod errors;
pub mod figure;
pub mod load;
pub mod models;
pub mod runs;
pub mod svg;

pub use errors::VizError;
pub use figure::{build_figure, Figure};
pub use load::{load_run, RunLog};
pub use runs::{find_latest_run, list_runs, resolve_run_dir, write_run_list};
pub use svg::{FigureSink, SvgSink};

pub const DEFAULT_BASE: &str = "planner_logs";
pub const DEFAULT_PLOT_FILE: &str = "plot.svg";

/// Resolve the run, load its logs and hand the figure to `sink`.
///
/// Returns the run directory that was rendered. Nothing reaches the sink
/// unless both log files were read and parsed.
pub fn visualize<S: FigureSink>(base: &Path, run: Option<&str>, sink: &mut S) -> Result<PathBuf, VizError> {
    let run_dir = resolve_run_dir(base, run)?;
    render_run(&run_dir, sink)?;
    Ok(run_dir)
}

pub fn render_run<S: FigureSink>(run_dir: &Path, sink: &mut S) -> Result<(), VizError> {
    info!(run_dir=%run_dir.display(), "loading run");
    let log = load_run(run_dir)?;
    let figure = build_figure(&log);
    sink.show(&figure)
}
