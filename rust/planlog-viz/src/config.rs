use std::path::PathBuf;

use clap::Parser;

use crate::DEFAULT_BASE;

#[derive(Parser, Debug, Clone)]
#[command(name = "planlog-viz", version, about = "Plot a planner request/response log pair")]
pub struct Args {
    /// Base directory holding one folder per planner run
    #[arg(long = "base", value_name = "DIR", env = "PLANLOG_BASE", default_value = DEFAULT_BASE)]
    pub base: PathBuf,

    /// Run folder under --base (default: most recently modified)
    #[arg(long = "run", value_name = "NAME", default_value = "")]
    pub run: String,

    /// SVG output path (default: <run_dir>/plot.svg)
    #[arg(long = "out", value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// List runs newest first and exit
    #[arg(long = "list", default_value_t = false)]
    pub list: bool,
}

impl Args {
    pub fn run_name(&self) -> Option<&str> {
        if self.run.is_empty() { None } else { Some(self.run.as_str()) }
    }
}
