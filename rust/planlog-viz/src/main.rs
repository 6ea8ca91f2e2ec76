use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use planlog_viz::config::Args;
use planlog_viz::{visualize, write_run_list, SvgSink};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();
    info!(?args, "starting planlog-viz");

    if args.list {
        let stdout = std::io::stdout();
        write_run_list(&args.base, &mut stdout.lock())
            .with_context(|| format!("failed to list runs in {:?}", args.base))?;
        return Ok(());
    }

    let mut sink = SvgSink::new(args.out.clone());
    let run_dir = visualize(&args.base, args.run_name(), &mut sink)
        .with_context(|| format!("failed to visualize runs in {:?}", args.base))?;

    println!("[viz] run_dir = {}", run_dir.display());
    Ok(())
}
