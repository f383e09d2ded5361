mod opts;

use bin2pcd::{convert_dir, convert_file};
use clap::Parser;
use eyre::Result;
use opts::Opts;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let opts = Opts::parse();
    let convert_opts = opts.convert_options();

    if opts.input.is_dir() {
        let report = convert_dir(
            &opts.input,
            opts.output.as_deref(),
            &convert_opts,
            opts.jobs,
        )?;
        info!("converted {} files", report.converted.len());
    } else {
        let output = convert_file(&opts.input, opts.output.as_deref(), &convert_opts)?;
        info!("wrote {}", output.display());
    }

    info!("Conversion completed!");

    Ok(())
}
