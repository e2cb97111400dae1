//! CLI entry point for the faqgrab tool.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use faqgrab::{GrabConfig, Grabber, infer_dir_name};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let target_dir = match args.target_dir {
        Some(dir) => dir,
        None => {
            let inferred = infer_dir_name(&args.index_url);
            info!(dir = %inferred, "storing in directory inferred from URL");
            PathBuf::from(inferred)
        }
    };

    let mut config = GrabConfig::new(args.index_url, target_dir);
    config.debug = args.debug;
    config.only_binaries = args.only_binaries;
    if let Some(cookie) = args.cookie {
        config.session_cookie = cookie;
    }

    Grabber::new(config).run().await?;

    Ok(())
}
