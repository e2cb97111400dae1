//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Grab a game title's FAQ archive from its fan-site listing.
///
/// Fetches the FAQ index page, follows each listed FAQ to its detail page,
/// works out what the page actually links to (plain-text mirror, inline
/// HTML, scanned image, PDF), and saves the content under the target
/// directory.
#[derive(Parser, Debug)]
#[command(name = "faqgrab")]
#[command(author, version, about)]
pub struct Args {
    /// FAQ index page URL (must contain /faqs)
    pub index_url: String,

    /// Target directory for saved files (default: inferred from the URL)
    pub target_dir: Option<PathBuf>,

    /// Dump every fetched page verbatim into the target directory
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Save only binary resource kinds (images, PDFs)
    #[arg(short = 'b', long)]
    pub only_binaries: bool,

    /// Session cookie value sent with every request (replaces the built-in one)
    #[arg(long, value_name = "VALUE")]
    pub cookie: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
