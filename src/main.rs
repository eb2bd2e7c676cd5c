//! # socialstats command-line entry point
//!
//! ```bash
//! socialstats summarize --input 2024_fb_ads.csv --preset fb-ads --output fb_ads.txt
//! socialstats summarize --input posts.csv --profile my_profile.json --json posts.json
//! socialstats profile tw-posts > tw_profile.json
//! ```

#![warn(clippy::all, rust_2018_idioms)]

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    socialstats::logging::init(cli.verbose, cli.log_file)?;

    if let Err(err) = cli::run_command(cli.command) {
        tracing::error!("{err:#}");
        return Err(err);
    }
    Ok(())
}
