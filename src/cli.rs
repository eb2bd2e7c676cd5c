use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use socialstats::analyser::logic::{build_report, load_dataset};
use socialstats::config::{DatasetProfile, PRESET_NAMES};
use socialstats::export::{
    AsciiOnlySink, ConsoleSink, FanOutSink, FileSink, JsonFile, ReportSink, emit,
};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(
    name = "socialstats",
    about = "Descriptive statistics for social-media ad and post exports"
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also write logs to a rolling file in the user data directory
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarise a CSV export overall and per group
    Summarize {
        /// Path to the CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Built-in profile (fb-ads, fb-posts, tw-posts)
        #[arg(short, long, conflicts_with = "profile")]
        preset: Option<String>,

        /// Path to a JSON profile
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Also write the text report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the report as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,

        /// Strip non-ASCII characters from the text report
        #[arg(long)]
        ascii_only: bool,

        /// Do not print the report to stdout
        #[arg(short, long)]
        quiet: bool,
    },
    /// Print a built-in profile as JSON, as a starting point for a custom one
    Profile {
        /// Built-in profile name
        #[arg(default_value = "fb-ads")]
        preset: String,
    },
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Summarize {
            input,
            preset,
            profile,
            output,
            json,
            ascii_only,
            quiet,
        } => handle_summarize(
            input,
            resolve_profile(preset, profile)?,
            output,
            json,
            ascii_only,
            quiet,
        ),
        Commands::Profile { preset } => handle_profile(&preset),
    }
}

fn resolve_profile(preset: Option<String>, path: Option<PathBuf>) -> Result<DatasetProfile> {
    if let Some(path) = path {
        return DatasetProfile::load(&path)
            .with_context(|| format!("Failed to load profile {}", path.display()));
    }
    let name = preset.unwrap_or_else(|| "fb-ads".to_owned());
    DatasetProfile::preset(&name).with_context(|| {
        format!(
            "Unknown preset '{name}'. Available: {}",
            PRESET_NAMES.join(", ")
        )
    })
}

fn handle_summarize(
    input: PathBuf,
    profile: DatasetProfile,
    output: Option<PathBuf>,
    json: Option<PathBuf>,
    ascii_only: bool,
    quiet: bool,
) -> Result<()> {
    let start = Instant::now();
    tracing::info!(
        "Summarising {} with profile '{}'",
        input.display(),
        profile.name
    );

    let dataset = load_dataset(&input).context("Failed to load dataset")?;
    tracing::info!(
        "Loaded {} rows, {} columns",
        dataset.row_count(),
        dataset.headers().len()
    );

    let report = build_report(dataset, &profile)?;

    // Every destination is opened after the report is built and before any line is written.
    let json_file = json.as_deref().map(JsonFile::create).transpose()?;
    let mut fan_out = FanOutSink::new();
    if !quiet {
        fan_out.push(Box::new(ConsoleSink::new()));
    }
    if let Some(path) = &output {
        let file = FileSink::create(path)?;
        tracing::info!("Writing report to {}", file.path().display());
        fan_out.push(Box::new(file));
    }

    if ascii_only {
        let mut sink = AsciiOnlySink::new(fan_out);
        emit(&report, &mut sink)?;
    } else {
        emit(&report, &mut fan_out as &mut dyn ReportSink)?;
    }

    if let Some(json_file) = json_file {
        let path = json_file.path().to_path_buf();
        json_file.write(&report)?;
        tracing::info!("JSON report written to {}", path.display());
    }

    tracing::info!(
        "Total execution time: {:.2} seconds",
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn handle_profile(preset: &str) -> Result<()> {
    let profile = DatasetProfile::preset(preset).with_context(|| {
        format!(
            "Unknown preset '{preset}'. Available: {}",
            PRESET_NAMES.join(", ")
        )
    })?;
    let mut console = ConsoleSink::new();
    for line in profile.to_json()?.lines() {
        console.write_line(line)?;
    }
    console.flush()?;
    Ok(())
}
