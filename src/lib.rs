//! # socialstats - descriptive statistics for social-media exports
//!
//! Loads a CSV export of ad or post records, derives numeric columns from
//! nested cells, classifies every column from a declared profile and builds a
//! report of per-column statistics for the whole dataset and for each group
//! of one or more key sets.
//!
//! ## Quick Start
//!
//! ```no_run
//! use socialstats::analyser::logic::{build_report, load_dataset};
//! use socialstats::config::DatasetProfile;
//! use socialstats::export::{ConsoleSink, emit};
//!
//! # fn example() -> anyhow::Result<()> {
//! let dataset = load_dataset("fb_ads.csv".as_ref())?;
//! let report = build_report(dataset, &DatasetProfile::facebook_ads())?;
//! emit(&report, &mut ConsoleSink::new())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`analyser::logic`]: parsing, classification, summaries, grouping and the report builder
//! - [`config`]: dataset profiles and built-in presets
//! - [`export`]: text rendering, report sinks and JSON output
//! - [`error`]: error types and handling utilities
//! - [`logging`]: tracing subscriber setup

#![warn(clippy::all, rust_2018_idioms)]

pub mod analyser;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
