//! Command-line parsing for the transit vetting tool.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline/modeling code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tvet", version, about = "Transit Signal Vetting (ensemble inference)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify a single candidate from transit parameters.
    Predict(PredictArgs),
    /// Classify every row of a candidate CSV and print a summary.
    Batch(BatchArgs),
    /// Print a synthesized transit light curve as JSON.
    Curve(CurveArgs),
    /// Write a small demonstration model artifact (not a trained model).
    InitModel(InitModelArgs),
}

/// Options shared by commands that load the model artifact.
#[derive(Debug, Parser, Clone)]
pub struct ModelArgs {
    /// Path to the model artifact JSON.
    #[arg(short = 'm', long = "model", value_name = "JSON")]
    pub model: PathBuf,

    /// How many feature importances to report.
    #[arg(long, default_value_t = 5)]
    pub top_k: usize,
}

/// Options for a single prediction.
#[derive(Debug, Parser)]
pub struct PredictArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Orbital period (days).
    #[arg(long)]
    pub period: f64,

    /// Transit depth (ppm).
    #[arg(long)]
    pub depth: f64,

    /// Transit duration (hours).
    #[arg(long)]
    pub duration: f64,

    /// Impact parameter.
    #[arg(long)]
    pub impact: Option<f64>,

    /// Model signal-to-noise ratio.
    #[arg(long)]
    pub snr: Option<f64>,

    /// Archive disposition score in [0, 1].
    #[arg(long)]
    pub score: Option<f64>,

    /// Emit the result as JSON instead of a formatted report.
    #[arg(long)]
    pub json: bool,
}

/// Options for batch classification.
#[derive(Debug, Parser)]
pub struct BatchArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Candidate CSV (required columns: koi_period, koi_depth, koi_duration).
    #[arg(short = 'i', long, value_name = "CSV")]
    pub input: PathBuf,

    /// Write the full per-row report as JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// Options for light-curve synthesis.
#[derive(Debug, Parser)]
pub struct CurveArgs {
    /// Orbital period (days).
    #[arg(long)]
    pub period: f64,

    /// Transit depth (ppm).
    #[arg(long)]
    pub depth: f64,

    /// Transit duration (hours).
    #[arg(long)]
    pub duration: f64,

    /// Impact parameter.
    #[arg(long, default_value_t = 0.5)]
    pub impact: f64,

    /// Cosmetic noise standard deviation (flux units, 0 disables).
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Seed for reproducible noise; unseeded when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Options for writing the demonstration artifact.
#[derive(Debug, Parser)]
pub struct InitModelArgs {
    /// Output path for the artifact JSON.
    #[arg(short = 'o', long, value_name = "JSON")]
    pub out: PathBuf,
}
