//! Command-line parsing for the loan approval screen.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the encoding/prediction code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "loan", version, about = "Loan approval screen backed by a pre-trained classifier")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Predict approval for one applicant, print the summary, and optionally export.
    Predict(PredictArgs),
    /// Print the encoded model input for one applicant as JSON (no prediction).
    Encode(EncodeArgs),
    /// Launch the interactive form.
    ///
    /// This uses the same underlying pipeline as `loan predict`, but collects the
    /// applicant in a terminal UI using Ratatui.
    Tui(ArtifactArgs),
}

/// Where the model and scaler artifacts live, and where exports go.
#[derive(Debug, Args, Clone, PartialEq)]
pub struct ArtifactArgs {
    /// Model artifact (JSON). Defaults to $LOAN_MODEL_PATH, then `model.json`.
    #[arg(long, value_name = "JSON")]
    pub model: Option<PathBuf>,

    /// Fitted scaler artifact (JSON). Defaults to $LOAN_SCALER_PATH; none if unset.
    #[arg(long, value_name = "JSON")]
    pub scaler: Option<PathBuf>,

    /// Directory for CSV/PDF exports. Defaults to $LOAN_EXPORT_DIR, then `.`.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

/// Applicant fields. Each flag overrides the same field from `--input`.
#[derive(Debug, Args, Clone, Default, PartialEq)]
pub struct ApplicantArgs {
    /// Read the applicant from a JSON file first.
    #[arg(long, value_name = "JSON")]
    pub input: Option<PathBuf>,

    /// Male | Female
    #[arg(long)]
    pub gender: Option<String>,

    /// Yes | No
    #[arg(long)]
    pub married: Option<String>,

    /// 0 | 1 | 2 | 3+
    #[arg(long)]
    pub dependents: Option<String>,

    /// Graduate | "Not Graduate"
    #[arg(long)]
    pub education: Option<String>,

    /// Yes | No
    #[arg(long)]
    pub self_employed: Option<String>,

    #[arg(long)]
    pub applicant_income: Option<f64>,

    #[arg(long)]
    pub coapplicant_income: Option<f64>,

    #[arg(long)]
    pub loan_amount: Option<f64>,

    /// Loan term in the unit the model was trained with (360 | 180 | 120 | 60 months by default).
    #[arg(long)]
    pub loan_term: Option<f64>,

    /// 1.0 (meets guidelines) | 0.0
    #[arg(long)]
    pub credit_history: Option<String>,

    /// Urban | Rural | Semiurban
    #[arg(long)]
    pub property_area: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    #[command(flatten)]
    pub applicant: ApplicantArgs,

    /// Hide the income/loan chart and KPI row.
    #[arg(long)]
    pub no_chart: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Also print the encoded model input.
    #[arg(long)]
    pub show_input: bool,

    /// Export the entered data as CSV.
    #[arg(long)]
    pub csv: bool,

    /// Export the result as a PDF report (only after a successful prediction).
    #[arg(long)]
    pub pdf: bool,
}

#[derive(Debug, Args, Clone)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    #[command(flatten)]
    pub applicant: ApplicantArgs,
}
