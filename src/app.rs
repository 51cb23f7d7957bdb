//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves configuration
//! - loads the model/scaler artifacts once
//! - runs the encode/predict pipeline
//! - prints summaries/charts
//! - writes optional exports

use clap::Parser;
use tracing::{Level, info, warn};

use crate::cli::{ApplicantArgs, Command, EncodeArgs, PredictArgs};
use crate::config::AppConfig;
use crate::domain::RawApplicant;
use crate::error::{AppError, EXIT_IO};
use crate::io::Artifacts;
use crate::logging::{LogSink, parse_level};

pub mod pipeline;

/// Entry point for the `loan` binary.
pub fn run() -> Result<(), AppError> {
    // We want `loan` and `loan --model m.json` to behave like `loan tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Predict(args) => handle_predict(args),
        Command::Encode(args) => handle_encode(args),
        Command::Tui(args) => {
            let config = AppConfig::from_env(&args);
            crate::logging::init(
                parse_level(config.log_level.as_deref(), Level::INFO),
                LogSink::File(&config.log_file),
            )?;
            crate::tui::run(config)
        }
    }
}

fn init_cli_logging(config: &AppConfig) -> Result<(), AppError> {
    crate::logging::init(parse_level(config.log_level.as_deref(), Level::WARN), LogSink::Stderr)
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = AppConfig::from_env(&args.artifacts);
    init_cli_logging(&config)?;

    let artifacts = Artifacts::load(&config.artifacts);
    print!("{}", crate::report::format_warnings(&artifacts.warnings));

    let raw = raw_applicant_from_args(&args.applicant)?;
    let record = artifacts.encoder.parse(&raw)?;

    if !args.no_chart {
        println!("{}", crate::plot::render_overview(&record, args.width));
        println!("{}", crate::report::format_kpis(&record));
    }
    println!("{}", crate::report::format_preview(&record));

    // The record is valid from here on, so the CSV export does not depend on the model.
    if args.csv {
        let at = chrono::Local::now().naive_local();
        let path = crate::io::write_record_csv(&config.export_dir, &record, at)?;
        println!("Wrote {}", path.display());
    }

    let outcome = match artifacts.pipeline().run(&record) {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(error = %err, "prediction failed; skipping report export");
            return Err(err.into());
        }
    };
    info!(decision = ?outcome.decision, "prediction");
    if args.show_input {
        print!("{}", crate::report::format_encoded(&outcome.features));
    }
    print!("{}", crate::report::format_outcome(&outcome));

    if args.pdf {
        let path = crate::io::write_report_pdf(&config.export_dir, &outcome)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn handle_encode(args: EncodeArgs) -> Result<(), AppError> {
    let config = AppConfig::from_env(&args.artifacts);
    init_cli_logging(&config)?;

    let artifacts = Artifacts::load(&config.artifacts);
    for w in &artifacts.warnings {
        warn!("{w}");
    }

    let raw = raw_applicant_from_args(&args.applicant)?;
    let record = artifacts.encoder.parse(&raw)?;
    let features = artifacts.pipeline().encode(&record)?;

    let json = serde_json::to_string_pretty(&features)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to serialize encoded features: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Start from `--input` (or the form defaults) and apply individual flags on top.
pub fn raw_applicant_from_args(args: &ApplicantArgs) -> Result<RawApplicant, AppError> {
    let mut raw = match &args.input {
        Some(path) => crate::io::read_applicant_json(path)?,
        None => RawApplicant::default(),
    };

    if let Some(v) = &args.gender {
        raw.gender = v.clone();
    }
    if let Some(v) = &args.married {
        raw.married = v.clone();
    }
    if let Some(v) = &args.dependents {
        raw.dependents = v.clone();
    }
    if let Some(v) = &args.education {
        raw.education = v.clone();
    }
    if let Some(v) = &args.self_employed {
        raw.self_employed = v.clone();
    }
    if let Some(v) = args.applicant_income {
        raw.applicant_income = v;
    }
    if let Some(v) = args.coapplicant_income {
        raw.coapplicant_income = v;
    }
    if let Some(v) = args.loan_amount {
        raw.loan_amount = v;
    }
    if let Some(v) = args.loan_term {
        raw.loan_term = v;
    }
    if let Some(v) = &args.credit_history {
        raw.credit_history = v.clone();
    }
    if let Some(v) = &args.property_area {
        raw.property_area = v.clone();
    }

    Ok(raw)
}

/// Rewrite argv so `loan` defaults to `loan tui`.
///
/// Rules:
/// - `loan`                       -> `loan tui`
/// - `loan --model m.json ...`    -> `loan tui --model m.json ...`
/// - `loan --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "predict" | "encode" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(argv(&["loan"])), argv(&["loan", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["loan", "--model", "m.json"])),
            argv(&["loan", "tui", "--model", "m.json"])
        );
        assert_eq!(rewrite_args(argv(&["loan", "--help"])), argv(&["loan", "--help"]));
        assert_eq!(rewrite_args(argv(&["loan", "predict"])), argv(&["loan", "predict"]));
    }

    #[test]
    fn flags_override_defaults() {
        let args = ApplicantArgs {
            gender: Some("Female".to_string()),
            loan_amount: Some(120.0),
            ..ApplicantArgs::default()
        };
        let raw = raw_applicant_from_args(&args).unwrap();
        assert_eq!(raw.gender, "Female");
        assert_eq!(raw.loan_amount, 120.0);
        assert_eq!(raw.married, "Yes");
    }
}
