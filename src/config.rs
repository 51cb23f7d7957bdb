//! Runtime configuration.
//!
//! Resolution order for every setting: command-line flag, then environment
//! (including a `.env` file in the working directory), then the default.

use std::path::PathBuf;

use crate::cli::ArtifactArgs;
use crate::io::ArtifactPaths;

pub const ENV_MODEL_PATH: &str = "LOAN_MODEL_PATH";
pub const ENV_SCALER_PATH: &str = "LOAN_SCALER_PATH";
pub const ENV_EXPORT_DIR: &str = "LOAN_EXPORT_DIR";
pub const ENV_LOG: &str = "LOAN_LOG";
pub const ENV_LOG_FILE: &str = "LOAN_LOG_FILE";

pub const DEFAULT_MODEL_PATH: &str = "model.json";
pub const DEFAULT_LOG_FILE: &str = "loan.log";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub artifacts: ArtifactPaths,
    /// Directory that receives CSV/PDF exports.
    pub export_dir: PathBuf,
    /// Log level filter (`error`..`trace`); front-ends pick their own default.
    pub log_level: Option<String>,
    /// Log destination for the TUI.
    pub log_file: PathBuf,
}

impl AppConfig {
    /// Resolve from flags and the process environment (loading `.env` first).
    pub fn from_env(args: &ArtifactArgs) -> Self {
        dotenvy::dotenv().ok();
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    /// Resolve from flags and an arbitrary variable lookup.
    pub fn resolve(args: &ArtifactArgs, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let model = args
            .model
            .clone()
            .or_else(|| var(ENV_MODEL_PATH).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));
        let scaler = args.scaler.clone().or_else(|| var(ENV_SCALER_PATH).map(PathBuf::from));
        let export_dir = args
            .out_dir
            .clone()
            .or_else(|| var(ENV_EXPORT_DIR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            artifacts: ArtifactPaths { model, scaler },
            export_dir,
            log_level: var(ENV_LOG),
            log_file: var(ENV_LOG_FILE)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn no_args() -> ArtifactArgs {
        ArtifactArgs {
            model: None,
            scaler: None,
            out_dir: None,
        }
    }

    #[test]
    fn defaults_without_env() {
        let cfg = AppConfig::resolve(&no_args(), |_| None);
        assert_eq!(cfg.artifacts.model, PathBuf::from("model.json"));
        assert_eq!(cfg.artifacts.scaler, None);
        assert_eq!(cfg.export_dir, PathBuf::from("."));
        assert_eq!(cfg.log_level, None);
        assert_eq!(cfg.log_file, PathBuf::from("loan.log"));
    }

    #[test]
    fn env_fills_in_and_flags_win() {
        let env: HashMap<&str, &str> = [
            (ENV_MODEL_PATH, "artifacts/model.json"),
            (ENV_SCALER_PATH, "artifacts/scaler.json"),
            (ENV_EXPORT_DIR, "out"),
            (ENV_LOG, "debug"),
            (ENV_LOG_FILE, ""),
        ]
        .into_iter()
        .collect();
        let lookup = |k: &str| env.get(k).map(|v| v.to_string());

        let cfg = AppConfig::resolve(&no_args(), lookup);
        assert_eq!(cfg.artifacts.model, PathBuf::from("artifacts/model.json"));
        assert_eq!(cfg.artifacts.scaler, Some(PathBuf::from("artifacts/scaler.json")));
        assert_eq!(cfg.export_dir, PathBuf::from("out"));
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
        assert_eq!(cfg.log_file, PathBuf::from(DEFAULT_LOG_FILE));

        let args = ArtifactArgs {
            model: Some(PathBuf::from("flag.json")),
            ..no_args()
        };
        let cfg = AppConfig::resolve(&args, lookup);
        assert_eq!(cfg.artifacts.model, PathBuf::from("flag.json"));
    }
}
