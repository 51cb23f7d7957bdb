//! `loan-screen` library crate.
//!
//! The binary (`loan`) is a thin wrapper around this library so that:
//!
//! - the feature-encoding contract is testable without spawning processes
//! - predictors are injected handles, so tests substitute fakes
//! - presentation (CLI, TUI) and export stay separate from encoding

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod encode;
pub mod error;
pub mod io;
pub mod logging;
pub mod models;
pub mod plot;
pub mod report;
pub mod tui;
