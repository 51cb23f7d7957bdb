//! Reporting utilities: formatted terminal output for a submission.

pub mod format;

pub use format::*;
