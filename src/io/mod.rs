//! Input/output helpers.
//!
//! - model/scaler artifact loading (`artifact`)
//! - applicant JSON input (`input`)
//! - CSV record export and export file naming (`export`)
//! - PDF report export (`pdf`)

pub mod artifact;
pub mod export;
pub mod input;
pub mod pdf;

pub use artifact::*;
pub use export::*;
pub use input::*;
pub use pdf::*;
