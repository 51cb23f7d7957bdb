//! Feature encoding: applicant record -> model input.
//!
//! - fixed category tables (`table`)
//! - the record <-> vector transform (`encoder`)
//! - the optional fitted rescaling of numeric columns (`scaling`)
//!
//! Everything here is pure: no I/O, no clocks, no shared state.

pub mod encoder;
pub mod error;
pub mod scaling;
pub mod table;

pub use encoder::*;
pub use error::*;
pub use scaling::*;
pub use table::*;
