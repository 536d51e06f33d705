//! Domain types for the Rollcall attendance terminal.
//!
//! Identifiers, transaction kinds and RTC-shaped timestamps, plus the
//! constants shared by the panel, storage and network crates.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
