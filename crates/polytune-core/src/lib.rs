//! # polytune-core
//!
//! Core types and error handling shared by every Polytune crate.

pub mod error;
pub mod types;

pub use error::{Error, HttpError, Result};
pub use types::*;
