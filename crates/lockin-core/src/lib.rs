//! Shared domain types for the Lockin access-control core.
//!
//! This crate holds everything the other workspace members agree on: the
//! device identity token, lock and outcome enums, indicator signals, the
//! error taxonomy and the controller configuration.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::ControllerConfig;
pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
