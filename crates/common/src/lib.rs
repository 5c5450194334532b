//! Daymap Common Utilities
//!
//! Shared infrastructure for all Daymap crates:
//! - Error types and result aliases
//! - Clock utilities that decide what "today" is
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
