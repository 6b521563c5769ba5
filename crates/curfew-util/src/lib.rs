//! Shared utilities for curfewd
//!
//! This crate provides:
//! - Wall-clock time types with minute precision
//! - Time windows for the allowed-period evaluator
//! - Default paths for the policy file and data directory

mod paths;
mod time;

pub use paths::*;
pub use time::*;
