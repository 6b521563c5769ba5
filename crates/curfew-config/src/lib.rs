//! Policy store for curfewd
//!
//! Owns the persisted policy: enforcement action mode, per-weekday allowed
//! time windows, broker settings, and the defaults profile restored by a
//! `reset` command. The file format is sectioned TOML; reads are tolerant
//! (malformed windows are skipped with a warning), writes rewrite the file.

mod policy;
mod store;
mod weekday;
mod window;

pub use policy::*;
pub use store::*;
pub use weekday::*;
pub use window::*;

use thiserror::Error;

/// Catastrophic policy-storage failures. Malformed individual entries are
/// not errors; they are skipped at load.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read or write policy file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Policy file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize policy: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;
