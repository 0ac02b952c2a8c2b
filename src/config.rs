//! Inventory Configuration
//!
//! Run-wide settings built once at startup and passed by reference into
//! discovery and rendering.

use crate::error::{Error, Result};
use std::path::PathBuf;

// =============================================================================
// Constants
// =============================================================================

/// Address budget shared by all ports of one FA director
pub const DEFAULT_MAX_ADDRESSES_PER_DIRECTOR: u32 = 4096;

// =============================================================================
// Unknown Port Policy
// =============================================================================

/// What to do when a later pass names a port the first pass never created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum UnknownPortPolicy {
    /// Skip the record and log a warning
    #[default]
    Warn,
    /// Abort the run
    Fail,
}

impl std::fmt::Display for UnknownPortPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnknownPortPolicy::Warn => write!(f, "warn"),
            UnknownPortPolicy::Fail => write!(f, "fail"),
        }
    }
}

// =============================================================================
// Inventory Configuration
// =============================================================================

/// Configuration for one inventory run
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Array identifier used for the first query
    pub array_id: String,
    /// Directory holding the SYMCLI binaries (None = resolve on PATH)
    pub symcli_path: Option<PathBuf>,
    /// Directory of captured XML documents to replay instead of running SYMCLI
    pub replay_dir: Option<PathBuf>,
    /// Address budget per director
    pub max_addresses_per_director: u32,
    /// Handling of unmatched director/port references
    pub unknown_port_policy: UnknownPortPolicy,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            array_id: String::new(),
            symcli_path: None,
            replay_dir: None,
            max_addresses_per_director: DEFAULT_MAX_ADDRESSES_PER_DIRECTOR,
            unknown_port_policy: UnknownPortPolicy::Warn,
        }
    }
}

impl InventoryConfig {
    /// Create a configuration for the given array with default settings
    pub fn new(array_id: impl Into<String>) -> Self {
        Self {
            array_id: array_id.into(),
            ..Default::default()
        }
    }

    /// Check the configuration before any query is issued
    pub fn validate(&self) -> Result<()> {
        if self.array_id.trim().is_empty() {
            return Err(Error::Configuration("array identifier is empty".into()));
        }

        if self.max_addresses_per_director == 0 {
            return Err(Error::Configuration(
                "address budget per director must be positive".into(),
            ));
        }

        if let Some(dir) = &self.replay_dir {
            if !dir.is_dir() {
                return Err(Error::Configuration(format!(
                    "replay directory {} does not exist",
                    dir.display()
                )));
            }
        }

        Ok(())
    }
}
