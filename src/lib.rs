//! FA Port Inventory
//!
//! Builds a per-director, per-port inventory of a Symmetrix/VMAX array's
//! front-end (FA) ports from three SYMCLI queries and renders it as a
//! fixed-width text report.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        InventoryCollector                          │
//! │   Pass 1: ports  ──▶  Pass 2: address usage  ──▶  Pass 3: logins   │
//! └───────────────────────────────┬───────────────────────────────────┘
//!                                 │
//!              ┌──────────────────┴──────────────────┐
//!              │                                     │
//!   ┌──────────┴──────────┐              ┌───────────┴───────────┐
//!   │  FabricSource       │              │  DirectorRegistry     │
//!   │  (symcli / replay)  │              │  FA ─▶ port records   │
//!   └─────────────────────┘              └───────────┬───────────┘
//!                                                    │
//!                                        ┌───────────┴───────────┐
//!                                        │     Text report       │
//!                                        └───────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`]: run configuration
//! - [`domain`]: query records and the [`FabricSource`] trait
//! - [`inventory`]: registry, discovery passes and report rendering
//! - [`symcli`]: SYMCLI invocation and XML decoding
//! - [`error`]: error types

pub mod config;
pub mod domain;
pub mod error;
pub mod inventory;
pub mod symcli;

// Re-export commonly used types
pub use config::{InventoryConfig, UnknownPortPolicy, DEFAULT_MAX_ADDRESSES_PER_DIRECTOR};

pub use domain::ports::{
    AddressUsage, AddressUsageReport, DirectorPortConfig, FabricSource, LoginEntry, LoginReport,
    PortConfiguration, PortLoginRecord, PortSlotConfig,
};

pub use error::{Error, ErrorCategory, Result};

pub use inventory::{
    render_report, write_report, ConnectionStatus, DirectorRecord, DirectorRegistry, Inventory,
    InventoryCollector, PassSummary, PortRecord,
};

pub use symcli::{ReplaySource, SymcliQuery, SymcliRunner, SymcliSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
