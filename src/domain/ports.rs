//! Domain Ports - Core trait definitions for the FA port inventory
//!
//! These traits define the boundary between the aggregation logic and the
//! array's management interface. Adapters implement these traits to provide
//! the three query results the discovery passes consume.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// =============================================================================
// Port Configuration (symcfg list -fa all -port)
// =============================================================================

/// One port slot as reported by the port configuration query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSlotConfig {
    /// Slot number (0..=3)
    pub slot: u8,
    /// Raw port status field (`ON` when enabled)
    pub status: Option<String>,
    /// Raw fabric connectivity field (`Yes` when connected)
    pub connectivity: Option<String>,
}

/// One director entry from the port configuration query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorPortConfig {
    /// Director identifier as reported (e.g. `FA-1A`)
    pub director: String,
    /// Whether the director itself is enabled
    pub enabled: bool,
    /// Per-slot status
    pub slots: Vec<PortSlotConfig>,
}

/// Result of the port configuration query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortConfiguration {
    /// Array identifier as reported by the array itself
    pub array_id: String,
    /// Director entries in document order
    pub directors: Vec<DirectorPortConfig>,
}

// =============================================================================
// Address Usage (symcfg list -address -dir all)
// =============================================================================

/// Mapped device count for one director port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressUsage {
    /// Director identifier as reported
    pub director: String,
    /// Port number
    pub port: String,
    /// Mapped devices including meta members
    pub mapped_devices: u32,
}

/// Result of the address usage query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressUsageReport {
    /// Array identifier, when the document carries one
    pub array_id: Option<String>,
    /// Records in document order
    pub records: Vec<AddressUsage>,
}

// =============================================================================
// Logins (symaccess list logins)
// =============================================================================

/// One initiator login seen on a port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginEntry {
    /// Originator port WWN
    pub originator_port_wwn: String,
    /// Fabric node name (`NULL` when the fabric database has none)
    pub node_name: Option<String>,
    /// Fabric port name
    pub port_name: Option<String>,
    /// Currently logged in
    pub logged_in: bool,
}

/// Login records for one director port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortLoginRecord {
    /// Director identifier as reported
    pub director: String,
    /// Port number
    pub port: String,
    /// Login entries in document order
    pub logins: Vec<LoginEntry>,
}

/// Result of the login query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginReport {
    /// Array identifier, when the document carries one
    pub array_id: Option<String>,
    /// Records in document order
    pub records: Vec<PortLoginRecord>,
}

// =============================================================================
// Fabric Source Port
// =============================================================================

/// Source of FA port data for one array
///
/// Each call is one blocking round trip to the management interface; the
/// discovery passes call them strictly in order.
#[async_trait]
pub trait FabricSource: Send + Sync {
    /// Query per-director port status and connectivity
    async fn port_configuration(&self, array_id: &str) -> Result<PortConfiguration>;

    /// Query per-port mapped device counts
    async fn address_usage(&self, array_id: &str) -> Result<AddressUsageReport>;

    /// Query per-port initiator logins
    async fn port_logins(&self, array_id: &str) -> Result<LoginReport>;

    /// Short name of the source, for logging
    fn name(&self) -> &str;
}
