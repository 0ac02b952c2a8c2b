//! Director Registry
//!
//! In-memory model of the array's FA directors and their enabled ports.
//! The first discovery pass fixes the set of directors and ports; later
//! passes only update records in place.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// =============================================================================
// Constants
// =============================================================================

/// Vendor prefix stripped from director identifiers
const DIRECTOR_PREFIX: &str = "FA-";

/// Width director names are zero-padded to when sorting
const DIRECTOR_SORT_WIDTH: usize = 3;

/// Marker appended to initiators that are no longer logged in
pub const NO_LOGIN_MARKER: &str = "(no_login)";

/// Strip the vendor prefix from a director identifier (`FA-7E` -> `7E`)
pub fn normalize_director_name(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix(DIRECTOR_PREFIX)
        .unwrap_or(trimmed)
        .to_string()
}

/// Sort key for director names: left-padded with zeros to width 3
pub fn director_sort_key(name: &str) -> String {
    format!("{:0>width$}", name, width = DIRECTOR_SORT_WIDTH)
}

// =============================================================================
// Connection Status
// =============================================================================

/// Fabric connectivity of a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionStatus {
    Connected,
    NotConnected,
}

impl ConnectionStatus {
    /// Map the raw connectivity field; only `Yes` means connected
    pub fn from_connectivity(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("Yes") => ConnectionStatus::Connected,
            _ => ConnectionStatus::NotConnected,
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ConnectionStatus::Connected => "Yes",
            ConnectionStatus::NotConnected => "No",
        };
        // pad() so width specifiers in the report apply
        f.pad(label)
    }
}

// =============================================================================
// Port Record
// =============================================================================

/// One enabled front-end port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRecord {
    /// Owning director (normalized)
    pub director_name: String,
    /// Port number, unique within the director
    pub port_number: String,
    /// Fabric connectivity
    pub connection_status: ConnectionStatus,
    /// Mapped devices including meta members
    pub used_address_count: u32,
    /// Initiators currently logged in
    pub active_logins: Vec<String>,
    /// Initiators seen before but not logged in, each with the marker
    pub historical_logins: Vec<String>,
}

impl PortRecord {
    pub fn new(
        director_name: impl Into<String>,
        port_number: impl Into<String>,
        connection_status: ConnectionStatus,
    ) -> Self {
        Self {
            director_name: director_name.into(),
            port_number: port_number.into(),
            connection_status,
            used_address_count: 0,
            active_logins: Vec::new(),
            historical_logins: Vec::new(),
        }
    }

    /// Record an initiator that is logged in now
    pub fn add_active_login(&mut self, initiator: impl Into<String>) {
        self.active_logins.push(initiator.into());
    }

    /// Record an initiator from the login history
    pub fn add_historical_login(&mut self, initiator: &str) {
        self.historical_logins
            .push(format!("{}{}", initiator, NO_LOGIN_MARKER));
    }
}

impl std::fmt::Display for PortRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.director_name, self.port_number)
    }
}

// =============================================================================
// Director Record
// =============================================================================

/// One FA director and its enabled ports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorRecord {
    /// Normalized director name
    pub name: String,
    ports: IndexMap<String, PortRecord>,
}

impl DirectorRecord {
    /// Create a director from its reported identifier
    pub fn new(raw_name: &str) -> Self {
        Self {
            name: normalize_director_name(raw_name),
            ports: IndexMap::new(),
        }
    }

    /// Add a port. Returns false if the port number already exists.
    pub fn add_port(&mut self, port_number: &str, status: ConnectionStatus) -> bool {
        if self.ports.contains_key(port_number) {
            return false;
        }
        self.ports.insert(
            port_number.to_string(),
            PortRecord::new(self.name.clone(), port_number, status),
        );
        true
    }

    pub fn port(&self, port_number: &str) -> Option<&PortRecord> {
        self.ports.get(port_number)
    }

    pub fn port_mut(&mut self, port_number: &str) -> Option<&mut PortRecord> {
        self.ports.get_mut(port_number)
    }

    /// Ports in discovery order
    pub fn ports(&self) -> impl Iterator<Item = &PortRecord> {
        self.ports.values()
    }

    /// Ports ordered by port number
    pub fn sorted_ports(&self) -> Vec<&PortRecord> {
        let mut ports: Vec<&PortRecord> = self.ports.values().collect();
        ports.sort_by(|a, b| a.port_number.cmp(&b.port_number));
        ports
    }

    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    /// Total mapped addresses across all ports of this director
    pub fn used_addresses(&self) -> u64 {
        self.ports
            .values()
            .map(|p| u64::from(p.used_address_count))
            .sum()
    }

    /// Addresses left in the director-wide budget (negative when over-committed)
    pub fn remaining_addresses(&self, budget: u32) -> i64 {
        i64::from(budget) - self.used_addresses() as i64
    }
}

impl std::fmt::Display for DirectorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>3}", self.name)
    }
}

// =============================================================================
// Director Registry
// =============================================================================

/// All directors discovered on one array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorRegistry {
    directors: IndexMap<String, DirectorRecord>,
}

impl DirectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the director for a reported identifier, creating it if absent
    pub fn ensure_director(&mut self, raw_name: &str) -> &mut DirectorRecord {
        let name = normalize_director_name(raw_name);
        self.directors
            .entry(name)
            .or_insert_with(|| DirectorRecord::new(raw_name))
    }

    /// Look up a director by reported or normalized identifier
    pub fn director(&self, raw_name: &str) -> Option<&DirectorRecord> {
        self.directors.get(&normalize_director_name(raw_name))
    }

    /// Look up a port by reported director identifier and port number
    pub fn port(&self, raw_director: &str, port_number: &str) -> Option<&PortRecord> {
        self.director(raw_director)
            .and_then(|d| d.port(port_number.trim()))
    }

    pub fn port_mut(&mut self, raw_director: &str, port_number: &str) -> Option<&mut PortRecord> {
        self.directors
            .get_mut(&normalize_director_name(raw_director))
            .and_then(|d| d.port_mut(port_number.trim()))
    }

    /// Directors in discovery order
    pub fn directors(&self) -> impl Iterator<Item = &DirectorRecord> {
        self.directors.values()
    }

    /// Directors ordered by zero-padded name
    pub fn sorted_directors(&self) -> Vec<&DirectorRecord> {
        let mut directors: Vec<&DirectorRecord> = self.directors.values().collect();
        directors.sort_by_cached_key(|d| director_sort_key(&d.name));
        directors
    }

    pub fn director_count(&self) -> usize {
        self.directors.len()
    }

    pub fn port_count(&self) -> usize {
        self.directors.values().map(DirectorRecord::port_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.directors.is_empty()
    }
}
