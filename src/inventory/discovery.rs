//! FA Port Discovery
//!
//! Runs the three discovery passes against a [`FabricSource`] and merges
//! their results into a [`DirectorRegistry`]:
//!
//! 1. port enumeration creates directors and their enabled ports
//! 2. address usage sets each port's mapped device count
//! 3. login enumeration appends active and historical initiators
//!
//! Passes 2 and 3 never create records. References to ports the first pass
//! did not create are handled by the configured [`UnknownPortPolicy`].

use crate::config::{InventoryConfig, UnknownPortPolicy};
use crate::domain::ports::{
    AddressUsageReport, FabricSource, LoginEntry, LoginReport, PortConfiguration,
};
use crate::error::{Error, Result};
use crate::inventory::registry::{ConnectionStatus, DirectorRegistry, PortRecord};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

// =============================================================================
// Constants
// =============================================================================

/// Port status value for an enabled slot
const PORT_ENABLED: &str = "ON";

/// Node name reported when the fabric database has no entry
const NODE_NAME_NOT_APPLICABLE: &str = "NULL";

pub const PORT_CONFIGURATION_QUERY: &str = "port configuration";
pub const ADDRESS_USAGE_QUERY: &str = "address usage";
pub const LOGINS_QUERY: &str = "logins";

// =============================================================================
// Results
// =============================================================================

/// Fully collected inventory for one array
#[derive(Debug, Clone)]
pub struct Inventory {
    /// Array identifier as reported by the array
    pub array_id: String,
    /// Directors and ports with usage and logins applied
    pub registry: DirectorRegistry,
    /// When collection finished
    pub collected_at: DateTime<Utc>,
}

/// Outcome of an update pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Records applied to an existing port
    pub applied: usize,
    /// Records skipped because their port is unknown
    pub skipped: usize,
}

// =============================================================================
// Pass 1: Port Enumeration
// =============================================================================

/// Create directors and enabled ports. Returns the number of ports created.
pub fn populate_ports(config: &PortConfiguration, registry: &mut DirectorRegistry) -> usize {
    let mut created = 0;

    for entry in &config.directors {
        if !entry.enabled {
            debug!("Skipping disabled director {}", entry.director);
            continue;
        }

        let director = registry.ensure_director(&entry.director);

        for slot in &entry.slots {
            let enabled = slot.status.as_deref().map(str::trim) == Some(PORT_ENABLED);
            if !enabled {
                debug!(
                    "Skipping {}:{} (status {:?})",
                    director.name, slot.slot, slot.status
                );
                continue;
            }

            let status = ConnectionStatus::from_connectivity(slot.connectivity.as_deref());
            if director.add_port(&slot.slot.to_string(), status) {
                created += 1;
            } else {
                warn!("Duplicate port {}:{} ignored", director.name, slot.slot);
            }
        }
    }

    created
}

// =============================================================================
// Pass 2: Address Usage
// =============================================================================

/// Overwrite the mapped device count of each referenced port
pub fn apply_address_usage(
    report: &AddressUsageReport,
    registry: &mut DirectorRegistry,
    policy: UnknownPortPolicy,
) -> Result<PassSummary> {
    let mut summary = PassSummary::default();

    for record in &report.records {
        match resolve_port(
            registry,
            ADDRESS_USAGE_QUERY,
            &record.director,
            &record.port,
            policy,
        )? {
            Some(port) => {
                port.used_address_count = record.mapped_devices;
                summary.applied += 1;
            }
            None => summary.skipped += 1,
        }
    }

    Ok(summary)
}

// =============================================================================
// Pass 3: Login Enumeration
// =============================================================================

/// Identity of the initiator behind a login entry
pub fn initiator_identity(entry: &LoginEntry) -> String {
    match entry.node_name.as_deref().map(str::trim) {
        Some(node) if !node.is_empty() && node != NODE_NAME_NOT_APPLICABLE => {
            let port = entry.port_name.as_deref().map(str::trim).unwrap_or_default();
            format!("{}/{}", node, port)
        }
        _ => entry.originator_port_wwn.trim().to_string(),
    }
}

/// Append each login entry to its port's active or historical list
pub fn apply_logins(
    report: &LoginReport,
    registry: &mut DirectorRegistry,
    policy: UnknownPortPolicy,
) -> Result<PassSummary> {
    let mut summary = PassSummary::default();

    for record in &report.records {
        let Some(port) =
            resolve_port(registry, LOGINS_QUERY, &record.director, &record.port, policy)?
        else {
            summary.skipped += 1;
            continue;
        };

        for login in &record.logins {
            let initiator = initiator_identity(login);
            if login.logged_in {
                port.add_active_login(initiator);
            } else {
                port.add_historical_login(&initiator);
            }
        }
        summary.applied += 1;
    }

    Ok(summary)
}

fn resolve_port<'r>(
    registry: &'r mut DirectorRegistry,
    query: &str,
    director: &str,
    port: &str,
    policy: UnknownPortPolicy,
) -> Result<Option<&'r mut PortRecord>> {
    match registry.port_mut(director, port) {
        Some(record) => Ok(Some(record)),
        None => match policy {
            UnknownPortPolicy::Warn => {
                warn!(
                    query,
                    director,
                    port,
                    "Port was not enumerated as enabled, record skipped"
                );
                Ok(None)
            }
            UnknownPortPolicy::Fail => Err(Error::UnknownPort {
                query: query.to_string(),
                director: director.to_string(),
                port: port.to_string(),
            }),
        },
    }
}

// =============================================================================
// Collector
// =============================================================================

/// Drives the three passes in order against one source
pub struct InventoryCollector<'a, S: FabricSource + ?Sized> {
    source: &'a S,
    config: &'a InventoryConfig,
}

impl<'a, S: FabricSource + ?Sized> InventoryCollector<'a, S> {
    pub fn new(source: &'a S, config: &'a InventoryConfig) -> Self {
        Self { source, config }
    }

    /// Run all passes. Nothing is returned unless every pass succeeds.
    pub async fn collect(&self) -> Result<Inventory> {
        info!(
            "Collecting FA port inventory for {} via {}",
            self.config.array_id,
            self.source.name()
        );

        let mut registry = DirectorRegistry::new();
        let array_id = self.discover_ports(&mut registry).await?;
        self.collect_address_usage(&array_id, &mut registry).await?;
        self.collect_logins(&array_id, &mut registry).await?;

        Ok(Inventory {
            array_id,
            registry,
            collected_at: Utc::now(),
        })
    }

    /// Pass 1. Returns the array identifier reported by the array.
    async fn discover_ports(&self, registry: &mut DirectorRegistry) -> Result<String> {
        let config = self.source.port_configuration(&self.config.array_id).await?;

        if config.array_id != self.config.array_id {
            debug!(
                "Array {} reports itself as {}",
                self.config.array_id, config.array_id
            );
        }

        let created = populate_ports(&config, registry);
        info!(
            "Found {} enabled ports on {} directors",
            created,
            registry.director_count()
        );

        Ok(config.array_id)
    }

    /// Pass 2
    async fn collect_address_usage(
        &self,
        array_id: &str,
        registry: &mut DirectorRegistry,
    ) -> Result<()> {
        let report = self.source.address_usage(array_id).await?;
        check_array_id(ADDRESS_USAGE_QUERY, array_id, report.array_id.as_deref());

        let summary = apply_address_usage(&report, registry, self.config.unknown_port_policy)?;
        info!(
            "Applied address usage to {} ports ({} skipped)",
            summary.applied, summary.skipped
        );
        Ok(())
    }

    /// Pass 3
    async fn collect_logins(&self, array_id: &str, registry: &mut DirectorRegistry) -> Result<()> {
        let report = self.source.port_logins(array_id).await?;
        check_array_id(LOGINS_QUERY, array_id, report.array_id.as_deref());

        let summary = apply_logins(&report, registry, self.config.unknown_port_policy)?;
        info!(
            "Applied logins to {} ports ({} skipped)",
            summary.applied, summary.skipped
        );
        Ok(())
    }
}

fn check_array_id(query: &str, expected: &str, reported: Option<&str>) {
    if let Some(reported) = reported {
        if reported != expected {
            warn!(query, expected, reported, "Query returned data for a different array");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        AddressUsage, DirectorPortConfig, PortLoginRecord, PortSlotConfig,
    };
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn slot(n: u8, status: &str, conn: &str) -> PortSlotConfig {
        PortSlotConfig {
            slot: n,
            status: Some(status.to_string()),
            connectivity: Some(conn.to_string()),
        }
    }

    fn director(name: &str, slots: Vec<PortSlotConfig>) -> DirectorPortConfig {
        DirectorPortConfig {
            director: name.to_string(),
            enabled: true,
            slots,
        }
    }

    fn single_port_config() -> PortConfiguration {
        PortConfiguration {
            array_id: "000195700123".to_string(),
            directors: vec![director(
                "FA-1A",
                vec![
                    slot(0, "ON", "Yes"),
                    slot(1, "OFF", "N/A"),
                    slot(2, "OFF", "N/A"),
                    slot(3, "OFF", "N/A"),
                ],
            )],
        }
    }

    fn login(wwn: &str, node: Option<&str>, port: Option<&str>, logged_in: bool) -> LoginEntry {
        LoginEntry {
            originator_port_wwn: wwn.to_string(),
            node_name: node.map(str::to_string),
            port_name: port.map(str::to_string),
            logged_in,
        }
    }

    fn usage(director: &str, port: &str, count: u32) -> AddressUsage {
        AddressUsage {
            director: director.to_string(),
            port: port.to_string(),
            mapped_devices: count,
        }
    }

    #[test]
    fn test_populate_skips_disabled_slots() {
        let mut registry = DirectorRegistry::new();
        let created = populate_ports(&single_port_config(), &mut registry);

        assert_eq!(created, 1);
        assert_eq!(registry.director_count(), 1);
        assert_eq!(registry.port_count(), 1);
        let port = registry.port("1A", "0").unwrap();
        assert_eq!(port.connection_status, ConnectionStatus::Connected);
        assert_eq!(port.used_address_count, 0);
        assert!(registry.port("1A", "1").is_none());
    }

    #[test]
    fn test_populate_maps_connectivity() {
        let config = PortConfiguration {
            array_id: "1234".into(),
            directors: vec![director(
                "FA-7E",
                vec![slot(0, "ON", "Yes"), slot(1, "ON", "N/A"), slot(2, "ON", "No")],
            )],
        };
        let mut registry = DirectorRegistry::new();
        populate_ports(&config, &mut registry);

        assert_eq!(
            registry.port("7E", "0").unwrap().connection_status,
            ConnectionStatus::Connected
        );
        assert_eq!(
            registry.port("7E", "1").unwrap().connection_status,
            ConnectionStatus::NotConnected
        );
        assert_eq!(
            registry.port("7E", "2").unwrap().connection_status,
            ConnectionStatus::NotConnected
        );
    }

    #[test]
    fn test_populate_skips_disabled_director() {
        let mut entry = director("FA-9H", vec![slot(0, "ON", "Yes")]);
        entry.enabled = false;
        let config = PortConfiguration {
            array_id: "1234".into(),
            directors: vec![entry],
        };
        let mut registry = DirectorRegistry::new();

        assert_eq!(populate_ports(&config, &mut registry), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_populate_director_with_no_enabled_ports() {
        let config = PortConfiguration {
            array_id: "1234".into(),
            directors: vec![director("FA-2B", vec![slot(0, "OFF", "N/A")])],
        };
        let mut registry = DirectorRegistry::new();
        populate_ports(&config, &mut registry);

        assert_eq!(registry.director_count(), 1);
        assert_eq!(registry.port_count(), 0);
    }

    #[test]
    fn test_address_usage_overwrites_count() {
        let mut registry = DirectorRegistry::new();
        populate_ports(&single_port_config(), &mut registry);

        let report = AddressUsageReport {
            array_id: None,
            records: vec![usage("FA-1A", "0", 7), usage("FA-1A", "0", 10)],
        };
        let summary =
            apply_address_usage(&report, &mut registry, UnknownPortPolicy::Warn).unwrap();

        assert_eq!(summary.applied, 2);
        assert_eq!(registry.port("1A", "0").unwrap().used_address_count, 10);
    }

    #[test]
    fn test_address_usage_for_disabled_port_is_skipped() {
        let mut registry = DirectorRegistry::new();
        populate_ports(&single_port_config(), &mut registry);

        let report = AddressUsageReport {
            array_id: None,
            records: vec![usage("FA-1A", "1", 42), usage("FA-5C", "0", 3)],
        };
        let summary =
            apply_address_usage(&report, &mut registry, UnknownPortPolicy::Warn).unwrap();

        assert_eq!(summary, PassSummary { applied: 0, skipped: 2 });
        assert!(registry.port("1A", "1").is_none());
        assert_eq!(registry.port_count(), 1);
    }

    #[test]
    fn test_address_usage_fail_policy() {
        let mut registry = DirectorRegistry::new();
        populate_ports(&single_port_config(), &mut registry);

        let report = AddressUsageReport {
            array_id: None,
            records: vec![usage("FA-1A", "3", 1)],
        };
        let result = apply_address_usage(&report, &mut registry, UnknownPortPolicy::Fail);

        assert_matches!(
            result,
            Err(Error::UnknownPort { ref director, ref port, .. }) if director == "FA-1A" && port == "3"
        );
    }

    #[test]
    fn test_initiator_identity() {
        let entry = login("10:00:00:00:c9:aa:bb:01", Some("NULL"), Some("NULL"), false);
        assert_eq!(initiator_identity(&entry), "10:00:00:00:c9:aa:bb:01");

        let entry = login(
            "10:00:00:00:c9:aa:bb:01",
            Some("esx01"),
            Some("vmhba2"),
            true,
        );
        assert_eq!(initiator_identity(&entry), "esx01/vmhba2");

        let entry = login("10:00:00:00:c9:aa:bb:02", None, None, true);
        assert_eq!(initiator_identity(&entry), "10:00:00:00:c9:aa:bb:02");
    }

    #[test]
    fn test_logins_classified_in_source_order() {
        let mut registry = DirectorRegistry::new();
        populate_ports(&single_port_config(), &mut registry);

        let report = LoginReport {
            array_id: None,
            records: vec![PortLoginRecord {
                director: "FA-1A".into(),
                port: "0".into(),
                logins: vec![
                    login("wwn-b", Some("NULL"), Some("NULL"), true),
                    login("wwn-a", Some("host-a"), Some("hba0"), true),
                    login("wwn-c", Some("NULL"), Some("NULL"), false),
                    login("wwn-b", Some("NULL"), Some("NULL"), true),
                ],
            }],
        };
        apply_logins(&report, &mut registry, UnknownPortPolicy::Warn).unwrap();

        let port = registry.port("1A", "0").unwrap();
        assert_eq!(port.active_logins, vec!["wwn-b", "host-a/hba0", "wwn-b"]);
        assert_eq!(port.historical_logins, vec!["wwn-c(no_login)"]);
    }

    #[test]
    fn test_logins_for_unknown_port() {
        let mut registry = DirectorRegistry::new();
        populate_ports(&single_port_config(), &mut registry);

        let report = LoginReport {
            array_id: None,
            records: vec![PortLoginRecord {
                director: "FA-1A".into(),
                port: "2".into(),
                logins: vec![login("wwn-a", Some("NULL"), None, true)],
            }],
        };

        let summary = apply_logins(&report, &mut registry, UnknownPortPolicy::Warn).unwrap();
        assert_eq!(summary.skipped, 1);
        assert!(registry.port("1A", "0").unwrap().active_logins.is_empty());

        assert_matches!(
            apply_logins(&report, &mut registry, UnknownPortPolicy::Fail),
            Err(Error::UnknownPort { .. })
        );
    }

    // -------------------------------------------------------------------------
    // Collector
    // -------------------------------------------------------------------------

    struct FixtureSource {
        ports: PortConfiguration,
        addresses: AddressUsageReport,
        logins: LoginReport,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl FixtureSource {
        fn record(&self, query: &str, array_id: &str) {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), array_id.to_string()));
        }
    }

    #[async_trait]
    impl FabricSource for FixtureSource {
        async fn port_configuration(&self, array_id: &str) -> Result<PortConfiguration> {
            self.record(PORT_CONFIGURATION_QUERY, array_id);
            Ok(self.ports.clone())
        }

        async fn address_usage(&self, array_id: &str) -> Result<AddressUsageReport> {
            self.record(ADDRESS_USAGE_QUERY, array_id);
            Ok(self.addresses.clone())
        }

        async fn port_logins(&self, array_id: &str) -> Result<LoginReport> {
            self.record(LOGINS_QUERY, array_id);
            Ok(self.logins.clone())
        }

        fn name(&self) -> &str {
            "fixture"
        }
    }

    fn scenario_source() -> FixtureSource {
        FixtureSource {
            ports: single_port_config(),
            addresses: AddressUsageReport {
                array_id: Some("000195700123".into()),
                records: vec![usage("FA-1A", "0", 10)],
            },
            logins: LoginReport {
                array_id: Some("000195700123".into()),
                records: vec![PortLoginRecord {
                    director: "FA-1A".into(),
                    port: "0".into(),
                    logins: vec![
                        login(
                            "10:00:00:00:c9:11:22:33",
                            Some("50:00:09:72:00:11:22:33"),
                            Some("50:00:09:72:00:11:22:34"),
                            true,
                        ),
                        login("10:00:00:00:c9:44:55:66", Some("NULL"), Some("NULL"), false),
                    ],
                }],
            },
            calls: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_collect_uses_reported_array_id() {
        let source = scenario_source();
        let config = InventoryConfig::new("123");

        let inventory = InventoryCollector::new(&source, &config)
            .collect()
            .await
            .unwrap();

        assert_eq!(inventory.array_id, "000195700123");
        let calls = source.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                (PORT_CONFIGURATION_QUERY.to_string(), "123".to_string()),
                (ADDRESS_USAGE_QUERY.to_string(), "000195700123".to_string()),
                (LOGINS_QUERY.to_string(), "000195700123".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_collect_end_to_end() {
        let source = scenario_source();
        let config = InventoryConfig::new("000195700123");

        let inventory = InventoryCollector::new(&source, &config)
            .collect()
            .await
            .unwrap();

        let port = inventory.registry.port("1A", "0").unwrap();
        assert_eq!(port.connection_status, ConnectionStatus::Connected);
        assert_eq!(port.used_address_count, 10);
        assert_eq!(
            port.active_logins,
            vec!["50:00:09:72:00:11:22:33/50:00:09:72:00:11:22:34"]
        );
        assert_eq!(
            port.historical_logins,
            vec!["10:00:00:00:c9:44:55:66(no_login)"]
        );
        assert_eq!(
            inventory
                .registry
                .director("1A")
                .unwrap()
                .remaining_addresses(config.max_addresses_per_director),
            4086
        );
    }

    #[tokio::test]
    async fn test_collect_fails_fast_under_fail_policy() {
        let mut source = scenario_source();
        source.addresses.records.push(usage("FA-1A", "2", 5));
        let config = InventoryConfig {
            unknown_port_policy: UnknownPortPolicy::Fail,
            ..InventoryConfig::new("000195700123")
        };

        let result = InventoryCollector::new(&source, &config).collect().await;

        assert_matches!(result, Err(Error::UnknownPort { .. }));
        // Login query never ran
        assert_eq!(source.calls.lock().unwrap().len(), 2);
    }
}
