//! SYMCLI Fabric Sources
//!
//! [`FabricSource`] implementations backed by live SYMCLI calls or by
//! previously captured XML documents.

use crate::domain::ports::{AddressUsageReport, FabricSource, LoginReport, PortConfiguration};
use crate::error::{Error, Result};
use crate::symcli::command::{SymcliQuery, SymcliRunner};
use crate::symcli::xml::{parse_address_usage, parse_logins, parse_port_configuration};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

// =============================================================================
// Live Source
// =============================================================================

/// Queries the array through the SYMCLI binaries
pub struct SymcliSource {
    runner: SymcliRunner,
}

impl SymcliSource {
    pub fn new(runner: SymcliRunner) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl FabricSource for SymcliSource {
    async fn port_configuration(&self, array_id: &str) -> Result<PortConfiguration> {
        let xml = self.runner.run(SymcliQuery::PortConfiguration, array_id).await?;
        parse_port_configuration(&xml)
    }

    async fn address_usage(&self, array_id: &str) -> Result<AddressUsageReport> {
        let xml = self.runner.run(SymcliQuery::AddressUsage, array_id).await?;
        parse_address_usage(&xml)
    }

    async fn port_logins(&self, array_id: &str) -> Result<LoginReport> {
        let xml = self.runner.run(SymcliQuery::Logins, array_id).await?;
        parse_logins(&xml)
    }

    fn name(&self) -> &str {
        "symcli"
    }
}

// =============================================================================
// Replay Source
// =============================================================================

/// Reads captured SYMCLI XML from a directory
///
/// Expects `symcfg_fa_port.xml`, `symcfg_addresses.xml` and
/// `symaccess_list_logins.xml`. The array id is not used to select files.
pub struct ReplaySource {
    dir: PathBuf,
}

impl ReplaySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn read(&self, query: SymcliQuery) -> Result<String> {
        let path = self.dir.join(query.capture_file());
        debug!("Replaying {} from {}", query, path.display());

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::CommandLaunch {
                query: query.label().to_string(),
                command: format!("read {}", path.display()),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl FabricSource for ReplaySource {
    async fn port_configuration(&self, _array_id: &str) -> Result<PortConfiguration> {
        parse_port_configuration(&self.read(SymcliQuery::PortConfiguration).await?)
    }

    async fn address_usage(&self, _array_id: &str) -> Result<AddressUsageReport> {
        parse_address_usage(&self.read(SymcliQuery::AddressUsage).await?)
    }

    async fn port_logins(&self, _array_id: &str) -> Result<LoginReport> {
        parse_logins(&self.read(SymcliQuery::Logins).await?)
    }

    fn name(&self) -> &str {
        "replay"
    }
}
