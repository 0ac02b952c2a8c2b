//! SYMCLI XML Decoding
//!
//! Decodes the XML documents SYMCLI prints when `SYMCLI_OUTPUT_MODE=XML`
//! into the domain records consumed by the discovery passes. Only the
//! fields the passes use are modelled; everything else is ignored.

use crate::domain::ports::{
    AddressUsage, AddressUsageReport, DirectorPortConfig, LoginEntry, LoginReport,
    PortConfiguration, PortLoginRecord, PortSlotConfig,
};
use crate::error::{Error, Result};
use crate::inventory::discovery::{ADDRESS_USAGE_QUERY, LOGINS_QUERY, PORT_CONFIGURATION_QUERY};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// Director status that marks a director as disabled
const DIRECTOR_OFFLINE: &str = "Offline";

/// Value of `logged_in` for an active login
const LOGGED_IN: &str = "Yes";

// =============================================================================
// Document Structures
// =============================================================================

/// `<SymCLI_ML>` root; the root element name itself is not checked
#[derive(Debug, Deserialize)]
struct SymcliDocument<T> {
    #[serde(rename = "Symmetrix")]
    symmetrix: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
struct SymmInfo {
    symid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PortConfigArray {
    #[serde(rename = "Symm_Info")]
    symm_info: Option<SymmInfo>,
    #[serde(rename = "Director", default)]
    directors: Vec<PortConfigDirector>,
}

#[derive(Debug, Deserialize)]
struct PortConfigDirector {
    #[serde(rename = "Dir_Info")]
    dir_info: Option<PortConfigDirInfo>,
}

#[derive(Debug, Deserialize)]
struct PortConfigDirInfo {
    id: Option<String>,
    status: Option<String>,
    port0_status: Option<String>,
    port0_conn_status: Option<String>,
    port1_status: Option<String>,
    port1_conn_status: Option<String>,
    port2_status: Option<String>,
    port2_conn_status: Option<String>,
    port3_status: Option<String>,
    port3_conn_status: Option<String>,
}

impl PortConfigDirInfo {
    fn into_slots(self) -> Vec<PortSlotConfig> {
        [
            (self.port0_status, self.port0_conn_status),
            (self.port1_status, self.port1_conn_status),
            (self.port2_status, self.port2_conn_status),
            (self.port3_status, self.port3_conn_status),
        ]
        .into_iter()
        .zip(0u8..)
        .map(|((status, connectivity), slot)| PortSlotConfig {
            slot,
            status,
            connectivity,
        })
        .collect()
    }
}

#[derive(Debug, Deserialize)]
struct AddressArray {
    #[serde(rename = "Symm_Info")]
    symm_info: Option<SymmInfo>,
    #[serde(rename = "Director", default)]
    directors: Vec<AddressDirector>,
}

#[derive(Debug, Deserialize)]
struct AddressDirector {
    #[serde(rename = "Dir_Info")]
    dir_info: Option<AddressDirInfo>,
    #[serde(rename = "Total")]
    total: Option<AddressTotal>,
}

#[derive(Debug, Deserialize)]
struct AddressDirInfo {
    id: Option<String>,
    port: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AddressTotal {
    mapped_devs_w_metamember: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginArray {
    #[serde(rename = "Symm_Info")]
    symm_info: Option<SymmInfo>,
    #[serde(rename = "Devmask_Login_Record", default)]
    records: Vec<LoginRecordXml>,
}

#[derive(Debug, Deserialize)]
struct LoginRecordXml {
    director: Option<String>,
    port: Option<String>,
    #[serde(rename = "Login", default)]
    logins: Vec<LoginXml>,
}

#[derive(Debug, Deserialize)]
struct LoginXml {
    originator_port_wwn: Option<String>,
    awwn_node_name: Option<String>,
    awwn_port_name: Option<String>,
    logged_in: Option<String>,
}

// =============================================================================
// Parsing
// =============================================================================

/// Decode the `symcfg list -fa all -port` document
pub fn parse_port_configuration(xml: &str) -> Result<PortConfiguration> {
    let query = PORT_CONFIGURATION_QUERY;
    let array: PortConfigArray = parse_symmetrix(query, xml)?;

    let array_id = array
        .symm_info
        .and_then(|info| info.symid)
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| missing(query, "Symm_Info/symid"))?;

    let mut directors = Vec::with_capacity(array.directors.len());
    for entry in array.directors {
        let info = entry
            .dir_info
            .ok_or_else(|| missing(query, "Director/Dir_Info"))?;
        let director = required(query, "Director/Dir_Info/id", info.id.clone())?;
        let enabled = !info
            .status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case(DIRECTOR_OFFLINE));

        directors.push(DirectorPortConfig {
            director,
            enabled,
            slots: info.into_slots(),
        });
    }

    debug!("Decoded {} director entries for {}", directors.len(), array_id);
    Ok(PortConfiguration {
        array_id,
        directors,
    })
}

/// Decode the `symcfg list -address -dir all` document
pub fn parse_address_usage(xml: &str) -> Result<AddressUsageReport> {
    let query = ADDRESS_USAGE_QUERY;
    let array: AddressArray = parse_symmetrix(query, xml)?;

    let mut records = Vec::with_capacity(array.directors.len());
    for entry in array.directors {
        let info = entry
            .dir_info
            .ok_or_else(|| missing(query, "Director/Dir_Info"))?;
        let director = required(query, "Director/Dir_Info/id", info.id)?;
        let port = required(query, "Director/Dir_Info/port", info.port)?;
        let raw_count = required(
            query,
            "Director/Total/mapped_devs_w_metamember",
            entry.total.and_then(|t| t.mapped_devs_w_metamember),
        )?;

        let mapped_devices = raw_count.parse().map_err(|_| Error::InvalidValue {
            query: query.to_string(),
            field: "mapped_devs_w_metamember".into(),
            value: raw_count.clone(),
        })?;

        records.push(AddressUsage {
            director,
            port,
            mapped_devices,
        });
    }

    Ok(AddressUsageReport {
        array_id: symid(array.symm_info),
        records,
    })
}

/// Decode the `symaccess list logins` document
pub fn parse_logins(xml: &str) -> Result<LoginReport> {
    let query = LOGINS_QUERY;
    let array: LoginArray = parse_symmetrix(query, xml)?;

    let mut records = Vec::with_capacity(array.records.len());
    for record in array.records {
        let director = required(query, "Devmask_Login_Record/director", record.director)?;
        let port = required(query, "Devmask_Login_Record/port", record.port)?;

        let mut logins = Vec::with_capacity(record.logins.len());
        for login in record.logins {
            logins.push(LoginEntry {
                originator_port_wwn: required(
                    query,
                    "Login/originator_port_wwn",
                    login.originator_port_wwn,
                )?,
                node_name: login.awwn_node_name,
                port_name: login.awwn_port_name,
                logged_in: login.logged_in.as_deref().map(str::trim) == Some(LOGGED_IN),
            });
        }

        records.push(PortLoginRecord {
            director,
            port,
            logins,
        });
    }

    Ok(LoginReport {
        array_id: symid(array.symm_info),
        records,
    })
}

// Helper functions

fn parse_symmetrix<T: DeserializeOwned>(query: &str, xml: &str) -> Result<T> {
    let document: SymcliDocument<T> =
        quick_xml::de::from_str(xml).map_err(|e| Error::XmlParse {
            query: query.to_string(),
            reason: e.to_string(),
        })?;

    document.symmetrix.ok_or_else(|| missing(query, "Symmetrix"))
}

fn required(query: &str, element: &str, value: Option<String>) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(query, element))
}

fn missing(query: &str, element: &str) -> Error {
    Error::MissingElement {
        query: query.to_string(),
        element: element.to_string(),
    }
}

fn symid(info: Option<SymmInfo>) -> Option<String> {
    info.and_then(|i| i.symid).map(|id| id.trim().to_string())
}
