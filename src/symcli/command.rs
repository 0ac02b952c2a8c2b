//! SYMCLI Invocation
//!
//! Runs `symcfg` / `symaccess` with XML output and captures stdout. Each
//! call waits for the tool to exit; there is no timeout and no retry.

use crate::error::{Error, Result};
use crate::inventory::discovery::{ADDRESS_USAGE_QUERY, LOGINS_QUERY, PORT_CONFIGURATION_QUERY};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Environment variable that switches SYMCLI to XML output
const OUTPUT_MODE_VAR: &str = "SYMCLI_OUTPUT_MODE";
const OUTPUT_MODE_XML: &str = "XML";

// =============================================================================
// Queries
// =============================================================================

/// The three SYMCLI queries the inventory is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymcliQuery {
    /// `symcfg -SID <id> list -fa all -port`
    PortConfiguration,
    /// `symcfg -SID <id> list -address -dir all`
    AddressUsage,
    /// `symaccess -SID <id> list logins`
    Logins,
}

impl SymcliQuery {
    pub fn label(&self) -> &'static str {
        match self {
            SymcliQuery::PortConfiguration => PORT_CONFIGURATION_QUERY,
            SymcliQuery::AddressUsage => ADDRESS_USAGE_QUERY,
            SymcliQuery::Logins => LOGINS_QUERY,
        }
    }

    pub fn program(&self) -> &'static str {
        match self {
            SymcliQuery::PortConfiguration | SymcliQuery::AddressUsage => "symcfg",
            SymcliQuery::Logins => "symaccess",
        }
    }

    pub fn args(&self, array_id: &str) -> Vec<String> {
        let tail: &[&str] = match self {
            SymcliQuery::PortConfiguration => &["list", "-fa", "all", "-port"],
            SymcliQuery::AddressUsage => &["list", "-address", "-dir", "all"],
            SymcliQuery::Logins => &["list", "logins"],
        };

        ["-SID", array_id]
            .iter()
            .chain(tail)
            .map(|s| s.to_string())
            .collect()
    }

    /// File name used when the query's output is captured for replay
    pub fn capture_file(&self) -> &'static str {
        match self {
            SymcliQuery::PortConfiguration => "symcfg_fa_port.xml",
            SymcliQuery::AddressUsage => "symcfg_addresses.xml",
            SymcliQuery::Logins => "symaccess_list_logins.xml",
        }
    }
}

impl std::fmt::Display for SymcliQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// =============================================================================
// Runner
// =============================================================================

/// Locates and runs SYMCLI binaries
#[derive(Debug, Clone, Default)]
pub struct SymcliRunner {
    symcli_path: Option<PathBuf>,
}

impl SymcliRunner {
    /// `symcli_path` is the directory holding the binaries; None uses PATH
    pub fn new(symcli_path: Option<PathBuf>) -> Self {
        Self { symcli_path }
    }

    /// Path of a SYMCLI binary
    pub fn binary(&self, program: &str) -> PathBuf {
        match &self.symcli_path {
            Some(dir) => dir.join(program),
            None => PathBuf::from(program),
        }
    }

    /// Run a query and return its XML output
    pub async fn run(&self, query: SymcliQuery, array_id: &str) -> Result<String> {
        let binary = self.binary(query.program());
        run_program(query.label(), &binary, &query.args(array_id)).await
    }
}

/// Run a program with XML output mode and return its stdout
pub async fn run_program(query: &str, program: &Path, args: &[String]) -> Result<String> {
    let command_line = format!("{} {}", program.display(), args.join(" "));
    debug!("Running {}", command_line);

    let output = Command::new(program)
        .args(args)
        .env(OUTPUT_MODE_VAR, OUTPUT_MODE_XML)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| Error::CommandLaunch {
            query: query.to_string(),
            command: command_line.clone(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::CommandFailed {
            query: query.to_string(),
            command: command_line,
            status: output.status.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    debug!("{} returned {} bytes", command_line, output.stdout.len());
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
