//! FA Port Report
//!
//! Renders a populated registry as the fixed-width text report. Output is a
//! pure function of the registry, array id and address budget.

use crate::inventory::registry::{DirectorRecord, DirectorRegistry, PortRecord};
use std::io::{self, Write};

const COLUMN_HEADER: &str = " FA:Port Connected UsedAddr AvailAddr Logins";

/// Separator between active and historical logins
const LOGIN_SEPARATOR: &str = "<>";

/// Format one port line. `remaining` is the director-wide figure.
pub fn format_port_line(director: &DirectorRecord, port: &PortRecord, remaining: i64) -> String {
    let line = format!(
        "{:>3}:{:<5}{:<9} {:>8} {:>9} {} {} {}",
        director.name,
        port.port_number,
        port.connection_status,
        port.used_address_count,
        remaining,
        port.active_logins.join(" "),
        LOGIN_SEPARATOR,
        port.historical_logins.join(" "),
    );
    line.trim_end().to_string()
}

/// Write the full report
pub fn write_report<W: Write>(
    out: &mut W,
    array_id: &str,
    registry: &DirectorRegistry,
    max_addresses: u32,
) -> io::Result<()> {
    writeln!(out, "Array ID: {}", array_id)?;
    writeln!(out)?;
    writeln!(out, "{}", COLUMN_HEADER)?;
    writeln!(out)?;

    for director in registry.sorted_directors() {
        let remaining = director.remaining_addresses(max_addresses);
        for port in director.sorted_ports() {
            writeln!(out, "{}", format_port_line(director, port, remaining))?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Render the full report into a string
pub fn render_report(array_id: &str, registry: &DirectorRegistry, max_addresses: u32) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_report(&mut buffer, array_id, registry, max_addresses);
    String::from_utf8_lossy(&buffer).into_owned()
}
