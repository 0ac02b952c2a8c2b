//! FA Port Inventory
//!
//! Prints the front-end port inventory of one Symmetrix/VMAX array: per FA
//! port, its connectivity, mapped address usage, remaining director address
//! budget, and the initiators logged in now or seen before.

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fa_port_inventory::{
    write_report, FabricSource, InventoryCollector, InventoryConfig, ReplaySource, Result,
    SymcliRunner, SymcliSource, UnknownPortPolicy, DEFAULT_MAX_ADDRESSES_PER_DIRECTOR,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// FA port inventory - connectivity, address usage and logins per FA port
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Symmetrix ID of the array
    #[arg(long = "sid", value_name = "ARRAY_ID")]
    sid: String,

    /// Directory holding the SYMCLI binaries (default: search PATH)
    #[arg(long, env = "SYMCLI_PATH", value_name = "DIR")]
    symcli_path: Option<PathBuf>,

    /// Read captured SYMCLI XML from this directory instead of running SYMCLI
    #[arg(long, value_name = "DIR")]
    replay_dir: Option<PathBuf>,

    /// Handling of address usage or logins for ports not enumerated as enabled
    #[arg(long, value_enum, default_value_t = UnknownPortPolicy::Warn)]
    on_unknown_port: UnknownPortPolicy,

    /// Address budget per FA director
    #[arg(long, default_value_t = DEFAULT_MAX_ADDRESSES_PER_DIRECTOR)]
    max_addresses: u32,

    /// Log level (off, trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

impl Args {
    fn to_config(&self) -> InventoryConfig {
        InventoryConfig {
            array_id: self.sid.clone(),
            symcli_path: self.symcli_path.clone(),
            replay_dir: self.replay_dir.clone(),
            max_addresses_per_director: self.max_addresses,
            unknown_port_policy: self.on_unknown_port,
        }
    }
}

/// Accept the single-dash spellings `-sid` and `-symcli_path`
fn normalize_legacy_args<I: IntoIterator<Item = String>>(args: I) -> Vec<String> {
    args.into_iter()
        .map(|arg| match arg.as_str() {
            "-sid" => "--sid".to_string(),
            "-symcli_path" => "--symcli-path".to_string(),
            _ => arg,
        })
        .collect()
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match Args::try_parse_from(normalize_legacy_args(std::env::args())) {
        Ok(args) => args,
        Err(e) => {
            // --help and --version print to stdout and succeed
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(&args);

    match run(args.to_config()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(category = ?e.category(), "Inventory failed");
            eprintln!("{}: {}", fa_port_inventory::NAME, e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(config: InventoryConfig) -> Result<()> {
    config.validate()?;

    let source: Box<dyn FabricSource> = match &config.replay_dir {
        Some(dir) => Box::new(ReplaySource::new(dir)),
        None => Box::new(SymcliSource::new(SymcliRunner::new(
            config.symcli_path.clone(),
        ))),
    };

    let inventory = InventoryCollector::new(source.as_ref(), &config)
        .collect()
        .await?;

    info!(
        "Collected {} ports on {} directors of {} at {}",
        inventory.registry.port_count(),
        inventory.registry.director_count(),
        inventory.array_id,
        inventory.collected_at.to_rfc3339()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(
        &mut out,
        &inventory.array_id,
        &inventory.registry,
        config.max_addresses_per_director,
    )?;
    out.flush()?;

    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "off" => LevelFilter::OFF,
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::WARN,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // stdout carries only the report
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(io::stderr))
            .init();
    }
}
