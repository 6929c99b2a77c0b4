use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use snapweb_shim::snappy::{FindOptions, FindSelect, SnapOptions};
use snapweb_shim::systemd::mode;
use snapweb_shim::{Config, HttpClient, SnapdAdapter, SnapdClient, Systemd};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "snapweb-shim")]
#[command(about = "Query snapd and systemd the way snapweb does", long_about = None)]
struct Cli {
    /// Base URL of the snapd REST API, reached over TCP
    #[arg(long, global = true)]
    snapd_url: Option<String>,

    /// Unix socket snapd listens on
    #[arg(long, global = true)]
    snapd_socket: Option<PathBuf>,

    /// timesyncd configuration file
    #[arg(long, global = true)]
    timesyncd_conf: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the icon of an installed snap
    Icon {
        name: String,
        /// Write the icon here instead of its reported filename
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the latest known details of a snap
    Info { name: String },
    /// List installed snaps, optionally restricted to NAMES
    List { names: Vec<String> },
    /// Search the store
    Find {
        query: Option<String>,
        /// Match snap names starting with QUERY
        #[arg(long)]
        prefix: bool,
        #[arg(long)]
        section: Option<String>,
        #[arg(long, conflicts_with = "refresh")]
        private: bool,
        #[arg(long)]
        refresh: bool,
    },
    /// Start installing a snap and print the change id
    Install {
        name: String,
        #[arg(long)]
        channel: Option<String>,
        #[arg(long)]
        devmode: bool,
        #[arg(long)]
        classic: bool,
    },
    /// Start removing a snap and print the change id
    Remove { name: String },
    /// Show snapd's version information
    Version,
    /// Show date, time, UTC offset and NTP server
    CoreConfig { keys: Vec<String> },
    /// Show the state and description of a systemd unit
    UnitStatus { name: String },
    /// Start a systemd unit
    Start {
        name: String,
        #[arg(long, default_value = mode::REPLACE)]
        mode: String,
    },
    /// Stop a systemd unit
    Stop {
        name: String,
        #[arg(long, default_value = mode::REPLACE)]
        mode: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(url) = cli.snapd_url {
        config.snapd_url = url;
        config.snapd_socket = None;
    }
    if let Some(socket) = cli.snapd_socket {
        config.snapd_socket = Some(socket);
    }
    if let Some(path) = cli.timesyncd_conf {
        config.timesyncd_path = path;
    }

    match cli.command {
        Commands::Icon { name, output } => {
            let icon = snapd(&config)?
                .icon(&name)
                .with_context(|| format!("Failed to fetch icon for {name}"))?;
            let path = output.unwrap_or_else(|| PathBuf::from(&icon.filename));
            fs::write(&path, &icon.content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_json(&json!({
                "filename": icon.filename,
                "path": path,
                "bytes": icon.content.len()
            }))
        }
        Commands::Info { name } => {
            let (snap, info) = snapd(&config)?.snap(&name)?;
            print_json(&json!({ "snap": snap, "info": info }))
        }
        Commands::List { names } => print_json(&snapd(&config)?.list(&names)?),
        Commands::Find {
            query,
            prefix,
            section,
            private,
            refresh,
        } => {
            let select = if private {
                Some(FindSelect::Private)
            } else if refresh {
                Some(FindSelect::Refresh)
            } else {
                None
            };
            let options = FindOptions {
                query: query.unwrap_or_default(),
                prefix,
                select,
                section,
                scope: None,
            };
            let (snaps, info) = snapd(&config)?.find(&options)?;
            print_json(&json!({ "snaps": snaps, "info": info }))
        }
        Commands::Install {
            name,
            channel,
            devmode,
            classic,
        } => {
            let options = SnapOptions {
                channel,
                devmode,
                classic,
                ..SnapOptions::default()
            };
            let change = snapd(&config)?.install(&name, &options)?;
            print_json(&json!({ "change": change }))
        }
        Commands::Remove { name } => {
            let change = snapd(&config)?.remove(&name, &SnapOptions::default())?;
            print_json(&json!({ "change": change }))
        }
        Commands::Version => print_json(&snapd(&config)?.server_version()?),
        Commands::CoreConfig { keys } => print_json(&snapd(&config)?.core_config(&keys)),
        Commands::UnitStatus { name } => cmd_unit_status(&name),
        Commands::Start { name, mode } => {
            systemd()?.start(&name, &mode)?;
            print_json(&json!({ "unit": name, "started": true }))
        }
        Commands::Stop { name, mode } => {
            systemd()?.stop(&name, &mode)?;
            print_json(&json!({ "unit": name, "stopped": true }))
        }
    }
}

fn snapd(config: &Config) -> Result<SnapdAdapter<HttpClient>> {
    SnapdAdapter::from_config(config).context("Failed to set up snapd client")
}

fn systemd() -> Result<Systemd<zbus::blocking::Connection>> {
    let connection =
        zbus::blocking::Connection::system().context("Failed to connect to system D-Bus")?;
    Ok(Systemd::new(connection))
}

fn cmd_unit_status(name: &str) -> Result<()> {
    let systemd = systemd()?;
    let unit = systemd.unit(name)?;
    print_json(&json!({
        "unit": unit.name(),
        "path": unit.object_path().as_str(),
        "status": unit.status()?,
        "description": unit.description()?
    }))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
