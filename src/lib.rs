//! snapweb-shim: thin adapters between a web front-end and the system daemons
//! it drives.
//!
//! - [`snappy`]: snapd's REST API, plus the host time configuration
//!   (clock, UTC offset and the timesyncd NTP server)
//! - [`systemd`]: unit lookup, start/stop and state queries over D-Bus
//!
//! Every operation is a single call into the daemon. Nothing is cached or
//! retried, and errors are returned as the daemon reported them.

pub mod config;
pub mod error;
pub mod snappy;
pub mod systemd;

pub use config::Config;
pub use error::{BusError, RemoteError, UnitError};
pub use snappy::{CoreConfig, HttpClient, SnapdAdapter, SnapdClient};
pub use systemd::{Systemd, Unit, UnitBus};
