//! Runtime settings for the adapters.
//!
//! Defaults point at the stock locations on an Ubuntu Core system and can be
//! overridden from the environment.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_SNAPD_URL: &str = "http://localhost";
pub const DEFAULT_SNAPD_SOCKET: &str = "/run/snapd.socket";
pub const DEFAULT_TIMESYNCD_CONF: &str = "/etc/systemd/timesyncd.conf";

pub const SNAPD_URL_ENV: &str = "SNAPWEB_SNAPD_URL";
pub const SNAPD_SOCKET_ENV: &str = "SNAPWEB_SNAPD_SOCKET";
pub const TIMESYNCD_CONF_ENV: &str = "SNAPWEB_TIMESYNCD_CONF";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the snapd REST API. Only the path is significant when
    /// `snapd_socket` is set.
    pub snapd_url: String,
    /// Unix socket snapd listens on. `None` means plain TCP to `snapd_url`.
    pub snapd_socket: Option<PathBuf>,
    /// timesyncd configuration file consulted for the NTP server.
    pub timesyncd_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapd_url: DEFAULT_SNAPD_URL.to_string(),
            snapd_socket: Some(PathBuf::from(DEFAULT_SNAPD_SOCKET)),
            timesyncd_path: PathBuf::from(DEFAULT_TIMESYNCD_CONF),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        // An explicit URL means TCP unless a socket is named as well.
        if let Some(url) = lookup(SNAPD_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.snapd_url = url.trim().to_string();
            config.snapd_socket = None;
        }
        if let Some(socket) = lookup(SNAPD_SOCKET_ENV).filter(|v| !v.trim().is_empty()) {
            config.snapd_socket = Some(PathBuf::from(socket.trim()));
        }
        if let Some(path) = lookup(TIMESYNCD_CONF_ENV).filter(|v| !v.trim().is_empty()) {
            config.timesyncd_path = PathBuf::from(path.trim());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_environment() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.snapd_url, "http://localhost");
        assert_eq!(
            config.snapd_socket,
            Some(PathBuf::from("/run/snapd.socket"))
        );
    }

    #[test]
    fn environment_overrides() {
        let config = Config::from_lookup(|key| match key {
            SNAPD_URL_ENV => Some("http://127.0.0.1:4200".to_string()),
            TIMESYNCD_CONF_ENV => Some("/tmp/timesyncd.conf".to_string()),
            _ => None,
        });
        assert_eq!(config.snapd_url, "http://127.0.0.1:4200");
        assert_eq!(config.snapd_socket, None);
        assert_eq!(config.timesyncd_path, PathBuf::from("/tmp/timesyncd.conf"));
    }

    #[test]
    fn socket_override_wins_over_url() {
        let config = Config::from_lookup(|key| match key {
            SNAPD_URL_ENV => Some("http://snapd".to_string()),
            SNAPD_SOCKET_ENV => Some("/tmp/snapd.socket".to_string()),
            _ => None,
        });
        assert_eq!(config.snapd_url, "http://snapd");
        assert_eq!(config.snapd_socket, Some(PathBuf::from("/tmp/snapd.socket")));
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = Config::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config, Config::default());
    }
}
