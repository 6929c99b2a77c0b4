//! Core configuration: host clock plus the NTP server from timesyncd.
//!
//! `timesyncd.conf` uses the systemd INI format: `[Section]` headers,
//! `Key=Value` lines, and `#` or `;` comments.

use crate::error::ConfigReadError;
use chrono::{DateTime, Local, Offset, TimeZone};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Snapshot of the host's time settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoreConfig {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Time")]
    pub time: String,
    /// UTC offset in hours.
    #[serde(rename = "Timezone")]
    pub timezone: f64,
    #[serde(rename = "NTPServer")]
    pub ntp_server: String,
}

impl CoreConfig {
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>, ntp_server: String) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        let offset_secs = now.offset().fix().local_minus_utc();
        Self {
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M").to_string(),
            timezone: f64::from(offset_secs) / 3600.0,
            ntp_server,
        }
    }

    /// Take a snapshot of the local clock and the configured NTP server.
    pub fn current(timesyncd_path: &Path) -> Self {
        Self::at(&Local::now(), read_ntp_server(timesyncd_path))
    }
}

/// Sections of an INI file, each a map of key to value.
pub(crate) type Sections = BTreeMap<String, BTreeMap<String, String>>;

/// Parse systemd INI content into sections.
///
/// A key assigned twice in one section keeps its last value. Keys that
/// appear before any `[Section]` header are dropped.
pub(crate) fn parse(content: &str) -> Sections {
    let mut sections = Sections::new();
    let mut current_section = String::new();

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            current_section = line[1..line.len() - 1].trim().to_string();
            sections.entry(current_section.clone()).or_default();
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            if !current_section.is_empty() {
                sections
                    .entry(current_section.clone())
                    .or_default()
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
        }
    }

    sections
}

fn first_ntp_server(path: &Path) -> Result<String, ConfigReadError> {
    let content = fs::read_to_string(path)?;
    parse(&content)
        .get("Time")
        .and_then(|time| time.get("NTP"))
        .and_then(|servers| servers.split_whitespace().next())
        .map(str::to_string)
        .ok_or(ConfigReadError::MissingKey)
}

/// First server listed in `NTP=` under `[Time]`, or an empty string.
pub fn read_ntp_server(path: &Path) -> String {
    match first_ntp_server(path) {
        Ok(server) => server,
        Err(err) => {
            warn!(path = %path.display(), "read_ntp_server: {err}");
            String::new()
        }
    }
}
