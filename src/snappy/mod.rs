//! snapd integration.
//!
//! [`SnapdClient`] is the set of snapd calls the web front-end relies on.
//! [`HttpClient`] implements it against the REST API, and [`SnapdAdapter`]
//! forwards to any implementation while adding the core configuration query.

use crate::config::Config;
use crate::error::RemoteError;
use std::path::{Path, PathBuf};

pub mod api;
pub mod http;
pub mod timesyncd;

pub use api::{
    FindOptions, FindSelect, Icon, OsRelease, ResultInfo, ServerVersion, Snap, SnapOptions,
};
pub use http::HttpClient;
pub use timesyncd::CoreConfig;

/// Client of the snapd REST API.
pub trait SnapdClient: Send + Sync {
    /// Icon of an installed snap.
    fn icon(&self, name: &str) -> Result<Icon, RemoteError>;

    /// Most recently published revision of the named snap.
    fn snap(&self, name: &str) -> Result<(Snap, ResultInfo), RemoteError>;

    /// Installed snaps whose names are in `names`; all of them if empty.
    fn list(&self, names: &[String]) -> Result<Vec<Snap>, RemoteError>;

    /// Snaps available from the store matching `options`.
    fn find(&self, options: &FindOptions) -> Result<(Vec<Snap>, ResultInfo), RemoteError>;

    /// Start installing a snap; returns the change id.
    fn install(&self, name: &str, options: &SnapOptions) -> Result<String, RemoteError>;

    /// Start removing a snap; returns the change id.
    fn remove(&self, name: &str, options: &SnapOptions) -> Result<String, RemoteError>;

    fn server_version(&self) -> Result<ServerVersion, RemoteError>;
}

/// Forwards to a [`SnapdClient`] and answers core configuration queries.
pub struct SnapdAdapter<C> {
    client: C,
    timesyncd_path: PathBuf,
}

impl SnapdAdapter<HttpClient> {
    /// Adapter over the REST API at `base_url`, reached over TCP.
    pub fn connect(base_url: &str, timesyncd_path: impl Into<PathBuf>) -> Self {
        Self::new(HttpClient::new(base_url), timesyncd_path)
    }

    /// Adapter over snapd as described by `config`: its unix socket when one
    /// is set, TCP otherwise.
    pub fn from_config(config: &Config) -> Result<Self, RemoteError> {
        Ok(Self::new(
            HttpClient::from_config(config)?,
            config.timesyncd_path.clone(),
        ))
    }
}

impl<C: SnapdClient> SnapdAdapter<C> {
    pub fn new(client: C, timesyncd_path: impl Into<PathBuf>) -> Self {
        Self {
            client,
            timesyncd_path: timesyncd_path.into(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn timesyncd_path(&self) -> &Path {
        &self.timesyncd_path
    }

    /// Current date, time, UTC offset and NTP server.
    ///
    /// `keys` is accepted for API compatibility; the full snapshot is always
    /// returned. A missing or incomplete timesyncd config yields an empty
    /// NTP server rather than an error.
    pub fn core_config(&self, _keys: &[String]) -> CoreConfig {
        CoreConfig::current(&self.timesyncd_path)
    }
}

impl<C: SnapdClient> SnapdClient for SnapdAdapter<C> {
    fn icon(&self, name: &str) -> Result<Icon, RemoteError> {
        self.client.icon(name)
    }

    fn snap(&self, name: &str) -> Result<(Snap, ResultInfo), RemoteError> {
        self.client.snap(name)
    }

    fn list(&self, names: &[String]) -> Result<Vec<Snap>, RemoteError> {
        self.client.list(names)
    }

    fn find(&self, options: &FindOptions) -> Result<(Vec<Snap>, ResultInfo), RemoteError> {
        self.client.find(options)
    }

    fn install(&self, name: &str, options: &SnapOptions) -> Result<String, RemoteError> {
        self.client.install(name, options)
    }

    fn remove(&self, name: &str, options: &SnapOptions) -> Result<String, RemoteError> {
        self.client.remove(name, options)
    }

    fn server_version(&self) -> Result<ServerVersion, RemoteError> {
        self.client.server_version()
    }
}

impl<C: SnapdClient + ?Sized> SnapdClient for Box<C> {
    fn icon(&self, name: &str) -> Result<Icon, RemoteError> {
        (**self).icon(name)
    }

    fn snap(&self, name: &str) -> Result<(Snap, ResultInfo), RemoteError> {
        (**self).snap(name)
    }

    fn list(&self, names: &[String]) -> Result<Vec<Snap>, RemoteError> {
        (**self).list(names)
    }

    fn find(&self, options: &FindOptions) -> Result<(Vec<Snap>, ResultInfo), RemoteError> {
        (**self).find(options)
    }

    fn install(&self, name: &str, options: &SnapOptions) -> Result<String, RemoteError> {
        (**self).install(name, options)
    }

    fn remove(&self, name: &str, options: &SnapOptions) -> Result<String, RemoteError> {
        (**self).remove(name, options)
    }

    fn server_version(&self) -> Result<ServerVersion, RemoteError> {
        (**self).server_version()
    }
}
