use crate::config::Config;
use crate::error::RemoteError;
use crate::snappy::api::{
    ErrorResult, FindOptions, Icon, Response, ResultInfo, ServerVersion, Snap, SnapAction,
    SnapOptions,
};
use crate::snappy::SnapdClient;
use reqwest::blocking::{Client, ClientBuilder, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_DISPOSITION, USER_AGENT};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

/// snapd REST client over HTTP, on TCP or on snapd's unix socket.
pub struct HttpClient {
    client: Client,
    base_url: String,
}

fn builder() -> ClientBuilder {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("snapweb-shim"));
    Client::builder().default_headers(headers)
}

impl HttpClient {
    /// Client for snapd listening on TCP at `base_url`.
    pub fn new(base_url: &str) -> Self {
        let client = builder().build().unwrap_or_else(|_| Client::new());
        Self::with_client(client, base_url)
    }

    /// Client for snapd listening on the unix socket at `socket`.
    ///
    /// Every request goes over the socket; the host in `base_url` only ends
    /// up in the `Host` header.
    pub fn unix(socket: &Path, base_url: &str) -> Result<Self, RemoteError> {
        let client = builder()
            .unix_socket(socket)
            .build()
            .map_err(|err| RemoteError::Transport(err.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn from_config(config: &Config) -> Result<Self, RemoteError> {
        match &config.snapd_socket {
            Some(socket) => Self::unix(socket, &config.snapd_url),
            None => Ok(Self::new(&config.snapd_url)),
        }
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn send(&self, request: RequestBuilder) -> Result<reqwest::blocking::Response, RemoteError> {
        request
            .send()
            .map_err(|err| RemoteError::Transport(err.to_string()))
    }

    /// Send a request and unwrap the snapd envelope, turning error
    /// responses into `RemoteError::Daemon`.
    fn envelope(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = self.send(request)?;
        let http_status = response.status();
        let body = response
            .text()
            .map_err(|err| RemoteError::Transport(err.to_string()))?;

        let envelope: Response = serde_json::from_str(&body).map_err(|err| {
            if http_status.is_success() {
                RemoteError::Decode(err.to_string())
            } else {
                RemoteError::Daemon {
                    status: http_status.as_u16(),
                    kind: None,
                    message: body.trim().to_string(),
                }
            }
        })?;

        if envelope.kind == "error" || !http_status.is_success() {
            let status = if envelope.status_code != 0 {
                envelope.status_code
            } else {
                http_status.as_u16()
            };
            let result: ErrorResult = serde_json::from_value(envelope.result).unwrap_or_default();
            let message = if result.message.is_empty() {
                envelope.status
            } else {
                result.message
            };
            return Err(RemoteError::Daemon {
                status,
                kind: result.kind,
                message,
            });
        }

        Ok(envelope)
    }

    fn sync<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<(T, ResultInfo), RemoteError> {
        let envelope = self.envelope(request)?;
        if envelope.kind != "sync" {
            return Err(RemoteError::Decode(format!(
                "expected sync response, got {}",
                envelope.kind
            )));
        }
        let result = serde_json::from_value(envelope.result)
            .map_err(|err| RemoteError::Decode(err.to_string()))?;
        Ok((result, envelope.info))
    }

    fn change(&self, request: RequestBuilder) -> Result<String, RemoteError> {
        let envelope = self.envelope(request)?;
        if envelope.kind != "async" {
            return Err(RemoteError::Decode(format!(
                "expected async response, got {}",
                envelope.kind
            )));
        }
        envelope
            .change
            .filter(|change| !change.is_empty())
            .ok_or_else(|| RemoteError::Decode("async response without change id".to_string()))
    }

    fn snap_action(
        &self,
        action: &'static str,
        name: &str,
        options: &SnapOptions,
    ) -> Result<String, RemoteError> {
        let path = format!("/v2/snaps/{}", urlencoding::encode(name));
        debug!(action, name, "posting snap action");
        let request = self
            .client
            .post(self.url(&path))
            .json(&SnapAction { action, options });
        self.change(request)
    }
}

impl SnapdClient for HttpClient {
    fn icon(&self, name: &str) -> Result<Icon, RemoteError> {
        let path = format!("/v2/icons/{}/icon", urlencoding::encode(name));
        debug!(name, "fetching icon");
        let response = self.send(self.client.get(self.url(&path)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<Response>(&body)
                .ok()
                .and_then(|envelope| serde_json::from_value::<ErrorResult>(envelope.result).ok())
                .map(|result| result.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| format!("cannot retrieve icon for {name}"));
            return Err(RemoteError::Daemon {
                status: status.as_u16(),
                kind: None,
                message,
            });
        }

        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(disposition_filename)
            .ok_or_else(|| {
                RemoteError::Decode(format!("cannot determine filename of icon for {name}"))
            })?;

        let content = response
            .bytes()
            .map_err(|err| RemoteError::Transport(err.to_string()))?;

        Ok(Icon {
            filename,
            content: content.to_vec(),
        })
    }

    fn snap(&self, name: &str) -> Result<(Snap, ResultInfo), RemoteError> {
        let path = format!("/v2/snaps/{}", urlencoding::encode(name));
        debug!(name, "fetching snap");
        self.sync(self.client.get(self.url(&path)))
    }

    fn list(&self, names: &[String]) -> Result<Vec<Snap>, RemoteError> {
        debug!(?names, "listing snaps");
        let mut request = self.client.get(self.url("/v2/snaps"));
        if !names.is_empty() {
            request = request.query(&[("snaps", names.join(","))]);
        }
        self.sync::<Vec<Snap>>(request).map(|(snaps, _)| snaps)
    }

    fn find(&self, options: &FindOptions) -> Result<(Vec<Snap>, ResultInfo), RemoteError> {
        debug!(query = %options.query, "searching store");
        let request = self
            .client
            .get(self.url("/v2/find"))
            .query(&options.to_query_pairs());
        self.sync(request)
    }

    fn install(&self, name: &str, options: &SnapOptions) -> Result<String, RemoteError> {
        self.snap_action("install", name, options)
    }

    fn remove(&self, name: &str, options: &SnapOptions) -> Result<String, RemoteError> {
        self.snap_action("remove", name, options)
    }

    fn server_version(&self) -> Result<ServerVersion, RemoteError> {
        debug!("fetching system info");
        self.sync::<ServerVersion>(self.client.get(self.url("/v2/system-info")))
            .map(|(version, _)| version)
    }
}

/// Pull the filename out of a `Content-Disposition` header value.
fn disposition_filename(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}
