use thiserror::Error;

/// Failure talking to snapd.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("snapd transport error: {0}")]
    Transport(String),
    #[error("snapd error ({status}): {message}")]
    Daemon {
        status: u16,
        kind: Option<String>,
        message: String,
    },
    #[error("cannot decode snapd response: {0}")]
    Decode(String),
}

/// Failure of a single D-Bus call.
///
/// The two variants are the two channels a bus call can fail on: the
/// connection itself, or an error reply sent back by the remote service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BusError {
    #[error("bus transport error: {0}")]
    Transport(String),
    #[error("{name}: {}", detail.as_deref().unwrap_or("no detail"))]
    Reply {
        name: String,
        detail: Option<String>,
    },
}

impl From<zbus::Error> for BusError {
    fn from(err: zbus::Error) -> Self {
        match err {
            zbus::Error::MethodError(name, detail, _) => BusError::Reply {
                name: name.to_string(),
                detail,
            },
            other => BusError::Transport(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum UnitError {
    #[error("cannot resolve unit {unit}: {source}")]
    Resolution {
        unit: String,
        #[source]
        source: BusError,
    },
    #[error("property {property} has type '{signature}', expected 's'")]
    PropertyType { property: String, signature: String },
    #[error("cannot read property {property}: {source}")]
    Property {
        property: String,
        #[source]
        source: BusError,
    },
    #[error("cannot {action} unit {unit}: {source}")]
    Control {
        action: &'static str,
        unit: String,
        #[source]
        source: BusError,
    },
}

impl UnitError {
    /// The underlying bus failure, if this error came from one.
    pub fn bus_error(&self) -> Option<&BusError> {
        match self {
            UnitError::Resolution { source, .. }
            | UnitError::Property { source, .. }
            | UnitError::Control { source, .. } => Some(source),
            UnitError::PropertyType { .. } => None,
        }
    }
}

/// Why the NTP server could not be read. Never surfaced past the reader.
#[derive(Debug, Error)]
pub(crate) enum ConfigReadError {
    #[error("unable to read: {0}")]
    Io(#[from] std::io::Error),
    #[error("no NTP servers are set")]
    MissingKey,
}
