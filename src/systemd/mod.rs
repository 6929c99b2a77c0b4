//! systemd unit control over D-Bus.
//!
//! [`Systemd`] resolves unit names to [`Unit`] handles and starts or stops
//! units through the Manager interface. Unit properties are read live on
//! every call.

use crate::error::{BusError, UnitError};
use tracing::debug;
use zbus::zvariant::{OwnedObjectPath, Value};

pub mod bus;

pub use bus::UnitBus;

/// Job modes understood by systemd's `StartUnit`/`StopUnit`.
///
/// These are passed through unchecked; any string is accepted.
pub mod mode {
    pub const REPLACE: &str = "replace";
    pub const FAIL: &str = "fail";
    pub const ISOLATE: &str = "isolate";
    pub const IGNORE_DEPENDENCIES: &str = "ignore-dependencies";
    pub const IGNORE_REQUIREMENTS: &str = "ignore-requirements";
}

/// Client for the systemd manager.
pub struct Systemd<B> {
    bus: B,
}

/// A unit resolved through [`Systemd::unit`].
pub struct Unit<'a, B> {
    bus: &'a B,
    name: String,
    object_path: OwnedObjectPath,
}

impl<B: UnitBus> Systemd<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Load `service` and return a handle to it.
    pub fn unit(&self, service: &str) -> Result<Unit<'_, B>, UnitError> {
        debug!(unit = service, "loading unit");
        let object_path = self
            .bus
            .load_unit(service)
            .map_err(|source| UnitError::Resolution {
                unit: service.to_string(),
                source,
            })?;

        Ok(Unit {
            bus: &self.bus,
            name: service.to_string(),
            object_path,
        })
    }

    pub fn start(&self, service: &str, mode: &str) -> Result<(), UnitError> {
        debug!(unit = service, mode, "starting unit");
        self.bus
            .start_unit(service, mode)
            .map(drop)
            .map_err(|source| control_error("start", service, source))
    }

    pub fn stop(&self, service: &str, mode: &str) -> Result<(), UnitError> {
        debug!(unit = service, mode, "stopping unit");
        self.bus
            .stop_unit(service, mode)
            .map(drop)
            .map_err(|source| control_error("stop", service, source))
    }
}

fn control_error(action: &'static str, unit: &str, source: BusError) -> UnitError {
    UnitError::Control {
        action,
        unit: unit.to_string(),
        source,
    }
}

impl<B: UnitBus> Unit<'_, B> {
    /// Name the unit was resolved from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn object_path(&self) -> &OwnedObjectPath {
        &self.object_path
    }

    /// Active state (active, inactive, activating, deactivating, failed).
    pub fn status(&self) -> Result<String, UnitError> {
        self.string_property("ActiveState")
    }

    pub fn description(&self) -> Result<String, UnitError> {
        self.string_property("Description")
    }

    /// Load state (loaded, not-found, error, masked).
    pub fn load_state(&self) -> Result<String, UnitError> {
        self.string_property("LoadState")
    }

    /// Sub-state (running, exited, dead, ...).
    pub fn sub_state(&self) -> Result<String, UnitError> {
        self.string_property("SubState")
    }

    /// Read a string-typed property of the `org.freedesktop.systemd1.Unit`
    /// interface.
    pub fn string_property(&self, property: &str) -> Result<String, UnitError> {
        let value = self
            .bus
            .get_property(&self.object_path, bus::UNIT_INTERFACE, property)
            .map_err(|source| UnitError::Property {
                property: property.to_string(),
                source,
            })?;

        match &*value {
            Value::Str(s) => Ok(s.as_str().to_string()),
            other => Err(UnitError::PropertyType {
                property: property.to_string(),
                signature: other.value_signature().to_string(),
            }),
        }
    }
}
