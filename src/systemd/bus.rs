//! The D-Bus calls the unit facade needs, and their zbus implementation.
//!
//! ## D-Bus Interface
//!
//! - **Bus**: System bus (`org.freedesktop.systemd1`)
//! - **Path**: `/org/freedesktop/systemd1`
//! - **Interfaces**: `org.freedesktop.systemd1.Manager`,
//!   `org.freedesktop.DBus.Properties`

use crate::error::BusError;
use zbus::blocking::Connection;
use zbus::zvariant::{ObjectPath, OwnedObjectPath, OwnedValue};

/// Interface holding the unit properties read by [`super::Unit`].
pub const UNIT_INTERFACE: &str = "org.freedesktop.systemd1.Unit";

/// Proxy for the systemd Manager interface.
#[zbus::proxy(
    interface = "org.freedesktop.systemd1.Manager",
    default_service = "org.freedesktop.systemd1",
    default_path = "/org/freedesktop/systemd1"
)]
trait Systemd1Manager {
    /// Load a unit (creates it if not loaded).
    fn load_unit(&self, name: &str) -> zbus::Result<OwnedObjectPath>;

    /// Start a unit. Returns the job path.
    fn start_unit(&self, name: &str, mode: &str) -> zbus::Result<OwnedObjectPath>;

    /// Stop a unit. Returns the job path.
    fn stop_unit(&self, name: &str, mode: &str) -> zbus::Result<OwnedObjectPath>;
}

/// Untyped property access on a systemd object.
#[zbus::proxy(
    interface = "org.freedesktop.DBus.Properties",
    default_service = "org.freedesktop.systemd1"
)]
trait Systemd1Properties {
    fn get(&self, interface_name: &str, property_name: &str) -> zbus::Result<OwnedValue>;
}

/// Calls into systemd over a message bus.
pub trait UnitBus: Send + Sync {
    fn load_unit(&self, name: &str) -> Result<OwnedObjectPath, BusError>;

    fn start_unit(&self, name: &str, mode: &str) -> Result<OwnedObjectPath, BusError>;

    fn stop_unit(&self, name: &str, mode: &str) -> Result<OwnedObjectPath, BusError>;

    /// `org.freedesktop.DBus.Properties.Get` on the object at `path`.
    fn get_property(
        &self,
        path: &ObjectPath<'_>,
        interface: &str,
        property: &str,
    ) -> Result<OwnedValue, BusError>;
}

impl UnitBus for Connection {
    fn load_unit(&self, name: &str) -> Result<OwnedObjectPath, BusError> {
        Ok(Systemd1ManagerProxyBlocking::new(self)?.load_unit(name)?)
    }

    fn start_unit(&self, name: &str, mode: &str) -> Result<OwnedObjectPath, BusError> {
        Ok(Systemd1ManagerProxyBlocking::new(self)?.start_unit(name, mode)?)
    }

    fn stop_unit(&self, name: &str, mode: &str) -> Result<OwnedObjectPath, BusError> {
        Ok(Systemd1ManagerProxyBlocking::new(self)?.stop_unit(name, mode)?)
    }

    fn get_property(
        &self,
        path: &ObjectPath<'_>,
        interface: &str,
        property: &str,
    ) -> Result<OwnedValue, BusError> {
        let proxy = Systemd1PropertiesProxyBlocking::builder(self)
            .path(path.to_owned())?
            .build()?;
        Ok(proxy.get(interface, property)?)
    }
}

impl<B: UnitBus + ?Sized> UnitBus for &B {
    fn load_unit(&self, name: &str) -> Result<OwnedObjectPath, BusError> {
        (**self).load_unit(name)
    }

    fn start_unit(&self, name: &str, mode: &str) -> Result<OwnedObjectPath, BusError> {
        (**self).start_unit(name, mode)
    }

    fn stop_unit(&self, name: &str, mode: &str) -> Result<OwnedObjectPath, BusError> {
        (**self).stop_unit(name, mode)
    }

    fn get_property(
        &self,
        path: &ObjectPath<'_>,
        interface: &str,
        property: &str,
    ) -> Result<OwnedValue, BusError> {
        (**self).get_property(path, interface, property)
    }
}
