//! Host-level shortcuts using the default enumerator and lock directories.

use crate::{
    discovery::{Discovery, PortEnumerator},
    platform::Platform,
    port::PortInfo,
};

/// List the serial ports currently present on this host.
#[must_use]
pub fn available_ports() -> Vec<PortInfo> {
    PortEnumerator::new().list_available_ports()
}

/// Discover ports and report which strategy found them.
#[must_use]
pub fn discover_ports() -> Discovery {
    PortEnumerator::new().discover()
}

/// Look up a present port by short name (`ttyUSB0`) or path (`/dev/ttyUSB0`).
#[must_use]
pub fn find_port(name: &str) -> Option<PortInfo> {
    PortEnumerator::new().find_by_name(name)
}

/// Standard baud rates for the platform this crate was built for.
#[must_use]
pub fn standard_baud_rates() -> &'static [u32] {
    Platform::current().standard_baud_rates()
}

pub use crate::lock::is_port_busy;
