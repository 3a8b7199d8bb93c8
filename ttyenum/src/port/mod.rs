//! Serial port records and port-name helpers.
//!
//! A [`PortInfo`] is a plain value describing one discovered TTY device.
//! Every discovery strategy builds fresh records; nothing is cached or shared
//! between enumeration calls.
//!
//! ## Example
//!
//! ```rust
//! use ttyenum::port::{port_name_from_system_location, port_name_to_system_location};
//!
//! assert_eq!(port_name_to_system_location("ttyUSB0"), "/dev/ttyUSB0");
//! assert_eq!(port_name_from_system_location("/dev/ttyUSB0"), "ttyUSB0");
//! ```

pub mod location;

use std::path::Path;

pub use location::{port_name_from_system_location, port_name_to_system_location};

/// Serial port information.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortInfo {
    /// Absolute path to the device node (e.g., "/dev/ttyUSB0").
    pub device: String,
    /// Short name the OS uses for the port (e.g., "ttyUSB0").
    pub port_name: String,
    /// Product/model description, empty when unknown.
    pub description: String,
    /// Manufacturer string, empty when unknown.
    pub manufacturer: String,
    /// Serial number, empty when unknown.
    pub serial_number: String,
    /// USB or PCI vendor ID (if available).
    pub vendor_id: Option<u16>,
    /// USB product or PCI device ID (if available).
    pub product_id: Option<u16>,
}

impl PortInfo {
    /// Create a record with only the device path and port name populated.
    pub fn new(device: impl Into<String>, port_name: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            port_name: port_name.into(),
            ..Default::default()
        }
    }

    /// Create a record from a short port name, deriving the device path.
    pub fn from_port_name(port_name: &str) -> Self {
        Self::new(port_name_to_system_location(port_name), port_name)
    }

    /// Path of the device node on this system.
    pub fn system_location(&self) -> String {
        if self
            .device
            .is_empty()
        {
            port_name_to_system_location(&self.port_name)
        } else {
            self.device
                .clone()
        }
    }

    /// Whether a vendor identifier was found.
    pub fn has_vendor_identifier(&self) -> bool {
        self.vendor_id
            .is_some()
    }

    /// Whether a product identifier was found.
    pub fn has_product_identifier(&self) -> bool {
        self.product_id
            .is_some()
    }

    /// Whether this is an empty record that names no port.
    pub fn is_null(&self) -> bool {
        self.port_name
            .is_empty()
    }

    /// Whether a filesystem entry exists at the port's system location.
    pub fn is_valid(&self) -> bool {
        !self.is_null() && Path::new(&self.system_location()).exists()
    }

    /// Whether another process holds the port's advisory lock file.
    ///
    /// Uses the default lock directories; see [`crate::lock::LockChecker`]
    /// for a configurable check.
    pub fn is_busy(&self) -> bool {
        crate::lock::is_port_busy(&self.port_name)
    }
}

/// Parse a hexadecimal identifier such as `"0403"`, `"0x8086\n"` or `" 1a86 "`.
pub(crate) fn parse_hex_u16(s: &str) -> Option<u16> {
    let s = s.trim();
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if s.is_empty() {
        return None;
    }
    u16::from_str_radix(s, 16).ok()
}

/// Trim the string and collapse internal whitespace runs to one space.
pub(crate) fn simplified(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
