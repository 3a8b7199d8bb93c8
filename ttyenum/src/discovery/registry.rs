//! Device-manager registry strategy.
//!
//! The registry (udev on Linux) is the richest source of port metadata. It is
//! reached through the [`DeviceRegistry`] trait so the filtering rules below
//! can run against recorded or synthetic device lists as well as a live
//! udev database.

use {
    crate::{
        error::{Error, Result},
        port::{PortInfo, parse_hex_u16, port_name_to_system_location},
    },
    log::trace,
    std::collections::BTreeMap,
};

/// udev property holding the model name.
pub const PROP_MODEL: &str = "ID_MODEL";
/// udev property holding the vendor name.
pub const PROP_VENDOR: &str = "ID_VENDOR";
/// udev property holding the hexadecimal model (product) ID.
pub const PROP_MODEL_ID: &str = "ID_MODEL_ID";
/// udev property holding the hexadecimal vendor ID.
pub const PROP_VENDOR_ID: &str = "ID_VENDOR_ID";
/// udev property holding the short serial number.
pub const PROP_SERIAL_SHORT: &str = "ID_SERIAL_SHORT";

/// Properties read from each registry entry.
pub const PROPERTIES: &[&str] = &[
    PROP_MODEL,
    PROP_VENDOR,
    PROP_MODEL_ID,
    PROP_VENDOR_ID,
    PROP_SERIAL_SHORT,
];

/// Driver bound to legacy 8250-compatible UARTs. Such entries exist for every
/// possible on-board port whether or not hardware is present.
const SERIAL8250_DRIVER: &str = "serial8250";

/// Bluetooth RFCOMM device name prefix.
const RFCOMM_PREFIX: &str = "rfcomm";

/// Highest RFCOMM channel device index.
const RFCOMM_MAX_INDEX: i64 = 255;

/// Source of tty-subsystem device entries.
pub trait DeviceRegistry: Send + Sync {
    /// List every device in the `tty` subsystem.
    ///
    /// An error means the registry itself could not be opened; the caller
    /// treats it as "no devices".
    fn tty_devices(&self) -> Result<Vec<RegistryDevice>>;
}

/// Parent node of a registry entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentDevice {
    /// Name of the kernel driver bound to the parent, if any.
    pub driver: Option<String>,
}

/// Snapshot of one registry entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryDevice {
    /// Device node path (e.g., "/dev/ttyUSB0").
    pub devnode: Option<String>,
    /// Kernel name of the device (e.g., "ttyUSB0").
    pub sysname: String,
    /// Parent node; `None` for virtual devices.
    pub parent: Option<ParentDevice>,
    /// Registry properties that were present on the entry.
    pub properties: BTreeMap<String, String>,
}

impl RegistryDevice {
    /// Create an entry with the given kernel name and no parent.
    pub fn new(sysname: impl Into<String>) -> Self {
        Self {
            sysname: sysname.into(),
            ..Default::default()
        }
    }

    /// Set the device node path.
    #[must_use]
    pub fn with_devnode(mut self, devnode: impl Into<String>) -> Self {
        self.devnode = Some(devnode.into());
        self
    }

    /// Attach a parent node with the given driver.
    #[must_use]
    pub fn with_parent(mut self, driver: Option<&str>) -> Self {
        self.parent = Some(ParentDevice {
            driver: driver.map(str::to_string),
        });
        self
    }

    /// Add a registry property.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: impl Into<String>) -> Self {
        self.properties
            .insert(key.to_string(), value.into());
        self
    }

    /// Look up a registry property.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .map(String::as_str)
    }
}

/// Registry that is never available.
///
/// Used on platforms without udev or when the `udev` feature is disabled;
/// discovery then falls through to the sysfs and `/dev` strategies.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRegistry;

impl DeviceRegistry for NullRegistry {
    fn tty_devices(&self) -> Result<Vec<RegistryDevice>> {
        Err(Error::Registry(
            "no device registry available on this platform".to_string(),
        ))
    }
}

/// Turn registry entries into port records, dropping the ones that do not
/// correspond to usable serial ports.
pub fn ports_from_registry(devices: Vec<RegistryDevice>) -> Vec<PortInfo> {
    devices
        .into_iter()
        .filter_map(port_from_entry)
        .collect()
}

fn port_from_entry(entry: RegistryDevice) -> Option<PortInfo> {
    if entry
        .sysname
        .is_empty()
    {
        return None;
    }

    let device = entry
        .devnode
        .clone()
        .filter(|node| !node.is_empty())
        .unwrap_or_else(|| port_name_to_system_location(&entry.sysname));
    let mut info = PortInfo::new(device, entry.sysname.clone());

    match &entry.parent {
        Some(parent) => {
            if parent
                .driver
                .as_deref()
                == Some(SERIAL8250_DRIVER)
            {
                trace!("Skipping {}: bound to {SERIAL8250_DRIVER}", entry.sysname);
                return None;
            }
            info.description = spaced(entry.property(PROP_MODEL));
            info.manufacturer = spaced(entry.property(PROP_VENDOR));
            info.serial_number = entry
                .property(PROP_SERIAL_SHORT)
                .unwrap_or_default()
                .to_string();
            info.vendor_id = entry
                .property(PROP_VENDOR_ID)
                .and_then(parse_hex_u16);
            info.product_id = entry
                .property(PROP_MODEL_ID)
                .and_then(parse_hex_u16);
        },
        None => {
            if !is_rfcomm_name(&entry.sysname) {
                trace!("Skipping virtual tty {}", entry.sysname);
                return None;
            }
        },
    }

    Some(info)
}

/// Registry names encode spaces as underscores ("FT232R_USB_UART").
fn spaced(value: Option<&str>) -> String {
    value
        .unwrap_or_default()
        .replace('_', " ")
}

/// Whether `name` is `rfcomm<N>` with `N` in `0..=255`.
fn is_rfcomm_name(name: &str) -> bool {
    name.strip_prefix(RFCOMM_PREFIX)
        .and_then(|suffix| {
            suffix
                .parse::<i64>()
                .ok()
        })
        .is_some_and(|index| (0..=RFCOMM_MAX_INDEX).contains(&index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ftdi_entry() -> RegistryDevice {
        RegistryDevice::new("ttyUSB0")
            .with_devnode("/dev/ttyUSB0")
            .with_parent(Some("ftdi_sio"))
            .with_property(PROP_MODEL, "FT232R_USB_UART")
            .with_property(PROP_VENDOR, "FTDI")
            .with_property(PROP_SERIAL_SHORT, "A50285BI")
            .with_property(PROP_VENDOR_ID, "0403")
            .with_property(PROP_MODEL_ID, "6001")
    }

    #[test]
    fn test_usb_entry_metadata() {
        let ports = ports_from_registry(vec![ftdi_entry()]);
        assert_eq!(ports.len(), 1);
        let port = &ports[0];
        assert_eq!(port.device, "/dev/ttyUSB0");
        assert_eq!(port.port_name, "ttyUSB0");
        assert_eq!(port.description, "FT232R USB UART");
        assert_eq!(port.manufacturer, "FTDI");
        assert_eq!(port.serial_number, "A50285BI");
        assert_eq!(port.vendor_id, Some(0x0403));
        assert_eq!(port.product_id, Some(0x6001));
    }

    #[test]
    fn test_serial8250_parent_is_excluded() {
        let entry = RegistryDevice::new("ttyS3")
            .with_devnode("/dev/ttyS3")
            .with_parent(Some("serial8250"));
        assert!(ports_from_registry(vec![entry, ftdi_entry()])
            .iter()
            .all(|p| p.port_name != "ttyS3"));
    }

    #[test]
    fn test_parent_without_driver_is_kept() {
        let entry = RegistryDevice::new("ttyS0")
            .with_devnode("/dev/ttyS0")
            .with_parent(None);
        let ports = ports_from_registry(vec![entry]);
        assert_eq!(ports.len(), 1);
        assert!(ports[0].description.is_empty());
        assert_eq!(ports[0].vendor_id, None);
    }

    #[test]
    fn test_rfcomm_index_range() {
        let entries = [
            "rfcomm7",
            "rfcomm0",
            "rfcomm255",
            "rfcomm256",
            "rfcommX",
            "rfcomm",
            "rfcomm-1",
            "tty1",
            "ptmx",
        ]
        .into_iter()
            .map(|name| RegistryDevice::new(name).with_devnode(format!("/dev/{name}")))
            .collect();

        let names: Vec<String> = ports_from_registry(entries)
            .into_iter()
            .map(|p| p.port_name)
            .collect();
        assert_eq!(names, ["rfcomm7", "rfcomm0", "rfcomm255"]);
    }

    #[test]
    fn test_bad_identifiers_only_clear_that_field() {
        let entry = ftdi_entry()
            .with_property(PROP_VENDOR_ID, "not-hex")
            .with_property(PROP_MODEL_ID, "6015");
        let ports = ports_from_registry(vec![entry]);
        assert_eq!(ports[0].vendor_id, None);
        assert_eq!(ports[0].product_id, Some(0x6015));
        assert_eq!(ports[0].manufacturer, "FTDI");
    }

    #[test]
    fn test_missing_properties_are_empty() {
        let entry = RegistryDevice::new("ttyACM0")
            .with_devnode("/dev/ttyACM0")
            .with_parent(Some("cdc_acm"));
        let port = &ports_from_registry(vec![entry])[0];
        assert!(port.description.is_empty());
        assert!(port.manufacturer.is_empty());
        assert!(port.serial_number.is_empty());
        assert!(!port.has_vendor_identifier());
        assert!(!port.has_product_identifier());
    }

    #[test]
    fn test_missing_devnode_is_derived() {
        let entry = RegistryDevice::new("rfcomm1");
        let ports = ports_from_registry(vec![entry]);
        assert_eq!(ports[0].device, "/dev/rfcomm1");
    }

    #[test]
    fn test_empty_sysname_is_skipped() {
        let entry = RegistryDevice::new("").with_parent(Some("ftdi_sio"));
        assert!(ports_from_registry(vec![entry]).is_empty());
    }

    #[test]
    fn test_null_registry_errors() {
        assert!(matches!(
            NullRegistry.tty_devices(),
            Err(Error::Registry(_))
        ));
    }
}
