//! Kernel tty class (sysfs) strategy.
//!
//! Every tty the kernel knows about appears as a symlink under
//! `/sys/class/tty` pointing into the device tree. The link target tells us
//! which bus the port hangs off, and for USB and PCI devices the metadata can
//! be read from small text files further up the tree.
//!
//! ```text
//! /sys/class/tty/ttyUSB0 -> ../../devices/pci0000:00/0000:00:14.0/usb1/1-1/1-1:1.0/ttyUSB0/tty/ttyUSB0
//!                                                                    ^^^
//!                                  uevent: DEVTYPE=usb_device, DRIVER=usb
//!                                  idVendor, idProduct, manufacturer, product, serial
//! ```

use {
    crate::{
        platform::Platform,
        port::{PortInfo, parse_hex_u16, port_name_to_system_location, simplified},
    },
    log::{debug, trace},
    std::{
        fs,
        path::{Component, Path, PathBuf},
    },
};

/// Default location of the tty class directory.
pub const SYSFS_TTY_CLASS: &str = "/sys/class/tty";

/// Path fragment of on-board UARTs on embedded SoCs (e.g. `.../fe215040.serial/tty/ttyS1`).
const ONBOARD_SERIAL_MARKER: &str = ".serial/tty/tty";

/// How a link target is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bus {
    /// Accept without extra metadata.
    Plain,
    /// Accept and look for USB device attributes up the tree.
    Usb,
    /// Accept and read PCI vendor/device IDs.
    Pci,
    /// Not a usable serial port.
    Skip,
}

fn classify(target: &str, platform: Platform) -> Bus {
    if target.contains("pnp") {
        return Bus::Plain;
    }
    // Android keeps platform-bus ttyUSB nodes; they are then classified by
    // the rules below like any other target.
    let android_usb = platform == Platform::Android && target.contains("ttyUSB");
    if target.contains("platform") && !android_usb {
        return Bus::Skip;
    }
    if target.contains("usb") {
        Bus::Usb
    } else if target.contains("pci") {
        Bus::Pci
    } else if target.contains(ONBOARD_SERIAL_MARKER) {
        Bus::Plain
    } else {
        Bus::Skip
    }
}

/// Walks the sysfs tty class directory.
#[derive(Debug, Clone)]
pub struct SysfsScanner {
    root: PathBuf,
    platform: Platform,
}

impl SysfsScanner {
    /// Create a scanner over `root` (normally [`SYSFS_TTY_CLASS`]).
    pub fn new(root: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            root: root.into(),
            platform,
        }
    }

    /// The tty class directory being scanned.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List serial ports found under the tty class directory.
    ///
    /// A missing or unreadable directory yields an empty list.
    pub fn scan(&self) -> Vec<PortInfo> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cannot read {}: {e}", self.root.display());
                return Vec::new();
            },
        };

        let mut links: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_type()
                    .is_ok_and(|t| t.is_symlink())
            })
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        links.sort();

        links
            .iter()
            .filter_map(|link| self.port_from_link(link))
            .collect()
    }

    fn port_from_link(&self, link: &Path) -> Option<PortInfo> {
        let target = resolve_link(link)?;
        let target_str = target.to_string_lossy();
        let port_name = target_str
            .rsplit_once('/')
            .map(|(_, name)| name)
            .filter(|name| !name.is_empty())?
            .to_string();

        let bus = classify(&target_str, self.platform);
        trace!("{} -> {target_str} ({bus:?})", link.display());

        let mut info = PortInfo::new(port_name_to_system_location(&port_name), port_name);
        match bus {
            Bus::Skip => return None,
            Bus::Plain => {},
            Bus::Usb => read_usb_attributes(&target, &mut info),
            Bus::Pci => read_pci_attributes(&target, &mut info),
        }
        Some(info)
    }
}

/// Resolve a symlink to an absolute, lexically normalized target path.
fn resolve_link(link: &Path) -> Option<PathBuf> {
    let target = fs::read_link(link).ok()?;
    let absolute = if target.is_absolute() {
        target
    } else {
        link.parent()?
            .join(target)
    };
    Some(normalize(&absolute))
}

/// Remove `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                out.pop();
            },
            other => out.push(other),
        }
    }
    out
}

/// Walk upward from `start` to the USB device node and copy its attributes.
///
/// Directories whose `uevent` is missing or does not describe a USB device
/// bound to the generic `usb` driver are passed over.
fn read_usb_attributes(start: &Path, info: &mut PortInfo) {
    let mut dir = Some(start);
    while let Some(current) = dir {
        if let Some(uevent) = read_text(&current.join("uevent")) {
            if uevent.contains("DEVTYPE=usb_device") && uevent.contains("DRIVER=usb") {
                trace!("USB device node for {}: {}", info.port_name, current.display());
                info.description = read_simplified(&current.join("product"));
                info.manufacturer = read_simplified(&current.join("manufacturer"));
                info.serial_number = read_simplified(&current.join("serial"));
                info.vendor_id = read_hex(&current.join("idVendor"));
                info.product_id = read_hex(&current.join("idProduct"));
                return;
            }
        }
        dir = current.parent();
    }
}

/// Read the PCI vendor and device IDs from `<target>/device`.
fn read_pci_attributes(target: &Path, info: &mut PortInfo) {
    let device_dir = target.join("device");
    info.vendor_id = read_hex(&device_dir.join("vendor"));
    info.product_id = read_hex(&device_dir.join("device"));
}

fn read_text(path: &Path) -> Option<String> {
    fs::read(path)
        .ok()
        .map(|bytes| {
            String::from_utf8_lossy(&bytes).into_owned()
        })
}

fn read_simplified(path: &Path) -> String {
    read_text(path)
        .map(|text| simplified(&text))
        .unwrap_or_default()
}

fn read_hex(path: &Path) -> Option<u16> {
    read_text(path).and_then(|text| parse_hex_u16(&text))
}
