//! # ttyenum
//!
//! A library for discovering serial (TTY) ports on Unix hosts.
//!
//! This crate answers two questions about the serial ports of a machine:
//!
//! - Which ports exist, and what is plugged into them (USB/PCI vendor and
//!   product IDs, manufacturer, product description, serial number)?
//! - Is a given port currently locked by another process?
//!
//! ## Discovery
//!
//! Ports are discovered by three strategies tried in order, stopping at the
//! first one that finds anything:
//!
//! 1. **Registry**: the udev database (Linux, `udev` feature)
//! 2. **sysfs**: the kernel's `/sys/class/tty` tree (Linux, Android)
//! 3. **Device directory**: a glob-filtered listing of `/dev`
//!
//! ## Features
//!
//! - `udev` (default): Query libudev before falling back to sysfs
//! - `serde`: Serialization support for data types
//!
//! ## Example
//!
//! ```rust,no_run
//! use ttyenum::{PortEnumerator, is_port_busy};
//!
//! for port in PortEnumerator::new().list_available_ports() {
//!     let ids = match (port.vendor_id, port.product_id) {
//!         (Some(vid), Some(pid)) => format!("{vid:04x}:{pid:04x}"),
//!         _ => "-".to_string(),
//!     };
//!     println!(
//!         "{} {} {} busy={}",
//!         port.device,
//!         ids,
//!         port.description,
//!         is_port_busy(&port.port_name)
//!     );
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::sync::{Arc, OnceLock};

pub mod discovery;
pub mod error;
pub mod host;
pub mod lock;
pub mod platform;
pub mod port;

static DEFAULT_REGISTRY: OnceLock<Arc<dyn DeviceRegistry>> = OnceLock::new();

/// Install the process-wide device registry used by [`PortEnumerator::new`].
///
/// Must be called before the first enumeration; returns `false` if a
/// registry was already installed or initialized.
pub fn set_default_registry<R>(registry: R) -> bool
where
    R: DeviceRegistry + 'static,
{
    DEFAULT_REGISTRY
        .set(Arc::new(registry))
        .is_ok()
}

/// The process-wide device registry, initialized on first use.
///
/// Defaults to libudev when built with the `udev` feature on Linux and to
/// [`NullRegistry`] everywhere else.
#[must_use]
pub fn default_registry() -> Arc<dyn DeviceRegistry> {
    DEFAULT_REGISTRY
        .get_or_init(platform_registry)
        .clone()
}

#[cfg(all(target_os = "linux", feature = "udev"))]
fn platform_registry() -> Arc<dyn DeviceRegistry> {
    Arc::new(discovery::udev::UdevRegistry)
}

#[cfg(not(all(target_os = "linux", feature = "udev")))]
fn platform_registry() -> Arc<dyn DeviceRegistry> {
    Arc::new(NullRegistry)
}

// Re-exports for convenience
#[cfg(all(target_os = "linux", feature = "udev"))]
pub use discovery::udev::UdevRegistry;
pub use {
    discovery::{
        DeviceRegistry, Discovery, NullRegistry, PortEnumerator, RegistryDevice, Strategy,
    },
    error::{Error, Result},
    host::{available_ports, discover_ports, find_port, is_port_busy, standard_baud_rates},
    lock::LockChecker,
    platform::Platform,
    port::{PortInfo, port_name_from_system_location, port_name_to_system_location},
};
