//! Serial port discovery.
//!
//! Ports are found by trying up to three strategies, in the order given by
//! the platform table, and stopping at the first one that finds anything:
//!
//! ```text
//! +------------------+   empty   +------------------+   empty   +------------------+
//! | Registry (udev)  | --------> | sysfs tty class  | --------> | /dev glob scan   |
//! | full metadata    |           | USB/PCI metadata |           | names only       |
//! +------------------+           +------------------+           +------------------+
//!                                  Linux/Android only
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use ttyenum::PortEnumerator;
//!
//! let discovery = PortEnumerator::new().discover();
//! for port in &discovery.ports {
//!     println!("{} ({})", port.device, port.description);
//! }
//! ```

pub mod devdir;
pub mod registry;
pub mod sysfs;
#[cfg(all(target_os = "linux", feature = "udev"))]
pub mod udev;

use {
    crate::{
        error::Result,
        platform::Platform,
        port::{PortInfo, port_name_from_system_location},
    },
    log::debug,
    std::{fmt, path::PathBuf, sync::Arc},
};

pub use {
    devdir::{DEVICE_DIR, DevDirScanner},
    registry::{DeviceRegistry, NullRegistry, ParentDevice, RegistryDevice, ports_from_registry},
    sysfs::{SYSFS_TTY_CLASS, SysfsScanner},
};

/// A discovery strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Strategy {
    /// Device-manager registry query (udev).
    Registry,
    /// Kernel tty class walk under `/sys/class/tty`.
    Sysfs,
    /// Glob-filtered listing of `/dev`.
    #[cfg_attr(feature = "serde", serde(rename = "devdir"))]
    DeviceDirectory,
}

impl Strategy {
    /// Short name used in logs and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            Self::Registry => "registry",
            Self::Sysfs => "sysfs",
            Self::DeviceDirectory => "devdir",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a discovery run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Strategy that produced the ports, `None` if every strategy came up empty.
    pub strategy: Option<Strategy>,
    /// Discovered ports.
    pub ports: Vec<PortInfo>,
}

/// Enumerates serial ports on the host.
pub struct PortEnumerator {
    registry: Arc<dyn DeviceRegistry>,
    platform: Platform,
    sysfs: SysfsScanner,
    devdir: DevDirScanner,
}

impl PortEnumerator {
    /// Create an enumerator for the current platform using the process-wide
    /// default registry and the standard `/sys/class/tty` and `/dev` paths.
    pub fn new() -> Self {
        let platform = Platform::current();
        Self {
            registry: crate::default_registry(),
            platform,
            sysfs: SysfsScanner::new(SYSFS_TTY_CLASS, platform),
            devdir: DevDirScanner::new(DEVICE_DIR, platform),
        }
    }

    /// Use a specific registry instead of the process-wide default.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<dyn DeviceRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Scan a different tty class directory.
    #[must_use]
    pub fn with_sysfs_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.sysfs = SysfsScanner::new(root, self.platform);
        self
    }

    /// Scan a different device directory, keeping the current patterns.
    #[must_use]
    pub fn with_device_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.devdir = self
            .devdir
            .with_dir(dir);
        self
    }

    /// Behave as on `platform`: strategy order, sysfs rules and `/dev`
    /// patterns all follow its table row. Resets custom device patterns.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self.sysfs = SysfsScanner::new(
            self.sysfs
                .root()
                .to_path_buf(),
            platform,
        );
        self.devdir = DevDirScanner::new(
            self.devdir
                .dir()
                .to_path_buf(),
            platform,
        );
        self
    }

    /// Replace the platform's device name patterns for the `/dev` scan.
    pub fn with_device_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        self.devdir = DevDirScanner::with_patterns(
            self.devdir
                .dir()
                .to_path_buf(),
            patterns,
        )?;
        Ok(self)
    }

    /// Platform whose rules this enumerator follows.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Run the strategies in order and return the first non-empty result.
    pub fn discover(&self) -> Discovery {
        for &strategy in self
            .platform
            .strategies()
        {
            let ports = self.run_strategy(strategy);
            if !ports.is_empty() {
                debug!(
                    "{strategy} strategy found {} port(s)",
                    ports.len()
                );
                return Discovery {
                    strategy: Some(strategy),
                    ports,
                };
            }
            debug!("{strategy} strategy found no ports");
        }
        Discovery::default()
    }

    /// List the serial ports currently present.
    pub fn list_available_ports(&self) -> Vec<PortInfo> {
        self.discover()
            .ports
    }

    /// Run a single strategy, bypassing the cascade.
    pub fn run_strategy(&self, strategy: Strategy) -> Vec<PortInfo> {
        match strategy {
            Strategy::Registry => match self
                .registry
                .tty_devices()
            {
                Ok(devices) => ports_from_registry(devices),
                Err(e) => {
                    debug!("Registry unavailable: {e}");
                    Vec::new()
                },
            },
            Strategy::Sysfs => self
                .sysfs
                .scan(),
            Strategy::DeviceDirectory => self
                .devdir
                .scan(),
        }
    }

    /// Find a port by short name or device path.
    pub fn find_by_name(&self, name: &str) -> Option<PortInfo> {
        let wanted = port_name_from_system_location(name);
        self.list_available_ports()
            .into_iter()
            .find(|p| p.port_name == wanted || p.device == name)
    }

    /// Find ports matching the given VID/PID.
    pub fn find_by_vid_pid(&self, vid: u16, pid: u16) -> Vec<PortInfo> {
        self.list_available_ports()
            .into_iter()
            .filter(|p| p.vendor_id == Some(vid) && p.product_id == Some(pid))
            .collect()
    }
}

impl Default for PortEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PortEnumerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortEnumerator")
            .field("platform", &self.platform)
            .field("sysfs", &self.sysfs)
            .field("devdir", &self.devdir)
            .finish_non_exhaustive()
    }
}
