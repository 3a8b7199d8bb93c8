//! Per-platform discovery settings.
//!
//! Everything that differs between Unix flavours lives in one table keyed by
//! [`Platform`]: the device-name patterns for the `/dev` scan, which
//! discovery strategies are attempted (and in which order), and the standard
//! baud rates the termios layer exposes.

use crate::discovery::Strategy;

/// Target platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Platform {
    /// Linux (desktop, server, embedded).
    Linux,
    /// Android; shares the Linux table with one sysfs carve-out.
    Android,
    /// FreeBSD.
    FreeBsd,
    /// QNX Neutrino.
    Qnx,
    /// Any other Unix-like system.
    #[cfg_attr(feature = "serde", serde(rename = "unix"))]
    Other,
}

/// Discovery settings for one platform.
#[derive(Debug, Clone, Copy)]
pub struct PlatformProfile {
    /// The platform this row describes.
    pub platform: Platform,
    /// Glob patterns matched against entries of the device directory.
    pub device_patterns: &'static [&'static str],
    /// Discovery strategies in priority order.
    pub strategies: &'static [Strategy],
    /// Standard baud rates supported by the serial driver layer.
    pub baud_rates: &'static [u32],
}

const LINUX_PATTERNS: &[&str] = &[
    "ttyS*",   // Standard UART 8250 etc.
    "ttyO*",   // OMAP UART
    "ttyUSB*", // USB/serial converters (PL2303, FTDI, CH340)
    "ttyACM*", // CDC-ACM devices
    "ttyGS*",  // USB gadget serial
    "ttyMI*",  // MOXA PCI/serial cards
    "ttymxc*", // Freescale i.MX UARTs
    "ttyAMA*", // ARM AMBA UARTs (Raspberry Pi)
    "rfcomm*", // Bluetooth serial
    "ircomm*", // IrDA serial
];

const LINUX_STRATEGIES: &[Strategy] = &[
    Strategy::Registry,
    Strategy::Sysfs,
    Strategy::DeviceDirectory,
];

const UNIX_STRATEGIES: &[Strategy] = &[Strategy::Registry, Strategy::DeviceDirectory];

const LINUX_BAUD_RATES: &[u32] = &[
    50, 75, 110, 134, 150, 200, 300, 600, 1200, 1800, 2400, 4800, 9600, 19200, 38400, 57600,
    115200, 230400, 460800, 500000, 576000, 921600, 1000000, 1152000, 1500000, 2000000, 2500000,
    3000000, 3500000, 4000000,
];

const FREEBSD_BAUD_RATES: &[u32] = &[
    50, 75, 110, 134, 150, 200, 300, 600, 1200, 1800, 2400, 4800, 7200, 9600, 14400, 19200, 28800,
    38400, 57600, 76800, 115200, 230400, 460800, 921600,
];

const POSIX_BAUD_RATES: &[u32] = &[
    50, 75, 110, 134, 150, 200, 300, 600, 1200, 1800, 2400, 4800, 9600, 19200, 38400, 57600,
    115200,
];

const PROFILES: &[PlatformProfile] = &[
    PlatformProfile {
        platform: Platform::Linux,
        device_patterns: LINUX_PATTERNS,
        strategies: LINUX_STRATEGIES,
        baud_rates: LINUX_BAUD_RATES,
    },
    PlatformProfile {
        platform: Platform::Android,
        device_patterns: LINUX_PATTERNS,
        strategies: LINUX_STRATEGIES,
        baud_rates: LINUX_BAUD_RATES,
    },
    PlatformProfile {
        platform: Platform::FreeBsd,
        device_patterns: &["cu*"],
        strategies: UNIX_STRATEGIES,
        baud_rates: FREEBSD_BAUD_RATES,
    },
    PlatformProfile {
        platform: Platform::Qnx,
        device_patterns: &["ser*"],
        strategies: UNIX_STRATEGIES,
        baud_rates: POSIX_BAUD_RATES,
    },
    PlatformProfile {
        platform: Platform::Other,
        device_patterns: &[],
        strategies: UNIX_STRATEGIES,
        baud_rates: POSIX_BAUD_RATES,
    },
];

impl Platform {
    /// The platform this crate was compiled for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "freebsd") {
            Self::FreeBsd
        } else if cfg!(target_os = "nto") {
            Self::Qnx
        } else {
            Self::Other
        }
    }

    /// Look up this platform's row in the profile table.
    pub fn profile(self) -> &'static PlatformProfile {
        PROFILES
            .iter()
            .find(|p| p.platform == self)
            .unwrap_or(&PROFILES[PROFILES.len() - 1])
    }

    /// Glob patterns for the device directory scan.
    pub fn device_patterns(self) -> &'static [&'static str] {
        self.profile()
            .device_patterns
    }

    /// Discovery strategies in priority order.
    pub fn strategies(self) -> &'static [Strategy] {
        self.profile()
            .strategies
    }

    /// Whether the kernel exposes a sysfs tty class on this platform.
    pub fn supports_sysfs(self) -> bool {
        self.strategies()
            .contains(&Strategy::Sysfs)
    }

    /// Standard baud rates for this platform.
    pub fn standard_baud_rates(self) -> &'static [u32] {
        self.profile()
            .baud_rates
    }

    /// Lowercase display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Android => "android",
            Self::FreeBsd => "freebsd",
            Self::Qnx => "qnx",
            Self::Other => "unix",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}
