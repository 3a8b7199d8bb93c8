//! Error types for ttyenum.

use thiserror::Error;

/// Result type for ttyenum operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ttyenum operations.
///
/// Enumeration itself never fails outward: unavailable resources degrade to
/// missing data. These variants surface from the pieces that can genuinely
/// fail, such as opening the device registry or compiling a user-supplied
/// glob pattern.
#[derive(Debug, Error)]
pub enum Error {
    /// Device registry (udev) could not be queried.
    #[error("Device registry error: {0}")]
    Registry(String),

    /// Invalid device-name glob pattern.
    #[error("Invalid device pattern '{pattern}': {reason}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_error_names_pattern() {
        let err = Error::Pattern {
            pattern: "tty[S".to_string(),
            reason: "invalid range pattern".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid device pattern 'tty[S': invalid range pattern"
        );
    }

    #[test]
    fn test_registry_error_display() {
        let err = Error::Registry("no udev".to_string());
        assert_eq!(err.to_string(), "Device registry error: no udev");
    }
}
