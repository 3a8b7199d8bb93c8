//! Device directory strategy.
//!
//! Last resort when neither the registry nor sysfs reported anything: list
//! the device directory and keep the nodes whose names match the platform's
//! serial device patterns. No metadata is available this way.

use {
    crate::{
        error::{Error, Result},
        platform::Platform,
        port::PortInfo,
    },
    glob::{MatchOptions, Pattern},
    log::{debug, warn},
    std::{
        collections::BTreeSet,
        fs,
        path::{Path, PathBuf},
    },
};

/// Default device directory.
pub const DEVICE_DIR: &str = "/dev";

/// Device name patterns are matched case-insensitively.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Scans a device directory for serial device nodes.
#[derive(Debug, Clone)]
pub struct DevDirScanner {
    dir: PathBuf,
    patterns: Vec<Pattern>,
}

impl DevDirScanner {
    /// Create a scanner using the platform's built-in patterns.
    pub fn new(dir: impl Into<PathBuf>, platform: Platform) -> Self {
        let patterns = platform
            .device_patterns()
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Ignoring built-in device pattern '{p}': {e}");
                    None
                },
            })
            .collect();
        Self {
            dir: dir.into(),
            patterns,
        }
    }

    /// Create a scanner with caller-supplied glob patterns.
    pub fn with_patterns<S: AsRef<str>>(dir: impl Into<PathBuf>, patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Pattern::new(p).map_err(|e| Error::Pattern {
                    pattern: p.to_string(),
                    reason: e
                        .msg
                        .to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            dir: dir.into(),
            patterns,
        })
    }

    /// Same patterns, different directory.
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// The directory being scanned.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Patterns in use, as written.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns
            .iter()
            .map(Pattern::as_str)
    }

    fn matches(&self, name: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(name, MATCH_OPTIONS))
    }

    /// List matching device nodes, sorted and deduplicated by absolute path.
    ///
    /// Directories and symbolic links are skipped. A missing directory
    /// yields an empty list.
    pub fn scan(&self) -> Vec<PortInfo> {
        let dir = std::path::absolute(&self.dir).unwrap_or_else(|_| self.dir.clone());
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cannot read {}: {e}", dir.display());
                return Vec::new();
            },
        };

        let mut found = BTreeSet::new();
        for entry in entries.flatten() {
            let name = entry
                .file_name()
                .to_string_lossy()
                .into_owned();
            if !self.matches(&name) {
                continue;
            }
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() || file_type.is_symlink() {
                continue;
            }
            found.insert((
                dir.join(&name)
                    .to_string_lossy()
                    .into_owned(),
                name,
            ));
        }

        found
            .into_iter()
            .map(|(device, port_name)| PortInfo::new(device, port_name))
            .collect()
    }
}
