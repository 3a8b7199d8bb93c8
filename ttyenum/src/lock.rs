//! Advisory UUCP-style lock files.
//!
//! Programs that open a serial port traditionally drop a `LCK..<port>` file
//! containing their pid into a shared lock directory. A port counts as busy
//! while such a file names a live process. This module only reads lock
//! files; it never creates or removes them, stale or not.

use {
    log::{debug, trace, warn},
    nix::{
        errno::Errno,
        sys::signal::kill,
        unistd::{AccessFlags, Pid, access},
    },
    std::{
        fs::File,
        io::{BufRead, BufReader},
        path::{Path, PathBuf},
    },
};

/// Well-known lock directories, in lookup order.
pub const LOCK_DIRECTORIES: &[&str] = &[
    "/var/lock",
    "/etc/locks",
    "/var/spool/locks",
    "/var/spool/uucp",
    "/tmp",
    "/var/tmp",
    "/var/lock/lockdev",
    "/run/lock",
];

/// Extra lock directory searched on Android, after the standard list.
#[cfg(target_os = "android")]
pub const ANDROID_LOCK_DIRECTORY: &str = "/data/local/tmp";

/// Lock file name for a port: `LCK..` followed by the name with `/` → `_`.
pub fn lock_file_name(port_name: &str) -> String {
    format!("LCK..{}", port_name.replace('/', "_"))
}

/// Resolves and inspects port lock files.
#[derive(Debug, Clone)]
pub struct LockChecker {
    directories: Vec<PathBuf>,
}

impl LockChecker {
    /// Check the standard lock directories plus the process temp directory.
    pub fn new() -> Self {
        let mut directories: Vec<PathBuf> = LOCK_DIRECTORIES
            .iter()
            .map(PathBuf::from)
            .collect();
        #[cfg(target_os = "android")]
        directories.push(PathBuf::from(ANDROID_LOCK_DIRECTORY));
        let temp = std::env::temp_dir();
        if !directories.contains(&temp) {
            directories.push(temp);
        }
        Self { directories }
    }

    /// Check only the given directories, in order.
    pub fn with_directories<I, P>(directories: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut unique: Vec<PathBuf> = Vec::new();
        for dir in directories {
            let dir = dir.into();
            if !unique.contains(&dir) {
                unique.push(dir);
            }
        }
        Self {
            directories: unique,
        }
    }

    /// Directories searched, in order.
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Path of the lock file for `port_name`.
    ///
    /// The first readable directory that already holds the lock file, or
    /// that a lock file could be written into, wins. `None` when no
    /// directory qualifies.
    pub fn lock_file_path(&self, port_name: &str) -> Option<PathBuf> {
        let file_name = lock_file_name(port_name);
        for dir in &self.directories {
            if access(dir.as_path(), AccessFlags::R_OK).is_err() {
                continue;
            }
            let path = dir.join(&file_name);
            if path.exists() || access(dir.as_path(), AccessFlags::W_OK).is_ok() {
                return Some(path);
            }
        }
        warn!(
            "No usable lock directory among {:?}",
            self.directories
        );
        None
    }

    /// Whether another live process holds the lock for `port_name`.
    ///
    /// Every failure (no lock directory, missing or unreadable file, garbage
    /// content, stale pid) reads as "not busy".
    pub fn is_busy(&self, port_name: &str) -> bool {
        self.lock_file_path(port_name)
            .is_some_and(|path| lock_file_is_held(&path))
    }
}

impl Default for LockChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the lock file at `path` names a process that is still alive.
pub fn lock_file_is_held(path: &Path) -> bool {
    let Some(pid) = read_lock_pid(path) else {
        return false;
    };
    if pid != 0 && !process_exists(pid) {
        debug!("Stale lock {} (pid {pid} is gone)", path.display());
        return false;
    }
    trace!("Lock {} held by pid {pid}", path.display());
    true
}

/// Read the pid from the first line of a lock file.
fn read_lock_pid(path: &Path) -> Option<i32> {
    let file = File::open(path).ok()?;
    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .ok()?;
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    line.parse()
        .ok()
}

/// Probe `pid` with signal 0. Only `ESRCH` means the process is gone;
/// `EPERM` still proves it exists.
fn process_exists(pid: i32) -> bool {
    !matches!(kill(Pid::from_raw(pid), None), Err(Errno::ESRCH))
}

/// Whether `port_name` is locked by a live process, using the default
/// lock directories.
pub fn is_port_busy(port_name: &str) -> bool {
    LockChecker::new().is_busy(port_name)
}
