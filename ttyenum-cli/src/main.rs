//! ttyenum CLI - Command-line tool for listing serial ports.
//!
//! ## Features
//!
//! - List serial ports with USB/PCI metadata
//! - Force a single discovery strategy
//! - Check whether a port is held by a UUCP lock file
//! - Shell completion generation
//! - Environment variable and config file support

use {
    anyhow::Result,
    clap::{Parser, Subcommand, ValueEnum},
    clap_complete::Shell,
    config::Config,
    env_logger::Env,
    log::debug,
    serde::{Deserialize, Serialize},
    std::{env, path::PathBuf},
    ttyenum::{LockChecker, PortEnumerator, Strategy},
};

mod commands;
mod config;

/// ttyenum - List serial ports and check their lock files.
///
/// Environment variables:
///   TTYENUM_SYSFS_ROOT  - tty class directory (default: /sys/class/tty)
///   TTYENUM_DEV_DIR     - Device directory (default: /dev)
///   TTYENUM_LOCK_DIR    - Lock directory to search (replaces the standard list)
#[derive(Parser)]
#[command(name = "ttyenum")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Verbose output level (-v, -vv for increasing detail).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-essential output).
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a configuration file.
    #[arg(long = "config", global = true, value_name = "PATH")]
    config_path: Option<PathBuf>,

    /// tty class directory to scan.
    #[arg(long, global = true, value_name = "DIR", env = "TTYENUM_SYSFS_ROOT")]
    sysfs_root: Option<PathBuf>,

    /// Device directory to scan.
    #[arg(long, global = true, value_name = "DIR", env = "TTYENUM_DEV_DIR")]
    dev_dir: Option<PathBuf>,

    /// Lock directory to search (repeatable).
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        env = "TTYENUM_LOCK_DIR",
        value_delimiter = ':'
    )]
    lock_dir: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Discovery strategy selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum StrategyArg {
    /// Cascade registry, sysfs and device directory.
    Auto,
    /// Device-manager registry (udev).
    Registry,
    /// Kernel tty class tree.
    Sysfs,
    /// Glob-filtered device directory listing.
    Devdir,
}

impl StrategyArg {
    /// The single strategy to run, or `None` for the full cascade.
    fn strategy(self) -> Option<Strategy> {
        match self {
            Self::Auto => None,
            Self::Registry => Some(Strategy::Registry),
            Self::Sysfs => Some(Strategy::Sysfs),
            Self::Devdir => Some(Strategy::DeviceDirectory),
        }
    }
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List available serial ports.
    List {
        /// Output port list as JSON to stdout.
        #[arg(long)]
        json: bool,

        /// Discovery strategy to use.
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
    },

    /// Show details of a single port.
    Info {
        /// Port name (ttyUSB0) or device path (/dev/ttyUSB0).
        port: String,

        /// Output information as JSON to stdout.
        #[arg(long)]
        json: bool,

        /// Discovery strategy to use.
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
    },

    /// Check whether a port is locked by a live process.
    Busy {
        /// Port name (ttyUSB0) or device path (/dev/ttyUSB0).
        port: String,

        /// Output result as JSON to stdout.
        #[arg(long)]
        json: bool,
    },

    /// List the standard baud rates of this platform.
    BaudRates {
        /// Output baud rates as JSON to stdout.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (detected from $SHELL if not specified).
        #[arg(value_enum)]
        shell: Option<Shell>,
    },
}

/// Effective scan and lock settings after merging flags, env and config files.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Settings {
    pub sysfs_root: Option<PathBuf>,
    pub dev_dir: Option<PathBuf>,
    pub device_patterns: Option<Vec<String>>,
    pub strategy: Option<Strategy>,
    pub lock_dirs: Option<Vec<PathBuf>>,
}

impl Settings {
    /// Merge command-line values over the loaded configuration.
    fn resolve(cli: &Cli, strategy: Option<StrategyArg>, config: Config) -> Self {
        let strategy = strategy
            .or(config.scan.strategy)
            .unwrap_or(StrategyArg::Auto);
        let lock_dirs = if cli.lock_dir.is_empty() {
            config.lock.directories
        } else {
            Some(cli.lock_dir.clone())
        };
        Self {
            sysfs_root: cli
                .sysfs_root
                .clone()
                .or(config.scan.sysfs_root),
            dev_dir: cli
                .dev_dir
                .clone()
                .or(config.scan.dev_dir),
            device_patterns: config.scan.device_patterns,
            strategy: strategy.strategy(),
            lock_dirs,
        }
    }

    /// Build the port enumerator these settings describe.
    pub(crate) fn enumerator(&self) -> Result<PortEnumerator> {
        let mut enumerator = PortEnumerator::new();
        if let Some(root) = &self.sysfs_root {
            enumerator = enumerator.with_sysfs_root(root);
        }
        if let Some(dir) = &self.dev_dir {
            enumerator = enumerator.with_device_dir(dir);
        }
        if let Some(patterns) = &self.device_patterns {
            enumerator = enumerator.with_device_patterns(patterns.as_slice())?;
        }
        Ok(enumerator)
    }

    /// Build the lock checker these settings describe.
    pub(crate) fn lock_checker(&self) -> LockChecker {
        match &self.lock_dirs {
            Some(dirs) => LockChecker::with_directories(dirs.iter().cloned()),
            None => LockChecker::new(),
        }
    }
}

fn main() -> Result<()> {
    // --- NO_COLOR and TTY detection ---
    let stderr_is_tty = console::Term::stderr().is_term();
    if env::var("NO_COLOR").is_ok() || !stderr_is_tty {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_target(cli.verbose >= 2)
        .format_timestamp(if cli.verbose >= 2 {
            Some(env_logger::TimestampPrecision::Millis)
        } else {
            None
        })
        .init();

    debug!(
        "ttyenum v{} on {} (verbose level: {})",
        env!("CARGO_PKG_VERSION"),
        ttyenum::Platform::current().name(),
        cli.verbose
    );

    // Load configuration
    let config = if let Some(ref path) = cli.config_path {
        Config::load_from_path(path)
    } else {
        Config::load()
    };

    let strategy = match &cli.command {
        Commands::List { strategy, .. } | Commands::Info { strategy, .. } => *strategy,
        _ => None,
    };
    let settings = Settings::resolve(&cli, strategy, config);
    debug!("Effective settings: {settings:?}");

    match &cli.command {
        Commands::List { json, .. } => {
            commands::ports::cmd_list(&settings, *json, cli.quiet)?;
        },
        Commands::Info { port, json, .. } => {
            commands::ports::cmd_info(&settings, port, *json)?;
        },
        Commands::Busy { port, json } => {
            commands::ports::cmd_busy(&settings, port, *json)?;
        },
        Commands::BaudRates { json } => {
            commands::ports::cmd_baud_rates(*json)?;
        },
        Commands::Completions { shell } => {
            commands::completions::cmd_completions(*shell)?;
        },
    }

    Ok(())
}
