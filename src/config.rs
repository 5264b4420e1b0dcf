//! Configuration options

use crate::{
    controller::Settings,
    placement::{DockSide, Reserve},
    utils::deserialize_shellexpand,
    wmaker::WmakerDefaults,
};
use anyhow::{Context, Result};
use colored::Colorize;
use directories::{BaseDirs, ProjectDirs};
use format_serde_error::SerdeError;
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

/// Configuration file name
const CONFIG_FILE: &str = "moveto.yml";

/// Where WindowMaker keeps its defaults unless told otherwise
const WMAKER_DEFAULTS: &str = "~/GNUstep/Defaults/WindowMaker";

// =================== Config ===================== [[[

/// Configuration file to parse
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub(crate) struct Config {
    /// Whether logs should be written to a file
    #[serde(alias = "log-to-file")]
    pub(crate) log_to_file: bool,

    /// The directory to write the log to
    #[serde(alias = "log-dir", deserialize_with = "deserialize_shellexpand")]
    pub(crate) log_dir: Option<PathBuf>,

    /// Pixels a window may be off a placement and still count as in it
    pub(crate) tolerance: u32,

    /// Edge of the screen the dock is attached to
    #[serde(alias = "dock-side")]
    pub(crate) dock_side: DockSide,

    /// Monitor carrying the dock. Detected from the dock's tiles when unset
    #[serde(alias = "dock-monitor")]
    pub(crate) dock_monitor: Option<String>,

    /// Width of the dock
    #[serde(alias = "dock-width")]
    pub(crate) dock_width: u32,

    /// Height of the miniwindows row
    #[serde(alias = "icon-height")]
    pub(crate) icon_height: u32,

    /// Space between a reserved strip and a window
    #[serde(alias = "reserved-border")]
    pub(crate) reserved_border: u32,

    /// Maximized windows may cover the dock
    #[serde(alias = "cover-dock")]
    pub(crate) cover_dock: bool,

    /// Maximized windows may cover miniwindows
    #[serde(alias = "cover-miniwindows")]
    pub(crate) cover_miniwindows: bool,

    /// WindowMaker's defaults file, which overrides the two `cover` options
    #[serde(alias = "wmaker-defaults", deserialize_with = "deserialize_shellexpand")]
    pub(crate) wmaker_defaults: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let reserve = Reserve::default();

        Self {
            log_to_file:       false,
            log_dir:           None,
            tolerance:         32_u32,
            dock_side:         reserve.dock_side,
            dock_monitor:      None,
            dock_width:        reserve.dock_width,
            icon_height:       reserve.icon_height,
            reserved_border:   reserve.border,
            cover_dock:        reserve.cover_dock,
            cover_miniwindows: reserve.cover_miniwindows,
            wmaker_defaults:   None,
        }
    }
}

impl Config {
    /// Create the default configuration file
    pub(crate) fn create_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::debug!("Creating configuration path: {}", path.display());
            fs::create_dir_all(path).context("unable to create configuration directory")?;
        }

        let path = path.join(CONFIG_FILE);
        log::debug!("{}: {}", "Configuration path".bright_blue(), path.display());

        if !path.is_file() {
            let initialization = include_str!("../example/moveto.yml");

            let mut config_file: fs::File = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .open(&path)
                .with_context(|| format!("could not create moveto config: '{}'", path.display()))?;

            config_file
                .write_all(initialization.as_bytes())
                .with_context(|| format!("could not create moveto config: '{}'", path.display()))?;
            config_file.flush()?;
        }

        Self::load(path)
    }

    /// Load the configuration file from a given path
    pub(crate) fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(file)
    }

    /// Parse the configuration from YAML
    pub(crate) fn from_str(file: String) -> Result<Self> {
        // An empty document is `null`, not an empty mapping
        if file.trim().is_empty() {
            return Ok(Self::default());
        }

        let res = serde_yaml::from_str(&file).map_err(|e| SerdeError::new(file, e))?;

        Ok(res)
    }

    /// Load the default configuration file
    pub(crate) fn load_default() -> Result<Self> {
        let dirs = MovetoDirs::new().context("failed to determine the configuration directory")?;
        let path = dirs.config_dir();
        log::debug!("loading default config: {}", path.display());
        Self::create_default(path)
    }

    /// Location of WindowMaker's defaults file
    pub(crate) fn wmaker_defaults_path(&self) -> PathBuf {
        self.wmaker_defaults
            .clone()
            .unwrap_or_else(|| PathBuf::from(shellexpand::tilde(WMAKER_DEFAULTS).to_string()))
    }

    /// Combine the configuration with WindowMaker's defaults into the
    /// [`Settings`] used to compute placements
    pub(crate) fn settings(&self, wmaker: WmakerDefaults) -> Settings {
        let mut reserve = Reserve {
            dock_side:         self.dock_side,
            dock_width:        self.dock_width,
            icon_height:       self.icon_height,
            border:            self.reserved_border,
            cover_dock:        self.cover_dock,
            cover_miniwindows: self.cover_miniwindows,
        };

        if let Some(no_over_icons) = wmaker.no_window_over_icons {
            reserve.cover_miniwindows = !no_over_icons;
        }
        if let Some(no_over_dock) = wmaker.no_window_over_dock {
            reserve.cover_dock = !no_over_dock;
        }

        Settings {
            reserve,
            dock_monitor: self.dock_monitor.clone(),
            dock_at_edge: false,
            tolerance: self.tolerance.into(),
        }
    }
} // ]]] === Config ===

// ================ Project Dirs ================== [[[

/// Get the project directories relevant to `moveto`
#[derive(Debug, Clone)]
pub(crate) struct MovetoDirs {
    /// User's `$XDG_CONFIG_HOME/moveto` directory
    config_dir: PathBuf,
}

impl MovetoDirs {
    /// Create a new [`MovetoDirs`]
    pub(crate) fn new() -> Option<Self> {
        Some(Self {
            config_dir: Self::get_config_dir()?,
        })
    }

    /// Wrapper function that makes it easier to get directories
    fn get_dir(env_var: &str, var: &str, join: &str) -> Option<PathBuf> {
        env::var_os(env_var)
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .or_else(|| {
                env::var_os(var)
                    .map(PathBuf::from)
                    .filter(|p| p.is_absolute())
                    .or_else(|| BaseDirs::new().map(|p| p.home_dir().join(join)))
                    .map(|p| p.join(env!("CARGO_PKG_NAME")))
            })
    }

    /// Get the `config` directory
    fn get_config_dir() -> Option<PathBuf> {
        Self::get_dir("MOVETO_CONFIG_DIR", "XDG_CONFIG_HOME", ".config")
            .or_else(|| get_project_dirs().map(|p| p.config_dir().to_path_buf()))
    }

    /// Get configuration directory
    #[must_use]
    pub(crate) fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

/// Get all user project directories
pub(crate) fn get_project_dirs() -> Option<ProjectDirs> {
    log::trace!("determining project default folders");
    ProjectDirs::from("com", "moveto", "moveto")
}

// ]]] === Project Dirs ===
