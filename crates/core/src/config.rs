//! Configuration for ptui.
//!
//! This module provides the [`Settings`] read from the optional YAML
//! configuration file and functions for resolving configuration file paths,
//! expanding shell variables like `~` in paths.

use serde::{Deserialize, Serialize};

/// Default path for the settings file
const DEFAULT_CONFIG_PATH: &str = "~/.ptui/config.yml";

/// Package manager that every command is issued against
pub const DEFAULT_PROGRAM: &str = "pacman";

/// Marker created by the package manager while it holds its database
pub const DEFAULT_LOCK_FILE: &str = "/var/lib/pacman/db.lck";

/// Number of lines forwarded per chunk
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Runtime settings shared by the executor and the front-end.
///
/// Every field is optional in the YAML file; missing fields fall back to
/// their defaults.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub program: String,
    pub lock_file: String,
    pub batch_size: usize,
    pub require_root: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            lock_file: DEFAULT_LOCK_FILE.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            require_root: true,
        }
    }
}

impl Settings {
    /// Batch capacity, never less than one line.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size.max(1)
    }

    /// The lock marker path with `~` expanded.
    #[must_use]
    pub fn lock_file_path(&self) -> String {
        shellexpand::tilde(&self.lock_file).to_string()
    }
}

/// Resolves the configuration file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// configuration path. Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use ptui_core::config::get_config_path;
///
/// // Use default path
/// let default_path = get_config_path(&None);
///
/// // Use custom path
/// let custom_path = get_config_path(&Some("/path/to/config.yml".to_string()));
/// assert_eq!(custom_path, "/path/to/config.yml");
/// ```
pub fn get_config_path(config_path_arg: &Option<String>) -> String {
    let config_path = match config_path_arg {
        Some(config_path) => config_path,
        None => DEFAULT_CONFIG_PATH,
    };

    shellexpand::tilde(config_path).to_string()
}
