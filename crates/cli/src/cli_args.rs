//! Command-line argument parsing.
//!
//! Flags given here take precedence over the settings file.

use clap::Parser;
use ptui_core::config::Settings;

/// Command-line arguments for the `ptui` binary.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use ptui_cli::cli_args::Args;
///
/// let args = Args::parse_from(["ptui", "--allow-non-root"]);
/// assert!(args.allow_non_root);
/// ```
#[derive(Parser, Debug)]
#[command(term_width = 0)]
pub struct Args {
    /// Path to the settings file YAML.
    ///
    /// If not provided, defaults to `~/.ptui/config.yml`.
    #[arg(long, short = 'c')]
    pub config_path: Option<String>,

    /// Package manager executable to run instead of the configured one.
    #[arg(long)]
    pub program: Option<String>,

    /// Lock marker that blocks new commands while it exists.
    #[arg(long)]
    pub lock_file: Option<String>,

    /// Start even when not running as root.
    #[arg(long, action)]
    pub allow_non_root: bool,

    /// Write logs to this file. Logging is off without it.
    #[arg(long, short = 'l')]
    pub log_file: Option<String>,
}

impl Args {
    /// Overlays the flags that were given on top of `settings`.
    #[must_use]
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(program) = &self.program {
            settings.program.clone_from(program);
        }
        if let Some(lock_file) = &self.lock_file {
            settings.lock_file.clone_from(lock_file);
        }
        if self.allow_non_root {
            settings.require_root = false;
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_values() {
        let args = Args::parse_from(["ptui"]);

        assert!(args.config_path.is_none());
        assert!(args.program.is_none());
        assert!(args.lock_file.is_none());
        assert!(!args.allow_non_root);
        assert!(args.log_file.is_none());
    }

    #[test]
    fn test_args_short_flags() {
        let args = Args::parse_from(["ptui", "-c", "/custom/config.yml", "-l", "/tmp/ptui.log"]);

        assert_eq!(args.config_path, Some("/custom/config.yml".to_string()));
        assert_eq!(args.log_file, Some("/tmp/ptui.log".to_string()));
    }

    #[test]
    fn test_args_long_flags() {
        let args = Args::parse_from([
            "ptui",
            "--config-path",
            "/custom/config.yml",
            "--program",
            "/usr/bin/pacman",
            "--lock-file",
            "/tmp/db.lck",
            "--allow-non-root",
            "--log-file",
            "/tmp/ptui.log",
        ]);

        assert_eq!(args.config_path, Some("/custom/config.yml".to_string()));
        assert_eq!(args.program, Some("/usr/bin/pacman".to_string()));
        assert_eq!(args.lock_file, Some("/tmp/db.lck".to_string()));
        assert!(args.allow_non_root);
        assert_eq!(args.log_file, Some("/tmp/ptui.log".to_string()));
    }

    #[test]
    fn test_apply_without_flags_keeps_settings() {
        let settings = Settings {
            program: "yay".to_string(),
            ..Settings::default()
        };
        let args = Args::parse_from(["ptui"]);

        assert_eq!(args.apply(settings.clone()), settings);
    }

    #[test]
    fn test_apply_overrides_settings() {
        let args = Args::parse_from([
            "ptui",
            "--program",
            "/usr/bin/pacman",
            "--lock-file",
            "/tmp/db.lck",
            "--allow-non-root",
        ]);

        let settings = args.apply(Settings::default());
        assert_eq!(settings.program, "/usr/bin/pacman");
        assert_eq!(settings.lock_file, "/tmp/db.lck");
        assert!(!settings.require_root);
        assert_eq!(settings.batch_size(), 100);
    }

    #[test]
    fn test_allow_non_root_never_reenables_check() {
        let settings = Settings {
            require_root: false,
            ..Settings::default()
        };
        let args = Args::parse_from(["ptui"]);

        assert!(!args.apply(settings).require_root);
    }
}
