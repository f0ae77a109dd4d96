//! Reading of the ptui settings file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};

use crate::config::Settings;
use crate::error::{Error, Result};

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    match File::open(path) {
        Ok(reader) => Ok(reader),
        Err(e) => Err(Error::io_error(
            file_description.to_string(),
            path.to_string(),
            e,
        )),
    }
}

/// Loads settings from a YAML file.
///
/// A missing or empty file yields [`Settings::default`]; any field left out of
/// the file keeps its default value.
///
/// # Errors
///
/// Returns an error if:
/// - The file exists but cannot be read
/// - The file contains invalid YAML
/// - The YAML doesn't match the expected structure
///
/// # Examples
///
/// ```no_run
/// use ptui_core::file_handling::get_settings;
///
/// let settings = get_settings("/home/me/.ptui/config.yml")?;
/// println!("Running commands with {}", settings.program);
/// # Ok::<(), ptui_core::error::Error>(())
/// ```
pub fn get_settings(config_path: &str) -> Result<Settings> {
    if !Path::exists(Path::new(config_path)) {
        debug!("No settings file at `{}`, using defaults", config_path);
        return Ok(Settings::default());
    }

    let mut contents = String::new();
    get_reader("settings", config_path)?
        .read_to_string(&mut contents)
        .map_err(|e| Error::io_error("settings".to_string(), config_path.to_string(), e))?;

    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }

    let settings: Settings = serde_yaml::from_str(&contents).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "settings".to_string(),
            config_path.to_string(),
            e,
        )
    })?;

    info!("Loaded settings from `{}`", config_path);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = get_settings("/definitely/not/here/config.yml").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();
        assert_eq!(get_settings(path).unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "program: yay\nbatch_size: 20\n").unwrap();
        let path = temp_file.path().to_str().unwrap();

        let settings = get_settings(path).unwrap();
        assert_eq!(settings.program, "yay");
        assert_eq!(settings.batch_size(), 20);
        assert_eq!(settings.lock_file, "/var/lib/pacman/db.lck");
        assert!(settings.require_root);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "batch_size: [not, a, number]\n").unwrap();
        let path = temp_file.path().to_str().unwrap();

        let result = get_settings(path);
        assert!(matches!(result, Err(Error::Yaml { .. })));
    }
}
