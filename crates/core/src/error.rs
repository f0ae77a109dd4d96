use std::process::ExitStatus;

use log::error;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not acquire the package database lock: `{}` exists.", .path)]
    ResourceLocked { path: String },

    #[error("Could not capture the {} pipe of the sub process.", .0)]
    MissingPipe(&'static str),

    #[error("Could not start `{}`: {}", .program, .original)]
    Spawn {
        program: String,
        original: std::io::Error,
    },

    #[error("Error waiting for sub process: {}", .0)]
    Wait(std::io::Error),

    #[error("The sub process exited with non-success status: {}", .0)]
    SubProcessExit(ExitStatus),

    #[error("Error reading {} of sub process: {}", .stream, .original)]
    StreamRead {
        stream: &'static str,
        original: std::io::Error,
    },

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),

    #[error("Misc error: {}", .0)]
    Misc(String),
}

impl Error {
    pub fn resource_locked(path: String) -> Self {
        Self::ResourceLocked { path }
    }

    pub fn spawn_error(program: String, original: std::io::Error) -> Self {
        error!("Failed to spawn `{}`: {}", program, original);
        Self::Spawn { program, original }
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    /// Whether this error was caused by the external lock marker being present.
    #[must_use]
    pub fn is_resource_locked(&self) -> bool {
        matches!(self, Self::ResourceLocked { .. })
    }
}
