//! Error types for kodegen_bundler_artifacts operations.
//!
//! This module defines the top-level error type with actionable error messages
//! and recovery suggestions.

use crate::bundler::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for kodegen_bundler_artifacts operations
pub type Result<T> = std::result::Result<T, PackError>;

/// Main error type for all packaging operations
#[derive(Error, Debug)]
pub enum PackError {
    /// Project configuration file errors
    #[error("Config error: {0}")]
    ProjectConfig(#[from] ProjectConfigError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bundler errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// Errors loading the project configuration file
#[derive(Error, Debug)]
pub enum ProjectConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    NotFound {
        /// Path where the file was expected
        path: PathBuf,
    },

    /// Configuration file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML or has the wrong shape
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// Path of the configuration file
        path: PathBuf,
        /// Parsing error
        #[source]
        source: toml::de::Error,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl PackError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            PackError::ProjectConfig(ProjectConfigError::NotFound { path }) => vec![
                format!("Create {} describing the project", path.display()),
                "Point at another file with --config <FILE>".to_string(),
            ],
            PackError::Cli(_) => vec!["Run with --help to see the accepted flags".to_string()],
            PackError::ProjectConfig(ProjectConfigError::Parse { .. }) => vec![
                "Check the TOML syntax and field names in the configuration file".to_string(),
            ],
            PackError::Bundler(e) => match config_error(e) {
                Some(ConfigError::MissingMappings) => vec![
                    "Add a files list under [artifact], e.g. files = [\"README.md\"]".to_string(),
                ],
                Some(ConfigError::DirectoryPattern { pattern }) => vec![
                    format!("Match the files inside the directory: {pattern}**"),
                ],
                Some(ConfigError::AmbiguousGlobstar { .. }) => vec![
                    "Spell out the destination, e.g. path = \"lib/**\" instead of \"lib/**/\""
                        .to_string(),
                ],
                Some(ConfigError::UnresolvedPackage { package, .. }) => vec![
                    format!("Declare [dependencies.{package}] with a dir or a platform directory"),
                ],
                Some(_) => vec!["Fix the file mapping named in the error above".to_string()],
                None => vec![
                    "Check file permissions and free space in the dist directory".to_string(),
                    "Any partially written archive should be discarded".to_string(),
                ],
            },
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Whether this is an expected configuration error (as opposed to an I/O failure)
    pub fn is_expected(&self) -> bool {
        match self {
            PackError::ProjectConfig(_) | PackError::Cli(_) => true,
            PackError::Bundler(e) => e.is_expected(),
            _ => false,
        }
    }
}

fn config_error(error: &crate::bundler::Error) -> Option<&ConfigError> {
    match error {
        crate::bundler::Error::Config(e) => Some(e),
        crate::bundler::Error::Context(_, inner) => config_error(inner),
        _ => None,
    }
}
