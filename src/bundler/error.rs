//! Error types for artifact packaging.
//!
//! Provides contextual error chaining, filesystem errors that carry the
//! offending path, and a distinct [`ConfigError`] kind for configuration
//! mistakes that abort a run before any output is trusted.
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_artifacts::bundler::{Context, ErrorExt, Result};
//! use std::path::Path;
//!
//! fn read_readme(root: &Path) -> Result<String> {
//!     let path = root.join("README.md");
//!     let text = std::fs::read_to_string(&path).fs_context("reading readme", &path)?;
//!     let first = text.lines().next().context("readme is empty")?;
//!     Ok(first.to_string())
//! }
//! ```

use std::{
    fmt::Display,
    io,
    path::{self, PathBuf},
};
use thiserror::Error as DeriveError;

/// Errors returned by the bundler.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Context describing the operation (e.g., "opening archive")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// Invalid or incomplete packaging configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Error walking a mapping's base directory.
    #[error("{0}")]
    WalkdirError(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error("{0}")]
    StripError(#[from] path::StripPrefixError),

    /// ZIP archive creation error.
    #[error("{0}")]
    ZipError(#[from] async_zip::error::ZipError),

    /// JSON serialization error (manifest writing).
    #[error("{0}")]
    JsonError(#[from] serde_json::error::Error),

    /// Background task failed to complete (directory traversal).
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Generic error with custom message.
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Whether this is an expected configuration error rather than an I/O failure.
    pub fn is_expected(&self) -> bool {
        match self {
            Error::Config(_) => true,
            Error::Context(_, inner) => inner.is_expected(),
            _ => false,
        }
    }
}

/// Configuration errors.
///
/// These abort the entire run immediately; no partial output is valid.
#[derive(Debug, DeriveError, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The artifact configuration has no file mapping list.
    #[error("no file mappings configured (expected an `artifact.files` list)")]
    MissingMappings,

    /// A mapping descriptor has no pattern.
    #[error("file mapping #{index} is missing a pattern")]
    MissingPattern {
        /// Position of the entry in the mapping list
        index: usize,
    },

    /// A mapping pattern ends in a separator.
    #[error("pattern must match files, not directories: {pattern}")]
    DirectoryPattern {
        /// The offending pattern
        pattern: String,
    },

    /// Globstar source mapped into a globstar destination directory.
    #[error("cannot map globstar pattern {pattern} into globstar directory {path}")]
    AmbiguousGlobstar {
        /// Source pattern
        pattern: String,
        /// Destination directory
        path: String,
    },

    /// A dependency package has no directory for the current platform.
    #[error("could not resolve directory for package '{package}' on platform '{platform}'")]
    UnresolvedPackage {
        /// Dependency package name
        package: String,
        /// Platform being packaged
        platform: String,
    },

    /// A rendered archive entry name would extract outside the archive root.
    #[error("archive entry '{name}' escapes the archive root")]
    UnsafeEntryName {
        /// The offending entry name
        name: String,
    },

    /// A mapping entry could not be interpreted.
    #[error("invalid file mapping #{index}: {reason}")]
    InvalidEntry {
        /// Position of the entry in the mapping list
        index: usize,
        /// Reason for the error
        reason: String,
    },
}

/// Convenient type alias for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for adding context to errors.
///
/// Similar to `anyhow::Context` but integrated with the bundler's Error type.
/// Works with both `Result<T, E>` and `Option<T>`.
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation).
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Extension trait for filesystem operations with automatic path context.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory", "opening archive".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Macro for early return with error.
///
/// Converts the message into a [`Error::GenericError`] and returns immediately.
///
/// ```ignore
/// bail!("operation failed");
/// bail!("invalid value: {}", value);
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::Error::GenericError($msg.into()))
    };
    ($err:expr $(,)?) => {
        return Err($crate::bundler::Error::GenericError($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_expected_through_context() {
        let err: Result<()> = Err(ConfigError::MissingMappings.into());
        let err = err.context("loading mappings").unwrap_err();
        assert!(err.is_expected());
        assert!(err.to_string().starts_with("loading mappings: "));
    }

    #[test]
    fn test_io_errors_are_not_expected() {
        let err = std::fs::read("/definitely/not/here")
            .fs_context("reading file", "/definitely/not/here")
            .unwrap_err();
        assert!(!err.is_expected());
        assert!(err.to_string().contains("/definitely/not/here"));
    }
}
