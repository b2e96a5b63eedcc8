//! # kodegen_bundler_artifacts
//!
//! Multi-platform artifact packaging.
//!
//! A project declares its platforms and a list of file mappings (literal
//! paths or glob descriptors with `*` and `**`). For every selected platform
//! the mappings are rendered with that platform's variables, matched against
//! the file system, and the matches are streamed into a zip archive under
//! reconstructed destination paths. A JSON manifest lists every archive.
//!
//! ## Features
//!
//! - **Template rendering**: `{name}`, `{platform}`, `{env.CC}` and
//!   per-platform variables in ids, patterns, paths and base directories
//! - **Capture-preserving globs**: `src/**/*.js` → `lib/**/*.js` keeps the
//!   matched directories and file stems
//! - **Dependency directories**: mappings can start inside a per-platform
//!   dependency tree
//! - **Dry runs**: [`Bundler::plan`] computes the archive contents without
//!   writing anything
//!
//! ## Usage
//!
//! ```bash
//! kodegen_bundler_artifacts                        # host platform only
//! kodegen_bundler_artifacts --multiplatform        # every declared platform
//! kodegen_bundler_artifacts --platforms linux,macos --dry-run
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Core modules
pub mod bundler;
pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;

// Re-export main types for public API
pub use bundler::{
    ArtifactPlugin, BundledArtifact, Bundler, FileMapping, PlatformInfo, PlatformSpecifier,
    Settings, SettingsBuilder,
};
pub use cli::Args;
pub use config::ProjectConfig;
pub use error::{CliError, PackError, ProjectConfigError, Result};
pub use metadata::{ArtifactMetadata, ArtifactMetadataItem};
