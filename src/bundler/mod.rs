//! Multi-platform artifact packaging.
//!
//! This module turns declarative file mappings into one zip archive per
//! target platform, plus a JSON manifest describing every archive.
//!
//! # Pipeline
//!
//! | Stage | Module | Role |
//! |-------|--------|------|
//! | Mapping normalization | [`mapping`] | raw config entries to [`FileMapping`] |
//! | Platform selection | [`platform`] | specifier + declared list to active platforms |
//! | Template rendering | [`template`] | `{a.b}` placeholders in ids, patterns, paths |
//! | Glob walking | [`glob`] | files under a base dir plus wildcard [`Capture`]s |
//! | Path reconstruction | [`path`] | captures spliced into the destination template |
//! | Assembly | [`Bundler`] | archives, progress, manifest |
//!
//! # Glob dialect
//!
//! Only literal segments, `*` (within one segment) and `**` (any number of
//! whole segments) are supported:
//!
//! ```
//! use kodegen_bundler_artifacts::bundler::{Capture, Pattern, build_path};
//!
//! let pattern = Pattern::new("src/**/*.js");
//! let captures = pattern.captures(&["src", "a", "b", "c.js"]).unwrap();
//! assert_eq!(
//!     captures,
//!     vec![
//!         Capture::SegmentRun(vec!["a".into(), "b".into()]),
//!         Capture::Segment("c".into()),
//!     ]
//! );
//! assert_eq!(build_path("lib/**/*.js", &captures), "lib/a/b/c.js");
//! ```

#![warn(missing_docs)]

mod archive;
mod builder;
mod error;
pub mod glob;
pub mod mapping;
pub mod path;
pub mod platform;
mod plugin;
mod settings;
pub mod template;
mod utils;

// Public re-exports
pub use archive::ZipSink;
pub use builder::{BundleEvent, Bundler, PlannedArtifact, PlannedFile};
pub use error::{ConfigError, Context, Error, ErrorExt, Result};
pub use glob::{Capture, GlobMatch, Pattern};
pub use mapping::{FileMapping, MappingDescriptor, RawMapping};
pub use path::{build_path, normalize_path};
pub use platform::{MatchedPlatforms, PlatformInfo, PlatformSpecifier, get_matched_platforms};
pub use plugin::ArtifactPlugin;
pub use settings::{
    ArtifactSettings, DEFAULT_DIST_DIR, DependencyDir, PackageSettings, Settings, SettingsBuilder,
};
pub use template::render;

/// A generated archive.
///
/// Returned by [`Bundler::generate`] for reporting. The manifest records the
/// id, platform and path; size and checksum are informational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledArtifact {
    /// Rendered artifact id (archive file stem).
    pub id: String,

    /// Platform name, when platforms were selected explicitly.
    pub platform: Option<String>,

    /// Path of the archive on disk.
    pub path: std::path::PathBuf,

    /// Number of entries written to the archive.
    pub files: usize,

    /// Archive size in bytes.
    pub size: u64,

    /// SHA-256 checksum of the archive, hex encoded.
    pub checksum: String,
}
