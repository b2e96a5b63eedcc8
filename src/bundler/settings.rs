//! Configuration structures for artifact packaging.
//!
//! [`Settings`] is the plain data the engine consumes: project metadata, the
//! declared platforms, the dependency directory table, and the normalized
//! file mappings. It is assembled with [`SettingsBuilder`], which validates
//! the mapping list up front so that a bad configuration aborts before any
//! archive is written.

use crate::bundler::error::{ConfigError, Result};
use crate::bundler::mapping::{FileMapping, RawMapping, normalize_all};
use crate::bundler::platform::{PlatformInfo, PlatformSpecifier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default output directory, relative to the project root.
pub const DEFAULT_DIST_DIR: &str = "dist";

/// Project metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSettings {
    /// Project name; also the manifest file stem
    pub name: String,
    /// Project version recorded in the manifest
    pub version: String,
}

/// Directories of a dependency package.
///
/// ```toml
/// [dependencies.openssl]
/// dir = "deps/openssl"
/// platforms = { linux = "deps/openssl-linux" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDir {
    /// Directory used when no platform-specific one is declared
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Platform-specific directories
    #[serde(default)]
    pub platforms: BTreeMap<String, PathBuf>,
}

impl DependencyDir {
    /// Platform-specific directory, falling back to the generic one.
    pub fn resolve(&self, platform: &str) -> Option<&Path> {
        self.platforms
            .get(platform)
            .or(self.dir.as_ref())
            .map(PathBuf::as_path)
    }
}

/// Artifact-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactSettings {
    /// Explicit artifact id template
    #[serde(default)]
    pub id: Option<String>,
    /// Base directory for every mapping, relative to the project root
    #[serde(default, alias = "baseDir")]
    pub base_dir: Option<String>,
    /// Raw file mapping entries
    #[serde(default)]
    pub files: Option<Vec<RawMapping>>,
}

/// Validated packaging configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    package: PackageSettings,
    project_root: PathBuf,
    dist_dir: PathBuf,
    platforms: Vec<PlatformInfo>,
    specifier: PlatformSpecifier,
    dependencies: BTreeMap<String, DependencyDir>,
    artifact_id: Option<String>,
    base_dir: Option<String>,
    mappings: Vec<FileMapping>,
}

impl Settings {
    /// Returns the project name.
    pub fn name(&self) -> &str {
        &self.package.name
    }

    /// Returns the project version.
    pub fn version(&self) -> &str {
        &self.package.version
    }

    /// Returns the project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Returns the directory archives and the manifest are written to.
    pub fn dist_dir(&self) -> &Path {
        &self.dist_dir
    }

    /// Returns the platforms declared by the project.
    pub fn platforms(&self) -> &[PlatformInfo] {
        &self.platforms
    }

    /// Returns the requested platform selection.
    pub fn specifier(&self) -> &PlatformSpecifier {
        &self.specifier
    }

    /// Returns the dependency directory table.
    pub fn dependencies(&self) -> &BTreeMap<String, DependencyDir> {
        &self.dependencies
    }

    /// Returns the explicit artifact id template, if any.
    pub fn artifact_id(&self) -> Option<&str> {
        self.artifact_id.as_deref()
    }

    /// Returns the project-level base directory override, if any.
    pub fn base_dir(&self) -> Option<&str> {
        self.base_dir.as_deref()
    }

    /// Returns the normalized mappings in declaration order.
    pub fn mappings(&self) -> &[FileMapping] {
        &self.mappings
    }
}

/// Builder for [`Settings`].
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    package_settings: Option<PackageSettings>,
    project_root: Option<PathBuf>,
    dist_dir: Option<PathBuf>,
    platforms: Vec<PlatformInfo>,
    specifier: PlatformSpecifier,
    dependencies: BTreeMap<String, DependencyDir>,
    artifact: ArtifactSettings,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets project metadata.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn package_settings(mut self, settings: PackageSettings) -> Self {
        self.package_settings = Some(settings);
        self
    }

    /// Sets the project root that relative paths resolve against.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn project_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the output directory. Relative paths resolve against the project root.
    ///
    /// Default: `dist`
    pub fn dist_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dist_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the declared platforms.
    pub fn platforms(mut self, platforms: Vec<PlatformInfo>) -> Self {
        self.platforms = platforms;
        self
    }

    /// Sets which platforms to package.
    ///
    /// Default: host platform only
    pub fn specifier(mut self, specifier: PlatformSpecifier) -> Self {
        self.specifier = specifier;
        self
    }

    /// Sets the dependency directory table.
    pub fn dependencies(mut self, dependencies: BTreeMap<String, DependencyDir>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Sets the artifact configuration (id template, base dir, file mappings).
    pub fn artifact(mut self, artifact: ArtifactSettings) -> Self {
        self.artifact = artifact;
        self
    }

    /// Overrides the artifact id template.
    pub fn artifact_id(mut self, id: impl Into<String>) -> Self {
        self.artifact.id = Some(id.into());
        self
    }

    /// Builds the settings, normalizing every file mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if `package_settings` or `project_root` is missing,
    /// and a [`ConfigError`] if the mapping list is absent or invalid.
    pub fn build(self) -> Result<Settings> {
        use crate::bundler::error::Context;

        let project_root = self.project_root.context("project_root is required")?;
        let package = self.package_settings.context("package_settings is required")?;
        if package.name.trim().is_empty() {
            crate::bail!("package name must not be empty");
        }

        let files = self.artifact.files.ok_or(ConfigError::MissingMappings)?;
        let mappings = normalize_all(&files)?;

        let dist_dir = project_root.join(
            self.dist_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR)),
        );

        Ok(Settings {
            package,
            project_root,
            dist_dir,
            platforms: self.platforms,
            specifier: self.specifier,
            dependencies: self.dependencies,
            artifact_id: self.artifact.id,
            base_dir: self.artifact.base_dir,
            mappings,
        })
    }
}
