//! Project configuration file.
//!
//! Projects describe their platforms, dependency directories and file
//! mappings in `artifacts.toml` at the project root:
//!
//! ```toml
//! name = "myapp"
//! version = "1.2.0"
//!
//! [[platforms]]
//! name = "linux"
//! variables = { exe = "" }
//!
//! [[platforms]]
//! name = "windows"
//! variables = { exe = ".exe" }
//!
//! [artifact]
//! files = [
//!   "README.md",
//!   { pattern = "target/{platform}/myapp{exe}", path = "bin/" },
//! ]
//! ```

use crate::bundler::{
    ArtifactSettings, DependencyDir, PackageSettings, PlatformInfo, SettingsBuilder,
};
use crate::error::{ProjectConfigError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "artifacts.toml";

/// Parsed `artifacts.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,
    /// Project version
    pub version: String,
    /// Output directory, relative to the project root
    #[serde(default, alias = "distDir")]
    pub dist_dir: Option<PathBuf>,
    /// Declared platforms
    #[serde(default)]
    pub platforms: Vec<PlatformInfo>,
    /// Dependency directory table
    #[serde(default)]
    pub dependencies: BTreeMap<String, DependencyDir>,
    /// Artifact configuration
    #[serde(default)]
    pub artifact: ArtifactSettings,
}

impl ProjectConfig {
    /// Load and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ProjectConfigError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ProjectConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ProjectConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Seed a [`SettingsBuilder`] rooted at `project_root`.
    pub fn into_settings_builder(self, project_root: &Path) -> SettingsBuilder {
        let mut builder = SettingsBuilder::new()
            .project_root(project_root)
            .package_settings(PackageSettings {
                name: self.name,
                version: self.version,
            })
            .platforms(self.platforms)
            .dependencies(self.dependencies)
            .artifact(self.artifact);
        if let Some(dist_dir) = self.dist_dir {
            builder = builder.dist_dir(dist_dir);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::RawMapping;

    const SAMPLE: &str = r#"
name = "myapp"
version = "1.2.0"
dist_dir = "out"

[[platforms]]
name = "linux"
env = { CC = "gcc" }
variables = { exe = "", bits = 64 }

[[platforms]]
name = "windows"
variables = { exe = ".exe" }

[dependencies.openssl]
dir = "deps/openssl"
platforms = { linux = "deps/openssl-linux" }

[artifact]
id = "{name}-{version}-{platform}"
files = [
  "README.md",
  { pattern = "bin/*", path = "bin/", platforms = ["linux"] },
  { package = "openssl", pattern = "lib/*.so", baseDir = "x64" },
]
"#;

    #[test]
    fn test_parse_sample() {
        let config: ProjectConfig = toml::from_str(SAMPLE).expect("parse");
        assert_eq!(config.name, "myapp");
        assert_eq!(config.platforms.len(), 2);
        assert_eq!(config.platforms[0].env["CC"], "gcc");
        assert_eq!(config.platforms[0].variables["bits"], 64);
        assert_eq!(
            config.dependencies["openssl"].resolve("linux"),
            Some(Path::new("deps/openssl-linux"))
        );
        let files = config.artifact.files.as_ref().expect("files");
        assert_eq!(files[0], RawMapping::Path("README.md".into()));
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_into_settings() {
        let config: ProjectConfig = toml::from_str(SAMPLE).expect("parse");
        let settings = config
            .into_settings_builder(Path::new("/project"))
            .build()
            .expect("settings");
        assert_eq!(settings.dist_dir(), Path::new("/project/out"));
        assert_eq!(settings.mappings()[1].path, "bin/*");
        assert_eq!(settings.mappings()[2].base_dir.as_deref(), Some("x64"));
        assert_eq!(settings.artifact_id(), Some("{name}-{version}-{platform}"));
    }

    #[test]
    fn test_missing_file() {
        let err = ProjectConfig::load(Path::new("/nope/artifacts.toml")).unwrap_err();
        assert!(err.is_expected());
    }
}
