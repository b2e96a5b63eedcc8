//! Artifact generation.
//!
//! This module provides the [`Bundler`] orchestrator that turns validated
//! [`Settings`] into one zip archive per selected platform plus a JSON
//! manifest.
//!
//! # Overview
//!
//! For each packaging run the bundler:
//! 1. Lets every plugin enrich the manifest and picks up a default id plugin
//! 2. Resolves which platforms to package
//! 3. Per platform, renders the artifact id and opens a fresh archive
//! 4. Walks each applicable mapping and streams matches into the archive
//! 5. Finalizes the archive and records it in the manifest
//! 6. Writes `{dist_dir}/{name}.json`
//!
//! Platforms are processed in resolved order and mappings in declaration
//! order. Only one archive is open at a time.
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_artifacts::bundler::{
//!     ArtifactSettings, Bundler, PackageSettings, RawMapping, SettingsBuilder,
//! };
//!
//! # async fn example() -> kodegen_bundler_artifacts::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .project_root(".")
//!     .package_settings(PackageSettings {
//!         name: "myapp".into(),
//!         version: "1.0.0".into(),
//!     })
//!     .artifact(ArtifactSettings {
//!         files: Some(vec![RawMapping::Path("README.md".into())]),
//!         ..Default::default()
//!     })
//!     .build()?;
//!
//! let artifacts = Bundler::new(settings).generate().await?;
//! for artifact in artifacts {
//!     println!("{} -> {}", artifact.id, artifact.path.display());
//! }
//! # Ok(())
//! # }
//! ```

use crate::bundler::{
    BundledArtifact,
    archive::ZipSink,
    error::{ConfigError, Context, Result},
    glob::{GlobMatch, Pattern, collect_matches},
    mapping::FileMapping,
    path::{build_path, normalize_path},
    platform::{PlatformInfo, get_matched_platforms},
    plugin::ArtifactPlugin,
    settings::Settings,
    template::render,
    utils::fs::{create_dir_all, size_and_checksum, write_file},
};
use crate::metadata::{ArtifactMetadata, ArtifactMetadataItem};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Progress notifications emitted while generating artifacts.
#[derive(Debug)]
pub enum BundleEvent<'a> {
    /// A source file was added to an archive.
    FileAdded {
        /// Artifact id of the archive being written
        artifact: &'a str,
        /// Source file on disk
        source: &'a Path,
        /// Entry name inside the archive
        destination: &'a str,
    },
    /// An archive was finalized.
    ArtifactCreated(&'a BundledArtifact),
}

type Reporter = Box<dyn Fn(&BundleEvent<'_>) + Send + Sync>;

/// A file that would be packaged, as computed by [`Bundler::plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Source file on disk
    pub source: PathBuf,
    /// Entry name inside the archive
    pub destination: String,
}

/// Everything that would go into one platform's archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedArtifact {
    /// Rendered artifact id
    pub id: String,
    /// Platform name
    pub platform: String,
    /// Archive path that would be written
    pub path: PathBuf,
    /// Files in archive order
    pub files: Vec<PlannedFile>,
}

/// Main artifact orchestrator.
pub struct Bundler {
    settings: Settings,
    plugins: Vec<Box<dyn ArtifactPlugin>>,
    reporter: Option<Reporter>,
}

impl std::fmt::Debug for Bundler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundler")
            .field("settings", &self.settings)
            .field("plugins", &self.plugins)
            .field("reporter", &self.reporter.as_ref().map(|_| "<Reporter>"))
            .finish()
    }
}

impl Bundler {
    /// Creates a new bundler with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            plugins: Vec::new(),
            reporter: None,
        }
    }

    /// Registers a plugin. Plugins run in registration order.
    pub fn with_plugin(mut self, plugin: impl ArtifactPlugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Installs a progress callback.
    pub fn with_reporter<F>(mut self, reporter: F) -> Self
    where
        F: Fn(&BundleEvent<'_>) + Send + Sync + 'static,
    {
        self.reporter = Some(Box::new(reporter));
        self
    }

    /// Returns the settings this bundler was created with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Path the manifest is written to.
    pub fn manifest_path(&self) -> PathBuf {
        self.settings
            .dist_dir()
            .join(format!("{}.json", self.settings.name()))
    }

    /// Generates one archive per selected platform and writes the manifest.
    ///
    /// Any error aborts the run. An archive that failed midway is removed.
    pub async fn generate(&self) -> Result<Vec<BundledArtifact>> {
        let mut metadata = ArtifactMetadata::new(self.settings.name(), self.settings.version());
        let id_plugin = self.run_metadata_plugins(&mut metadata)?;

        let matched = get_matched_platforms(self.settings.specifier(), self.settings.platforms());
        if matched.platforms.is_empty() {
            log::warn!("No platforms matched the requested selection; writing an empty manifest");
        }

        let dist_dir = self.settings.dist_dir();
        create_dir_all(dist_dir).await?;

        let mut artifacts = Vec::with_capacity(matched.platforms.len());
        for platform in &matched.platforms {
            let data = self.template_data(platform);
            let id = self.artifact_id(platform, matched.specified, id_plugin, &data);

            let artifact = self
                .generate_artifact(&id, platform, matched.specified, &data)
                .await
                .with_context(|| format!("failed to generate artifact '{id}'"))?;

            metadata.artifacts.push(ArtifactMetadataItem {
                id: artifact.id.clone(),
                platform: artifact.platform.clone(),
                path: relative_to(&artifact.path, dist_dir)?,
            });
            self.report(&BundleEvent::ArtifactCreated(&artifact));
            artifacts.push(artifact);
        }

        let manifest_path = self.manifest_path();
        write_file(&manifest_path, metadata.to_json_pretty()?).await?;
        log::info!("Wrote manifest {}", manifest_path.display());

        Ok(artifacts)
    }

    /// Computes what [`generate`](Self::generate) would package without
    /// writing anything.
    pub async fn plan(&self) -> Result<Vec<PlannedArtifact>> {
        let mut metadata = ArtifactMetadata::new(self.settings.name(), self.settings.version());
        let id_plugin = self.run_metadata_plugins(&mut metadata)?;
        let matched = get_matched_platforms(self.settings.specifier(), self.settings.platforms());

        let mut planned = Vec::with_capacity(matched.platforms.len());
        for platform in &matched.platforms {
            let data = self.template_data(platform);
            let id = self.artifact_id(platform, matched.specified, id_plugin, &data);

            let mut files = Vec::new();
            for mapping in self.active_mappings(platform) {
                files.extend(self.resolve_mapping(mapping, platform, &data).await?);
            }
            planned.push(PlannedArtifact {
                path: self.archive_path(&id),
                id,
                platform: platform.name.clone(),
                files,
            });
        }
        Ok(planned)
    }

    /// Runs every plugin's metadata hook and returns the plugin that supplies
    /// default artifact ids. The last one registered wins.
    fn run_metadata_plugins(
        &self,
        metadata: &mut ArtifactMetadata,
    ) -> Result<Option<&dyn ArtifactPlugin>> {
        let mut id_plugin = None;
        for plugin in &self.plugins {
            plugin
                .process_artifact_metadata(metadata)
                .with_context(|| format!("plugin '{}' failed to process metadata", plugin.name()))?;
            if plugin.provides_default_artifact_id() {
                id_plugin = Some(plugin.as_ref());
            }
        }
        Ok(id_plugin)
    }

    async fn generate_artifact(
        &self,
        id: &str,
        platform: &PlatformInfo,
        specified: bool,
        data: &Value,
    ) -> Result<BundledArtifact> {
        let mut sink = ZipSink::create(&self.archive_path(id)).await?;

        if let Err(e) = self.fill_archive(&mut sink, id, platform, data).await {
            sink.abort().await;
            return Err(e);
        }

        let files = sink.len();
        let path = sink.finish().await?;
        let (size, checksum) = size_and_checksum(&path).await?;
        log::info!(
            "Created {} ({} files, {} bytes)",
            path.display(),
            files,
            size
        );

        Ok(BundledArtifact {
            id: id.to_string(),
            platform: specified.then(|| platform.name.clone()),
            path,
            files,
            size,
            checksum,
        })
    }

    async fn fill_archive(
        &self,
        sink: &mut ZipSink,
        id: &str,
        platform: &PlatformInfo,
        data: &Value,
    ) -> Result<()> {
        for mapping in self.active_mappings(platform) {
            for file in self.resolve_mapping(mapping, platform, data).await? {
                if sink.append_file(&file.source, &file.destination).await? {
                    self.report(&BundleEvent::FileAdded {
                        artifact: id,
                        source: &file.source,
                        destination: &file.destination,
                    });
                }
            }
        }
        Ok(())
    }

    fn active_mappings<'a>(
        &'a self,
        platform: &'a PlatformInfo,
    ) -> impl Iterator<Item = &'a FileMapping> + 'a {
        self.settings
            .mappings()
            .iter()
            .filter(move |m| m.applies_to(&platform.name))
    }

    /// Matches one mapping for one platform and computes archive entry names.
    async fn resolve_mapping(
        &self,
        mapping: &FileMapping,
        platform: &PlatformInfo,
        data: &Value,
    ) -> Result<Vec<PlannedFile>> {
        let base_dir = self.resolve_base_dir(mapping, platform, data)?;
        let pattern = Pattern::new(&normalize_path(&render(&mapping.pattern, data)));
        let destination = render(&mapping.path, data);

        log::debug!(
            "Matching '{}' under {} for {}",
            pattern.as_str(),
            base_dir.display(),
            platform.name
        );
        let dist_dir = self.settings.dist_dir().to_path_buf();
        let matches: Vec<GlobMatch> = tokio::task::spawn_blocking(move || {
            collect_matches(&base_dir, &pattern, Some(&dist_dir))
        })
        .await??;

        Ok(matches
            .into_iter()
            .map(|m| PlannedFile {
                destination: build_path(&destination, &m.captures),
                source: m.source,
            })
            .collect())
    }

    /// Base directory for a mapping.
    ///
    /// Package mappings start at the dependency's platform directory (or its
    /// generic directory); others start at the project root plus the project
    /// level override. The mapping's own base directory is applied last.
    fn resolve_base_dir(
        &self,
        mapping: &FileMapping,
        platform: &PlatformInfo,
        data: &Value,
    ) -> Result<PathBuf> {
        let root = self.settings.project_root();
        let mut base = match &mapping.package {
            Some(package) => {
                let dir = self
                    .settings
                    .dependencies()
                    .get(package)
                    .and_then(|dep| dep.resolve(&platform.name))
                    .ok_or_else(|| ConfigError::UnresolvedPackage {
                        package: package.clone(),
                        platform: platform.name.clone(),
                    })?;
                root.join(dir)
            }
            None => match self.settings.base_dir() {
                Some(dir) => root.join(render(dir, data)),
                None => root.to_path_buf(),
            },
        };
        if let Some(dir) = &mapping.base_dir {
            base.push(render(dir, data));
        }
        Ok(base)
    }

    /// Artifact id: configured template, else the plugin default, else
    /// `{name}-{platform}` when platforms were selected and `{name}` otherwise.
    fn artifact_id(
        &self,
        platform: &PlatformInfo,
        specified: bool,
        id_plugin: Option<&dyn ArtifactPlugin>,
        data: &Value,
    ) -> String {
        let template = self
            .settings
            .artifact_id()
            .map(str::to_string)
            .or_else(|| {
                id_plugin.and_then(|p| {
                    p.default_artifact_id(specified.then_some(platform.name.as_str()))
                })
            })
            .unwrap_or_else(|| {
                if specified {
                    "{name}-{platform}".to_string()
                } else {
                    "{name}".to_string()
                }
            });
        render(&template, data)
    }

    /// Render data for one platform: project fields, platform name, env, then
    /// platform variables (which may shadow the others).
    fn template_data(&self, platform: &PlatformInfo) -> Value {
        let mut data = Map::new();
        data.insert("name".into(), Value::from(self.settings.name()));
        data.insert("version".into(), Value::from(self.settings.version()));
        data.insert("platform".into(), Value::from(platform.name.as_str()));
        data.insert(
            "env".into(),
            Value::Object(
                platform
                    .env
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
                    .collect(),
            ),
        );
        for (key, value) in &platform.variables {
            data.insert(key.clone(), value.clone());
        }
        Value::Object(data)
    }

    fn archive_path(&self, id: &str) -> PathBuf {
        self.settings.dist_dir().join(format!("{id}.zip"))
    }

    fn report(&self, event: &BundleEvent<'_>) {
        if let Some(reporter) = &self.reporter {
            reporter(event);
        }
    }
}

/// `/`-separated form of `path` relative to `base`.
fn relative_to(path: &Path, base: &Path) -> Result<String> {
    Ok(path
        .strip_prefix(base)?
        .to_string_lossy()
        .replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{ArtifactSettings, PackageSettings, RawMapping, SettingsBuilder};
    use crate::bundler::platform::PlatformSpecifier;

    struct IdPlugin(&'static str);

    impl ArtifactPlugin for IdPlugin {
        fn name(&self) -> &str {
            "id"
        }

        fn provides_default_artifact_id(&self) -> bool {
            true
        }

        fn default_artifact_id(&self, platform: Option<&str>) -> Option<String> {
            Some(match platform {
                Some(_) => format!("{}-{{platform}}", self.0),
                None => self.0.to_string(),
            })
        }
    }

    fn bundler(id: Option<&str>, specifier: PlatformSpecifier) -> Bundler {
        let mut linux = PlatformInfo::named("linux");
        linux.variables.insert("arch".into(), Value::from("x64"));
        let settings = SettingsBuilder::new()
            .project_root("/project")
            .package_settings(PackageSettings {
                name: "app".into(),
                version: "2.0.0".into(),
            })
            .platforms(vec![linux, PlatformInfo::named("macos")])
            .specifier(specifier)
            .artifact(ArtifactSettings {
                id: id.map(str::to_string),
                files: Some(vec![RawMapping::Path("README.md".into())]),
                ..Default::default()
            })
            .build()
            .expect("valid settings");
        Bundler::new(settings)
    }

    #[test]
    fn test_artifact_id_defaults() {
        let b = bundler(None, PlatformSpecifier::default());
        let linux = &b.settings().platforms()[0];
        let data = b.template_data(linux);
        assert_eq!(b.artifact_id(linux, false, None, &data), "app");
        assert_eq!(b.artifact_id(linux, true, None, &data), "app-linux");
    }

    #[test]
    fn test_artifact_id_priority() {
        let plugin = IdPlugin("{name}-plugin");
        let plugin: &dyn ArtifactPlugin = &plugin;
        let b = bundler(None, PlatformSpecifier::default());
        let linux = &b.settings().platforms()[0];
        let data = b.template_data(linux);
        assert_eq!(b.artifact_id(linux, true, Some(plugin), &data), "app-plugin-linux");
        assert_eq!(b.artifact_id(linux, false, Some(plugin), &data), "app-plugin");

        let b = bundler(Some("{name}-{version}-{arch}"), PlatformSpecifier::default());
        let linux = &b.settings().platforms()[0];
        let data = b.template_data(linux);
        assert_eq!(b.artifact_id(linux, true, Some(plugin), &data), "app-2.0.0-x64");
    }

    #[test]
    fn test_unresolved_package_is_config_error() {
        let b = bundler(None, PlatformSpecifier::default());
        let mapping = FileMapping {
            package: Some("openssl".into()),
            base_dir: None,
            pattern: "lib/*.so".into(),
            path: "lib/*.so".into(),
            platform_set: None,
        };
        let linux = &b.settings().platforms()[0];
        let err = b
            .resolve_base_dir(&mapping, linux, &b.template_data(linux))
            .unwrap_err();
        assert!(err.is_expected());
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(
            relative_to(Path::new("/p/dist/app.zip"), Path::new("/p/dist")).unwrap(),
            "app.zip"
        );
        assert!(relative_to(Path::new("/elsewhere/app.zip"), Path::new("/p/dist")).is_err());
    }
}
