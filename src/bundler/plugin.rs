//! Plugin hooks into artifact generation.
//!
//! Plugins are supplied by the embedding application. Both hooks are optional;
//! the default implementations do nothing.

use crate::bundler::Result;
use crate::metadata::ArtifactMetadata;

/// Extension point for artifact generation.
pub trait ArtifactPlugin: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str;

    /// Inspect or extend the manifest before any archive is produced.
    fn process_artifact_metadata(&self, _metadata: &mut ArtifactMetadata) -> Result<()> {
        Ok(())
    }

    /// Whether this plugin supplies [`default_artifact_id`](Self::default_artifact_id).
    fn provides_default_artifact_id(&self) -> bool {
        false
    }

    /// Artifact id template used when none is configured.
    ///
    /// `platform` is the platform name when platforms were selected explicitly.
    /// The result is rendered like any other id template.
    fn default_artifact_id(&self, _platform: Option<&str>) -> Option<String> {
        None
    }
}

impl std::fmt::Debug for dyn ArtifactPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactPlugin").field("name", &self.name()).finish()
    }
}
