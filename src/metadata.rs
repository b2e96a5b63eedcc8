//! Artifact manifest written alongside the produced archives.
//!
//! The manifest is created once per packaging run, handed to plugins for
//! enrichment, extended with one item per artifact, then serialized once as
//! `{dist_dir}/{name}.json`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One produced archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadataItem {
    /// Rendered artifact id (archive file stem)
    pub id: String,
    /// Platform name, present when platforms were selected explicitly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Archive path relative to the dist directory
    pub path: String,
}

/// Manifest describing every artifact of one project version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Project name
    pub name: String,
    /// Project version
    pub version: String,
    /// Artifacts in the order they were produced
    #[serde(default)]
    pub artifacts: Vec<ArtifactMetadataItem>,
    /// Fields injected by plugins
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ArtifactMetadata {
    /// Empty manifest for `name`/`version`.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            artifacts: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Set a plugin-provided top-level field.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.extra.insert(key.into(), value);
    }

    /// Render as indented JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_manifest_shape() {
        let mut metadata = ArtifactMetadata::new("app", "1.0.0");
        metadata.insert("channel", json!("beta"));
        metadata.artifacts.push(ArtifactMetadataItem {
            id: "app-linux".into(),
            platform: Some("linux".into()),
            path: "app-linux.zip".into(),
        });
        metadata.artifacts.push(ArtifactMetadataItem {
            id: "app".into(),
            platform: None,
            path: "app.zip".into(),
        });

        let value = serde_json::to_value(&metadata).expect("serialize");
        assert_eq!(
            value,
            json!({
                "name": "app",
                "version": "1.0.0",
                "channel": "beta",
                "artifacts": [
                    { "id": "app-linux", "platform": "linux", "path": "app-linux.zip" },
                    { "id": "app", "path": "app.zip" }
                ]
            })
        );
    }
}
