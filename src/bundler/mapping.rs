//! File mapping rules.
//!
//! A mapping relates a source glob pattern to a destination path template.
//! Configuration accepts either a bare string (the same path on both sides)
//! or a descriptor table:
//!
//! ```toml
//! files = [
//!   "README.md",
//!   { pattern = "target/{profile}/*", path = "bin/", platforms = ["linux", "macos"] },
//!   { package = "openssl", pattern = "lib/*.so", path = "lib/" },
//! ]
//! ```

use crate::bundler::error::{ConfigError, Result};
use crate::bundler::glob::Pattern;
use crate::bundler::path::{count_template_tokens, normalize_path};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const GLOBSTAR: &str = "**";

/// A mapping entry as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawMapping {
    /// Same relative path for source and destination.
    Path(String),
    /// Full descriptor.
    Descriptor(MappingDescriptor),
}

/// Descriptor form of a mapping entry. Every field is optional at parse time
/// so validation can report what is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingDescriptor {
    /// Dependency package whose directory is the base for `pattern`
    #[serde(default)]
    pub package: Option<String>,
    /// Base directory override, relative to the project (or package) root
    #[serde(default, alias = "baseDir")]
    pub base_dir: Option<String>,
    /// Source glob pattern
    #[serde(default)]
    pub pattern: Option<String>,
    /// Destination template; defaults to `pattern`
    #[serde(default)]
    pub path: Option<String>,
    /// Single platform restriction
    #[serde(default)]
    pub platform: Option<String>,
    /// Platform set restriction
    #[serde(default)]
    pub platforms: Option<Vec<String>>,
}

/// A validated mapping. Immutable once normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMapping {
    /// Dependency package providing the base directory
    pub package: Option<String>,
    /// Base directory override
    pub base_dir: Option<String>,
    /// Source glob pattern; never ends in a separator
    pub pattern: String,
    /// Destination template
    pub path: String,
    /// Platforms this mapping applies to; `None` means all
    pub platform_set: Option<BTreeSet<String>>,
}

impl FileMapping {
    /// Whether this mapping applies when packaging `platform`.
    pub fn applies_to(&self, platform: &str) -> bool {
        self.platform_set
            .as_ref()
            .is_none_or(|set| set.contains(platform))
    }
}

/// Normalize the whole mapping list, failing on the first invalid entry.
pub fn normalize_all(entries: &[RawMapping]) -> Result<Vec<FileMapping>> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| normalize(index, entry))
        .collect()
}

/// Normalize one configuration entry into a [`FileMapping`].
///
/// `index` is the entry's position, used in error messages.
pub fn normalize(index: usize, entry: &RawMapping) -> Result<FileMapping> {
    let mapping = match entry {
        RawMapping::Path(path) => {
            let path = normalize_path(path);
            validate_pattern(index, &path)?;
            FileMapping {
                package: None,
                base_dir: None,
                pattern: path.clone(),
                path,
                platform_set: None,
            }
        }
        RawMapping::Descriptor(descriptor) => normalize_descriptor(index, descriptor)?,
    };
    warn_on_unfilled_wildcards(&mapping);
    Ok(mapping)
}

fn normalize_descriptor(index: usize, descriptor: &MappingDescriptor) -> Result<FileMapping> {
    let pattern = descriptor
        .pattern
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .ok_or(ConfigError::MissingPattern { index })?;
    let pattern = normalize_path(pattern);
    validate_pattern(index, &pattern)?;

    let mut path = normalize_path(descriptor.path.as_deref().unwrap_or(&pattern));
    if path.ends_with('/') {
        let file_name = last_component(&pattern);
        let dir_name = last_component(path.trim_end_matches('/'));
        if file_name == GLOBSTAR && dir_name == GLOBSTAR {
            return Err(ConfigError::AmbiguousGlobstar {
                pattern: pattern.clone(),
                path,
            }
            .into());
        }
        path.push_str(file_name);
    }
    if escapes_root(&path) {
        return Err(ConfigError::InvalidEntry {
            index,
            reason: format!("destination '{path}' escapes the archive root"),
        }
        .into());
    }

    let mut platform_set: Option<BTreeSet<String>> = None;
    if let Some(platform) = &descriptor.platform {
        platform_set.get_or_insert_with(BTreeSet::new).insert(platform.clone());
    }
    if let Some(platforms) = &descriptor.platforms {
        platform_set
            .get_or_insert_with(BTreeSet::new)
            .extend(platforms.iter().cloned());
    }

    Ok(FileMapping {
        package: descriptor.package.clone(),
        base_dir: descriptor.base_dir.clone(),
        pattern,
        path,
        platform_set,
    })
}

fn validate_pattern(index: usize, pattern: &str) -> Result<()> {
    if pattern.ends_with('/') {
        return Err(ConfigError::DirectoryPattern {
            pattern: pattern.to_string(),
        }
        .into());
    }
    // The walker only descends, so these could never match.
    if escapes_root(pattern) {
        return Err(ConfigError::InvalidEntry {
            index,
            reason: format!("pattern '{pattern}' escapes its base directory; use base_dir instead"),
        }
        .into());
    }
    Ok(())
}

/// Whether a normalized path climbs above its root.
pub(crate) fn escapes_root(path: &str) -> bool {
    path.split('/').any(|segment| segment == "..")
}

fn last_component(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Destination tokens with no capture to fill them are copied literally into
/// the archive path, which is almost never intended.
fn warn_on_unfilled_wildcards(mapping: &FileMapping) {
    let (source_runs, source_stars) = Pattern::new(&mapping.pattern).wildcard_counts();
    let (dest_runs, dest_stars) = count_template_tokens(&mapping.path);
    if dest_runs > source_runs || dest_stars > source_stars {
        log::warn!(
            "Destination '{}' has more wildcards than pattern '{}'; extra wildcards stay literal",
            mapping.path,
            mapping.pattern
        );
    }
}
