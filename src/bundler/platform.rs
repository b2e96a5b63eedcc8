//! Target platforms and platform selection.
//!
//! A project declares the platforms it can be packaged for. Which of them are
//! packaged in a run is decided by a [`PlatformSpecifier`] built from the
//! command line; with nothing specified, only the host platform is packaged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// A named target environment with its own variable bindings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformInfo {
    /// Platform name (e.g. "linux", "macos", "windows")
    pub name: String,
    /// Environment bindings exposed to templates as `{env.KEY}`
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Template variables exposed at the top level of the render data
    #[serde(default)]
    pub variables: Map<String, Value>,
}

impl PlatformInfo {
    /// Platform with no env or variables.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The platform the current process runs on.
    pub fn host() -> Self {
        Self::named(host_platform())
    }
}

/// Host platform identifier.
///
/// Uses runtime OS detection via `std::env::consts::OS`.
pub fn host_platform() -> &'static str {
    std::env::consts::OS
}

/// Which platforms to package, as requested by the caller.
#[derive(Debug, Clone, Default)]
pub struct PlatformSpecifier {
    /// Single platform name
    pub platform: Option<String>,
    /// Set of platform names; takes precedence over `platform`
    pub platforms: Vec<String>,
    /// Package every declared platform
    pub multiplatform: bool,
}

/// Outcome of platform resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedPlatforms {
    /// Platforms to package, in declaration order
    pub platforms: Vec<PlatformInfo>,
    /// Whether the caller selected platforms explicitly
    pub specified: bool,
}

/// Resolve `specifier` against the declared `platforms`.
///
/// Precedence is `platforms`, then `platform`, then `multiplatform`. Filtering
/// keeps the order of the declared list. Without any selection the result is a
/// single host platform and `specified` is false.
pub fn get_matched_platforms(
    specifier: &PlatformSpecifier,
    platforms: &[PlatformInfo],
) -> MatchedPlatforms {
    let wanted: Option<BTreeSet<&str>> = if !specifier.platforms.is_empty() {
        Some(specifier.platforms.iter().map(String::as_str).collect())
    } else {
        specifier
            .platform
            .as_deref()
            .map(|name| BTreeSet::from([name]))
    };

    if let Some(wanted) = wanted {
        let matched = platforms
            .iter()
            .filter(|p| wanted.contains(p.name.as_str()))
            .cloned()
            .collect::<Vec<_>>();
        if matched.len() < wanted.len() {
            log::warn!(
                "Requested platform(s) not declared by project: {:?}",
                wanted
                    .iter()
                    .filter(|w| !platforms.iter().any(|p| p.name == **w))
                    .collect::<Vec<_>>()
            );
        }
        return MatchedPlatforms {
            platforms: matched,
            specified: true,
        };
    }

    if specifier.multiplatform {
        return MatchedPlatforms {
            platforms: platforms.to_vec(),
            specified: true,
        };
    }

    MatchedPlatforms {
        platforms: vec![PlatformInfo::host()],
        specified: false,
    }
}
