//! Command line argument parsing and validation.
//!
//! The tool is designed to "just work": run it from a project directory
//! containing `artifacts.toml` and it packages the host platform.

use crate::bundler::PlatformSpecifier;
use clap::Parser;
use std::path::PathBuf;

/// Package a project into per-platform zip archives
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "kodegen_bundler_artifacts",
    version,
    about = "Package a project into per-platform zip archives",
    long_about = "Expand the file mappings in artifacts.toml for each selected platform, \
write one zip per platform into the dist directory, and describe them in {name}.json.

Usage:
  kodegen_bundler_artifacts
  kodegen_bundler_artifacts --multiplatform
  kodegen_bundler_artifacts --platforms linux,macos --dist-dir out
  kodegen_bundler_artifacts --project ../app --dry-run"
)]
pub struct Args {
    /// Project root directory
    #[arg(
        long,
        short = 'C',
        value_name = "DIR",
        default_value = ".",
        env = "KODEGEN_ARTIFACTS_PROJECT"
    )]
    pub project: PathBuf,

    /// Configuration file (default: <PROJECT>/artifacts.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Package a single declared platform
    #[arg(long, value_name = "NAME")]
    pub platform: Option<String>,

    /// Package these declared platforms (comma separated)
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub platforms: Vec<String>,

    /// Package every declared platform
    #[arg(long)]
    pub multiplatform: bool,

    /// Output directory, relative to the project root
    #[arg(long, value_name = "DIR")]
    pub dist_dir: Option<PathBuf>,

    /// Artifact id template, e.g. "{name}-{version}-{platform}"
    #[arg(long, value_name = "TEMPLATE")]
    pub artifact_id: Option<String>,

    /// Show what would be packaged without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Show debug-level progress
    #[arg(long, short, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show errors
    #[arg(long, short)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.platforms.iter().any(|p| p.trim().is_empty()) {
            return Err("--platforms must not contain empty names".to_string());
        }
        if let Some(id) = &self.artifact_id
            && id.trim().is_empty()
        {
            return Err("--artifact-id must not be empty".to_string());
        }
        Ok(())
    }

    /// Platform selection requested on the command line.
    pub fn specifier(&self) -> PlatformSpecifier {
        PlatformSpecifier {
            platform: self.platform.clone(),
            platforms: self.platforms.clone(),
            multiplatform: self.multiplatform,
        }
    }

    /// Configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.project.join(crate::config::CONFIG_FILE_NAME))
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            output: super::OutputManager::new(verbose, quiet),
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print verbose message (only with --verbose)
    pub fn verbose_println(&self, message: &str) {
        let _ = self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.verbose, args.quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_platform_flags() {
        let args = Args::try_parse_from([
            "kodegen_bundler_artifacts",
            "--platforms",
            "linux,macos",
            "--dist-dir",
            "out",
        ])
        .expect("parse");
        assert_eq!(args.platforms, vec!["linux", "macos"]);
        assert_eq!(args.dist_dir, Some(PathBuf::from("out")));
        assert!(args.validate().is_ok());

        let spec = args.specifier();
        assert_eq!(spec.platforms, vec!["linux", "macos"]);
        assert!(!spec.multiplatform);
    }

    #[test]
    fn test_config_path_default() {
        let args = Args::try_parse_from(["kodegen_bundler_artifacts", "-C", "/work/app"])
            .expect("parse");
        assert_eq!(args.config_path(), PathBuf::from("/work/app/artifacts.toml"));
    }

    #[test]
    fn test_empty_artifact_id_rejected() {
        let args = Args::try_parse_from(["kodegen_bundler_artifacts", "--artifact-id", " "])
            .expect("parse");
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["kodegen_bundler_artifacts", "-v", "-q"]).is_err());
    }
}
