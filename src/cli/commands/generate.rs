//! Generate command implementation.
//!
//! Writes one archive per selected platform and the JSON manifest.

use crate::bundler::BundledArtifact;
use crate::cli::{Args, RuntimeConfig};
use crate::error::Result;

/// Execute a packaging run
pub(super) async fn execute_generate(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    let bundler = super::create_bundler(args, config)?;

    config.println(&format!(
        "📦 Packaging {} {}...",
        bundler.settings().name(),
        bundler.settings().version()
    ));
    let artifacts = bundler.generate().await?;

    print_summary(&artifacts, config);
    config.verbose_println(&format!(
        "Manifest written to {}",
        bundler.manifest_path().display()
    ));

    Ok(0)
}

fn print_summary(artifacts: &[BundledArtifact], config: &RuntimeConfig) {
    if artifacts.is_empty() {
        config.warning_println("No artifacts were created");
        return;
    }

    config.success_println(&format!("Created {} artifact(s)", artifacts.len()));

    for artifact in artifacts {
        let size_mb = artifact.size as f64 / 1_048_576.0;
        match &artifact.platform {
            Some(platform) => config.println(&format!("\n  {} [{platform}]:", artifact.id)),
            None => config.println(&format!("\n  {}:", artifact.id)),
        }
        config.println(&format!(
            "    📦 {} ({:.2} MB, {} files)",
            artifact.path.display(),
            size_mb,
            artifact.files
        ));
        config.println(&format!("    🔐 SHA256: {}", artifact.checksum));
    }
}
