//! Preview command implementation.
//!
//! Lists what each archive would contain without writing anything.

use crate::cli::{Args, RuntimeConfig};
use crate::error::Result;

/// Execute a dry run
pub(super) async fn execute_preview(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    let bundler = super::create_bundler(args, config)?;
    let planned = bundler.plan().await?;

    if planned.is_empty() {
        config.warning_println("No platforms matched; nothing would be packaged");
        return Ok(0);
    }

    config.println("🔍 Dry run, nothing will be written");
    for artifact in &planned {
        config.println(&format!(
            "\n  {} [{}] → {}",
            artifact.id,
            artifact.platform,
            artifact.path.display()
        ));
        if artifact.files.is_empty() {
            config.indent("(no files matched)");
        }
        for file in &artifact.files {
            config.indent(&format!("{} → {}", file.source.display(), file.destination));
        }
    }
    config.println(&format!(
        "\nManifest would be written to {}",
        bundler.manifest_path().display()
    ));

    Ok(0)
}
