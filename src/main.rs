//! kodegen_bundler_artifacts - package a project into per-platform zip archives.
//!
//! Reads `artifacts.toml`, writes `{dist}/{id}.zip` for each selected platform
//! and a `{dist}/{name}.json` manifest.

use kodegen_bundler_artifacts::cli;
use kodegen_bundler_artifacts::cli::OutputManager;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            // Create output manager for error display (never quiet for fatal errors)
            let output = OutputManager::new(false, false);
            output.error(&format!("Fatal error: {e}"));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                let _ = output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    let _ = output.indent(&suggestion);
                }
            }

            process::exit(1);
        }
    }
}
