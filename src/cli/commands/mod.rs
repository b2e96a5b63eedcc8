//! Command execution.
//!
//! A run either generates the archives or, with `--dry-run`, previews what
//! would go into them.

mod generate;
mod preview;

use crate::bundler::{BundleEvent, Bundler};
use crate::cli::{Args, RuntimeConfig};
use crate::config::ProjectConfig;
use crate::error::{CliError, Result};
use path_absolutize::Absolutize;

use generate::execute_generate;
use preview::execute_preview;

/// Execute a packaging run based on parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    let config = RuntimeConfig::from(&args);

    let result = match args.validate() {
        Err(reason) => Err(CliError::InvalidArguments { reason }.into()),
        Ok(()) if args.dry_run => execute_preview(&args, &config).await,
        Ok(()) => execute_generate(&args, &config).await,
    };

    match result {
        Ok(exit_code) => Ok(exit_code),
        // Unexpected failures go up to main for the fatal error report
        Err(e) if !e.is_expected() => Err(e),
        Err(e) => {
            config.error_println(&e.to_string());

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                config.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    config.println(&format!("  • {suggestion}"));
                }
            }

            Ok(1)
        }
    }
}

/// Load the project configuration and apply command line overrides.
fn create_bundler(args: &Args, config: &RuntimeConfig) -> Result<Bundler> {
    let project_root = args.project.absolutize()?.into_owned();
    let config_path = args.config_path();
    config.verbose_println(&format!("Loading {}", config_path.display()));

    let project = ProjectConfig::load(&config_path)?;
    let mut builder = project
        .into_settings_builder(&project_root)
        .specifier(args.specifier());
    if let Some(dist_dir) = &args.dist_dir {
        builder = builder.dist_dir(dist_dir);
    }
    if let Some(id) = &args.artifact_id {
        builder = builder.artifact_id(id.as_str());
    }
    let settings = builder.build()?;

    config.verbose_println(&format!(
        "Project {} {} ({} mapping{})",
        settings.name(),
        settings.version(),
        settings.mappings().len(),
        if settings.mappings().len() == 1 { "" } else { "s" }
    ));

    let output = config.output().clone();
    Ok(Bundler::new(settings).with_reporter(move |event| {
        let _ = match event {
            BundleEvent::FileAdded {
                source,
                destination,
                ..
            } => output.file_added(source, destination),
            BundleEvent::ArtifactCreated(artifact) => {
                output.artifact_created(&artifact.id, &artifact.path, artifact.files)
            }
        };
    }))
}
