// brickforge/src/commands/init.rs
//
// USE CASE: Generate a bundle project from a JSON configuration.

use std::path::PathBuf;

use tracing::debug;

use brickforge_core::ForgeError;
use brickforge_core::application::generate_project;
use brickforge_core::infrastructure::compiler::JinjaRenderer;
use brickforge_core::infrastructure::config::load_template_config;

pub fn execute(
    config_file: PathBuf,
    output_dir: PathBuf,
    template_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    println!("⚙️  Loading configuration from {}...", config_file.display());
    let config = load_template_config(&config_file).map_err(ForgeError::from)?;

    let renderer = match &template_dir {
        Some(dir) => {
            println!("   Templates: {}", dir.display());
            JinjaRenderer::from_dir(dir)
        }
        None => JinjaRenderer::embedded().map_err(ForgeError::from)?,
    };
    debug!(template_dir = ?template_dir, "Renderer ready");

    println!("🏗️  Generating '{}'...", config.project_name);
    let report = generate_project(&config, &output_dir, &renderer)?;

    println!(
        "✨ Wrote {} files to {}",
        report.files,
        report.project_dir.display()
    );
    println!("   Targets: {}", report.targets.join(", "));

    if report.host_is_example {
        println!(
            "⚠️  No workspace host was given; databricks.yml uses an example URL. Set workspace_host or DATABRICKS_HOST and regenerate, or edit the file."
        );
    }

    Ok(())
}
