// brickforge/src/commands/validate.rs
//
// USE CASE: Check a configuration and show what it would generate, without
// writing anything.

use std::path::PathBuf;

use comfy_table::{Table, presets::UTF8_FULL};

use brickforge_core::ForgeError;
use brickforge_core::application::describe_targets;
use brickforge_core::domain::resolve;
use brickforge_core::infrastructure::config::load_template_config;

pub fn execute(config_file: PathBuf) -> anyhow::Result<()> {
    let config = load_template_config(&config_file).map_err(ForgeError::from)?;
    let resolved = resolve(&config).map_err(ForgeError::from)?;

    println!("✅ Configuration is valid: {}", resolved.project_name);
    println!(
        "   Cloud: {}  Compute: {}  CI/CD: {}",
        resolved.cloud_provider,
        resolved.compute.compute_type,
        resolved.cicd_platform_name
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Target", "Mode", "Workspace", "Catalog", "Run as", "Grants"]);
    for row in describe_targets(&resolved) {
        table.add_row(vec![
            row.name.to_string(),
            row.mode.to_string(),
            row.host,
            row.catalog,
            row.run_as,
            row.grants,
        ]);
    }
    println!("{table}");

    if resolved.host_is_example {
        println!("⚠️  No workspace host configured; an example URL would be used.");
    }
    if !resolved.sp_configured {
        println!("ℹ️  Service principal ids are placeholders until configure_sp_now is 'yes'.");
    }

    Ok(())
}
