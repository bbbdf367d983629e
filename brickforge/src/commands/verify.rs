// brickforge/src/commands/verify.rs
//
// USE CASE: Re-run the consistency checks on a generated project.

use std::path::PathBuf;

use brickforge_core::application::verify_project;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    println!("🔍 Verifying {}...", project_dir.display());

    let report = verify_project(&project_dir)?;

    if report.is_consistent() {
        println!(
            "✨ {} is consistent ({} files).",
            report.project_name, report.files
        );
        return Ok(());
    }

    eprintln!("\n⚠️  {} violation(s) detected:", report.violations.len());
    for violation in &report.violations {
        eprintln!("   ❌ {violation}");
    }
    anyhow::bail!(
        "{} is inconsistent with its bundle_init_config.json",
        report.project_name
    )
}
