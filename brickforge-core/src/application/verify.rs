// brickforge-core/src/application/verify.rs

use std::path::Path;

use tracing::{info, instrument};

use crate::domain::consistency::ConsistencyChecker;
use crate::domain::resolve::resolve;
use crate::error::ForgeError;
use crate::infrastructure::config::load_project_config;
use crate::infrastructure::fs::read_tree;

#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub project_name: String,
    pub files: usize,
    pub violations: Vec<String>,
}

impl VerificationReport {
    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Re-checks a generated project on disk against its own
/// `bundle_init_config.json`.
#[instrument(skip(project_dir), fields(path = %project_dir.display()))]
pub fn verify_project(project_dir: &Path) -> Result<VerificationReport, ForgeError> {
    let config = load_project_config(project_dir)?;
    let resolved = resolve(&config)?;
    let tree = read_tree(project_dir)?;

    let violations = ConsistencyChecker::violations(&resolved, &tree);
    info!(violations = violations.len(), "Verification finished");

    Ok(VerificationReport {
        project_name: resolved.project_name,
        files: tree.len(),
        violations,
    })
}
