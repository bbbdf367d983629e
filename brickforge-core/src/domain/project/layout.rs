// brickforge-core/src/domain/project/layout.rs

//! Relative paths of the generated project. Every path is `/` separated.

use super::options::CicdPlatform;

pub const BUNDLE_MANIFEST: &str = "databricks.yml";
pub const VARIABLES: &str = "variables.yml";
pub const INIT_CONFIG: &str = "bundle_init_config.json";
pub const README: &str = "README.md";
pub const QUICKSTART: &str = "QUICKSTART.md";
pub const SCHEMAS: &str = "resources/schemas.yml";
pub const CI_CD_SETUP: &str = "docs/CI_CD_SETUP.md";
pub const PERMISSIONS_SETUP: &str = "docs/PERMISSIONS_SETUP.md";
pub const SETUP_GROUPS: &str = "docs/SETUP_GROUPS.md";
pub const CLUSTER_CONFIGS: &str = "templates/cluster_configs.yml";

pub fn ingestion_job(project_name: &str) -> String {
    format!("resources/{project_name}_ingestion.job.yml")
}

pub fn pipeline(project_name: &str) -> String {
    format!("resources/{project_name}_pipeline.pipeline.yml")
}

pub fn pipeline_trigger_job(project_name: &str) -> String {
    format!("resources/{project_name}_pipeline_trigger.job.yml")
}

/// The pipeline definition slot of a CI platform. `None` for `none`, which
/// has no slot of its own.
pub fn ci_slot(platform: CicdPlatform, project_name: &str) -> Option<String> {
    match platform {
        CicdPlatform::Disabled => None,
        CicdPlatform::AzureDevops => Some(format!(
            ".azure/devops_pipelines/{project_name}_bundle_cicd.yml"
        )),
        CicdPlatform::GithubActions => {
            Some(format!(".github/workflows/{project_name}_bundle_cicd.yml"))
        }
        CicdPlatform::Gitlab => Some(".gitlab-ci.yml".to_string()),
    }
}
