// brickforge-core/src/application/cicd/gitlab.rs

use super::CiEmitter;
use crate::domain::cicd::{JobKind, StageKind};
use crate::domain::project::CicdPlatform;

/// `.gitlab-ci.yml` with one GitLab stage per pipeline stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitlabEmitter;

impl CiEmitter for GitlabEmitter {
    fn platform(&self) -> CicdPlatform {
        CicdPlatform::Gitlab
    }

    fn template_name(&self) -> &'static str {
        "cicd/gitlab.yml.j2"
    }

    fn stage_id(&self, kind: StageKind) -> &'static str {
        match kind {
            StageKind::Ci => "ci",
            StageKind::StagingDeploy => "staging",
            StageKind::ProdDeploy => "production",
        }
    }

    fn job_id(&self, kind: JobKind) -> &'static str {
        match kind {
            JobKind::ValidateAndTest => "bundle-ci",
            JobKind::ValidateProd => "validate-prod",
            JobKind::DeployStage => "staging-cd",
            JobKind::DeployProd => "prod-cd",
        }
    }

    fn variable_ref(&self, source: &str) -> String {
        format!("${source}")
    }

    fn push_condition(&self, branches: &[String]) -> String {
        let tests: Vec<String> = branches
            .iter()
            .map(|b| format!("$CI_COMMIT_BRANCH == \"{b}\""))
            .collect();
        format!(
            "$CI_PIPELINE_SOURCE == \"push\" && ({})",
            tests.join(" || ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_are_shell_references() {
        assert_eq!(GitlabEmitter.variable_ref("STAGE_ARM_TENANT_ID"), "$STAGE_ARM_TENANT_ID");
    }

    #[test]
    fn test_push_condition() {
        assert_eq!(
            GitlabEmitter.push_condition(&["main".to_string()]),
            "$CI_PIPELINE_SOURCE == \"push\" && ($CI_COMMIT_BRANCH == \"main\")"
        );
    }
}
