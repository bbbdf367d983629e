// brickforge-core/src/application/cicd/github_actions.rs

use super::CiEmitter;
use crate::domain::cicd::{JobKind, StageKind};
use crate::domain::project::CicdPlatform;

/// GitHub Actions workflow. Stages flatten into jobs chained with `needs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GithubActionsEmitter;

impl CiEmitter for GithubActionsEmitter {
    fn platform(&self) -> CicdPlatform {
        CicdPlatform::GithubActions
    }

    fn template_name(&self) -> &'static str {
        "cicd/github_actions.yml.j2"
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
        format!("${{{{ secrets.{source} }}}}")
    }

    /// Bare expression; the template wraps it with `gha_expr`.
    fn push_condition(&self, branches: &[String]) -> String {
        let refs: Vec<String> = branches
            .iter()
            .map(|b| format!("github.ref == 'refs/heads/{b}'"))
            .collect();
        match refs.as_slice() {
            [single] => format!("github.event_name == 'push' && {single}"),
            _ => format!("github.event_name == 'push' && ({})", refs.join(" || ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_reference() {
        assert_eq!(
            GithubActionsEmitter.variable_ref("PROD_DATABRICKS_CLIENT_ID"),
            "${{ secrets.PROD_DATABRICKS_CLIENT_ID }}"
        );
    }

    #[test]
    fn test_multi_branch_condition() {
        let condition =
            GithubActionsEmitter.push_condition(&["main".to_string(), "release".to_string()]);
        assert_eq!(
            condition,
            "github.event_name == 'push' && \
             (github.ref == 'refs/heads/main' || github.ref == 'refs/heads/release')"
        );
    }
}
