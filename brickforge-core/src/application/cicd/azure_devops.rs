// brickforge-core/src/application/cicd/azure_devops.rs

use super::CiEmitter;
use crate::domain::cicd::{JobKind, StageKind};
use crate::domain::project::CicdPlatform;

/// Multi-stage Azure Pipelines YAML.
#[derive(Debug, Clone, Copy, Default)]
pub struct AzureDevOpsEmitter;

impl CiEmitter for AzureDevOpsEmitter {
    fn platform(&self) -> CicdPlatform {
        CicdPlatform::AzureDevops
    }

    fn template_name(&self) -> &'static str {
        "cicd/azure_devops.yml.j2"
    }

    fn stage_id(&self, kind: StageKind) -> &'static str {
        match kind {
            StageKind::Ci => "BundleCI",
            StageKind::StagingDeploy => "StagingBundleCD",
            StageKind::ProdDeploy => "ProdBundleCD",
        }
    }

    fn job_id(&self, kind: JobKind) -> &'static str {
        match kind {
            JobKind::ValidateAndTest => "ValidateAndTest",
            JobKind::ValidateProd => "ValidateProd",
            JobKind::DeployStage => "DeployStaging",
            JobKind::DeployProd => "DeployProduction",
        }
    }

    fn variable_ref(&self, source: &str) -> String {
        format!("$({source})")
    }

    fn push_condition(&self, branches: &[String]) -> String {
        let tests: Vec<String> = branches
            .iter()
            .map(|b| format!("eq(variables['Build.SourceBranch'], 'refs/heads/{b}')"))
            .collect();
        let branch_test = match tests.as_slice() {
            [single] => single.clone(),
            _ => format!("or({})", tests.join(", ")),
        };
        format!("and(succeeded(), ne(variables['Build.Reason'], 'PullRequest'), {branch_test})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_branch_condition_has_no_or() {
        let condition = AzureDevOpsEmitter.push_condition(&["release".to_string()]);
        assert_eq!(
            condition,
            "and(succeeded(), ne(variables['Build.Reason'], 'PullRequest'), \
             eq(variables['Build.SourceBranch'], 'refs/heads/release'))"
        );
    }

    #[test]
    fn test_secrets_use_macro_syntax() {
        assert_eq!(
            AzureDevOpsEmitter.variable_ref("STAGE_ARM_CLIENT_SECRET"),
            "$(STAGE_ARM_CLIENT_SECRET)"
        );
    }
}
