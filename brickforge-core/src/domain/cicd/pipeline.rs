// brickforge-core/src/domain/cicd/pipeline.rs

use serde::Serialize;

use crate::domain::environment::TargetName;
use crate::domain::project::{CloudProvider, TemplateConfig};

pub const PYTHON_VERSION: &str = "3.11";
pub const SETUP_CLI_BASE_URL: &str = "https://raw.githubusercontent.com/databricks/setup-cli";
pub const UNIT_TEST_COMMAND: &str = "python -m pytest tests/ -v --junitxml=test-results.xml";
pub const UNIT_TEST_RESULTS: &str = "test-results.xml";

pub fn cli_install_url(version: &str) -> String {
    format!("{SETUP_CLI_BASE_URL}/v{version}/install.sh")
}

/// An environment variable the Databricks CLI reads to authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthVariable {
    pub name: &'static str,
    pub secret: bool,
    pub description: &'static str,
}

const AZURE_SERVICE_PRINCIPAL: &[AuthVariable] = &[
    AuthVariable {
        name: "ARM_TENANT_ID",
        secret: false,
        description: "Microsoft Entra ID tenant id",
    },
    AuthVariable {
        name: "ARM_CLIENT_ID",
        secret: false,
        description: "Application (client) id of the service principal",
    },
    AuthVariable {
        name: "ARM_CLIENT_SECRET",
        secret: true,
        description: "Client secret of the service principal",
    },
];

const DATABRICKS_OAUTH: &[AuthVariable] = &[
    AuthVariable {
        name: "DATABRICKS_HOST",
        secret: false,
        description: "Workspace URL of the environment",
    },
    AuthVariable {
        name: "DATABRICKS_CLIENT_ID",
        secret: false,
        description: "OAuth client id of the service principal",
    },
    AuthVariable {
        name: "DATABRICKS_CLIENT_SECRET",
        secret: true,
        description: "OAuth secret generated for the service principal",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// Entra ID service principal (azure).
    AzureServicePrincipal,
    /// Databricks OAuth machine-to-machine (aws, gcp).
    DatabricksOauth,
}

impl AuthScheme {
    pub fn for_cloud(cloud: CloudProvider) -> Self {
        match cloud {
            CloudProvider::Azure => Self::AzureServicePrincipal,
            CloudProvider::Aws | CloudProvider::Gcp => Self::DatabricksOauth,
        }
    }

    pub fn variables(&self) -> &'static [AuthVariable] {
        match self {
            Self::AzureServicePrincipal => AZURE_SERVICE_PRINCIPAL,
            Self::DatabricksOauth => DATABRICKS_OAUTH,
        }
    }

    /// The other scheme's variables. None of them may appear in a pipeline
    /// using this scheme.
    pub fn excluded(&self) -> &'static [AuthVariable] {
        match self {
            Self::AzureServicePrincipal => DATABRICKS_OAUTH,
            Self::DatabricksOauth => AZURE_SERVICE_PRINCIPAL,
        }
    }
}

/// One auth variable bound for one environment: the CLI reads `name`, the CI
/// platform stores the value under `source` (e.g. `STAGE_ARM_CLIENT_ID`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialBinding {
    pub name: &'static str,
    pub source: String,
    pub secret: bool,
    pub environment: TargetName,
    pub description: &'static str,
}

fn credentials(scheme: AuthScheme, target: TargetName) -> Vec<CredentialBinding> {
    scheme
        .variables()
        .iter()
        .map(|var| CredentialBinding {
            name: var.name,
            source: format!("{}_{}", target.upper(), var.name),
            secret: var.secret,
            environment: target,
            description: var.description,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Ci,
    StagingDeploy,
    ProdDeploy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    ValidateAndTest,
    ValidateProd,
    DeployStage,
    DeployProd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineJob {
    pub kind: JobKind,
    /// Bundle target the job validates or deploys.
    pub target: TargetName,
    /// Job in the same stage that must succeed first.
    pub needs: Option<JobKind>,
    pub run_unit_tests: bool,
    pub deploy: bool,
    pub credentials: Vec<CredentialBinding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineStage {
    pub kind: StageKind,
    /// Stage that must succeed first.
    pub needs: Option<StageKind>,
    /// Push branches the stage runs for. Empty means every trigger,
    /// pull requests included.
    pub push_branches: Vec<String>,
    pub jobs: Vec<PipelineJob>,
}

/// Platform-neutral description of the bundle CI/CD pipeline. Each CI
/// platform renders the same spec, so stages, gating, credentials, tool
/// versions and branches cannot drift between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineSpec {
    pub project_name: String,
    pub cli_version: String,
    pub cli_install_url: String,
    pub python_version: &'static str,
    pub unit_test_command: &'static str,
    pub unit_test_results: &'static str,
    pub default_branch: String,
    pub release_branch: Option<String>,
    /// Branches whose pushes start the pipeline.
    pub trigger_branches: Vec<String>,
    pub auth_scheme: AuthScheme,
    pub auth_variables: Vec<AuthVariable>,
    pub excluded_variables: Vec<AuthVariable>,
    pub stages: Vec<PipelineStage>,
}

impl PipelineSpec {
    pub fn build(config: &TemplateConfig) -> Self {
        let scheme = AuthScheme::for_cloud(config.cloud_provider);
        let full = config.is_full();
        let default_branch = config.default_branch.clone();
        let release_branch = full.then(|| config.release_branch.clone());

        let mut trigger_branches = vec![default_branch.clone()];
        trigger_branches.extend(release_branch.clone());

        let mut ci_jobs = vec![PipelineJob {
            kind: JobKind::ValidateAndTest,
            target: TargetName::Stage,
            needs: None,
            run_unit_tests: true,
            deploy: false,
            credentials: credentials(scheme, TargetName::Stage),
        }];
        if full {
            ci_jobs.push(PipelineJob {
                kind: JobKind::ValidateProd,
                target: TargetName::Prod,
                needs: Some(JobKind::ValidateAndTest),
                run_unit_tests: false,
                deploy: false,
                credentials: credentials(scheme, TargetName::Prod),
            });
        }

        let mut stages = vec![
            PipelineStage {
                kind: StageKind::Ci,
                needs: None,
                push_branches: Vec::new(),
                jobs: ci_jobs,
            },
            PipelineStage {
                kind: StageKind::StagingDeploy,
                needs: Some(StageKind::Ci),
                push_branches: trigger_branches.clone(),
                jobs: vec![PipelineJob {
                    kind: JobKind::DeployStage,
                    target: TargetName::Stage,
                    needs: None,
                    run_unit_tests: false,
                    deploy: true,
                    credentials: credentials(scheme, TargetName::Stage),
                }],
            },
        ];

        if let Some(release) = &release_branch {
            stages.push(PipelineStage {
                kind: StageKind::ProdDeploy,
                needs: Some(StageKind::StagingDeploy),
                push_branches: vec![release.clone()],
                jobs: vec![PipelineJob {
                    kind: JobKind::DeployProd,
                    target: TargetName::Prod,
                    needs: None,
                    run_unit_tests: false,
                    deploy: true,
                    credentials: credentials(scheme, TargetName::Prod),
                }],
            });
        }

        Self {
            project_name: config.project_name.clone(),
            cli_version: config.databricks_cli_version.clone(),
            cli_install_url: cli_install_url(&config.databricks_cli_version),
            python_version: PYTHON_VERSION,
            unit_test_command: UNIT_TEST_COMMAND,
            unit_test_results: UNIT_TEST_RESULTS,
            default_branch,
            release_branch,
            trigger_branches,
            auth_scheme: scheme,
            auth_variables: scheme.variables().to_vec(),
            excluded_variables: scheme.excluded().to_vec(),
            stages,
        }
    }

    pub fn stage(&self, kind: StageKind) -> Option<&PipelineStage> {
        self.stages.iter().find(|s| s.kind == kind)
    }

    pub fn jobs(&self) -> impl Iterator<Item = &PipelineJob> {
        self.stages.iter().flat_map(|s| s.jobs.iter())
    }

    /// Every credential the platform must store, one per environment and
    /// variable, in first-use order.
    pub fn credential_sources(&self) -> Vec<CredentialBinding> {
        let mut seen: Vec<CredentialBinding> = Vec::new();
        for binding in self.jobs().flat_map(|j| j.credentials.iter()) {
            if !seen.iter().any(|b| b.source == binding.source) {
                seen.push(binding.clone());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::EnvironmentSetup;

    fn kinds(spec: &PipelineSpec) -> Vec<StageKind> {
        spec.stages.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_minimal_pipeline_has_no_prod_stage() {
        let mut config = TemplateConfig::with_defaults("acme");
        config.environment_setup = EnvironmentSetup::Minimal;
        let spec = PipelineSpec::build(&config);

        assert_eq!(kinds(&spec), [StageKind::Ci, StageKind::StagingDeploy]);
        assert_eq!(spec.trigger_branches, ["main"]);
        assert!(spec.release_branch.is_none());
        assert!(spec.jobs().all(|j| j.target != TargetName::Prod));
    }

    #[test]
    fn test_full_pipeline_gates_prod_on_staging() {
        let config = TemplateConfig::with_defaults("acme");
        let spec = PipelineSpec::build(&config);

        assert_eq!(
            kinds(&spec),
            [StageKind::Ci, StageKind::StagingDeploy, StageKind::ProdDeploy]
        );
        let prod = spec.stage(StageKind::ProdDeploy);
        assert_eq!(prod.and_then(|s| s.needs), Some(StageKind::StagingDeploy));
        assert_eq!(prod.map(|s| s.push_branches.clone()), Some(vec!["release".to_string()]));

        let ci = spec.stage(StageKind::Ci);
        let validate_prod = ci.and_then(|s| s.jobs.iter().find(|j| j.kind == JobKind::ValidateProd));
        assert_eq!(validate_prod.and_then(|j| j.needs), Some(JobKind::ValidateAndTest));
    }

    #[test]
    fn test_auth_sets_follow_the_cloud() {
        let mut config = TemplateConfig::with_defaults("acme");
        let azure = PipelineSpec::build(&config);
        let names: Vec<&str> = azure.auth_variables.iter().map(|v| v.name).collect();
        assert_eq!(names, ["ARM_TENANT_ID", "ARM_CLIENT_ID", "ARM_CLIENT_SECRET"]);

        config.cloud_provider = CloudProvider::Gcp;
        let gcp = PipelineSpec::build(&config);
        assert_eq!(gcp.auth_scheme, AuthScheme::DatabricksOauth);
        assert!(gcp.excluded_variables.iter().any(|v| v.name == "ARM_TENANT_ID"));
    }

    #[test]
    fn test_credential_sources_are_prefixed_per_environment() {
        let config = TemplateConfig::with_defaults("acme");
        let spec = PipelineSpec::build(&config);
        let sources: Vec<String> = spec
            .credential_sources()
            .into_iter()
            .map(|c| c.source)
            .collect();
        assert_eq!(
            sources,
            [
                "STAGE_ARM_TENANT_ID",
                "STAGE_ARM_CLIENT_ID",
                "STAGE_ARM_CLIENT_SECRET",
                "PROD_ARM_TENANT_ID",
                "PROD_ARM_CLIENT_ID",
                "PROD_ARM_CLIENT_SECRET",
            ]
        );
    }

    #[test]
    fn test_cli_version_is_single_sourced() {
        let mut config = TemplateConfig::with_defaults("acme");
        config.databricks_cli_version = "0.250.1".into();
        let spec = PipelineSpec::build(&config);
        assert_eq!(
            spec.cli_install_url,
            "https://raw.githubusercontent.com/databricks/setup-cli/v0.250.1/install.sh"
        );
    }
}
