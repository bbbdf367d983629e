// brickforge-core/src/domain/resolve.rs

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::cicd::PipelineSpec;
use crate::domain::environment::{DeploymentMode, HostPolicy, TargetName, build_targets};
use crate::domain::error::DomainError;
use crate::domain::fragments::{
    ComputeFragment, PermissionGrant, PermissionSet, ServicePrincipalBinding, service_principal,
    var_ref,
};
use crate::domain::project::{CicdPlatform, CloudProvider, TemplateConfig, layout};

const USER_ROOT_PATH: &str = "~/.bundle/${bundle.name}/${bundle.target}";
const SHARED_ROOT_PATH: &str = "/Workspace/Shared/.bundle/${bundle.name}/${bundle.target}";
const USER_SCHEMA_PREFIX: &str = "${workspace.current_user.short_name}_";

/// Workspace used when neither the config nor the environment names one.
pub fn example_host(cloud: CloudProvider) -> &'static str {
    match cloud {
        CloudProvider::Azure => "https://adb-1234567890123456.7.azuredatabricks.net",
        CloudProvider::Aws => "https://dbc-a1b2c3d4-e5f6.cloud.databricks.com",
        CloudProvider::Gcp => "https://1234567890123456.7.gcp.databricks.com",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTarget {
    pub name: TargetName,
    pub is_dev_like: bool,
    pub is_default: bool,
    pub mode: DeploymentMode,
    pub host_policy: HostPolicy,
    /// Literal URL or placeholder token, exactly as written to databricks.yml.
    pub host: String,
    pub root_path: &'static str,
    pub catalog_name: String,
    pub schema_prefix: &'static str,
    /// `${var.<target>_service_principal}` for every target but `user`.
    pub run_as: Option<String>,
    pub permissions: Vec<PermissionGrant>,
}

/// Reference variable declared in variables.yml under multi_workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostVariable {
    pub variable: String,
    pub target: TargetName,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CiSlot {
    pub platform: CicdPlatform,
    pub path: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputPaths {
    pub ingestion_job: String,
    pub pipeline: String,
    pub pipeline_trigger_job: String,
    pub ci_slots: Vec<CiSlot>,
    pub active_ci_slot: Option<String>,
}

/// Every value a generated file may mention, computed once per run. Files
/// render from this and only this, which is what keeps names, suffixes,
/// hosts and branches identical across the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedValues {
    pub config: TemplateConfig,
    pub project_name: String,
    pub catalog_suffix: String,
    pub default_catalog: String,
    pub catalogs: Vec<String>,
    pub is_full: bool,
    pub has_dev: bool,
    pub multi_workspace: bool,
    pub cloud_provider: CloudProvider,
    pub cicd_enabled: bool,
    pub cicd_platform: CicdPlatform,
    pub cicd_platform_name: &'static str,
    pub current_host: String,
    pub host_is_example: bool,
    pub targets: Vec<ResolvedTarget>,
    pub host_variables: Vec<HostVariable>,
    pub compute: ComputeFragment,
    pub service_principals: Vec<ServicePrincipalBinding>,
    pub sp_configured: bool,
    pub permissions: Option<PermissionSet>,
    pub pipeline: PipelineSpec,
    pub paths: OutputPaths,
}

impl ResolvedValues {
    pub fn target(&self, name: TargetName) -> Option<&ResolvedTarget> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn target_names(&self) -> Vec<&'static str> {
        self.targets.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn permissions_enabled(&self) -> bool {
        self.permissions.is_some()
    }
}

/// Validates the configuration and derives the full value set.
pub fn resolve(config: &TemplateConfig) -> Result<ResolvedValues, DomainError> {
    config.check()?;

    let suffix = config.uc_catalog_suffix.clone();
    let (current_host, host_is_example) = match &config.workspace_host {
        Some(host) => (host.trim_end_matches('/').to_string(), false),
        None => {
            let fallback = example_host(config.cloud_provider);
            warn!(
                host = fallback,
                "No workspace_host configured and DATABRICKS_HOST is unset; using an example host"
            );
            (fallback.to_string(), true)
        }
    };

    let permissions = PermissionSet::select(config);

    let targets: Vec<ResolvedTarget> = build_targets(config)
        .into_iter()
        .map(|spec| {
            let host = match &spec.host_policy {
                HostPolicy::CurrentContext | HostPolicy::Shared => current_host.clone(),
                HostPolicy::Placeholder { token } => token.clone(),
            };
            let is_user = spec.name == TargetName::User;
            ResolvedTarget {
                name: spec.name,
                is_dev_like: spec.is_dev_like,
                is_default: is_user,
                mode: spec.mode(),
                host,
                root_path: if is_user { USER_ROOT_PATH } else { SHARED_ROOT_PATH },
                catalog_name: format!("{}_{}", spec.catalog_prefix(), suffix),
                schema_prefix: if is_user { USER_SCHEMA_PREFIX } else { "" },
                run_as: (!is_user).then(|| var_ref(spec.name.service_principal_variable())),
                permissions: permissions
                    .as_ref()
                    .map(|p| p.grants_for(spec.name))
                    .unwrap_or_default(),
                host_policy: spec.host_policy,
            }
        })
        .collect();

    let host_variables = targets
        .iter()
        .filter_map(|t| {
            t.host_policy.placeholder().map(|token| HostVariable {
                variable: format!("workspace_host_{}", t.name),
                target: t.name,
                token: token.to_string(),
            })
        })
        .collect();

    let mut catalogs: Vec<String> = Vec::new();
    for target in &targets {
        if !catalogs.contains(&target.catalog_name) {
            catalogs.push(target.catalog_name.clone());
        }
    }

    let service_principals = service_principal::select(config);
    let sp_configured = service_principals.iter().all(|b| b.configured);

    let project_name = config.project_name.clone();
    let ci_slots = CicdPlatform::ACTIVE
        .iter()
        .filter_map(|platform| {
            layout::ci_slot(*platform, &project_name).map(|path| CiSlot {
                platform: *platform,
                path,
                active: *platform == config.cicd_platform,
            })
        })
        .collect();

    let paths = OutputPaths {
        ingestion_job: layout::ingestion_job(&project_name),
        pipeline: layout::pipeline(&project_name),
        pipeline_trigger_job: layout::pipeline_trigger_job(&project_name),
        ci_slots,
        active_ci_slot: layout::ci_slot(config.cicd_platform, &project_name),
    };

    debug!(
        project = %project_name,
        targets = targets.len(),
        platform = %config.cicd_platform,
        "Resolved configuration"
    );

    Ok(ResolvedValues {
        project_name,
        default_catalog: format!("dev_{suffix}"),
        catalog_suffix: suffix,
        catalogs,
        is_full: config.is_full(),
        has_dev: config.has_dev_environment(),
        multi_workspace: config.workspace_setup.is_multi(),
        cloud_provider: config.cloud_provider,
        cicd_enabled: config.cicd_platform.is_enabled(),
        cicd_platform: config.cicd_platform,
        cicd_platform_name: config.cicd_platform.display_name(),
        current_host,
        host_is_example,
        targets,
        host_variables,
        compute: ComputeFragment::select(config.compute_type, config.cloud_provider),
        service_principals,
        sp_configured,
        permissions,
        pipeline: PipelineSpec::build(config),
        paths,
        config: config.clone(),
    })
}
