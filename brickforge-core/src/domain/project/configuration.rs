// brickforge-core/src/domain/project/configuration.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use super::options::{
    CicdPlatform, CloudProvider, ComputeType, EnvironmentSetup, Toggle, WorkspaceSetup,
};
use crate::domain::environment::TargetName;
use crate::domain::error::DomainError;

pub const DEFAULT_CATALOG_SUFFIX: &str = "my_domain";
pub const DEFAULT_CLI_VERSION: &str = "0.240.0";

const PROJECT_NAME_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9_-]*$";
const CATALOG_SUFFIX_PATTERN: &str = r"^[a-z0-9_]+$";
const BRANCH_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9._/-]*$";
const HOST_PATTERN: &str = r"^https://[A-Za-z0-9.-]+(:[0-9]+)?/?$";
const CLI_VERSION_PATTERN: &str = r"^[0-9]+\.[0-9]+\.[0-9]+$";
const SP_ID_PATTERN: &str =
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";

/// The answers to every template question. Read once, never mutated after
/// validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TemplateConfig {
    #[validate(custom(function = "validate_project_name"))]
    pub project_name: String,

    #[serde(default = "default_environment_setup")]
    pub environment_setup: EnvironmentSetup,

    #[serde(default = "toggle_no")]
    pub include_dev_environment: Toggle,

    #[serde(default = "default_compute_type")]
    pub compute_type: ComputeType,

    #[serde(default = "toggle_yes")]
    pub include_permissions: Toggle,

    #[serde(default = "toggle_no")]
    pub configure_sp_now: Toggle,

    #[serde(default = "default_cicd_platform")]
    pub cicd_platform: CicdPlatform,

    #[serde(default = "default_cloud_provider")]
    pub cloud_provider: CloudProvider,

    #[serde(default = "default_workspace_setup")]
    pub workspace_setup: WorkspaceSetup,

    #[serde(default = "default_catalog_suffix")]
    #[validate(custom(function = "validate_catalog_suffix"))]
    pub uc_catalog_suffix: String,

    #[serde(default = "default_branch")]
    #[validate(custom(function = "validate_branch_name"))]
    pub default_branch: String,

    #[serde(default = "default_release_branch")]
    #[validate(custom(function = "validate_branch_name"))]
    pub release_branch: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_workspace_host"))]
    pub workspace_host: Option<String>,

    #[serde(default = "default_cli_version")]
    #[validate(custom(function = "validate_cli_version"))]
    pub databricks_cli_version: String,

    // --- Service principals (only read when configure_sp_now = yes) ---
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_service_principal_id"))]
    pub dev_service_principal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_service_principal_id"))]
    pub stage_service_principal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_service_principal_id"))]
    pub prod_service_principal: Option<String>,
}

impl TemplateConfig {
    /// A config with every option at its documented default.
    pub fn with_defaults(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            environment_setup: default_environment_setup(),
            include_dev_environment: toggle_no(),
            compute_type: default_compute_type(),
            include_permissions: toggle_yes(),
            configure_sp_now: toggle_no(),
            cicd_platform: default_cicd_platform(),
            cloud_provider: default_cloud_provider(),
            workspace_setup: default_workspace_setup(),
            uc_catalog_suffix: default_catalog_suffix(),
            default_branch: default_branch(),
            release_branch: default_release_branch(),
            workspace_host: None,
            databricks_cli_version: default_cli_version(),
            dev_service_principal: None,
            stage_service_principal: None,
            prod_service_principal: None,
        }
    }

    pub fn is_full(&self) -> bool {
        self.environment_setup.is_full()
    }

    pub fn has_dev_environment(&self) -> bool {
        self.include_dev_environment.is_yes()
    }

    pub fn service_principal_id(&self, target: TargetName) -> Option<&str> {
        match target {
            TargetName::User => None,
            TargetName::Dev => self.dev_service_principal.as_deref(),
            TargetName::Stage => self.stage_service_principal.as_deref(),
            TargetName::Prod => self.prod_service_principal.as_deref(),
        }
    }

    /// Field-level validation followed by the cross-field rules.
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate()
            .map_err(|e| DomainError::InvalidConfiguration(e.to_string()))?;

        if self.configure_sp_now.is_yes() {
            for target in TargetName::deployed(self) {
                if self.service_principal_id(target).is_none() {
                    return Err(DomainError::MissingServicePrincipal {
                        target: target.to_string(),
                        key: target.service_principal_variable().to_string(),
                    });
                }
            }
        }

        if self.is_full() && self.default_branch == self.release_branch {
            return Err(DomainError::InvalidConfiguration(format!(
                "default_branch and release_branch must differ in a full setup (both are '{}')",
                self.default_branch
            )));
        }

        Ok(())
    }
}

// --- DEFAULTS ---

fn default_environment_setup() -> EnvironmentSetup {
    EnvironmentSetup::Full
}
fn default_compute_type() -> ComputeType {
    ComputeType::Serverless
}
fn default_cicd_platform() -> CicdPlatform {
    CicdPlatform::AzureDevops
}
fn default_cloud_provider() -> CloudProvider {
    CloudProvider::Azure
}
fn default_workspace_setup() -> WorkspaceSetup {
    WorkspaceSetup::SingleWorkspace
}
fn toggle_yes() -> Toggle {
    Toggle::Yes
}
fn toggle_no() -> Toggle {
    Toggle::No
}
fn default_catalog_suffix() -> String {
    DEFAULT_CATALOG_SUFFIX.to_string()
}
fn default_branch() -> String {
    "main".to_string()
}
fn default_release_branch() -> String {
    "release".to_string()
}
fn default_cli_version() -> String {
    DEFAULT_CLI_VERSION.to_string()
}

// --- VALIDATORS ---

fn matches_pattern(
    value: &str,
    pattern: &str,
    code: &'static str,
    message: &'static str,
) -> Result<(), ValidationError> {
    let re = Regex::new(pattern).map_err(|_| ValidationError::new("pattern"))?;
    if re.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new(code);
        err.message = Some(Cow::Borrowed(message));
        err.add_param(Cow::Borrowed("value"), &value);
        Err(err)
    }
}

fn validate_project_name(value: &str) -> Result<(), ValidationError> {
    matches_pattern(
        value,
        PROJECT_NAME_PATTERN,
        "project_name",
        "must start with a letter or digit and contain only letters, digits, '_' or '-'",
    )
}

fn validate_catalog_suffix(value: &str) -> Result<(), ValidationError> {
    matches_pattern(
        value,
        CATALOG_SUFFIX_PATTERN,
        "uc_catalog_suffix",
        "must contain only lowercase letters, digits or '_'",
    )
}

fn validate_branch_name(value: &str) -> Result<(), ValidationError> {
    matches_pattern(value, BRANCH_PATTERN, "branch", "is not a valid git branch name")
}

fn validate_workspace_host(value: &str) -> Result<(), ValidationError> {
    matches_pattern(
        value,
        HOST_PATTERN,
        "workspace_host",
        "must be an https:// workspace URL",
    )
}

fn validate_cli_version(value: &str) -> Result<(), ValidationError> {
    matches_pattern(
        value,
        CLI_VERSION_PATTERN,
        "databricks_cli_version",
        "must be a MAJOR.MINOR.PATCH version without a leading 'v'",
    )
}

fn validate_service_principal_id(value: &str) -> Result<(), ValidationError> {
    matches_pattern(
        value,
        SP_ID_PATTERN,
        "service_principal",
        "must be a service principal application id (UUID)",
    )
}
