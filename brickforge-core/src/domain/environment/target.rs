// brickforge-core/src/domain/environment/target.rs

use serde::Serialize;
use std::fmt;

use crate::domain::project::TemplateConfig;

pub const PLACEHOLDER_HOST_PREFIX: &str = "WORKSPACE_HOST_PLACEHOLDER_";

/// The four deployment environments a bundle can carry. Declaration order is
/// the output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetName {
    User,
    Dev,
    Stage,
    Prod,
}

impl TargetName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Dev => "dev",
            Self::Stage => "stage",
            Self::Prod => "prod",
        }
    }

    /// Uppercase form used for placeholder tokens and CI secret prefixes.
    pub fn upper(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Dev => "DEV",
            Self::Stage => "STAGE",
            Self::Prod => "PROD",
        }
    }

    pub fn service_principal_variable(&self) -> &'static str {
        match self {
            Self::User => "user_service_principal",
            Self::Dev => "dev_service_principal",
            Self::Stage => "stage_service_principal",
            Self::Prod => "prod_service_principal",
        }
    }

    /// Targets deployed by a service principal (everything but `user`), in
    /// output order, for the given configuration.
    pub fn deployed(config: &TemplateConfig) -> Vec<TargetName> {
        let mut names = Vec::with_capacity(3);
        if config.has_dev_environment() {
            names.push(Self::Dev);
        }
        names.push(Self::Stage);
        if config.is_full() {
            names.push(Self::Prod);
        }
        names
    }
}

impl fmt::Display for TargetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a target's `workspace.host` is bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostPolicy {
    /// The invoking user's current workspace. Only the user target has it.
    CurrentContext,
    /// Same workspace as the user target (single_workspace).
    Shared,
    /// A token left for the consumer to replace (multi_workspace).
    Placeholder { token: String },
}

impl HostPolicy {
    pub fn for_target(name: TargetName, multi_workspace: bool) -> Self {
        match name {
            TargetName::User => Self::CurrentContext,
            _ if multi_workspace => Self::Placeholder {
                token: format!("{}{}", PLACEHOLDER_HOST_PREFIX, name.upper()),
            },
            _ => Self::Shared,
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Self::Placeholder { token } => Some(token),
            _ => None,
        }
    }
}

/// Bundle deployment mode of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    Development,
    Production,
}

impl DeploymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

/// One entry of the target set, before per-target fragments are attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetSpec {
    pub name: TargetName,
    pub is_dev_like: bool,
    pub host_policy: HostPolicy,
}

impl TargetSpec {
    pub fn mode(&self) -> DeploymentMode {
        match self.name {
            TargetName::User => DeploymentMode::Development,
            _ => DeploymentMode::Production,
        }
    }

    /// Catalog prefix: user and dev share the dev catalog.
    pub fn catalog_prefix(&self) -> &'static str {
        if self.is_dev_like {
            "dev"
        } else {
            self.name.as_str()
        }
    }
}

/// Ordered target set: user, [dev], stage, [prod].
pub fn build_targets(config: &TemplateConfig) -> Vec<TargetSpec> {
    let multi = config.workspace_setup.is_multi();

    std::iter::once(TargetName::User)
        .chain(TargetName::deployed(config))
        .map(|name| TargetSpec {
            name,
            is_dev_like: matches!(name, TargetName::User | TargetName::Dev),
            host_policy: HostPolicy::for_target(name, multi),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::{EnvironmentSetup, Toggle, WorkspaceSetup};

    fn names(targets: &[TargetSpec]) -> Vec<&'static str> {
        targets.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_minimal_without_dev_is_user_and_stage() {
        let mut config = TemplateConfig::with_defaults("acme");
        config.environment_setup = EnvironmentSetup::Minimal;
        assert_eq!(names(&build_targets(&config)), ["user", "stage"]);
    }

    #[test]
    fn test_full_with_dev_keeps_insertion_order() {
        let mut config = TemplateConfig::with_defaults("acme");
        config.include_dev_environment = Toggle::Yes;
        assert_eq!(
            names(&build_targets(&config)),
            ["user", "dev", "stage", "prod"]
        );
    }

    #[test]
    fn test_user_host_is_never_a_placeholder() {
        for setup in [WorkspaceSetup::SingleWorkspace, WorkspaceSetup::MultiWorkspace] {
            let mut config = TemplateConfig::with_defaults("acme");
            config.workspace_setup = setup;
            let targets = build_targets(&config);
            assert_eq!(targets[0].host_policy, HostPolicy::CurrentContext);
        }
    }

    #[test]
    fn test_multi_workspace_gives_distinct_placeholders() {
        let mut config = TemplateConfig::with_defaults("acme");
        config.workspace_setup = WorkspaceSetup::MultiWorkspace;
        config.include_dev_environment = Toggle::Yes;

        let targets = build_targets(&config);
        let tokens: Vec<&str> = targets
            .iter()
            .filter_map(|t| t.host_policy.placeholder())
            .collect();
        assert_eq!(
            tokens,
            [
                "WORKSPACE_HOST_PLACEHOLDER_DEV",
                "WORKSPACE_HOST_PLACEHOLDER_STAGE",
                "WORKSPACE_HOST_PLACEHOLDER_PROD"
            ]
        );
    }

    #[test]
    fn test_single_workspace_shares_the_host() {
        let config = TemplateConfig::with_defaults("acme");
        let targets = build_targets(&config);
        assert!(
            targets[1..]
                .iter()
                .all(|t| t.host_policy == HostPolicy::Shared)
        );
    }

    #[test]
    fn test_dev_like_targets_use_the_dev_catalog() {
        let mut config = TemplateConfig::with_defaults("acme");
        config.include_dev_environment = Toggle::Yes;
        let prefixes: Vec<&str> = build_targets(&config)
            .iter()
            .map(TargetSpec::catalog_prefix)
            .collect();
        assert_eq!(prefixes, ["dev", "dev", "stage", "prod"]);
    }
}
