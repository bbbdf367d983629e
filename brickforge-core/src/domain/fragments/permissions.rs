// brickforge-core/src/domain/fragments/permissions.rs

use serde::Serialize;

use crate::domain::environment::TargetName;
use crate::domain::project::TemplateConfig;

/// A workspace group the bundle grants access to, declared as a bundle
/// variable so admins can rename it without touching databricks.yml.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupVariable {
    pub variable: &'static str,
    pub default_name: &'static str,
    pub description: &'static str,
}

pub const DEVELOPERS: GroupVariable = GroupVariable {
    variable: "developers_group",
    default_name: "developers",
    description: "Engineers who build and deploy the bundle",
};

pub const QA_TEAM: GroupVariable = GroupVariable {
    variable: "qa_team_group",
    default_name: "qa_team",
    description: "Testers who run jobs in stage",
};

pub const ANALYTICS_TEAM: GroupVariable = GroupVariable {
    variable: "analytics_team_group",
    default_name: "analytics_team",
    description: "Consumers with read access to deployed resources",
};

pub const OPERATIONS: GroupVariable = GroupVariable {
    variable: "operations_group",
    default_name: "operations_team",
    description: "On-call operators who manage production",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PermissionLevel {
    #[serde(rename = "CAN_MANAGE")]
    CanManage,
    #[serde(rename = "CAN_RUN")]
    CanRun,
    #[serde(rename = "CAN_VIEW")]
    CanView,
}

impl PermissionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CanManage => "CAN_MANAGE",
            Self::CanRun => "CAN_RUN",
            Self::CanView => "CAN_VIEW",
        }
    }
}

/// One `permissions:` entry of a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionGrant {
    /// `group_name` or `service_principal_name`.
    pub principal_key: &'static str,
    /// Variable reference, e.g. `${var.developers_group}`.
    pub principal: String,
    pub level: PermissionLevel,
}

impl PermissionGrant {
    fn group(group: GroupVariable, level: PermissionLevel) -> Self {
        Self {
            principal_key: "group_name",
            principal: var_ref(group.variable),
            level,
        }
    }

    fn service_principal(target: TargetName) -> Self {
        Self {
            principal_key: "service_principal_name",
            principal: var_ref(target.service_principal_variable()),
            level: PermissionLevel::CanManage,
        }
    }
}

pub fn var_ref(variable: &str) -> String {
    format!("${{var.{variable}}}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionSet {
    pub groups: Vec<GroupVariable>,
    pub has_operations: bool,
}

impl PermissionSet {
    /// `None` when include_permissions is `no`.
    pub fn select(config: &TemplateConfig) -> Option<Self> {
        if !config.include_permissions.is_yes() {
            return None;
        }

        let mut groups = vec![DEVELOPERS, QA_TEAM, ANALYTICS_TEAM];
        let has_operations = config.is_full();
        if has_operations {
            groups.push(OPERATIONS);
        }

        Some(Self {
            groups,
            has_operations,
        })
    }

    /// Grants for one target. The user target deploys in development mode
    /// under the invoking user and gets none.
    pub fn grants_for(&self, target: TargetName) -> Vec<PermissionGrant> {
        use PermissionLevel::*;

        match target {
            TargetName::User => Vec::new(),
            TargetName::Dev => vec![
                PermissionGrant::service_principal(target),
                PermissionGrant::group(DEVELOPERS, CanManage),
                PermissionGrant::group(QA_TEAM, CanView),
                PermissionGrant::group(ANALYTICS_TEAM, CanView),
            ],
            TargetName::Stage => vec![
                PermissionGrant::service_principal(target),
                PermissionGrant::group(DEVELOPERS, CanView),
                PermissionGrant::group(QA_TEAM, CanRun),
                PermissionGrant::group(ANALYTICS_TEAM, CanView),
            ],
            TargetName::Prod => {
                let mut grants = vec![PermissionGrant::service_principal(target)];
                if self.has_operations {
                    grants.push(PermissionGrant::group(OPERATIONS, CanManage));
                }
                grants.extend([
                    PermissionGrant::group(DEVELOPERS, CanView),
                    PermissionGrant::group(QA_TEAM, CanView),
                    PermissionGrant::group(ANALYTICS_TEAM, CanView),
                ]);
                grants
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::{EnvironmentSetup, Toggle};

    #[test]
    fn test_disabled_permissions_select_nothing() {
        let mut config = TemplateConfig::with_defaults("acme");
        config.include_permissions = Toggle::No;
        assert!(PermissionSet::select(&config).is_none());
    }

    #[test]
    fn test_operations_group_only_in_full_mode() {
        let mut config = TemplateConfig::with_defaults("acme");
        let full = PermissionSet::select(&config);
        assert_eq!(full.map(|p| p.groups.len()), Some(4));

        config.environment_setup = EnvironmentSetup::Minimal;
        let minimal = PermissionSet::select(&config);
        let variables: Vec<&str> = minimal
            .iter()
            .flat_map(|p| p.groups.iter().map(|g| g.variable))
            .collect();
        assert_eq!(
            variables,
            ["developers_group", "qa_team_group", "analytics_team_group"]
        );
    }

    #[test]
    fn test_prod_is_managed_by_operations() {
        let config = TemplateConfig::with_defaults("acme");
        let set = PermissionSet::select(&config);
        let grants = set.map(|s| s.grants_for(TargetName::Prod)).unwrap_or_default();

        assert_eq!(grants[0].principal, "${var.prod_service_principal}");
        assert_eq!(grants[1].principal, "${var.operations_group}");
        assert_eq!(grants[1].level, PermissionLevel::CanManage);
        assert!(
            grants[2..]
                .iter()
                .all(|g| g.level == PermissionLevel::CanView)
        );
    }

    #[test]
    fn test_user_target_has_no_grants() {
        let config = TemplateConfig::with_defaults("acme");
        let set = PermissionSet::select(&config);
        assert!(set.is_some_and(|s| s.grants_for(TargetName::User).is_empty()));
    }
}
