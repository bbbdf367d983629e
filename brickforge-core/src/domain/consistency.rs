// brickforge-core/src/domain/consistency.rs

use regex::Regex;
use serde_yaml::Value;
use tracing::{debug, instrument};

use crate::domain::environment::{PLACEHOLDER_HOST_PREFIX, TargetName};
use crate::domain::error::DomainError;
use crate::domain::fragments::SP_PLACEHOLDER;
use crate::domain::fragments::permissions::{ANALYTICS_TEAM, DEVELOPERS, OPERATIONS, QA_TEAM};
use crate::domain::project::{ProjectTree, layout};
use crate::domain::resolve::ResolvedValues;

/// Re-checks a rendered tree against the values it was rendered from.
///
/// Any finding means the templates and the resolver disagree; generation
/// aborts before the tree reaches disk.
pub struct ConsistencyChecker<'a> {
    resolved: &'a ResolvedValues,
    tree: &'a ProjectTree,
    violations: Vec<String>,
}

impl<'a> ConsistencyChecker<'a> {
    #[instrument(skip_all, fields(project = %resolved.project_name, files = tree.len()))]
    pub fn verify(resolved: &'a ResolvedValues, tree: &'a ProjectTree) -> Result<(), DomainError> {
        let violations = Self::violations(resolved, tree);
        if violations.is_empty() {
            debug!("Generated tree is consistent");
            Ok(())
        } else {
            Err(DomainError::ConsistencyViolation(violations))
        }
    }

    pub fn violations(resolved: &'a ResolvedValues, tree: &'a ProjectTree) -> Vec<String> {
        let mut checker = Self {
            resolved,
            tree,
            violations: Vec::new(),
        };
        checker.check_ci_slots();
        checker.check_bundle_manifest();
        checker.check_variables();
        checker.check_placeholders();
        checker.check_shared_names();
        checker.check_active_pipeline();
        checker.check_compute();
        checker.violations
    }

    fn fail(&mut self, message: impl Into<String>) {
        self.violations.push(message.into());
    }

    fn parse(&mut self, path: &str) -> Option<Value> {
        let tree = self.tree;
        let Some(content) = tree.get(path) else {
            self.fail(format!("{path} is missing"));
            return None;
        };
        match serde_yaml::from_str::<Value>(content) {
            Ok(value) => Some(value),
            Err(e) => {
                self.fail(format!("{path} is not valid YAML: {e}"));
                None
            }
        }
    }

    fn check_ci_slots(&mut self) {
        let (resolved, tree) = (self.resolved, self.tree);
        for slot in &resolved.paths.ci_slots {
            match tree.get(&slot.path) {
                None => self.fail(format!("CI slot {} is missing", slot.path)),
                Some(body) if slot.active && body.trim().is_empty() => {
                    self.fail(format!("active CI slot {} is empty", slot.path))
                }
                Some(body) if !slot.active && !body.trim().is_empty() => {
                    self.fail(format!("inactive CI slot {} has content", slot.path))
                }
                Some(_) => {}
            }
        }
    }

    fn check_bundle_manifest(&mut self) {
        let (resolved, tree) = (self.resolved, self.tree);
        let Some(manifest) = self.parse(layout::BUNDLE_MANIFEST) else {
            return;
        };

        if manifest["bundle"]["name"].as_str() != Some(resolved.project_name.as_str()) {
            self.fail("databricks.yml bundle.name differs from project_name");
        }

        let declared: Vec<String> = manifest["targets"]
            .as_mapping()
            .map(|m| m.keys().filter_map(|k| k.as_str().map(String::from)).collect())
            .unwrap_or_default();
        let expected = resolved.target_names();
        if declared != expected {
            self.fail(format!(
                "databricks.yml targets are {declared:?}, expected {expected:?}"
            ));
        }

        let mut placeholder_hosts: Vec<String> = Vec::new();
        for target in &resolved.targets {
            let node = &manifest["targets"][target.name.as_str()];
            let host = node["workspace"]["host"].as_str().unwrap_or_default();

            if host != target.host {
                self.fail(format!(
                    "targets.{}.workspace.host is '{host}', expected '{}'",
                    target.name, target.host
                ));
            }
            if node["variables"]["catalog_name"].as_str() != Some(target.catalog_name.as_str()) {
                self.fail(format!(
                    "targets.{}.variables.catalog_name differs from '{}'",
                    target.name, target.catalog_name
                ));
            }

            if target.name == TargetName::User {
                if host.contains("${") || host.contains(PLACEHOLDER_HOST_PREFIX) {
                    self.fail(format!("user target host '{host}' is not a literal URL"));
                }
            } else if resolved.multi_workspace {
                if placeholder_hosts.iter().any(|h| h == host) {
                    self.fail(format!("placeholder host '{host}' is shared by two targets"));
                }
                placeholder_hosts.push(host.to_string());
            }

            let has_block = !node["permissions"].is_null();
            let wants_block = !target.permissions.is_empty();
            if has_block != wants_block {
                self.fail(format!(
                    "targets.{} permissions block present={has_block}, expected {wants_block}",
                    target.name
                ));
            }
        }

        let mentions = tree
            .get(layout::BUNDLE_MANIFEST)
            .is_some_and(|c| c.contains("permissions:"));
        if mentions != resolved.permissions_enabled() {
            self.fail("databricks.yml permissions blocks disagree with include_permissions");
        }
    }

    fn check_variables(&mut self) {
        let resolved = self.resolved;
        let Some(doc) = self.parse(layout::VARIABLES) else {
            return;
        };
        let variables = &doc["variables"];
        let declared = |name: &str| !variables[name].is_null();

        for name in [TargetName::Dev, TargetName::Stage, TargetName::Prod] {
            let variable = name.service_principal_variable();
            let exists = resolved.target(name).is_some();
            if declared(variable) != exists {
                self.fail(format!(
                    "variables.yml {variable} declared={}, target exists={exists}",
                    declared(variable)
                ));
            }
        }

        let groups = resolved
            .permissions
            .as_ref()
            .map(|p| p.groups.clone())
            .unwrap_or_default();
        for group in [DEVELOPERS, QA_TEAM, ANALYTICS_TEAM, OPERATIONS] {
            let wanted = groups.contains(&group);
            if declared(group.variable) != wanted {
                self.fail(format!(
                    "variables.yml {} declared={}, expected {wanted}",
                    group.variable,
                    declared(group.variable)
                ));
            }
        }

        let host_variables: Vec<String> = variables
            .as_mapping()
            .map(|m| {
                m.keys()
                    .filter_map(|k| k.as_str())
                    .filter(|k| k.starts_with("workspace_host"))
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        let expected: Vec<String> = resolved
            .host_variables
            .iter()
            .map(|v| v.variable.clone())
            .collect();
        if host_variables != expected {
            self.fail(format!(
                "variables.yml host variables are {host_variables:?}, expected {expected:?}"
            ));
        }

        for binding in &resolved.service_principals {
            let default = variables[binding.variable]["default"].as_str();
            if default != Some(binding.value.as_str()) {
                self.fail(format!(
                    "variables.yml {} default is {default:?}, expected '{}'",
                    binding.variable, binding.value
                ));
            }
        }

        if variables["catalog_name"]["default"].as_str() != Some(resolved.default_catalog.as_str())
        {
            self.fail("variables.yml catalog_name default differs from the dev catalog");
        }
    }

    fn check_placeholders(&mut self) {
        let (resolved, tree) = (self.resolved, self.tree);
        if !resolved.multi_workspace {
            let offenders: Vec<String> = tree
                .files_containing(PLACEHOLDER_HOST_PREFIX)
                .into_iter()
                .map(String::from)
                .collect();
            if !offenders.is_empty() {
                self.fail(format!(
                    "single_workspace project contains host placeholders in {offenders:?}"
                ));
            }
        }

        if resolved.sp_configured {
            let offenders: Vec<String> = tree
                .files_containing(SP_PLACEHOLDER)
                .into_iter()
                .map(String::from)
                .collect();
            if !offenders.is_empty() {
                self.fail(format!(
                    "service principals are configured but {offenders:?} still hold {SP_PLACEHOLDER}"
                ));
            }
        }
    }

    fn check_shared_names(&mut self) {
        let (resolved, tree) = (self.resolved, self.tree);
        let project = resolved.project_name.clone();
        let suffix = resolved.catalog_suffix.clone();
        for path in [layout::BUNDLE_MANIFEST, layout::VARIABLES, layout::README] {
            let Some(content) = tree.get(path) else {
                self.fail(format!("{path} is missing"));
                continue;
            };
            if !content.contains(&project) {
                self.fail(format!("{path} does not mention project '{project}'"));
            }
            if !content.contains(&suffix) {
                self.fail(format!("{path} does not mention catalog suffix '{suffix}'"));
            }
        }
    }

    fn check_active_pipeline(&mut self) {
        let (resolved, tree) = (self.resolved, self.tree);
        let Some(path) = resolved.paths.active_ci_slot.clone() else {
            return;
        };
        let Some(content) = tree.get(&path).map(str::to_owned) else {
            return;
        };
        let pipeline = &resolved.pipeline;

        for branch in &pipeline.trigger_branches {
            if !content.contains(branch.as_str()) {
                self.fail(format!("{path} never names branch '{branch}'"));
            }
        }
        for var in &pipeline.auth_variables {
            if !content.contains(var.name) {
                self.fail(format!("{path} is missing auth variable {}", var.name));
            }
        }
        for var in &pipeline.excluded_variables {
            if content.contains(var.name) {
                self.fail(format!("{path} mentions foreign auth variable {}", var.name));
            }
        }

        match Regex::new(r"setup-cli/v([0-9][0-9A-Za-z.\-]*)/") {
            Ok(re) => {
                let versions: Vec<&str> = re
                    .captures_iter(&content)
                    .filter_map(|c| c.get(1).map(|m| m.as_str()))
                    .collect();
                if versions.is_empty() {
                    self.fail(format!("{path} never installs the Databricks CLI"));
                }
                if let Some(other) = versions.iter().find(|v| **v != pipeline.cli_version) {
                    self.fail(format!(
                        "{path} installs CLI v{other}, expected v{}",
                        pipeline.cli_version
                    ));
                }
            }
            Err(e) => self.fail(format!("CLI version pattern failed to compile: {e}")),
        }
    }

    fn check_compute(&mut self) {
        let (resolved, tree) = (self.resolved, self.tree);
        let compute = &resolved.compute;
        let pipeline_path = resolved.paths.pipeline.clone();
        let job_path = resolved.paths.ingestion_job.clone();

        if let Some(content) = tree.get(&pipeline_path) {
            if content.contains("serverless:") != compute.serverless {
                self.fail(format!(
                    "{pipeline_path} serverless block disagrees with compute_type {}",
                    compute.compute_type
                ));
            }
        } else {
            self.fail(format!("{pipeline_path} is missing"));
        }

        if let Some(content) = tree.get(&job_path) {
            if content.contains("node_type_id") != compute.classic.is_some() {
                self.fail(format!(
                    "{job_path} classic cluster disagrees with compute_type {}",
                    compute.compute_type
                ));
            }
        } else {
            self.fail(format!("{job_path} is missing"));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::project::{CicdPlatform, TemplateConfig};
    use crate::domain::resolve::resolve;
    use anyhow::Result;

    /// A hand-written tree matching the default configuration.
    fn consistent_tree(resolved: &ResolvedValues) -> ProjectTree {
        let host = &resolved.current_host;
        let mut tree = ProjectTree::new();
        tree.insert(
            layout::BUNDLE_MANIFEST,
            format!(
                r#"bundle:
  name: acme
targets:
  user:
    mode: development
    default: true
    workspace:
      host: {host}
    variables:
      catalog_name: dev_my_domain
  stage:
    workspace:
      host: {host}
    variables:
      catalog_name: stage_my_domain
    permissions:
      - group_name: "${{var.developers_group}}"
        level: CAN_VIEW
  prod:
    workspace:
      host: {host}
    variables:
      catalog_name: prod_my_domain
    permissions:
      - group_name: "${{var.operations_group}}"
        level: CAN_MANAGE
"#
            ),
        );
        tree.insert(
            layout::VARIABLES,
            r#"# acme
variables:
  catalog_name:
    default: dev_my_domain
  schema_prefix:
    default: ""
  stage_service_principal:
    default: SP_PLACEHOLDER
  prod_service_principal:
    default: SP_PLACEHOLDER
  developers_group:
    default: developers
  qa_team_group:
    default: qa_team
  analytics_team_group:
    default: analytics_team
  operations_group:
    default: operations_team
"#,
        );
        tree.insert(layout::README, "# acme\n\nCatalogs: dev_my_domain\n");
        tree.insert(
            ".azure/devops_pipelines/acme_bundle_cicd.yml",
            "trigger: [main, release]\n\
             # setup-cli/v0.240.0/install.sh\n\
             ARM_TENANT_ID ARM_CLIENT_ID ARM_CLIENT_SECRET\n",
        );
        tree.insert(".github/workflows/acme_bundle_cicd.yml", "");
        tree.insert(".gitlab-ci.yml", "");
        tree.insert(&resolved.paths.pipeline, "serverless: true\n");
        tree.insert(&resolved.paths.ingestion_job, "environments: []\n");
        tree
    }

    #[test]
    fn test_consistent_tree_passes() -> Result<()> {
        let resolved = resolve(&TemplateConfig::with_defaults("acme"))?;
        let tree = consistent_tree(&resolved);
        let violations = ConsistencyChecker::violations(&resolved, &tree);
        assert!(violations.is_empty(), "{violations:#?}");
        Ok(())
    }

    #[test]
    fn test_inactive_slot_with_content_is_flagged() -> Result<()> {
        let resolved = resolve(&TemplateConfig::with_defaults("acme"))?;
        let mut tree = consistent_tree(&resolved);
        tree.insert(".gitlab-ci.yml", "stages: [ci]\n");

        let err = ConsistencyChecker::verify(&resolved, &tree).unwrap_err();
        assert!(err.to_string().contains("inactive CI slot .gitlab-ci.yml"));
        Ok(())
    }

    #[test]
    fn test_foreign_auth_variable_is_flagged() -> Result<()> {
        let resolved = resolve(&TemplateConfig::with_defaults("acme"))?;
        let mut tree = consistent_tree(&resolved);
        let path = ".azure/devops_pipelines/acme_bundle_cicd.yml";
        let body = format!("{}DATABRICKS_HOST\n", tree.get(path).unwrap());
        tree.insert(path, body);

        let violations = ConsistencyChecker::violations(&resolved, &tree);
        assert_eq!(violations.len(), 1, "{violations:#?}");
        assert!(violations[0].contains("DATABRICKS_HOST"));
        Ok(())
    }

    #[test]
    fn test_drifting_cli_version_is_flagged() -> Result<()> {
        let resolved = resolve(&TemplateConfig::with_defaults("acme"))?;
        let mut tree = consistent_tree(&resolved);
        let path = ".azure/devops_pipelines/acme_bundle_cicd.yml";
        let body = format!("{}setup-cli/v0.1.0/install.sh\n", tree.get(path).unwrap());
        tree.insert(path, body);

        let violations = ConsistencyChecker::violations(&resolved, &tree);
        assert!(violations.iter().any(|v| v.contains("v0.1.0")), "{violations:#?}");
        Ok(())
    }

    #[test]
    fn test_placeholder_leak_under_single_workspace() -> Result<()> {
        let resolved = resolve(&TemplateConfig::with_defaults("acme"))?;
        let mut tree = consistent_tree(&resolved);
        tree.insert("docs/CI_CD_SETUP.md", "Replace WORKSPACE_HOST_PLACEHOLDER_STAGE\n");

        let violations = ConsistencyChecker::violations(&resolved, &tree);
        assert!(violations.iter().any(|v| v.contains("docs/CI_CD_SETUP.md")));
        Ok(())
    }

    #[test]
    fn test_missing_target_is_flagged() -> Result<()> {
        let mut config = TemplateConfig::with_defaults("acme");
        config.cicd_platform = CicdPlatform::Disabled;
        let resolved = resolve(&config)?;
        let mut tree = consistent_tree(&resolved);
        tree.insert(".azure/devops_pipelines/acme_bundle_cicd.yml", "");
        let manifest = tree.get(layout::BUNDLE_MANIFEST).unwrap().replace("  prod:", "  production:");
        tree.insert(layout::BUNDLE_MANIFEST, manifest);

        let violations = ConsistencyChecker::violations(&resolved, &tree);
        assert!(violations.iter().any(|v| v.contains("targets are")), "{violations:#?}");
        Ok(())
    }
}
