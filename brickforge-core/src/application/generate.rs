// brickforge-core/src/application/generate.rs

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::application::ports::TemplateEngine;
use crate::application::render::render_project;
use crate::domain::consistency::ConsistencyChecker;
use crate::domain::project::TemplateConfig;
use crate::domain::resolve::resolve;
use crate::error::ForgeError;
use crate::infrastructure::fs::{ensure_vacant, write_tree};

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub project_dir: PathBuf,
    pub files: usize,
    pub targets: Vec<&'static str>,
    pub host_is_example: bool,
}

/// Validate, resolve, render, verify, then write. Nothing reaches disk
/// unless every earlier step succeeds.
#[instrument(skip(config, engine), fields(project = %config.project_name))]
pub fn generate_project(
    config: &TemplateConfig,
    output_dir: &Path,
    engine: &dyn TemplateEngine,
) -> Result<GenerationReport, ForgeError> {
    let resolved = resolve(config)?;

    let project_dir = output_dir.join(&resolved.project_name);
    // Fail early, before rendering, on an occupied destination.
    ensure_vacant(&project_dir)?;

    let tree = render_project(&resolved, engine)?;
    ConsistencyChecker::verify(&resolved, &tree)?;

    write_tree(&tree, &project_dir)?;
    info!(path = ?project_dir, files = tree.len(), "Project generated");

    Ok(GenerationReport {
        project_dir,
        files: tree.len(),
        targets: resolved.target_names(),
        host_is_example: resolved.host_is_example,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::{
        CicdPlatform, CloudProvider, ComputeType, EnvironmentSetup, Toggle, WorkspaceSetup,
    };
    use crate::infrastructure::compiler::JinjaRenderer;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_every_option_combination_generates_a_consistent_project() -> Result<()> {
        let renderer = JinjaRenderer::embedded()?;
        let dir = tempdir()?;
        let mut count = 0;

        for setup in [EnvironmentSetup::Minimal, EnvironmentSetup::Full] {
            for dev in [Toggle::No, Toggle::Yes] {
                for compute in [ComputeType::Serverless, ComputeType::Classic, ComputeType::Both] {
                    for permissions in [Toggle::No, Toggle::Yes] {
                        for platform in [
                            CicdPlatform::Disabled,
                            CicdPlatform::AzureDevops,
                            CicdPlatform::GithubActions,
                            CicdPlatform::Gitlab,
                        ] {
                            for cloud in [CloudProvider::Azure, CloudProvider::Aws] {
                                for workspaces in
                                    [WorkspaceSetup::SingleWorkspace, WorkspaceSetup::MultiWorkspace]
                                {
                                    count += 1;
                                    let mut config =
                                        TemplateConfig::with_defaults(format!("p{count}"));
                                    config.environment_setup = setup;
                                    config.include_dev_environment = dev;
                                    config.compute_type = compute;
                                    config.include_permissions = permissions;
                                    config.cicd_platform = platform;
                                    config.cloud_provider = cloud;
                                    config.workspace_setup = workspaces;

                                    let report =
                                        generate_project(&config, dir.path(), &renderer)?;
                                    assert_eq!(report.files, 23, "{config:?}");
                                }
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_configured_service_principals_replace_placeholders() -> Result<()> {
        let renderer = JinjaRenderer::embedded()?;
        let dir = tempdir()?;

        let mut config = TemplateConfig::with_defaults("acme");
        config.configure_sp_now = Toggle::Yes;
        config.stage_service_principal = Some("22222222-2222-2222-2222-222222222222".into());
        config.prod_service_principal = Some("33333333-3333-3333-3333-333333333333".into());

        let report = generate_project(&config, dir.path(), &renderer)?;
        let variables = std::fs::read_to_string(report.project_dir.join("variables.yml"))?;
        assert!(variables.contains("33333333-3333-3333-3333-333333333333"));
        assert!(!variables.contains("SP_PLACEHOLDER"));
        Ok(())
    }

    #[test]
    fn test_names_that_look_like_yaml_scalars_stay_strings() -> Result<()> {
        let renderer = JinjaRenderer::embedded()?;
        let dir = tempdir()?;

        for name in ["123", "true", "null", "1e3", "0x1F"] {
            let config = TemplateConfig::with_defaults(name);
            let report = generate_project(&config, dir.path(), &renderer)?;
            assert_eq!(report.files, 23, "{name}");

            let manifest: serde_yaml::Value = serde_yaml::from_str(&std::fs::read_to_string(
                report.project_dir.join("databricks.yml"),
            )?)?;
            assert_eq!(manifest["bundle"]["name"].as_str(), Some(name));
        }
        Ok(())
    }

    #[test]
    fn test_invalid_config_leaves_no_directory() -> Result<()> {
        let renderer = JinjaRenderer::embedded()?;
        let dir = tempdir()?;

        let mut config = TemplateConfig::with_defaults("acme");
        config.configure_sp_now = Toggle::Yes;

        assert!(generate_project(&config, dir.path(), &renderer).is_err());
        assert!(!dir.path().join("acme").exists());
        Ok(())
    }
}
