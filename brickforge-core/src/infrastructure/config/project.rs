// brickforge-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::Path;
use tracing::{info, instrument};

use crate::domain::project::{TemplateConfig, layout};
use crate::infrastructure::error::InfrastructureError;

/// Env var naming the invoking user's current workspace, as set by the
/// Databricks CLI profile tooling.
pub const HOST_ENV_VAR: &str = "DATABRICKS_HOST";

/// Loads a template configuration and layers the environment on top of it.
///
/// Validation is left to the domain (`TemplateConfig::check`), so a parsed
/// but invalid document still loads here.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn load_template_config(path: &Path) -> Result<TemplateConfig, InfrastructureError> {
    let mut config = read_template_config(path)?;
    apply_env_overrides(&mut config, std::env::var(HOST_ENV_VAR).ok());
    Ok(config)
}

/// Reads a configuration exactly as written, with no environment layering.
pub fn read_template_config(path: &Path) -> Result<TemplateConfig, InfrastructureError> {
    if !path.is_file() {
        return Err(InfrastructureError::ConfigNotFound(path.display().to_string()));
    }

    info!(path = ?path, "Loading template configuration");
    let content = fs::read_to_string(path)?;
    let config: TemplateConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// The configuration echoed into a generated project.
pub fn load_project_config(project_dir: &Path) -> Result<TemplateConfig, InfrastructureError> {
    read_template_config(&project_dir.join(layout::INIT_CONFIG))
}

fn apply_env_overrides(config: &mut TemplateConfig, host: Option<String>) {
    if config.workspace_host.is_some() {
        return;
    }
    if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
        info!(host = %host, "Using workspace host from {}", HOST_ENV_VAR);
        config.workspace_host = Some(host.trim().to_string());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_config_not_found() {
        let err = read_template_config(Path::new("/nonexistent/acme.json")).unwrap_err();
        assert!(matches!(err, InfrastructureError::ConfigNotFound(_)));
    }

    #[test]
    fn test_malformed_json_is_a_json_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(&path, "{ \"project_name\": ")?;

        let err = read_template_config(&path).unwrap_err();
        assert!(matches!(err, InfrastructureError::JsonError(_)));
        Ok(())
    }

    #[test]
    fn test_env_host_fills_only_a_missing_value() {
        let mut config = TemplateConfig::with_defaults("acme");
        apply_env_overrides(&mut config, Some("https://env.cloud.databricks.com".into()));
        assert_eq!(
            config.workspace_host.as_deref(),
            Some("https://env.cloud.databricks.com")
        );

        apply_env_overrides(&mut config, Some("https://other.cloud.databricks.com".into()));
        assert_eq!(
            config.workspace_host.as_deref(),
            Some("https://env.cloud.databricks.com")
        );
    }

    #[test]
    fn test_blank_env_host_is_ignored() {
        let mut config = TemplateConfig::with_defaults("acme");
        apply_env_overrides(&mut config, Some("  ".into()));
        assert!(config.workspace_host.is_none());
    }

    #[test]
    fn test_project_config_reads_the_echo() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("bundle_init_config.json"),
            r#"{"project_name": "acme", "cloud_provider": "gcp"}"#,
        )?;
        let config = load_project_config(dir.path())?;
        assert_eq!(config.project_name, "acme");
        Ok(())
    }
}
