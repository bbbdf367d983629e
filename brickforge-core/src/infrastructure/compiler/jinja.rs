// brickforge-core/src/infrastructure/compiler/jinja.rs

// Renders the project file templates. Templates are compiled into the binary
// unless a template directory is given, in which case it replaces the
// embedded set entirely.

use std::path::Path;

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use tracing::debug;

use crate::application::ports::TemplateEngine;
use crate::error::ForgeError;
use crate::infrastructure::compiler::templates::EMBEDDED_TEMPLATES;
use crate::infrastructure::error::InfrastructureError;

pub struct JinjaRenderer {
    env: Environment<'static>,
}

impl JinjaRenderer {
    /// Renderer over the templates shipped with the crate.
    pub fn embedded() -> Result<Self, InfrastructureError> {
        let mut env = Self::base_environment();
        for &(name, source) in EMBEDDED_TEMPLATES {
            env.add_template(name, source)?;
        }
        debug!(templates = EMBEDDED_TEMPLATES.len(), "Loaded embedded templates");
        Ok(Self { env })
    }

    /// Renderer reading templates from `dir` on demand.
    pub fn from_dir(dir: &Path) -> Self {
        let mut env = Self::base_environment();
        env.set_loader(minijinja::path_loader(dir));
        debug!(dir = ?dir, "Loading templates from directory");
        Self { env }
    }

    fn base_environment() -> Environment<'static> {
        let mut env = Environment::new();

        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        // Output is YAML, Markdown and Python; never escape.
        env.set_auto_escape_callback(|_| AutoEscape::None);
        // Context drift must fail loudly, never render an empty string.
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        // GitHub Actions expression syntax collides with Jinja delimiters.
        env.add_filter("gha_secret", |name: &str| format!("${{{{ secrets.{name} }}}}"));
        env.add_filter("gha_expr", |expr: &str| format!("${{{{ {expr} }}}}"));

        env
    }

    fn render_template(
        &self,
        name: &str,
        context: &serde_json::Value,
    ) -> Result<String, InfrastructureError> {
        let template = self.env.get_template(name).map_err(|e| {
            if e.kind() == minijinja::ErrorKind::TemplateNotFound {
                InfrastructureError::TemplateMissing(name.to_string())
            } else {
                InfrastructureError::from(e)
            }
        })?;
        Ok(template.render(context)?)
    }
}

impl TemplateEngine for JinjaRenderer {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, ForgeError> {
        Ok(self.render_template(template, context)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_github_filters_emit_expressions() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("gha.j2"),
            "{{ 'STAGE_ARM_CLIENT_ID' | gha_secret }} {{ 'github.ref' | gha_expr }}",
        )?;
        let renderer = JinjaRenderer::from_dir(dir.path());

        let out = renderer.render("gha.j2", &json!({}))?;
        assert_eq!(
            out,
            "${{ secrets.STAGE_ARM_CLIENT_ID }} ${{ github.ref }}"
        );
        Ok(())
    }

    #[test]
    fn test_undefined_values_are_errors() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("t.j2"), "name: {{ project_name }}\n")?;
        let renderer = JinjaRenderer::from_dir(dir.path());

        assert_eq!(
            renderer.render("t.j2", &json!({"project_name": "acme"}))?,
            "name: acme\n"
        );
        assert!(renderer.render("t.j2", &json!({})).is_err());
        Ok(())
    }

    #[test]
    fn test_missing_template_is_reported_by_name() -> Result<()> {
        let dir = tempdir()?;
        let renderer = JinjaRenderer::from_dir(dir.path());

        let err = renderer.render("bundle/databricks.yml.j2", &json!({})).unwrap_err();
        assert!(matches!(
            err,
            ForgeError::Infrastructure(InfrastructureError::TemplateMissing(ref name))
                if name == "bundle/databricks.yml.j2"
        ));
        Ok(())
    }

    #[test]
    fn test_embedded_templates_parse() -> Result<()> {
        let renderer = JinjaRenderer::embedded()?;
        for &(name, _) in EMBEDDED_TEMPLATES {
            assert!(renderer.env.get_template(name).is_ok(), "{name}");
        }
        Ok(())
    }
}
