// brickforge-core/src/application/describe.rs

use crate::domain::resolve::ResolvedValues;

/// One row of the `validate` target table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSummary {
    pub name: &'static str,
    pub mode: &'static str,
    pub host: String,
    pub catalog: String,
    pub run_as: String,
    pub grants: String,
}

pub fn describe_targets(resolved: &ResolvedValues) -> Vec<TargetSummary> {
    resolved
        .targets
        .iter()
        .map(|t| TargetSummary {
            name: t.name.as_str(),
            mode: t.mode.as_str(),
            host: t.host.clone(),
            catalog: t.catalog_name.clone(),
            run_as: t
                .run_as
                .clone()
                .unwrap_or_else(|| "current user".to_string()),
            grants: t
                .permissions
                .iter()
                .map(|g| format!("{} {}", strip_var(&g.principal), g.level.as_str()))
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect()
}

fn strip_var(reference: &str) -> &str {
    reference
        .strip_prefix("${var.")
        .and_then(|r| r.strip_suffix('}'))
        .unwrap_or(reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::{TemplateConfig, Toggle};
    use crate::domain::resolve::resolve;
    use anyhow::Result;

    #[test]
    fn test_rows_follow_target_order() -> Result<()> {
        let mut config = TemplateConfig::with_defaults("acme");
        config.include_dev_environment = Toggle::Yes;
        let rows = describe_targets(&resolve(&config)?);

        let names: Vec<&str> = rows.iter().map(|r| r.name).collect();
        assert_eq!(names, ["user", "dev", "stage", "prod"]);
        assert_eq!(rows[0].run_as, "current user");
        assert_eq!(rows[2].run_as, "${var.stage_service_principal}");
        assert!(rows[3].grants.starts_with("prod_service_principal CAN_MANAGE"));
        Ok(())
    }
}
