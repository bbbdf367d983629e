// brickforge-core/src/domain/fragments/service_principal.rs

use serde::Serialize;

use crate::domain::environment::TargetName;
use crate::domain::project::TemplateConfig;

/// Default for every service principal variable when the ids are supplied
/// after generation.
pub const SP_PLACEHOLDER: &str = "SP_PLACEHOLDER";

/// The service principal variable of one deployed target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicePrincipalBinding {
    pub target: TargetName,
    pub variable: &'static str,
    pub value: String,
    pub configured: bool,
}

/// One binding per deployed target, in output order. Ids are copied literally
/// when configure_sp_now is `yes`; otherwise every binding holds the placeholder.
pub fn select(config: &TemplateConfig) -> Vec<ServicePrincipalBinding> {
    let configure_now = config.configure_sp_now.is_yes();

    TargetName::deployed(config)
        .into_iter()
        .map(|target| {
            let literal = config
                .service_principal_id(target)
                .filter(|_| configure_now);
            ServicePrincipalBinding {
                target,
                variable: target.service_principal_variable(),
                value: literal.unwrap_or(SP_PLACEHOLDER).to_string(),
                configured: literal.is_some(),
            }
        })
        .collect()
}
