// brickforge-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Invalid value '{value}' for option '{option}'")]
    #[diagnostic(
        code(brickforge::domain::invalid_option),
        help("Expected one of: {expected}")
    )]
    InvalidOption {
        option: String,
        value: String,
        expected: String,
    },

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(brickforge::domain::invalid_configuration),
        help("Run `brickforge options` to list every recognized key and its legal values.")
    )]
    InvalidConfiguration(String),

    #[error("Service principal for target '{target}' is required when configure_sp_now is 'yes'")]
    #[diagnostic(
        code(brickforge::domain::missing_service_principal),
        help("Set '{key}' to the application id of the service principal, or set configure_sp_now to 'no'.")
    )]
    MissingServicePrincipal { target: String, key: String },

    #[error("Generated project is inconsistent ({} violation(s)): {}", .0.len(), .0.join("; "))]
    #[diagnostic(
        code(brickforge::domain::consistency),
        help("This is a generator defect: the rendered files disagree with the resolved configuration.")
    )]
    ConsistencyViolation(Vec<String>),
}
