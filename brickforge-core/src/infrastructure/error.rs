// brickforge-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(brickforge::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / JSON / YAML ---
    #[error("JSON Parsing Error: {0}")]
    #[diagnostic(
        code(brickforge::infra::json),
        help("The configuration must be a JSON object; run `brickforge options` for the legal values.")
    )]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(brickforge::infra::config))]
    ConfigError(String),

    #[error("Configuration file not found at '{0}'")]
    #[diagnostic(code(brickforge::infra::config_missing))]
    ConfigNotFound(String),

    // --- TEMPLATING ---
    #[error("Template Rendering Error: {0}")]
    #[diagnostic(
        code(brickforge::infra::template),
        help("A template references a value the resolver does not provide, or has a syntax error.")
    )]
    TemplateError(#[source] minijinja::Error),

    #[error("Missing template: {0}")]
    #[diagnostic(
        code(brickforge::infra::template_missing),
        help("Every generated file needs its template. Check --template-dir or rebuild with the embedded set.")
    )]
    TemplateMissing(String),

    // --- OUTPUT ---
    #[error("Output directory '{0}' already exists and is not empty")]
    #[diagnostic(
        code(brickforge::infra::target_not_empty),
        help("Remove the directory, or choose another --output-dir.")
    )]
    TargetNotEmpty(String),
}

// A missing template gets its own variant; everything else stays a render error.
impl From<minijinja::Error> for InfrastructureError {
    fn from(err: minijinja::Error) -> Self {
        if err.kind() == minijinja::ErrorKind::TemplateNotFound {
            let detail = err
                .detail()
                .map(String::from)
                .unwrap_or_else(|| err.to_string());
            InfrastructureError::TemplateMissing(detail)
        } else {
            InfrastructureError::TemplateError(err)
        }
    }
}
