// brickforge-core/src/domain/cicd/mod.rs

pub mod pipeline;

pub use pipeline::{
    AuthScheme, AuthVariable, CredentialBinding, JobKind, PipelineJob, PipelineSpec,
    PipelineStage, StageKind, cli_install_url,
};
