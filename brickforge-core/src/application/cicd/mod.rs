// brickforge-core/src/application/cicd/mod.rs

//! CI/CD pipeline emitters.
//!
//! Every platform renders the same [`PipelineSpec`]. An emitter only decides
//! platform naming: stage and job ids, how a secret is referenced, and how a
//! branch condition is spelled.

pub mod azure_devops;
pub mod github_actions;
pub mod gitlab;

use serde::Serialize;

use crate::application::ports::TemplateEngine;
use crate::domain::cicd::{JobKind, PipelineJob, PipelineSpec, PipelineStage, StageKind};
use crate::domain::project::CicdPlatform;
use crate::error::ForgeError;

pub use azure_devops::AzureDevOpsEmitter;
pub use github_actions::GithubActionsEmitter;
pub use gitlab::GitlabEmitter;

/// One environment variable as the platform spells it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvBinding {
    pub name: &'static str,
    pub value: String,
    pub secret: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformJob {
    pub id: &'static str,
    pub display_name: &'static str,
    pub target: &'static str,
    /// Job of the same stage that must succeed first.
    pub depends_on_job: Option<&'static str>,
    /// Every upstream job id, for platforms without stage-level gating.
    pub needs: Vec<&'static str>,
    pub run_unit_tests: bool,
    pub deploy: bool,
    pub env: Vec<EnvBinding>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformStage {
    pub id: &'static str,
    pub display_name: &'static str,
    pub depends_on: Option<&'static str>,
    /// Branch gate in the platform's expression syntax. `None` runs on
    /// every trigger.
    pub condition: Option<String>,
    pub jobs: Vec<PlatformJob>,
}

/// Template context of a CI pipeline file.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformPipeline<'a> {
    pub project_name: &'a str,
    pub platform_name: &'static str,
    pub spec: &'a PipelineSpec,
    pub stages: Vec<PlatformStage>,
}

pub fn stage_display_name(kind: StageKind) -> &'static str {
    match kind {
        StageKind::Ci => "Bundle CI",
        StageKind::StagingDeploy => "Staging bundle CD",
        StageKind::ProdDeploy => "Prod bundle CD",
    }
}

pub fn job_display_name(kind: JobKind) -> &'static str {
    match kind {
        JobKind::ValidateAndTest => "Validate bundle and run unit tests",
        JobKind::ValidateProd => "Validate prod bundle",
        JobKind::DeployStage => "Deploy bundle to stage",
        JobKind::DeployProd => "Deploy bundle to prod",
    }
}

pub trait CiEmitter: Send + Sync {
    fn platform(&self) -> CicdPlatform;

    /// Template rendering this platform's pipeline file.
    fn template_name(&self) -> &'static str;

    fn stage_id(&self, kind: StageKind) -> &'static str;

    fn job_id(&self, kind: JobKind) -> &'static str;

    /// How a job reads a stored variable, e.g. `$(STAGE_ARM_CLIENT_ID)`.
    fn variable_ref(&self, source: &str) -> String;

    /// Condition limiting a stage to pushes on the given branches.
    fn push_condition(&self, branches: &[String]) -> String;

    fn context<'a>(&self, spec: &'a PipelineSpec) -> PlatformPipeline<'a> {
        let stages = spec
            .stages
            .iter()
            .map(|stage| self.platform_stage(spec, stage))
            .collect();

        PlatformPipeline {
            project_name: &spec.project_name,
            platform_name: self.platform().display_name(),
            spec,
            stages,
        }
    }

    fn platform_stage(&self, spec: &PipelineSpec, stage: &PipelineStage) -> PlatformStage {
        let upstream: Vec<&'static str> = stage
            .needs
            .and_then(|kind| spec.stage(kind))
            .map(|s| s.jobs.iter().map(|j| self.job_id(j.kind)).collect())
            .unwrap_or_default();

        PlatformStage {
            id: self.stage_id(stage.kind),
            display_name: stage_display_name(stage.kind),
            depends_on: stage.needs.map(|kind| self.stage_id(kind)),
            condition: (!stage.push_branches.is_empty())
                .then(|| self.push_condition(&stage.push_branches)),
            jobs: stage
                .jobs
                .iter()
                .map(|job| self.platform_job(job, &upstream))
                .collect(),
        }
    }

    fn platform_job(&self, job: &PipelineJob, upstream: &[&'static str]) -> PlatformJob {
        let depends_on_job = job.needs.map(|kind| self.job_id(kind));
        let mut needs = upstream.to_vec();
        needs.extend(depends_on_job);

        PlatformJob {
            id: self.job_id(job.kind),
            display_name: job_display_name(job.kind),
            target: job.target.as_str(),
            depends_on_job,
            needs,
            run_unit_tests: job.run_unit_tests,
            deploy: job.deploy,
            env: job
                .credentials
                .iter()
                .map(|c| EnvBinding {
                    name: c.name,
                    value: self.variable_ref(&c.source),
                    secret: c.secret,
                })
                .collect(),
        }
    }

    /// Ids must be unique within the file.
    fn validate(&self, spec: &PipelineSpec) -> Result<(), ForgeError> {
        let mut seen: Vec<&'static str> = Vec::new();
        for job in spec.jobs() {
            let id = self.job_id(job.kind);
            if seen.contains(&id) {
                return Err(ForgeError::InternalError(format!(
                    "{} emitter produced duplicate job id '{id}'",
                    self.platform()
                )));
            }
            seen.push(id);
        }
        Ok(())
    }

    fn emit(&self, spec: &PipelineSpec, engine: &dyn TemplateEngine) -> Result<String, ForgeError> {
        self.validate(spec)?;
        let context = serde_json::to_value(self.context(spec))
            .map_err(|e| ForgeError::InternalError(e.to_string()))?;
        engine.render(self.template_name(), &context)
    }
}

/// The emitter of an active platform; `None` for `none`.
pub fn emitter_for(platform: CicdPlatform) -> Option<Box<dyn CiEmitter>> {
    match platform {
        CicdPlatform::Disabled => None,
        CicdPlatform::AzureDevops => Some(Box::new(AzureDevOpsEmitter)),
        CicdPlatform::GithubActions => Some(Box::new(GithubActionsEmitter)),
        CicdPlatform::Gitlab => Some(Box::new(GitlabEmitter)),
    }
}
