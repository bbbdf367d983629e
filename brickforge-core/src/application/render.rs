// brickforge-core/src/application/render.rs

use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::cicd::emitter_for;
use crate::application::ports::TemplateEngine;
use crate::domain::project::{CicdPlatform, ProjectTree, layout};
use crate::domain::resolve::ResolvedValues;
use crate::error::ForgeError;

/// Where the body of a generated file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Template(&'static str),
    /// One CI slot. Inactive slots render as zero-length files.
    CiPipeline(CicdPlatform),
    /// The configuration echo.
    InitConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: String,
    pub source: FileSource,
}

impl PlannedFile {
    fn template(path: impl Into<String>, template: &'static str) -> Self {
        Self {
            path: path.into(),
            source: FileSource::Template(template),
        }
    }
}

/// Every file of the project, in a fixed order. The set of paths only
/// depends on the project name; options change file bodies, never presence.
pub fn plan_files(resolved: &ResolvedValues) -> Vec<PlannedFile> {
    let paths = &resolved.paths;

    let mut plan = vec![
        PlannedFile::template(layout::BUNDLE_MANIFEST, "bundle/databricks.yml.j2"),
        PlannedFile::template(layout::VARIABLES, "bundle/variables.yml.j2"),
        PlannedFile::template(layout::SCHEMAS, "resources/schemas.yml.j2"),
        PlannedFile::template(&paths.ingestion_job, "resources/ingestion.job.yml.j2"),
        PlannedFile::template(&paths.pipeline, "resources/pipeline.pipeline.yml.j2"),
        PlannedFile::template(
            &paths.pipeline_trigger_job,
            "resources/pipeline_trigger.job.yml.j2",
        ),
    ];

    plan.extend(paths.ci_slots.iter().map(|slot| PlannedFile {
        path: slot.path.clone(),
        source: FileSource::CiPipeline(slot.platform),
    }));

    plan.extend([
        PlannedFile::template(layout::README, "docs/README.md.j2"),
        PlannedFile::template(layout::QUICKSTART, "docs/QUICKSTART.md.j2"),
        PlannedFile::template(layout::CI_CD_SETUP, "docs/CI_CD_SETUP.md.j2"),
        PlannedFile::template(layout::PERMISSIONS_SETUP, "docs/PERMISSIONS_SETUP.md.j2"),
        PlannedFile::template(layout::SETUP_GROUPS, "docs/SETUP_GROUPS.md.j2"),
        PlannedFile::template("src/jobs/ingest_to_raw.py", "src/ingest_to_raw.py.j2"),
        PlannedFile::template("src/pipelines/bronze.py", "src/bronze.py.j2"),
        PlannedFile::template("src/pipelines/silver.py", "src/silver.py.j2"),
        PlannedFile::template("tests/__init__.py", "tests/__init__.py.j2"),
        PlannedFile::template("tests/test_placeholder.py", "tests/test_placeholder.py.j2"),
        PlannedFile::template("requirements_dev.txt", "project/requirements_dev.txt.j2"),
        PlannedFile::template(layout::CLUSTER_CONFIGS, "project/cluster_configs.yml.j2"),
        PlannedFile::template(".gitignore", "project/gitignore.j2"),
        PlannedFile {
            path: layout::INIT_CONFIG.to_string(),
            source: FileSource::InitConfig,
        },
    ]);

    plan
}

/// Context shared by every non-CI template: the resolved values plus the
/// credentials table the docs print.
pub fn template_context(resolved: &ResolvedValues) -> Result<Value, ForgeError> {
    let mut context =
        serde_json::to_value(resolved).map_err(|e| ForgeError::InternalError(e.to_string()))?;

    let credentials = serde_json::to_value(resolved.pipeline.credential_sources())
        .map_err(|e| ForgeError::InternalError(e.to_string()))?;
    let ci = match emitter_for(resolved.cicd_platform) {
        Some(emitter) => serde_json::to_value(emitter.context(&resolved.pipeline))
            .map_err(|e| ForgeError::InternalError(e.to_string()))?,
        None => Value::Null,
    };

    if let Value::Object(map) = &mut context {
        map.insert("credentials".to_string(), credentials);
        map.insert("ci".to_string(), ci);
    }
    Ok(context)
}

/// Renders the whole project in memory.
#[instrument(skip_all, fields(project = %resolved.project_name))]
pub fn render_project(
    resolved: &ResolvedValues,
    engine: &dyn TemplateEngine,
) -> Result<ProjectTree, ForgeError> {
    let context = template_context(resolved)?;
    let mut tree = ProjectTree::new();

    for file in plan_files(resolved) {
        let body = match &file.source {
            FileSource::Template(name) => engine.render(name, &context)?,
            FileSource::CiPipeline(platform) if *platform == resolved.cicd_platform => {
                match emitter_for(*platform) {
                    Some(emitter) => emitter.emit(&resolved.pipeline, engine)?,
                    None => String::new(),
                }
            }
            FileSource::CiPipeline(_) => String::new(),
            FileSource::InitConfig => {
                let mut json = serde_json::to_string_pretty(&resolved.config)
                    .map_err(|e| ForgeError::InternalError(e.to_string()))?;
                json.push('\n');
                json
            }
        };
        debug!(path = %file.path, bytes = body.len(), "Rendered");

        if tree.insert(file.path.clone(), body).is_some() {
            return Err(ForgeError::InternalError(format!(
                "file '{}' is planned twice",
                file.path
            )));
        }
    }

    Ok(tree)
}
