// brickforge-core/src/infrastructure/compiler/templates.rs

/// Template sources compiled into the binary, keyed by loader name.
pub const EMBEDDED_TEMPLATES: &[(&str, &str)] = &[
    ("bundle/databricks.yml.j2", include_str!("../../../templates/bundle/databricks.yml.j2")),
    ("bundle/variables.yml.j2", include_str!("../../../templates/bundle/variables.yml.j2")),
    ("cicd/azure_devops.yml.j2", include_str!("../../../templates/cicd/azure_devops.yml.j2")),
    ("cicd/github_actions.yml.j2", include_str!("../../../templates/cicd/github_actions.yml.j2")),
    ("cicd/gitlab.yml.j2", include_str!("../../../templates/cicd/gitlab.yml.j2")),
    ("docs/CI_CD_SETUP.md.j2", include_str!("../../../templates/docs/CI_CD_SETUP.md.j2")),
    ("docs/PERMISSIONS_SETUP.md.j2", include_str!("../../../templates/docs/PERMISSIONS_SETUP.md.j2")),
    ("docs/QUICKSTART.md.j2", include_str!("../../../templates/docs/QUICKSTART.md.j2")),
    ("docs/README.md.j2", include_str!("../../../templates/docs/README.md.j2")),
    ("docs/SETUP_GROUPS.md.j2", include_str!("../../../templates/docs/SETUP_GROUPS.md.j2")),
    ("project/cluster_configs.yml.j2", include_str!("../../../templates/project/cluster_configs.yml.j2")),
    ("project/gitignore.j2", include_str!("../../../templates/project/gitignore.j2")),
    ("project/requirements_dev.txt.j2", include_str!("../../../templates/project/requirements_dev.txt.j2")),
    ("resources/ingestion.job.yml.j2", include_str!("../../../templates/resources/ingestion.job.yml.j2")),
    ("resources/pipeline.pipeline.yml.j2", include_str!("../../../templates/resources/pipeline.pipeline.yml.j2")),
    ("resources/pipeline_trigger.job.yml.j2", include_str!("../../../templates/resources/pipeline_trigger.job.yml.j2")),
    ("resources/schemas.yml.j2", include_str!("../../../templates/resources/schemas.yml.j2")),
    ("src/bronze.py.j2", include_str!("../../../templates/src/bronze.py.j2")),
    ("src/ingest_to_raw.py.j2", include_str!("../../../templates/src/ingest_to_raw.py.j2")),
    ("src/silver.py.j2", include_str!("../../../templates/src/silver.py.j2")),
    ("tests/__init__.py.j2", include_str!("../../../templates/tests/__init__.py.j2")),
    ("tests/test_placeholder.py.j2", include_str!("../../../templates/tests/test_placeholder.py.j2")),
];
