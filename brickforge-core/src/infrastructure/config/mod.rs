pub mod project;

pub use project::{HOST_ENV_VAR, load_project_config, load_template_config, read_template_config};
