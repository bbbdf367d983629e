// brickforge-core/src/domain/project/mod.rs

pub mod configuration;
pub mod layout;
pub mod options;
pub mod tree;

pub use configuration::{DEFAULT_CATALOG_SUFFIX, DEFAULT_CLI_VERSION, TemplateConfig};
pub use options::{
    CicdPlatform, CloudProvider, ComputeType, EnvironmentSetup, OPTION_CATALOG, OptionSpec,
    Toggle, WorkspaceSetup,
};
pub use tree::ProjectTree;
