// brickforge-core/src/domain/environment/mod.rs

pub mod target;

pub use target::{
    DeploymentMode, HostPolicy, PLACEHOLDER_HOST_PREFIX, TargetName, TargetSpec, build_targets,
};
