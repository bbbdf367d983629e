// brickforge-core/src/domain/fragments/mod.rs

//! Per-option selections that several output files must agree on.

pub mod compute;
pub mod permissions;
pub mod service_principal;

pub use compute::{ClassicCluster, ComputeFragment, JobCompute, PipelineCompute};
pub use permissions::{GroupVariable, PermissionGrant, PermissionLevel, PermissionSet, var_ref};
pub use service_principal::{SP_PLACEHOLDER, ServicePrincipalBinding};
