// brickforge-core/src/domain/mod.rs

pub mod cicd;
pub mod consistency;
pub mod environment;
pub mod error;
pub mod fragments;
pub mod project;
pub mod resolve;

pub use error::DomainError;
pub use resolve::{ResolvedValues, resolve};
