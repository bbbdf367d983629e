// brickforge-core/src/infrastructure/mod.rs

pub mod compiler;
pub mod config;
pub mod error;
pub mod fs;
