// brickforge-core/src/application/mod.rs

pub mod cicd;
pub mod describe;
pub mod generate;
pub mod ports;
pub mod render;
pub mod verify;

// --- RE-EXPORTS (FACADE PATTERN) ---
// `use brickforge_core::application::{generate_project, verify_project};`

pub use describe::{TargetSummary, describe_targets};
pub use generate::{GenerationReport, generate_project};
pub use render::{plan_files, render_project};
pub use verify::{VerificationReport, verify_project};
