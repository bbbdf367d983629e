// brickforge-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)]

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Domain (business core)
// Config model, targets, fragments, resolved values, consistency rules.
// Depends on NOTHING else (neither infra nor app).
pub mod domain;

// 2. Infrastructure (Adapters)
// Config files, minijinja renderer, filesystem.
// Depends on the Domain.
pub mod infrastructure;

// 3. Application (Use Cases)
// Orchestration (generate, verify, describe) and CI emitters.
// Depends on the Domain, the Infra and the Ports.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// use brickforge_core::ForgeError;
pub use error::ForgeError;
