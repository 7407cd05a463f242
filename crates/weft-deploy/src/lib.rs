//! Weft Deploy
//!
//! This crate turns a weft-core blueprint into a deployment plan:
//! namespaces collect deploy targets, the compiler validates them against
//! the connectivity graph and emits an ordered, deterministic plan for an
//! external provisioning engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 blueprint code                  │
//! │   (containers, services, machines, allow rules) │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 weft-deploy                     │
//! │  Namespace ──► Compiler ──► Plan ──► PlanWriter │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │        external provisioning engine             │
//! │        (trait ProvisionEngine, black box)       │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod compiler;
pub mod engine;
pub mod error;
pub mod namespace;
pub mod plan;
pub mod writer;

// Re-exports
pub use compiler::Compiler;
pub use engine::{ProvisionEngine, SshKeySource};
pub use error::{DeployError, Result};
pub use namespace::{Deployable, Namespace, NamespaceState};
pub use plan::{FirewallRule, Plan, PlanSummary, ResourceSpec};
pub use writer::PlanWriter;
