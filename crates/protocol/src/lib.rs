//! # ck-protocol
//!
//! Data models shared by every crew-kit crate.
//!
//! This crate defines:
//! - Configuration document records (YAML agents/tasks, TOML settings)
//! - Kickoff inputs and task/crew outputs
//! - Run state and the progress events emitted while a crew runs
//!
//! ## Modules
//!
//! - [`agent_models`]: Agent entries of `config/agents.yaml`
//! - [`task_models`]: Task entries of `config/tasks.yaml`
//! - [`config_models`]: Global settings from `crew.toml`
//! - [`crew_models`]: Inputs, task outputs and crew outputs
//! - [`process_models`]: Run status and the persisted run record
//! - [`events`]: Engine progress events
//!
//! ## Design Principles
//!
//! - Minimal dependencies: only serde, uuid and chrono
//! - Independent compilation: no dependencies on other crew-kit crates

pub mod agent_models;
pub mod config_models;
pub mod crew_models;
pub mod events;
pub mod process_models;
pub mod task_models;

// Re-export all public types for convenience
pub use agent_models::*;
pub use config_models::*;
pub use crew_models::*;
pub use events::*;
pub use process_models::*;
pub use task_models::*;
