//! Agent abstraction and management.
//!
//! This module provides the `Agent` trait, the model-backed
//! `AgentInstance`, the fixed role registry and the `AgentManager` used
//! during a run.

pub mod base;
pub mod instance;
pub mod manager;
pub mod registry;

pub use base::{Agent, AgentError, AgentEvent, AgentEventStream, ExecutionContext};
pub use instance::AgentInstance;
pub use manager::AgentManager;
pub use registry::{RoleEntry, ToolSelector, AGGREGATE_OUTPUT_FILE, ROLES};
