//! State management for crew runs.
//!
//! This module provides:
//! - Run state machine logic and the event sink
//! - RunStore persisting the latest run for replay

pub mod run;
pub mod store;

pub use run::EventSink;
pub use store::RunStore;
