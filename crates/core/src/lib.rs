//! # ck-core
//!
//! Crew assembly and execution for crew-kit.
//!
//! This crate provides:
//! - Configuration loading from a crew project directory
//! - Model handles bound to a local Ollama server
//! - Agents with a chat/tool loop and the role registry
//! - The crew engine: sequential and hierarchical runs, replay, training and testing
//! - Run records for replay
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and environment settings
//! - [`llm`]: Language model abstraction and Ollama handles
//! - [`tools`]: Tool trait and the web search tool
//! - [`agents`]: Agent trait, agent instances and the role registry
//! - [`crew`]: Crew assembly and kickoff
//! - [`engine`]: Task execution, delegation, training and evaluation
//! - [`state`]: Run state transitions and the run store
//! - [`init`]: Project scaffolding

pub mod agents;
pub mod config;
pub mod crew;
pub mod engine;
pub mod init;
pub mod llm;
pub mod state;
pub mod template;
pub mod tools;
