//! Project scaffolding for `crew init`.
//!
//! Writes a ready-to-edit crew project into a directory:
//! - `crew.toml` with the global settings
//! - `config/agents.yaml` and `config/tasks.yaml` with the four roles
//! - `.env.example` listing the environment variables the CLI reads
//!
//! # Example
//!
//! ```no_run
//! use ck_core::init::{generate_crew_project, InitOptions};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("forex-crew"),
//!     force: false,
//! };
//!
//! let written = generate_crew_project(options).await?;
//! println!("Created {} files", written.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_crew_project, InitOptions, PROJECT_FILES};
pub use templates::get_template;
