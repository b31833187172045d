//! Shared helpers for the ck-core integration tests.
//!
//! - Project fixtures written into temporary directories
//! - Recording language models and a model provider
//! - Event assertions

pub mod assertions;
pub mod fixtures;
pub mod mock_models;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_models::*;
