//! Process environment settings.
//!
//! The environment is read exactly once, at process start, into a
//! [`Settings`] value that is then passed down explicitly. Nothing below the
//! entry point calls `std::env::var`.

use tracing::debug;

/// Environment variable holding the general-purpose model id.
pub const ENV_GENERAL_MODEL: &str = "OLLAMA_LLAMA3";

/// Environment variable holding the reasoning model id.
pub const ENV_REASONING_MODEL: &str = "OLLAMA_GEMMA3";

/// Environment variable holding the code model id.
pub const ENV_CODE_MODEL: &str = "OLLAMA_DEEPSEEK";

/// Environment variable holding the web search API key.
pub const ENV_SERPER_API_KEY: &str = "SERPER_API_KEY";

pub const DEFAULT_GENERAL_MODEL: &str = "llama3.2";
pub const DEFAULT_REASONING_MODEL: &str = "gemma2:2b";
pub const DEFAULT_CODE_MODEL: &str = "deepseek-coder:1.3b";

/// Values taken from the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Model id for the general handle (manager and overlord).
    pub general_model: String,

    /// Model id for the reasoning handle (researcher and analyst).
    pub reasoning_model: String,

    /// Model id for the code handle (coding agent).
    pub code_model: String,

    /// Key for the web search API. Only checked when a search runs.
    pub serper_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    /// Load `.env` (overriding existing variables) and read the environment.
    pub fn from_env() -> Self {
        match dotenvy::dotenv_override() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(e) => debug!("No .env file loaded: {e}"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// Unset and empty variables both fall back to the built-in defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            general_model: read(ENV_GENERAL_MODEL)
                .unwrap_or_else(|| DEFAULT_GENERAL_MODEL.to_string()),
            reasoning_model: read(ENV_REASONING_MODEL)
                .unwrap_or_else(|| DEFAULT_REASONING_MODEL.to_string()),
            code_model: read(ENV_CODE_MODEL).unwrap_or_else(|| DEFAULT_CODE_MODEL.to_string()),
            serper_api_key: read(ENV_SERPER_API_KEY),
        }
    }
}
