//! Builds the shared model handles.

use super::{LanguageModel, LlmError, LlmResult, ModelHandle};
use crate::config::Settings;
use ck_protocol::config_models::GlobalConfig;
use reqwest::Url;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// The three model groups an agent can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Overlord and crew manager.
    General,
    /// Researcher and analyst.
    Reasoning,
    /// Coding agent.
    Code,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::General => "general",
            ModelKind::Reasoning => "reasoning",
            ModelKind::Code => "code",
        };
        f.write_str(name)
    }
}

/// Source of models for the assembler.
///
/// [`ModelFactory`] is the production implementation; tests provide scripted
/// models instead.
pub trait ModelProvider: Send + Sync {
    fn model(&self, kind: ModelKind) -> Arc<dyn LanguageModel>;
}

/// Holds one handle per [`ModelKind`], all bound to the same endpoint.
#[derive(Debug, Clone)]
pub struct ModelFactory {
    general: Arc<ModelHandle>,
    reasoning: Arc<ModelHandle>,
    code: Arc<ModelHandle>,
    endpoint: Url,
    stream: bool,
    client: reqwest::Client,
}

impl ModelFactory {
    /// Build the three handles.
    ///
    /// Nothing is contacted here. The only possible failure is an endpoint in
    /// `crew.toml` that does not parse as a URL.
    pub fn new(settings: &Settings, global: &GlobalConfig) -> LlmResult<Self> {
        let endpoint = Url::parse(&global.endpoint).map_err(|e| LlmError::InvalidEndpoint {
            endpoint: global.endpoint.clone(),
            reason: e.to_string(),
        })?;
        let client = reqwest::Client::new();

        let build = |kind: ModelKind, model_id: &str| {
            info!(kind = %kind, model = model_id, endpoint = %endpoint, "Binding model handle");
            Arc::new(ModelHandle::with_client(
                model_id,
                endpoint.clone(),
                global.stream,
                client.clone(),
            ))
        };

        Ok(Self {
            general: build(ModelKind::General, &settings.general_model),
            reasoning: build(ModelKind::Reasoning, &settings.reasoning_model),
            code: build(ModelKind::Code, &settings.code_model),
            endpoint: endpoint.clone(),
            stream: global.stream,
            client: client.clone(),
        })
    }

    /// The concrete handle for a kind.
    pub fn handle(&self, kind: ModelKind) -> &Arc<ModelHandle> {
        match kind {
            ModelKind::General => &self.general,
            ModelKind::Reasoning => &self.reasoning,
            ModelKind::Code => &self.code,
        }
    }

    /// A handle for an arbitrary model id on the same endpoint.
    pub fn ad_hoc(&self, model_id: &str) -> Arc<ModelHandle> {
        Arc::new(ModelHandle::with_client(
            model_id,
            self.endpoint.clone(),
            self.stream,
            self.client.clone(),
        ))
    }
}

impl ModelProvider for ModelFactory {
    fn model(&self, kind: ModelKind) -> Arc<dyn LanguageModel> {
        self.handle(kind).clone()
    }
}
