//! Web search through the Serper API.

use super::{Tool, ToolResult};
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

pub const SERPER_SEARCH_URL: &str = "https://google.serper.dev/search";

/// Number of organic results rendered back to the model.
const MAX_RESULTS: usize = 8;

/// `web_search`: Google results via serper.dev.
///
/// Construction never fails. Without an API key the tool still registers and
/// reports the problem when it is called.
#[derive(Debug, Clone)]
pub struct SerperSearchTool {
    api_key: Option<String>,
    client: reqwest::Client,
}

impl SerperSearchTool {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Tool for SerperSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the internet with a query and return the top results (title, link, snippet)."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Value) -> Result<ToolResult> {
        let Some(query) = params
            .get("query")
            .or_else(|| params.get("search_query"))
            .and_then(Value::as_str)
            .filter(|q| !q.trim().is_empty())
        else {
            return Ok(ToolResult::error("Missing required parameter: query"));
        };

        let Some(api_key) = self.api_key.as_deref() else {
            warn!("web_search called without SERPER_API_KEY");
            return Ok(ToolResult::error(
                "Web search is unavailable: SERPER_API_KEY is not set",
            ));
        };

        debug!(query, "Running web search");
        let response = self
            .client
            .post(SERPER_SEARCH_URL)
            .header("X-API-KEY", api_key)
            .json(&json!({ "q": query }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Ok(ToolResult::error(format!(
                "Search request failed ({status}): {body}"
            )));
        }

        let results: SearchResponse = response.json().await?;
        Ok(ToolResult::success(render_results(query, &results)))
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

fn render_results(query: &str, results: &SearchResponse) -> String {
    if results.organic.is_empty() {
        return format!("No results found for '{query}'.");
    }

    let blocks: Vec<String> = results
        .organic
        .iter()
        .take(MAX_RESULTS)
        .map(|r| format!("Title: {}\nLink: {}\nSnippet: {}", r.title, r.link, r.snippet))
        .collect();

    format!("Search results for '{query}':\n\n{}", blocks.join("\n---\n"))
}
