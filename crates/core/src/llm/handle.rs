//! Ollama-backed model handle.
//!
//! Talks to `POST {endpoint}/api/chat`. With streaming enabled the server
//! answers with newline-delimited JSON objects, one per delta; the final
//! object has `"done": true`.

use super::{
    ChatMessage, LanguageModel, LlmChunk, LlmError, LlmResult, LlmStream, Role, ToolCall,
    ToolDefinition,
};
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;
use tracing::debug;

/// Immutable binding of a model id to an inference endpoint.
///
/// Handles are created once by the [`ModelFactory`](super::ModelFactory) and
/// shared behind `Arc` by every agent that selects them. Construction never
/// touches the network; an unreachable server only shows up on the first
/// [`chat`](LanguageModel::chat).
#[derive(Debug)]
pub struct ModelHandle {
    model_id: String,
    endpoint: Url,
    stream: bool,
    client: reqwest::Client,
}

impl ModelHandle {
    pub fn new(model_id: impl Into<String>, endpoint: Url, stream: bool) -> Self {
        Self::with_client(model_id, endpoint, stream, reqwest::Client::new())
    }

    /// Create a handle that shares an existing connection pool.
    pub fn with_client(
        model_id: impl Into<String>,
        endpoint: Url,
        stream: bool,
        client: reqwest::Client,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            endpoint,
            stream,
            client,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn stream(&self) -> bool {
        self.stream
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.endpoint.as_str().trim_end_matches('/'))
    }

    fn build_request(&self, messages: Vec<ChatMessage>, tools: Vec<ToolDefinition>) -> OllamaRequest {
        OllamaRequest {
            model: self.model_id.clone(),
            messages: messages.into_iter().map(OllamaMessage::from).collect(),
            stream: self.stream,
            tools: tools.into_iter().map(OllamaTool::from).collect(),
        }
    }
}

#[async_trait]
impl LanguageModel for ModelHandle {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        tools: Vec<ToolDefinition>,
    ) -> LlmResult<LlmStream> {
        let request = self.build_request(messages, tools);
        debug!(
            model = %self.model_id,
            messages = request.messages.len(),
            tools = request.tools.len(),
            stream = self.stream,
            "Sending chat request"
        );

        let response = self
            .client
            .post(self.chat_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        if !self.stream {
            let chunk: OllamaChunk = response
                .json()
                .await
                .map_err(|e| LlmError::Stream(e.to_string()))?;
            let chunks = chunk.into_llm_chunks()?;
            return Ok(Box::pin(tokio_stream::iter(chunks.into_iter().map(Ok))));
        }

        let mut bytes = Box::pin(response.bytes_stream());
        let stream = async_stream::try_stream! {
            let mut buffer: Vec<u8> = Vec::new();
            while let Some(piece) = bytes.next().await {
                let piece = piece.map_err(|e| LlmError::Stream(e.to_string()))?;
                buffer.extend_from_slice(&piece);
                for line in drain_lines(&mut buffer)? {
                    for chunk in parse_line(&line)? {
                        yield chunk;
                    }
                }
            }
            // The last object may arrive without a trailing newline.
            let rest = decode_line(&buffer)?;
            if !rest.trim().is_empty() {
                for chunk in parse_line(&rest)? {
                    yield chunk;
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

/// Remove every complete line from `buffer` and return them decoded.
///
/// Bytes after the last newline stay in the buffer so a UTF-8 sequence split
/// across network reads is decoded only once it is complete.
fn drain_lines(buffer: &mut Vec<u8>) -> LlmResult<Vec<String>> {
    let mut lines = Vec::new();
    while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
        let line: Vec<u8> = buffer.drain(..=pos).collect();
        let line = decode_line(&line[..line.len() - 1])?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

fn decode_line(bytes: &[u8]) -> LlmResult<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| LlmError::Stream(e.to_string()))
}

/// Parse one NDJSON line of a streamed chat response.
fn parse_line(line: &str) -> LlmResult<Vec<LlmChunk>> {
    let chunk: OllamaChunk = serde_json::from_str(line.trim())
        .map_err(|e| LlmError::Stream(format!("{e} (line: {line})")))?;
    chunk.into_llm_chunks()
}

// ────────────────────────────────────────────────────────────────────────────
// Ollama wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<OllamaTool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<OllamaToolCall>,
}

impl From<ChatMessage> for OllamaMessage {
    fn from(message: ChatMessage) -> Self {
        let role = match message.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        };
        Self {
            role: role.to_string(),
            content: message.content,
            tool_calls: message
                .tool_calls
                .into_iter()
                .map(|call| OllamaToolCall {
                    function: OllamaFunctionCall {
                        name: call.name,
                        arguments: call.arguments,
                    },
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaToolCall {
    function: OllamaFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaFunctionCall {
    name: String,
    #[serde(default)]
    arguments: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct OllamaTool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: OllamaFunction,
}

#[derive(Debug, Serialize)]
struct OllamaFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

impl From<ToolDefinition> for OllamaTool {
    fn from(tool: ToolDefinition) -> Self {
        Self {
            kind: "function",
            function: OllamaFunction {
                name: tool.name,
                description: tool.description,
                parameters: tool.parameters,
            },
        }
    }
}

/// A response object: the whole answer, or one streamed delta.
#[derive(Debug, Deserialize)]
struct OllamaChunk {
    #[serde(default)]
    message: Option<OllamaMessage>,
    #[serde(default)]
    error: Option<String>,
}

impl OllamaChunk {
    fn into_llm_chunks(self) -> LlmResult<Vec<LlmChunk>> {
        if let Some(error) = self.error {
            return Err(LlmError::Stream(error));
        }

        let mut chunks = Vec::new();
        if let Some(message) = self.message {
            if !message.content.is_empty() {
                chunks.push(LlmChunk::Text(message.content));
            }
            if !message.tool_calls.is_empty() {
                let calls = message
                    .tool_calls
                    .into_iter()
                    .map(|call| ToolCall {
                        name: call.function.name,
                        arguments: call.function.arguments,
                    })
                    .collect();
                chunks.push(LlmChunk::ToolCalls(calls));
            }
        }
        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn handle(stream: bool) -> ModelHandle {
        let endpoint = Url::parse("http://localhost:11434").expect("valid url");
        ModelHandle::new("llama3.2", endpoint, stream)
    }

    #[test]
    fn test_chat_url_joins_endpoint() {
        assert_eq!(handle(true).chat_url(), "http://localhost:11434/api/chat");

        let nested = ModelHandle::new(
            "m",
            Url::parse("http://gpu-box:8080/ollama/").expect("valid url"),
            false,
        );
        assert_eq!(nested.chat_url(), "http://gpu-box:8080/ollama/api/chat");
    }

    #[test]
    fn test_request_body_shape() {
        let tools = vec![ToolDefinition {
            name: "web_search".to_string(),
            description: "Search the web".to_string(),
            parameters: json!({"type": "object"}),
        }];
        let request = handle(true).build_request(
            vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            tools,
        );
        let body = serde_json::to_value(&request).expect("serialize");

        assert_eq!(body["model"], "llama3.2");
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert!(body["messages"][1].get("tool_calls").is_none());
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "web_search");
    }

    #[test]
    fn test_request_omits_empty_tools() {
        let request = handle(false).build_request(vec![ChatMessage::user("hi")], vec![]);
        let body = serde_json::to_value(&request).expect("serialize");
        assert!(body.get("tools").is_none());
        assert_eq!(body["stream"], false);
    }

    #[test]
    fn test_drain_lines_keeps_partial_tail() {
        let mut buffer = b"{\"a\":1}\n\n{\"b\":".to_vec();
        let lines = drain_lines(&mut buffer).expect("decode");
        assert_eq!(lines, vec!["{\"a\":1}".to_string()]);
        assert_eq!(buffer, b"{\"b\":".to_vec());
    }

    #[test]
    fn test_drain_lines_waits_for_split_utf8() {
        // "é" is 0xC3 0xA9; only the first byte has arrived
        let mut buffer = vec![b'"', 0xC3];
        assert!(drain_lines(&mut buffer).expect("decode").is_empty());
        buffer.extend_from_slice(&[0xA9, b'"', b'\n']);
        assert_eq!(drain_lines(&mut buffer).expect("decode"), vec!["\"é\"".to_string()]);
    }

    #[test]
    fn test_parse_text_delta() {
        let line = r#"{"model":"llama3.2","message":{"role":"assistant","content":"Hel"},"done":false}"#;
        assert_eq!(
            parse_line(line).expect("parse"),
            vec![LlmChunk::Text("Hel".to_string())]
        );
    }

    #[test]
    fn test_parse_final_chunk_without_content() {
        let line = r#"{"model":"llama3.2","message":{"role":"assistant","content":""},"done":true,"eval_count":42}"#;
        assert!(parse_line(line).expect("parse").is_empty());
    }

    #[test]
    fn test_parse_tool_calls() {
        let line = r#"{"message":{"role":"assistant","content":"","tool_calls":[{"function":{"name":"web_search","arguments":{"query":"rust"}}}]},"done":true}"#;
        let chunks = parse_line(line).expect("parse");
        assert_eq!(
            chunks,
            vec![LlmChunk::ToolCalls(vec![ToolCall {
                name: "web_search".to_string(),
                arguments: json!({"query": "rust"}),
            }])]
        );
    }

    #[test]
    fn test_parse_server_error() {
        let line = r#"{"error":"model 'nope' not found"}"#;
        match parse_line(line) {
            Err(LlmError::Stream(message)) => assert!(message.contains("not found")),
            other => panic!("Expected stream error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_garbage_line() {
        assert!(matches!(parse_line("not json"), Err(LlmError::Stream(_))));
    }

    #[test]
    fn test_construction_is_offline() {
        // No server listens here; building the handle must still work.
        let handle = ModelHandle::new(
            "llama3.2",
            Url::parse("http://127.0.0.1:9").expect("valid url"),
            true,
        );
        assert_eq!(handle.model_id(), "llama3.2");
        assert!(handle.stream());
        assert_eq!(handle.endpoint().port(), Some(9));
    }
}
