// OpenAI-compatible chat completions client (Groq, OpenAI)

use crate::config::ProviderConfig;
use crate::error::{LlmError, Result};
use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
use crate::types::Message;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Chat completions client (HTTP direct, no SDK)
pub struct CompletionsClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl CompletionsClient {
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|_| LlmError::InvalidConfig("Invalid API key format".to_string()))?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
        })
    }

    /// Build chat completion request payload
    fn build_chat_request(&self, model: &str, messages: &[Message], options: &ChatOptions) -> Value {
        let mut request = serde_json::json!({
            "model": model,
            "messages": messages,
        });

        if let Some(obj) = request.as_object_mut() {
            if let Some(temp) = options.temperature {
                obj.insert("temperature".to_string(), serde_json::json!(temp));
            }
            if let Some(max_tokens) = options.max_tokens {
                obj.insert("max_tokens".to_string(), serde_json::json!(max_tokens));
            }
        }

        request
    }
}

#[async_trait]
impl ChatClient for CompletionsClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_chat_request(&request.model, &request.messages, &request.options);

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::RateLimited { retry_after, message });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // A body cut off mid-read is a transport failure, not a bad payload
        let body = response.bytes().await?;
        let raw: Value = serde_json::from_slice(&body)
            .map_err(|e| LlmError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

        parse_completion(raw, &request.model)
    }
}

/// Pull the first choice's text out of a completions body
fn parse_completion(raw: Value, requested_model: &str) -> Result<ChatResponse> {
    let parsed: CompletionBody = serde_json::from_value(raw.clone())
        .map_err(|e| LlmError::MalformedResponse(format!("Unexpected response shape: {}", e)))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::MalformedResponse("Response contained no choices".to_string()))?;

    let content = choice
        .message
        .content
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| LlmError::MalformedResponse("Response contained no usable content".to_string()))?;

    Ok(ChatResponse {
        content,
        model: parsed.model.unwrap_or_else(|| requested_model.to_string()),
        usage: parsed.usage.map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }),
        finish_reason: choice.finish_reason,
        raw,
    })
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
struct CompletionBody {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_completion() {
        let raw = json!({
            "id": "chatcmpl-1",
            "model": "llama-3.1-8b-instant",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "  Great course.  "},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
        });

        let response = parse_completion(raw, "fallback").unwrap();
        assert_eq!(response.content, "Great course.");
        assert_eq!(response.model, "llama-3.1-8b-instant");
        assert_eq!(response.usage.unwrap().total_tokens, 13);
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn test_parse_completion_without_choices() {
        let err = parse_completion(json!({"choices": []}), "m").unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_completion_missing_fields() {
        let err = parse_completion(json!({"error": {"message": "nope"}}), "m").unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse(_)));

        let err = parse_completion(json!({"choices": [{"message": {"content": ""}}]}), "m").unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse(_)));
    }

    #[test]
    fn test_build_chat_request() {
        let client = CompletionsClient::from_config(&ProviderConfig::groq("k")).unwrap();
        let payload = client.build_chat_request(
            "llama-3.1-8b-instant",
            &[Message::human("hello")],
            &ChatOptions::new().temperature(0.7),
        );

        assert_eq!(payload["model"], "llama-3.1-8b-instant");
        assert_eq!(payload["messages"][0]["role"], "user");
        assert!(payload.get("max_tokens").is_none());
        assert!((payload["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }
}
