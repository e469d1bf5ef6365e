//! Chat-completion client used for heading summarization.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ConfigError, GenerationError};
use crate::models::GenerationConfig;

/// Text-generation capability behind the summarizer.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one completion for the given system and user prompts and
    /// return the generated text.
    async fn generate(&self, system: &str, user: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Request body for the /chat/completions endpoint.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct HttpGenerationClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HttpGenerationClient {
    /// Create a new generation client with the given configuration.
    ///
    /// Fails at construction when the API key is missing; providers are
    /// never probed lazily per request.
    pub fn new(config: &GenerationConfig) -> Result<Self, ConfigError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ConfigError::MissingCredential("generation api key (set OPENAI_API_KEY)".into())
            })?
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TextGenerator for HttpGenerationClient {
    async fn generate(&self, system: &str, user: &str) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout
                } else {
                    GenerationError::RequestError(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::ServerError(format!(
                "status {}: {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| GenerationError::InvalidResponse("no choices in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn config(url: String) -> GenerationConfig {
        GenerationConfig {
            url,
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let result = HttpGenerationClient::new(&GenerationConfig::default());
        assert!(matches!(result, Err(ConfigError::MissingCredential(_))));
    }

    #[test]
    fn test_base_url_trimming() {
        let config = config("https://api.example.com/v1/".to_string());
        let client = HttpGenerationClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://api.example.com/v1");
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .header("authorization", "Bearer sk-test");
                then.status(200).json_body(serde_json::json!({
                    "choices": [
                        {"message": {"role": "assistant", "content": "{\"History\": \"ok\"}"}}
                    ]
                }));
            })
            .await;

        let client = HttpGenerationClient::new(&config(server.base_url())).unwrap();
        let text = client.generate("system", "user").await.unwrap();
        assert_eq!(text, "{\"History\": \"ok\"}");
    }

    #[tokio::test]
    async fn test_generate_server_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(500).body("boom");
            })
            .await;

        let client = HttpGenerationClient::new(&config(server.base_url())).unwrap();
        let result = client.generate("system", "user").await;
        assert!(matches!(result, Err(GenerationError::ServerError(_))));
    }
}
