//! OpenAI-compatible chat-completion client.

use crate::client::InferenceClient;
use crate::error::InferenceError;
use crate::prompt::{SYSTEM_PROMPT, user_message};
use async_trait::async_trait;
use log::{debug, info, warn};
use pantry_rs_config::InferenceConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Longest slice of a non-JSON error body kept in `InferenceError::Api`.
const ERROR_BODY_LIMIT: usize = 200;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Error documents come either as `{"error": {"message": ..}}` or
/// `{"error": ".."}` depending on the provider.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message { message: String },
    Text(String),
}

/// Chat-completion client for recipe requests.
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    client: Client,
    base_url: String,
    model: String,
    max_tokens: u32,
    token: Option<String>,
}

impl ChatCompletionClient {
    /// Create a client for `base_url` using `model`.
    ///
    /// No request timeout is configured.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .build()
            .map_err(|err| InferenceError::Client(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            max_tokens,
            token: None,
        })
    }

    /// Create a client from config, reading the token from the environment.
    ///
    /// A missing token is not an error; requests are then sent without
    /// an `Authorization` header.
    pub fn from_config(config: &InferenceConfig) -> Result<Self, InferenceError> {
        let token = config.access_token();
        if token.is_none() {
            warn!(
                "inference token not set; sending unauthenticated requests (env={})",
                config.token_env
            );
        }
        let client =
            Self::new(&config.base_url, &config.model, config.max_tokens)?.with_token(token);
        info!(
            "initialized chat completion client (base_url={}, model={})",
            client.base_url, client.model
        );
        Ok(client)
    }

    /// Set or clear the bearer token.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    fn build_request<'a>(&'a self, ingredients: &[String]) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage::new("system", SYSTEM_PROMPT),
                ChatMessage::new("user", user_message(ingredients)),
            ],
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl InferenceClient for ChatCompletionClient {
    async fn request_recipe(&self, ingredients: &[String]) -> Result<String, InferenceError> {
        let request = self.build_request(ingredients);
        debug!(
            "sending recipe request (model={}, items={})",
            self.model,
            ingredients.len()
        );

        let mut http_request = self.client.post(self.api_url("chat/completions"));
        if let Some(token) = self.token.as_deref() {
            http_request = http_request.bearer_auth(token);
        }
        let response = http_request
            .json(&request)
            .send()
            .await
            .map_err(|err| InferenceError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| InferenceError::Transport(err.to_string()))?;

        if !status.is_success() {
            return Err(parse_error_response(status.as_u16(), &body));
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|err| InferenceError::Decode(err.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
            .ok_or(InferenceError::NoContent)?;

        debug!("received recipe (chars={})", content.len());
        Ok(content)
    }
}

fn parse_error_response(status: u16, body: &str) -> InferenceError {
    let message = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            error: ErrorDetail::Message { message },
        }) => message,
        Ok(ErrorResponse {
            error: ErrorDetail::Text(message),
        }) => message,
        Err(_) => body.chars().take(ERROR_BODY_LIMIT).collect(),
    };
    InferenceError::Api { status, message }
}
