use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{GenerationError, TokenUsage};

use super::env::{read_env_var, read_timeout};
use super::provider::{
    Completion, CompletionClient, CompletionError, CompletionMessage, CompletionRequest,
};
use super::response_parsing::truncate_message;

const CLIENT_ID: &str = "anthropic";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ENV_API_KEY: &str = "ANTHROPIC_API_KEY";
const ENV_BASE_URL: &str = "ANTHROPIC_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "BPMN_FORGE_TIMEOUT_SECS";
const UNKNOWN_ERROR_TYPE: &str = "unknown_error";

pub struct AnthropicClient {
    api_key: String,
    api_base_url: String,
    client: Client,
}

impl AnthropicClient {
    pub fn from_env() -> Result<Self, GenerationError> {
        Self::from_lookup(read_env_var)
    }

    /// Builds a client from a variable lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GenerationError>
    where
        F: Fn(&str) -> Result<Option<String>, GenerationError>,
    {
        let api_key = lookup(ENV_API_KEY)?
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::configuration(format!(
                    "{ENV_API_KEY} environment variable is not set"
                ))
            })?;
        let api_base_url = lookup(ENV_BASE_URL)?.unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let timeout = read_timeout(ENV_TIMEOUT_SECS, &lookup)?;
        Self::with_config(api_key, api_base_url, timeout)
    }

    /// `timeout` of `None` leaves the transport without a deadline.
    pub fn with_config(
        api_key: impl Into<String>,
        api_base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, GenerationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GenerationError::configuration(
                "Anthropic API key must not be empty",
            ));
        }

        let api_base_url = api_base_url.into();
        if api_base_url.trim().is_empty() {
            return Err(GenerationError::configuration(
                "Anthropic API base URL must not be empty",
            ));
        }

        let client = Client::builder().timeout(timeout).build().map_err(|err| {
            GenerationError::configuration(format!("failed to create Anthropic HTTP client: {err}"))
        })?;

        Ok(Self {
            api_key,
            api_base_url,
            client,
        })
    }

    fn endpoint_url(&self) -> String {
        format!("{}/v1/messages", self.api_base_url.trim_end_matches('/'))
    }

    fn build_request_payload(request: &CompletionRequest) -> AnthropicMessagesRequest<'_> {
        AnthropicMessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system.as_deref(),
            messages: request.messages.iter().map(AnthropicMessage::from).collect(),
        }
    }
}

impl CompletionClient for AnthropicClient {
    fn client_id(&self) -> &str {
        CLIENT_ID
    }

    fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError> {
        let payload = Self::build_request_payload(request);

        let response = self
            .client
            .post(self.endpoint_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .map_err(map_transport_error)?;

        let status = response.status();
        let response_body = response.text().map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_http_error(status.as_u16(), &response_body));
        }

        debug!(bytes = response_body.len(), "Anthropic response received");
        map_success_response(&response_body)
    }
}

#[derive(Debug, Serialize)]
struct AnthropicMessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a CompletionMessage> for AnthropicMessage<'a> {
    fn from(message: &'a CompletionMessage) -> Self {
        Self {
            role: message.role.as_str(),
            content: &message.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicMessagesResponse {
    #[serde(default)]
    usage: Option<AnthropicUsage>,
    #[serde(default)]
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl AnthropicContentBlock {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Text { text } => Some(text),
            Self::Other => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

fn map_success_response(response_body: &str) -> Result<Completion, CompletionError> {
    let response: AnthropicMessagesResponse =
        serde_json::from_str(response_body).map_err(|err| CompletionError::Decode {
            message: format!("Anthropic response decode failed: {err}"),
        })?;

    let usage = response.usage.unwrap_or_default();
    Ok(Completion {
        segments: response
            .content
            .into_iter()
            .filter_map(AnthropicContentBlock::into_text)
            .collect(),
        usage: TokenUsage {
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
        },
    })
}

fn map_http_error(status: u16, body: &str) -> CompletionError {
    let detail = serde_json::from_str::<AnthropicErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error);

    match detail {
        Some(detail) => CompletionError::Api {
            status,
            error_type: detail.error_type,
            message: detail.message,
        },
        None => CompletionError::Api {
            status,
            error_type: UNKNOWN_ERROR_TYPE.to_string(),
            message: truncate_message(body),
        },
    }
}

fn map_transport_error(error: reqwest::Error) -> CompletionError {
    CompletionError::Transport {
        message: format!("Anthropic transport error: {error}"),
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorEnvelope {
    #[serde(default)]
    error: Option<AnthropicErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorDetail {
    #[serde(rename = "type")]
    error_type: String,
    #[serde(default)]
    message: String,
}
