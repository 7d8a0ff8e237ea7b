use thiserror::Error;

use crate::domain::TokenUsage;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system: Option<String>,
    pub messages: Vec<CompletionMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionMessage {
    pub role: MessageRole,
    pub content: String,
}

impl CompletionMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Text segments in the order the service returned them.
    pub segments: Vec<String>,
    pub usage: TokenUsage,
}

impl Completion {
    pub fn first_text(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }
}

/// Failure reported by a completion service client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    /// The service answered with an error status and category.
    #[error("service returned HTTP {status} ({error_type}): {message}")]
    Api {
        status: u16,
        error_type: String,
        message: String,
    },
    #[error("service transport failed: {message}")]
    Transport { message: String },
    #[error("service response could not be decoded: {message}")]
    Decode { message: String },
}

pub trait CompletionClient: Send + Sync {
    fn client_id(&self) -> &str;

    fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError>;
}
