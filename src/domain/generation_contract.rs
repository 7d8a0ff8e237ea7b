use serde::{Deserialize, Serialize};

use super::{CostEstimate, GenerationError, ModelDescriptor, find_model};

pub const DEFAULT_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_MAX_TOKENS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl GenerationParams {
    pub fn validate(&self) -> Result<(), GenerationError> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(GenerationError::validation(format!(
                "temperature must be in 0.0..=1.0 (got {})",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(GenerationError::validation(
                "max_tokens must be greater than 0",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Process description sent verbatim as the single user message.
    pub prompt: String,
    #[serde(default)]
    pub system: Option<String>,
    /// Provider model id; `None` selects the default model.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub params: GenerationParams,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            model: None,
            params: GenerationParams::default(),
        }
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.prompt.trim().is_empty() {
            return Err(GenerationError::validation("prompt must not be empty"));
        }
        self.params.validate()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub bpmn_xml: String,
    pub usage: TokenUsage,
    /// Model id the completion was requested with.
    pub model: String,
}

impl GenerationResult {
    pub fn model_descriptor(&self) -> Option<&'static ModelDescriptor> {
        find_model(&self.model)
    }

    pub fn cost(&self) -> CostEstimate {
        CostEstimate::compute(
            &self.model,
            self.usage.input_tokens,
            self.usage.output_tokens,
        )
    }
}
