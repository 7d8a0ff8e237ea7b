use std::sync::Arc;

use tracing::{error, info};

use crate::domain::{DEFAULT_MODEL, GenerationError, GenerationRequest, GenerationResult};
use crate::infra::llm::{
    AnthropicClient, CompletionClient, CompletionError, CompletionMessage, CompletionRequest,
    validate_bpmn_response,
};

const OVERLOADED_STATUS: u16 = 529;
const OVERLOADED_ERROR_TYPE: &str = "overloaded_error";
const NOT_FOUND_STATUS: u16 = 404;
const NOT_FOUND_ERROR_TYPE: &str = "not_found_error";
const MODEL_MARKER: &str = "model:";

/// Issues one completion per call and turns the raw text into a validated
/// BPMN document. Never retries.
#[derive(Clone)]
pub struct ModelGateway {
    client: Arc<dyn CompletionClient>,
}

impl ModelGateway {
    pub fn new<C>(client: C) -> Self
    where
        C: CompletionClient + 'static,
    {
        Self::with_shared_client(Arc::new(client))
    }

    pub fn with_shared_client(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Builds an Anthropic-backed gateway; fails with a configuration error
    /// when the API key is absent.
    pub fn from_env() -> Result<Self, GenerationError> {
        Ok(Self::new(AnthropicClient::from_env()?))
    }

    pub fn generate(&self, request: GenerationRequest) -> Result<GenerationResult, GenerationError> {
        request.validate()?;

        let model = request
            .model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(DEFAULT_MODEL.id)
            .to_string();
        info!(
            client = self.client.client_id(),
            model = %model,
            temperature = request.params.temperature,
            max_tokens = request.params.max_tokens,
            "generating BPMN"
        );

        let completion_request = CompletionRequest {
            model: model.clone(),
            temperature: request.params.temperature,
            max_tokens: request.params.max_tokens,
            system: request.system,
            messages: vec![CompletionMessage::user(request.prompt)],
        };

        let completion = self
            .client
            .complete(&completion_request)
            .map_err(|err| classify_completion_error(err, &model))?;
        info!(
            input_tokens = completion.usage.input_tokens,
            output_tokens = completion.usage.output_tokens,
            "completion received"
        );

        let raw_text = completion.first_text().ok_or_else(|| {
            error!(model = %model, "completion contained no text segment");
            GenerationError::unexpected("completion contained no text segment")
        })?;
        let bpmn_xml = validate_bpmn_response(raw_text, &model)?;

        Ok(GenerationResult {
            bpmn_xml,
            usage: completion.usage,
            model,
        })
    }
}

pub(crate) fn classify_completion_error(error: CompletionError, model: &str) -> GenerationError {
    error!(model, error = %error, "completion request failed");

    match &error {
        CompletionError::Api {
            status: OVERLOADED_STATUS,
            error_type,
            ..
        } if error_type == OVERLOADED_ERROR_TYPE => GenerationError::ServiceOverloaded,
        CompletionError::Api {
            status: NOT_FOUND_STATUS,
            error_type,
            message,
        } if error_type == NOT_FOUND_ERROR_TYPE => match unavailable_model_name(message) {
            Some(name) => GenerationError::ModelUnavailable { model: name },
            None => GenerationError::generic_service(error.to_string()),
        },
        CompletionError::Api { .. } | CompletionError::Transport { .. } => {
            GenerationError::generic_service(error.to_string())
        }
        CompletionError::Decode { .. } => GenerationError::unexpected(error.to_string()),
    }
}

/// Pulls the model name out of a not-found message such as
/// `model: claude-typo`.
fn unavailable_model_name(message: &str) -> Option<String> {
    let (_, rest) = message.split_once(MODEL_MARKER)?;
    let name = rest
        .trim()
        .trim_end_matches('}')
        .trim()
        .trim_matches(|c| c == '\'' || c == '"');
    (!name.is_empty()).then(|| name.to_string())
}
