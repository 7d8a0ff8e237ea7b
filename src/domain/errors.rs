use thiserror::Error;

/// Prefix carried by every error whose message is meant for the end user.
pub const USER_FACING_PREFIX: &str = "model_problem";

const MODEL_DECLINED_MESSAGE: &str = "The selected AI model could not create the process model. Try a different model or a more specific description of the process flow.";
const TRUNCATED_OUTPUT_MESSAGE: &str = "The 'Max Tokens' limit was too low for the selected AI model to finish the process model. Increase the 'Max Tokens' limit and retry.";
const SERVICE_OVERLOADED_MESSAGE: &str = "The AI service is currently overloaded. Try again later or use a different model.";
const GENERIC_SERVICE_MESSAGE: &str = "An error occurred with the AI service during generation.";
const UNEXPECTED_MESSAGE: &str = "Unexpected error during generation.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorCategory {
    Fatal,
    UserActionRequired,
    TemporaryFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("configuration error: {message}")]
    Configuration { message: String },
    #[error("{}: {message}", USER_FACING_PREFIX)]
    Validation { message: String },
    #[error("{}: {}", USER_FACING_PREFIX, MODEL_DECLINED_MESSAGE)]
    ModelDeclined,
    #[error("{}: {}", USER_FACING_PREFIX, TRUNCATED_OUTPUT_MESSAGE)]
    TruncatedOutput,
    #[error(
        "{}: Model '{model}' is not available. Check that the model name is spelled correctly.",
        USER_FACING_PREFIX
    )]
    ModelUnavailable { model: String },
    #[error("{}: {}", USER_FACING_PREFIX, SERVICE_OVERLOADED_MESSAGE)]
    ServiceOverloaded,
    /// The service itself failed: an HTTP error status outside the named
    /// cases, or a transport failure reaching it.
    #[error("{}: {}", USER_FACING_PREFIX, GENERIC_SERVICE_MESSAGE)]
    GenericService { detail: String },
    /// A fault on our side of the exchange: an undecodable response body, a
    /// completion without a text segment, or a local I/O failure. Shares the
    /// `TemporaryFailure` category with `GenericService` but is a distinct
    /// variant, so a match on `GenericService` alone does not see it.
    #[error("{}: {}", USER_FACING_PREFIX, UNEXPECTED_MESSAGE)]
    Unexpected { detail: String },
}

impl GenerationError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn generic_service(detail: impl Into<String>) -> Self {
        Self::GenericService {
            detail: detail.into(),
        }
    }

    pub fn unexpected(detail: impl Into<String>) -> Self {
        Self::Unexpected {
            detail: detail.into(),
        }
    }

    pub fn category(&self) -> GenerationErrorCategory {
        match self {
            Self::Configuration { .. } => GenerationErrorCategory::Fatal,
            Self::Validation { .. }
            | Self::ModelDeclined
            | Self::TruncatedOutput
            | Self::ModelUnavailable { .. } => GenerationErrorCategory::UserActionRequired,
            Self::ServiceOverloaded | Self::GenericService { .. } | Self::Unexpected { .. } => {
                GenerationErrorCategory::TemporaryFailure
            }
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.category() == GenerationErrorCategory::Fatal
    }

    /// True when `user_message` is ready to be shown to the end user as-is.
    pub fn is_user_facing(&self) -> bool {
        !self.is_fatal()
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration { message } => format!("Service is misconfigured: {message}"),
            Self::Validation { message } => message.clone(),
            Self::ModelDeclined => MODEL_DECLINED_MESSAGE.to_string(),
            Self::TruncatedOutput => TRUNCATED_OUTPUT_MESSAGE.to_string(),
            Self::ModelUnavailable { model } => format!(
                "Model '{model}' is not available. Check that the model name is spelled correctly."
            ),
            Self::ServiceOverloaded => SERVICE_OVERLOADED_MESSAGE.to_string(),
            Self::GenericService { .. } => GENERIC_SERVICE_MESSAGE.to_string(),
            Self::Unexpected { .. } => UNEXPECTED_MESSAGE.to_string(),
        }
    }
}

/// Recovers the user message from a rendered error string, if it carries the
/// user-facing prefix.
pub fn strip_user_facing_prefix(rendered: &str) -> Option<&str> {
    rendered
        .strip_prefix(USER_FACING_PREFIX)
        .and_then(|rest| rest.strip_prefix(':'))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::{GenerationError, GenerationErrorCategory, strip_user_facing_prefix};

    #[test]
    fn category_separates_fatal_configuration_from_recoverable_errors() {
        assert_eq!(
            GenerationError::configuration("ANTHROPIC_API_KEY is not set").category(),
            GenerationErrorCategory::Fatal
        );
        assert_eq!(
            GenerationError::TruncatedOutput.category(),
            GenerationErrorCategory::UserActionRequired
        );
        assert_eq!(
            GenerationError::ModelUnavailable {
                model: "claude-x".to_string()
            }
            .category(),
            GenerationErrorCategory::UserActionRequired
        );
        assert_eq!(
            GenerationError::ServiceOverloaded.category(),
            GenerationErrorCategory::TemporaryFailure
        );
        assert_eq!(
            GenerationError::unexpected("boom").category(),
            GenerationErrorCategory::TemporaryFailure
        );
    }

    #[test]
    fn display_carries_prefix_only_for_user_facing_errors() {
        let rendered = GenerationError::ServiceOverloaded.to_string();
        assert!(rendered.starts_with("model_problem: "));
        assert!(rendered.contains("overloaded"));

        let rendered = GenerationError::configuration("missing key").to_string();
        assert!(!rendered.starts_with("model_problem"));
        assert!(GenerationError::configuration("missing key").is_fatal());
        assert!(!GenerationError::configuration("missing key").is_user_facing());
    }

    #[test]
    fn user_message_hides_operator_detail() {
        let error = GenerationError::generic_service("HTTP 500: upstream stack trace");
        assert!(!error.user_message().contains("stack trace"));
        assert!(error.to_string().ends_with(&error.user_message()));
    }

    #[test]
    fn unexpected_and_generic_service_share_category_but_not_variant() {
        let service = GenerationError::generic_service("HTTP 500");
        let local = GenerationError::unexpected("response had no text segment");

        assert_eq!(service.category(), local.category());
        assert!(service.to_string().starts_with("model_problem: "));
        assert!(local.to_string().starts_with("model_problem: "));
        assert_ne!(service.user_message(), local.user_message());
        assert!(!matches!(local, GenerationError::GenericService { .. }));
    }

    #[test]
    fn model_unavailable_message_names_the_model() {
        let error = GenerationError::ModelUnavailable {
            model: "claude-typo".to_string(),
        };
        assert!(error.user_message().contains("'claude-typo'"));
        assert!(error.user_message().contains("spelled correctly"));
    }

    #[test]
    fn strip_user_facing_prefix_recovers_user_message() {
        let error = GenerationError::ModelDeclined;
        let rendered = error.to_string();

        assert_eq!(
            strip_user_facing_prefix(&rendered),
            Some(error.user_message().as_str())
        );
        assert_eq!(strip_user_facing_prefix("connection reset by peer"), None);
    }
}
