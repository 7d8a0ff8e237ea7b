mod anthropic;
mod env;
mod provider;
pub mod response_parsing;
mod system_prompt;

pub use anthropic::AnthropicClient;
pub use provider::{
    Completion, CompletionClient, CompletionError, CompletionMessage, CompletionRequest,
    MessageRole,
};
pub use response_parsing::validate_bpmn_response;
pub use system_prompt::load_system_prompt;
