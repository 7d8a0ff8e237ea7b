mod cost;
mod errors;
mod generation_contract;
mod model_catalog;

pub use cost::{CostEstimate, estimate_cost};
pub use errors::{
    GenerationError, GenerationErrorCategory, USER_FACING_PREFIX, strip_user_facing_prefix,
};
pub use generation_contract::{
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GenerationParams, GenerationRequest,
    GenerationResult, TokenUsage,
};
pub use model_catalog::{
    AVAILABLE_MODELS, DEFAULT_MODEL, ModelDescriptor, ModelPricing, display_name_for, find_model,
    model_or_default,
};
