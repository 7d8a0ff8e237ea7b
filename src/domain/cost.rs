use super::model_catalog::model_or_default;

/// Estimated USD cost of one generation. Values are unrounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimate {
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
}

impl CostEstimate {
    /// Prices token usage for `model_id`. Unknown ids are priced as the
    /// default model since the estimate is informational only.
    pub fn compute(model_id: &str, input_tokens: u64, output_tokens: u64) -> Self {
        let pricing = model_or_default(model_id).pricing;
        let input_cost = input_tokens as f64 * pricing.input_per_token;
        let output_cost = output_tokens as f64 * pricing.output_per_token;

        Self {
            input_cost,
            output_cost,
            total_cost: input_cost + output_cost,
        }
    }
}

pub fn estimate_cost(model_id: &str, input_tokens: u64, output_tokens: u64) -> f64 {
    CostEstimate::compute(model_id, input_tokens, output_tokens).total_cost
}
