/// Price of one token in USD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub input_per_token: f64,
    pub output_per_token: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub pricing: ModelPricing,
}

const FALLBACK_DISPLAY_NAME: &str = "Claude";

/// Models offered for BPMN generation. The first entry is the default.
pub const AVAILABLE_MODELS: &[ModelDescriptor] = &[
    ModelDescriptor {
        id: "claude-3-7-sonnet-20250219",
        display_name: "Sonnet 3.7",
        pricing: ModelPricing {
            input_per_token: 0.000003,
            output_per_token: 0.000015,
        },
    },
    ModelDescriptor {
        id: "claude-3-opus-20240229",
        display_name: "Opus 3",
        pricing: ModelPricing {
            input_per_token: 0.000015,
            output_per_token: 0.000075,
        },
    },
    ModelDescriptor {
        id: "claude-3-5-sonnet-20241022",
        display_name: "Sonnet 3.5",
        pricing: ModelPricing {
            input_per_token: 0.000003,
            output_per_token: 0.000015,
        },
    },
    ModelDescriptor {
        id: "claude-3-5-haiku-20241022",
        display_name: "Haiku 3.5",
        pricing: ModelPricing {
            input_per_token: 0.0000008,
            output_per_token: 0.000004,
        },
    },
];

pub const DEFAULT_MODEL: &ModelDescriptor = &AVAILABLE_MODELS[0];

pub fn find_model(model_id: &str) -> Option<&'static ModelDescriptor> {
    let model_id = model_id.trim();
    AVAILABLE_MODELS.iter().find(|model| model.id == model_id)
}

/// Looks up `model_id`, falling back to [`DEFAULT_MODEL`] on a miss.
pub fn model_or_default(model_id: &str) -> &'static ModelDescriptor {
    find_model(model_id).unwrap_or(DEFAULT_MODEL)
}

pub fn display_name_for(model_id: &str) -> &'static str {
    find_model(model_id)
        .map(|model| model.display_name)
        .unwrap_or(FALLBACK_DISPLAY_NAME)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{AVAILABLE_MODELS, DEFAULT_MODEL, display_name_for, find_model, model_or_default};

    #[test]
    fn model_ids_are_unique() {
        let ids: HashSet<_> = AVAILABLE_MODELS.iter().map(|model| model.id).collect();
        assert_eq!(ids.len(), AVAILABLE_MODELS.len());
    }

    #[test]
    fn default_model_is_first_entry() {
        assert_eq!(DEFAULT_MODEL.id, AVAILABLE_MODELS[0].id);
        assert_eq!(DEFAULT_MODEL.id, "claude-3-7-sonnet-20250219");
    }

    #[test]
    fn find_model_trims_and_matches_exact_id() {
        let model = find_model(" claude-3-5-haiku-20241022 ").expect("haiku should be registered");
        assert_eq!(model.display_name, "Haiku 3.5");
        assert!(find_model("claude-3-5-haiku").is_none());
    }

    #[test]
    fn unknown_model_falls_back_to_default() {
        assert_eq!(model_or_default("gpt-unknown"), DEFAULT_MODEL);
        assert_eq!(display_name_for("gpt-unknown"), "Claude");
        assert_eq!(display_name_for("claude-3-opus-20240229"), "Opus 3");
    }
}
