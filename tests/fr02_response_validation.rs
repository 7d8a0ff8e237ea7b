use bpmn_forge::domain::{AVAILABLE_MODELS, DEFAULT_MODEL, GenerationError, estimate_cost};
use bpmn_forge::infra::llm::response_parsing::{
    DECLINE_MARKER, XML_DECLARATION, validate_bpmn_response,
};

const MODEL: &str = "claude-3-7-sonnet-20250219";

const NOISE: &[(&str, &str)] = &[
    ("", ""),
    ("Sure! Here is the BPMN model:\n", "\nHope this helps."),
    ("```xml\n", "\n```"),
    ("   \n\t", "\n\n   "),
    ("Výsledek:\n", " -- konec"),
];

fn document(closing_tag: &str) -> String {
    let opening = closing_tag.trim_start_matches("</").trim_end_matches('>');
    format!(
        "{XML_DECLARATION}\n<{opening} id=\"Definitions_1\">\n  <process id=\"P\"/>\n{closing_tag}"
    )
}

#[test]
fn decline_marker_fails_regardless_of_surrounding_text() {
    for (prefix, suffix) in NOISE {
        for body in [
            DECLINE_MARKER.to_string(),
            format!("{DECLINE_MARKER}: insufficient detail"),
            format!("{}\n{DECLINE_MARKER}", document("</bpmn:definitions>")),
        ] {
            let raw = format!("{prefix}{body}{suffix}");
            assert_eq!(
                validate_bpmn_response(&raw, MODEL),
                Err(GenerationError::ModelDeclined),
                "raw completion: {raw:?}"
            );
        }
    }
}

#[test]
fn missing_closing_tags_fail_as_truncated() {
    let full = document("</bpmn:definitions>");
    let cut_points = [10, full.len() / 2, full.len() - 1];

    for (prefix, suffix) in NOISE {
        for cut in cut_points {
            let raw = format!("{prefix}{}{suffix}", &full[..cut]);
            assert_eq!(
                validate_bpmn_response(&raw, MODEL),
                Err(GenerationError::TruncatedOutput),
                "raw completion: {raw:?}"
            );
        }
    }
}

#[test]
fn span_is_returned_byte_for_byte_without_noise() {
    for closing_tag in ["</bpmn:definitions>", "</definitions>"] {
        let expected = document(closing_tag);
        for (prefix, suffix) in NOISE {
            let raw = format!("{prefix}{expected}{suffix}");
            let validated =
                validate_bpmn_response(&raw, MODEL).expect("noisy document should validate");
            assert_eq!(validated, expected, "raw completion: {raw:?}");
        }
    }
}

#[test]
fn trailing_junk_is_stripped() {
    let raw = r#"<?xml version="1.0" encoding="UTF-8"?><bpmn:definitions>...</bpmn:definitions> trailing junk"#;

    assert_eq!(
        validate_bpmn_response(raw, MODEL).as_deref(),
        Ok(r#"<?xml version="1.0" encoding="UTF-8"?><bpmn:definitions>...</bpmn:definitions>"#)
    );
}

#[test]
fn unknown_model_cost_matches_default_model() {
    assert_eq!(
        estimate_cost("claude-does-not-exist", 1000, 500),
        estimate_cost(DEFAULT_MODEL.id, 1000, 500)
    );
}

#[test]
fn zero_usage_is_free_for_every_registered_model() {
    for model in AVAILABLE_MODELS {
        assert_eq!(estimate_cost(model.id, 0, 0), 0.0, "model {}", model.id);
    }
}
