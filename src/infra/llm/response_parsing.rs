use tracing::{debug, error};

use crate::domain::GenerationError;

const MAX_ERROR_MESSAGE_LEN: usize = 256;

/// Emitted by the model, as instructed by the system prompt, when it cannot
/// produce a diagram for the description.
pub const DECLINE_MARKER: &str = "PROBLÉM";
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

const PREFIXED_CLOSING_TAG: &str = "</bpmn:definitions>";
const PLAIN_CLOSING_TAG: &str = "</definitions>";
const PREFIXED_OPENING_TAG: &str = "<bpmn:definitions";
const PLAIN_OPENING_TAG: &str = "<definitions";

pub(crate) fn truncate_message(body: &str) -> String {
    let compact = body.trim().replace('\n', " ");
    compact.chars().take(MAX_ERROR_MESSAGE_LEN).collect()
}

/// Extracts the BPMN document from a raw completion.
///
/// Checks run in order: decline marker, missing closing tag, then extraction
/// of the span from the XML declaration through the closing tag. Without a
/// declaration the span starts at the opening `definitions` tag.
pub fn validate_bpmn_response(raw_text: &str, model: &str) -> Result<String, GenerationError> {
    let content = raw_text.trim();

    if content.contains(DECLINE_MARKER) {
        error!(model, "model declined to generate the process model");
        return Err(GenerationError::ModelDeclined);
    }

    if !content.contains(PREFIXED_CLOSING_TAG) && !content.contains(PLAIN_CLOSING_TAG) {
        error!(model, "completion ended before the closing definitions tag");
        return Err(GenerationError::TruncatedOutput);
    }

    let Some(start) = document_start(content) else {
        error!(model, "completion has a closing tag but no document start");
        return Err(GenerationError::ModelDeclined);
    };

    let Some(end) = document_end(content, start) else {
        error!(model, "closing definitions tag precedes the document start");
        return Err(GenerationError::TruncatedOutput);
    };

    let document = &content[start..end];
    debug!(model, bytes = document.len(), "validated BPMN content");
    Ok(document.to_string())
}

fn document_start(content: &str) -> Option<usize> {
    content
        .find(XML_DECLARATION)
        .or_else(|| content.find(PREFIXED_OPENING_TAG))
        .or_else(|| content.find(PLAIN_OPENING_TAG))
}

fn document_end(content: &str, start: usize) -> Option<usize> {
    let tail = &content[start..];
    [PREFIXED_CLOSING_TAG, PLAIN_CLOSING_TAG]
        .into_iter()
        .find_map(|tag| tail.find(tag).map(|offset| start + offset + tag.len()))
}
