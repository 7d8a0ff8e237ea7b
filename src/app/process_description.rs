use std::fs;
use std::path::Path;

use tracing::info;

use crate::domain::GenerationError;

/// How the user described the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessDescription {
    Simple { text: String },
    Structured { name: String, flow: String },
}

impl ProcessDescription {
    /// Replaces the free text (simple) or the flow (structured) with the
    /// contents of an uploaded file.
    pub fn with_file_contents(self, contents: String) -> Self {
        match self {
            Self::Simple { .. } => Self::Simple { text: contents },
            Self::Structured { name, .. } => Self::Structured {
                name,
                flow: contents,
            },
        }
    }

    /// Formats the description as the prompt sent to the model.
    pub fn to_prompt(&self) -> Result<String, GenerationError> {
        match self {
            Self::Simple { text } => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(GenerationError::validation(
                        "Please enter text or upload a file.",
                    ));
                }
                Ok(format!("Process Description:\n{text}"))
            }
            Self::Structured { name, flow } => {
                let flow = flow.trim();
                if flow.is_empty() {
                    return Err(GenerationError::validation("Please enter process flow."));
                }
                Ok(format!(
                    "Process Name: {}\n\nProcess Flow:\n{flow}",
                    name.trim()
                ))
            }
        }
    }
}

pub fn read_description_file(path: &Path) -> Result<String, GenerationError> {
    info!(path = %path.display(), "reading process description file");
    let bytes = fs::read(path).map_err(|err| {
        GenerationError::validation(format!(
            "Error reading file '{}': {err}",
            path.display()
        ))
    })?;
    String::from_utf8(bytes).map_err(|_| {
        GenerationError::validation("Error reading file. Please check that it is a text file.")
    })
}
