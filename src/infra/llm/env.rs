use std::env::{self, VarError};
use std::time::Duration;

use crate::domain::GenerationError;

/// Reads a bpmn_forge setting from the process environment. Blank values
/// count as unset.
pub(crate) fn read_env_var(name: &str) -> Result<Option<String>, GenerationError> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(GenerationError::configuration(format!(
            "{name} is set but is not valid UTF-8"
        ))),
    }
}

/// Parses the transport timeout for Anthropic requests. Leaving the variable
/// unset means requests wait for as long as the service takes.
pub(crate) fn parse_transport_timeout(
    name: &str,
    value: &str,
) -> Result<Duration, GenerationError> {
    let value = value.trim();
    match value.parse::<u64>() {
        Ok(0) => Err(GenerationError::configuration(format!(
            "{name} must be at least 1 second; unset it to disable the transport timeout"
        ))),
        Ok(seconds) => Ok(Duration::from_secs(seconds)),
        Err(_) => Err(GenerationError::configuration(format!(
            "{name} must be a whole number of seconds (got '{value}')"
        ))),
    }
}

pub(crate) fn read_timeout<F>(name: &str, lookup: F) -> Result<Option<Duration>, GenerationError>
where
    F: Fn(&str) -> Result<Option<String>, GenerationError>,
{
    lookup(name)?
        .map(|value| parse_transport_timeout(name, &value))
        .transpose()
}
