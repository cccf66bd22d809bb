//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::PathBuf;

use univid_core::{ApiResponse, Camera, DateTimeInput, EntityId, NvrSession, RawOutput};

use crate::error::CliError;

/// Resolve a camera by id, name, or on-screen text to its id.
pub fn resolve_camera_id(session: &NvrSession, search: &str) -> Result<EntityId, CliError> {
    Ok(find_camera(session, search)?.id.clone())
}

pub fn find_camera<'a>(session: &'a NvrSession, search: &str) -> Result<&'a Camera, CliError> {
    session
        .get_camera(search)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "camera".into(),
            identifier: search.into(),
        })
}

/// `--file` to an explicit save target; `None` keeps the default name.
pub fn file_output(file: Option<PathBuf>) -> Option<RawOutput> {
    file.map(RawOutput::File)
}

/// A bare integer is epoch seconds; anything else is NVR-local text.
pub fn parse_time(input: &str) -> DateTimeInput {
    input
        .trim()
        .parse::<i64>()
        .map_or_else(|_| DateTimeInput::from(input), DateTimeInput::Epoch)
}

/// Turn a media response into a one-line report, or an error when the
/// NVR had nothing to give.
pub fn saved_message(resp: &ApiResponse) -> Result<String, CliError> {
    match resp {
        ApiResponse::Saved(path) => Ok(format!("Saved {}", path.display())),
        ApiResponse::Binary(bytes) => Ok(format!("Received {} bytes", bytes.len())),
        ApiResponse::Text(text) => Ok(text.clone()),
        ApiResponse::Json(value) => Ok(value.to_string()),
        ApiResponse::NoData { status } => Err(CliError::NoData { status: *status }),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_epoch_seconds() {
        assert_eq!(parse_time("1543183200"), DateTimeInput::Epoch(1_543_183_200));
        assert_eq!(
            parse_time("2018-11-26 02:00"),
            DateTimeInput::Text("2018-11-26 02:00".into())
        );
    }

    #[test]
    fn no_data_is_an_error() {
        assert!(matches!(
            saved_message(&ApiResponse::NoData { status: 404 }),
            Err(CliError::NoData { status: 404 })
        ));
        assert_eq!(
            saved_message(&ApiResponse::Saved("x.jpg".into())).unwrap_or_default(),
            "Saved x.jpg"
        );
    }
}
