//! Command dispatch: bridges CLI args -> session calls -> output formatting.

pub mod cameras;
pub mod config_cmd;
pub mod info;
pub mod recordings;
pub mod util;

use univid_core::NvrSession;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an NVR-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    session: &mut NvrSession,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Info => info::handle(session, global),
        Command::Cameras(args) => cameras::handle(session, args, global).await,
        Command::Recordings(args) => recordings::handle(session, args, global).await,
        // Handled before a session is opened
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
