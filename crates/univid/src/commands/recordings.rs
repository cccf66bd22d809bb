//! Recording command handlers.

use tabled::Tabled;

use univid_core::time::DEFAULT_RESOLUTION_MS;
use univid_core::{EntityId, NvrSession, Recording, RecordingQuery, resolve_to_epoch_millis};

use crate::cli::{GlobalOpts, RecordingsArgs, RecordingsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RecordingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    event_type: String,
    #[tabled(rename = "Camera")]
    camera: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Locked")]
    locked: String,
}

impl RecordingRow {
    fn new(r: &Recording, camera: String, color: bool) -> Self {
        Self {
            id: r.id.to_string(),
            event_type: r.event_type.clone().unwrap_or_else(|| "-".into()),
            camera,
            start: r.start_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            end: r.end_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            locked: output::paint_flag(r.is_locked(), color),
        }
    }
}

/// Name of the recording's camera, falling back to its id.
fn camera_label(session: &NvrSession, r: &Recording) -> String {
    r.primary_camera().map_or_else(
        || "-".to_owned(),
        |id| {
            session
                .cameras()
                .get(id)
                .map_or_else(|| id.to_string(), |c| c.name.clone())
        },
    )
}

// ── Handler ─────────────────────────────────────────────────────────

fn time_bound(session: &NvrSession, input: Option<&str>) -> Result<Option<i64>, CliError> {
    let offset = session.utc_offset().unwrap_or(0);
    input
        .map(|text| resolve_to_epoch_millis(util::parse_time(text), offset, DEFAULT_RESOLUTION_MS))
        .transpose()
        .map_err(CliError::from)
}

pub async fn handle(
    session: &mut NvrSession,
    args: RecordingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        RecordingsCommand::List {
            limit,
            camera,
            types,
            since,
            until,
        } => {
            let cameras = camera
                .iter()
                .map(|c| util::resolve_camera_id(session, c).map(|id| id.to_string()))
                .collect::<Result<Vec<_>, _>>()?;
            let query = RecordingQuery {
                limit: Some(limit),
                types,
                cameras,
                start_ms: time_bound(session, since.as_deref())?,
                end_ms: time_bound(session, until.as_deref())?,
                ids_only: false,
            };

            let recordings = session.get_recordings(&query).await?;
            let view: &NvrSession = session;
            let out = output::render_list(
                &global.output,
                &recordings,
                |r| RecordingRow::new(r, camera_label(view, r), color),
                |r| r.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RecordingsCommand::Download { id, file } => {
            let resp = session
                .download_recording(&EntityId::from(id), util::file_output(file))
                .await?;
            output::print_output(&util::saved_message(&resp)?, global.quiet);
            Ok(())
        }

        RecordingsCommand::Motion { id, file } => {
            let resp = session
                .recording_motion(&EntityId::from(id), util::file_output(file))
                .await?;
            output::print_output(&util::saved_message(&resp)?, global.quiet);
            Ok(())
        }

        RecordingsCommand::Thumbnail { id, width, file } => {
            let resp = session
                .recording_thumbnail(&EntityId::from(id), width, util::file_output(file))
                .await?;
            output::print_output(&util::saved_message(&resp)?, global.quiet);
            Ok(())
        }

        RecordingsCommand::Lock { id } => {
            let rec = session.lock_recording(&EntityId::from(id)).await?;
            output::print_output(&format!("Locked {}", rec.id), global.quiet);
            Ok(())
        }

        RecordingsCommand::Unlock { id } => {
            let rec = session.unlock_recording(&EntityId::from(id)).await?;
            output::print_output(&format!("Unlocked {}", rec.id), global.quiet);
            Ok(())
        }

        RecordingsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete recording {id}?"), global.yes)? {
                return Ok(());
            }
            let id = EntityId::from(id);
            if !session.delete_recording(&id).await? {
                return Err(CliError::NoData { status: 0 });
            }
            output::print_output(&format!("Deleted {id}"), global.quiet);
            Ok(())
        }

        RecordingsCommand::Purge => {
            if !util::confirm("Delete ALL recordings on the NVR?", global.yes)? {
                return Ok(());
            }
            if !session.delete_all_recordings().await? {
                return Err(CliError::NoData { status: 0 });
            }
            output::print_output("All recordings deleted", global.quiet);
            Ok(())
        }
    }
}
