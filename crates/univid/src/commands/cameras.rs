//! Camera command handlers.

use serde::Serialize;
use tabled::Tabled;

use univid_core::{Camera, IspSetting, ModelCapabilities, NvrSession, RecordingSettingsUpdate};

use crate::cli::{CamerasArgs, CamerasCommand, GlobalOpts, Toggle};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CameraRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Managed")]
    managed: String,
    #[tabled(rename = "MAC")]
    mac: String,
}

impl CameraRow {
    fn new(c: &Camera, color: bool) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            model: c.model.clone(),
            state: output::paint_state(c.state.as_deref().unwrap_or("-"), color),
            managed: output::paint_flag(c.managed, color),
            mac: c.mac.to_string(),
        }
    }
}

#[derive(Clone, Tabled, Serialize)]
struct IspRow {
    #[tabled(rename = "Setting")]
    setting: IspSetting,
    #[tabled(rename = "Value", display_with = "display_value")]
    value: Option<i64>,
    #[tabled(rename = "Range")]
    range: String,
}

#[allow(clippy::ref_option)]
fn display_value(v: &Option<i64>) -> String {
    v.map_or_else(|| "-".into(), |v| v.to_string())
}

fn detail(c: &Camera) -> String {
    let mut lines = vec![
        format!("ID:         {}", c.id),
        format!("Name:       {}", c.name),
        format!("Model:      {}", c.model),
        format!("Platform:   {}", c.platform.as_deref().unwrap_or("-")),
        format!("MAC:        {}", c.mac),
        format!("State:      {}", c.state.as_deref().unwrap_or("-")),
        format!("Managed:    {}", c.managed),
        format!("OSD text:   {}", c.overlay_text),
    ];
    if let Some(offset) = c.utc_offset {
        lines.push(format!("UTC offset: {offset}s"));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    session: &mut NvrSession,
    args: CamerasArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        CamerasCommand::List { active, managed } => {
            let collection = if active {
                session.active_cameras()
            } else if managed {
                session.managed_cameras()
            } else {
                session.cameras()
            };
            let mut cameras: Vec<&Camera> = collection.iter().collect();
            cameras.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

            let out = output::render_list(
                &global.output,
                &cameras,
                |c| CameraRow::new(c, color),
                |c| c.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CamerasCommand::Show { camera } => {
            let cam = util::find_camera(session, &camera)?;
            let out = output::render_single(&global.output, cam, detail, |c| c.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CamerasCommand::Snapshot {
            camera,
            width,
            file,
        } => {
            let id = util::resolve_camera_id(session, &camera)?;
            let resp = session
                .snapshot(&id, width, util::file_output(file))
                .await?;
            output::print_output(&util::saved_message(&resp)?, global.quiet);
            Ok(())
        }

        CamerasCommand::Clip {
            camera,
            start,
            end,
            file,
        } => {
            let id = util::resolve_camera_id(session, &camera)?;
            let resp = session
                .export_clip(
                    &id,
                    util::parse_time(&start),
                    util::parse_time(&end),
                    util::file_output(file),
                )
                .await?;
            output::print_output(&util::saved_message(&resp)?, global.quiet);
            Ok(())
        }

        CamerasCommand::Isp {
            camera,
            setting,
            value,
        } => {
            let id = util::resolve_camera_id(session, &camera)?;
            match (setting, value) {
                (Some(setting), Some(value)) => {
                    let applied = session.set_isp(&id, setting, value).await?;
                    output::print_output(&format!("{setting} = {applied}"), global.quiet);
                }
                (Some(setting), None) => {
                    let current = session.get_isp(&id, setting)?;
                    output::print_output(&display_value(&current), global.quiet);
                }
                (None, _) => {
                    let cam = util::find_camera(session, &camera)?;
                    let settings = cam
                        .capabilities()
                        .map(ModelCapabilities::supported_settings)
                        .unwrap_or_default();
                    let rows: Vec<IspRow> = settings
                        .into_iter()
                        .map(|s| {
                            let r = s.range();
                            IspRow {
                                setting: s,
                                value: cam.isp_value(s),
                                range: format!("{}..={}", r.floor, r.ceiling),
                            }
                        })
                        .collect();
                    let out = output::render_list(
                        &global.output,
                        &rows,
                        IspRow::clone,
                        |r| format!("{}={}", r.setting, display_value(&r.value)),
                    )?;
                    output::print_output(&out, global.quiet);
                }
            }
            Ok(())
        }

        CamerasCommand::Osd {
            camera,
            text,
            timestamp,
            watermark,
        } => {
            let id = util::resolve_camera_id(session, &camera)?;
            if text.is_none() && timestamp.is_none() && watermark.is_none() {
                return Err(CliError::Validation {
                    field: "osd".into(),
                    reason: "give at least one of --text, --timestamp, --watermark".into(),
                });
            }
            if let Some(text) = text {
                session.set_onscreen_text(&id, &text).await?;
            }
            if let Some(t) = timestamp {
                session.enable_onscreen_timestamp(&id, t.enabled()).await?;
            }
            if let Some(w) = watermark {
                session.enable_onscreen_watermark(&id, w.enabled()).await?;
            }
            output::print_output(&format!("Updated {id}"), global.quiet);
            Ok(())
        }

        CamerasCommand::Record {
            camera,
            full_time,
            motion,
            pre_padding,
            post_padding,
        } => {
            let id = util::resolve_camera_id(session, &camera)?;
            let update = RecordingSettingsUpdate {
                full_time_record_enabled: full_time.map(Toggle::enabled),
                motion_record_enabled: motion.map(Toggle::enabled),
                pre_padding_secs: pre_padding,
                post_padding_secs: post_padding,
            };
            if update.is_empty() {
                return Err(CliError::Validation {
                    field: "record".into(),
                    reason: "nothing to change".into(),
                });
            }
            session.set_recording_settings(&id, &update).await?;
            output::print_output(&format!("Updated {id}"), global.quiet);
            Ok(())
        }
    }
}
