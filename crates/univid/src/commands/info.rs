//! `univid info`

use serde::Serialize;

use univid_core::NvrSession;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct InfoView<'a> {
    name: Option<&'a str>,
    version: Option<&'a str>,
    supported_version: bool,
    gmt_offset: Option<&'a str>,
    utc_offset_secs: Option<i32>,
    cameras: usize,
    active_cameras: usize,
    recordings: usize,
}

fn format_offset(secs: i32) -> String {
    let sign = if secs < 0 { '-' } else { '+' };
    let abs = secs.unsigned_abs();
    format!("GMT{sign}{:02}:{:02}", abs / 3600, abs % 3600 / 60)
}

fn detail(v: &InfoView<'_>) -> String {
    [
        format!("Name:        {}", v.name.unwrap_or("-")),
        format!(
            "Version:     {}{}",
            v.version.unwrap_or("-"),
            if v.supported_version { "" } else { " (unsupported)" }
        ),
        format!(
            "UTC offset:  {}",
            v.utc_offset_secs.map_or_else(|| "unknown".into(), format_offset)
        ),
        format!("Cameras:     {} ({} active)", v.cameras, v.active_cameras),
        format!("Recordings:  {} cached", v.recordings),
    ]
    .join("\n")
}

pub fn handle(session: &NvrSession, global: &GlobalOpts) -> Result<(), CliError> {
    let info = session.server_info();
    let view = InfoView {
        name: info.name.as_deref(),
        version: info.version.as_deref(),
        supported_version: info.is_supported_version,
        gmt_offset: info.gmt_offset.as_deref(),
        utc_offset_secs: session.utc_offset(),
        cameras: session.cameras().len(),
        active_cameras: session.active_cameras().len(),
        recordings: session.recordings().len(),
    };
    let out = output::render_single(&global.output, &view, detail, |v| {
        v.name.unwrap_or_default().to_owned()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_render_as_gmt() {
        assert_eq!(format_offset(7200), "GMT+02:00");
        assert_eq!(format_offset(-12_600), "GMT-03:30");
        assert_eq!(format_offset(0), "GMT+00:00");
    }
}
