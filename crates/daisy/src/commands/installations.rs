//! Installation command handlers.

use serde::Serialize;
use tabled::Tabled;

use daisy_core::{Hub, Installation};

use crate::cli::{GlobalOpts, InstallationsArgs, InstallationsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct InstallationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Firmware")]
    firmware: String,
    #[tabled(rename = "Location")]
    location: String,
}

impl From<&Installation> for InstallationRow {
    fn from(i: &Installation) -> Self {
        let location = match (i.latitude, i.longitude) {
            (Some(lat), Some(lon)) => format!("{lat:.4}, {lon:.4}"),
            _ => "-".into(),
        };
        Self {
            id: i.id.to_string(),
            code: i.inst_code.clone(),
            name: i.display_name().to_owned(),
            firmware: output::or_dash(i.firmware_version.as_deref()),
            location,
        }
    }
}

#[derive(Serialize)]
struct InstallationStatus {
    id: i64,
    inst_code: String,
    name: String,
    active: bool,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    hub: &Hub,
    args: InstallationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::login(hub, global).await?;
    let installations = hub.list_installations().await?;

    match args.command {
        InstallationsCommand::List => {
            let out = output::render_list(
                &global.output,
                &installations,
                |i| InstallationRow::from(i),
                |i| i.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InstallationsCommand::Status { installation } => {
            let inst = util::resolve_installation(hub, &installation)?;
            let active = util::with_spinner(
                global,
                "Probing hub…",
                hub.is_installation_active(inst.id),
            )
            .await?;

            let status = InstallationStatus {
                id: inst.id,
                inst_code: inst.inst_code.clone(),
                name: inst.display_name().to_owned(),
                active,
            };
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &status,
                |s| {
                    let state = if s.active { "online" } else { "offline" };
                    format!(
                        "{} ({}): {}",
                        s.name,
                        s.inst_code,
                        output::paint_state(state, color)
                    )
                },
                |s| s.active.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
