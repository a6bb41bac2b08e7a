//! Device command handlers, plus the row/detail views lights and covers
//! reuse.

use tabled::Tabled;
use tracing::warn;

use daisy_core::{Device, Hub};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "Installation")]
    installation: String,
    #[tabled(rename = "State")]
    state: String,
}

impl DeviceRow {
    pub(super) fn new(d: &Device, color: bool) -> Self {
        Self {
            id: d.id().to_string(),
            label: d.label().to_owned(),
            dtype: d.device_type().to_string(),
            installation: d.installation_id().to_string(),
            state: state_summary(d, color),
        }
    }
}

fn on_off(value: Option<bool>, on: &str, off: &str) -> Option<String> {
    value.map(|v| if v { on } else { off }.to_owned())
}

/// One-cell summary of a device's last known state.
pub(super) fn state_summary(d: &Device, color: bool) -> String {
    let parts: Vec<String> = match d {
        Device::Light(l) => [
            on_off(l.state.is_on, "on", "off").map(|s| output::paint_state(&s, color)),
            l.state.brightness.map(|b| format!("{b}%")),
            l.state.rgb.map(|c| format!("rgb({c})")),
        ]
        .into_iter()
        .flatten()
        .collect(),
        Device::Cover(c) => [
            on_off(c.state.is_closed, "closed", "open").map(|s| output::paint_state(&s, color)),
            c.state.position.map(|p| format!("{p}%")),
        ]
        .into_iter()
        .flatten()
        .collect(),
    };
    if parts.is_empty() {
        "-".into()
    } else {
        parts.join(" ")
    }
}

/// Key/value listing for a single device.
pub(super) fn detail(d: &Device) -> String {
    let info = d.info();
    let mut lines = vec![
        format!("ID:           {}", info.id),
        format!("Label:        {}", info.label),
        format!("Type:         {}", info.device_type),
        format!("Installation: {}", info.installation_id),
        format!("Index:        {}", info.device_index),
        format!("Model:        {}", output::or_dash(info.model_id)),
    ];
    match d {
        Device::Light(l) => {
            lines.push(format!(
                "Power:        {}",
                output::or_dash(on_off(l.state.is_on, "on", "off"))
            ));
            lines.push(format!(
                "Brightness:   {}",
                output::or_dash(l.state.brightness.map(|b| format!("{b}%")))
            ));
            lines.push(format!("Color:        {}", output::or_dash(l.state.rgb)));
        }
        Device::Cover(c) => {
            lines.push(format!(
                "Closed:       {}",
                output::or_dash(c.state.is_closed)
            ));
            lines.push(format!(
                "Position:     {}",
                output::or_dash(c.state.position.map(|p| format!("{p}%")))
            ));
        }
    }
    lines.join("\n")
}

/// Print a device list in the selected format.
pub(super) fn print_devices(devices: &[Device], global: &GlobalOpts) {
    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        devices,
        |d| DeviceRow::new(d, color),
        |d| d.id().to_string(),
    );
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(hub: &Hub, args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    util::connect(hub, global).await?;

    match args.command {
        DevicesCommand::List {
            installation,
            status,
        } => {
            if status {
                let updated =
                    util::with_spinner(global, "Reading status…", hub.update_all()).await?;
                let total = hub.directory().device_count();
                if updated < total {
                    warn!(updated, total, "some devices did not report status");
                }
            }

            let mut devices = hub.directory().devices();
            if let Some(ref ident) = installation {
                let inst = util::resolve_installation(hub, ident)?;
                devices.retain(|d| d.installation_id() == inst.id);
            }
            print_devices(&devices, global);
            Ok(())
        }

        DevicesCommand::Status { device } => {
            let id = util::resolve_device(hub, &device)?.id();
            let device =
                util::with_spinner(global, "Reading status…", hub.update_state(id)).await?;
            let out = output::render_single(&global.output, &device, detail, |d| {
                state_summary(d, false)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
