//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use daisy_core::{AckMode, AckOutcome, CoreError, Device, Hub, Installation, Session};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Log in, naming the profile in the error on failure.
pub async fn login(hub: &Hub, global: &GlobalOpts) -> Result<Arc<Session>, CliError> {
    let fut = hub.login();
    with_spinner(global, "Logging in…", fut)
        .await
        .map_err(|e| match e {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: global.profile.clone().unwrap_or_else(|| "default".into()),
                message,
            },
            other => other.into(),
        })
}

/// Log in and fetch the installation/room/device directory.
pub async fn connect(hub: &Hub, global: &GlobalOpts) -> Result<(), CliError> {
    login(hub, global).await?;
    with_spinner(global, "Fetching devices…", hub.refresh()).await?;
    Ok(())
}

/// Resolve an installation by id, instCode or description.
pub fn resolve_installation(hub: &Hub, identifier: &str) -> Result<Arc<Installation>, CliError> {
    hub.directory()
        .find_installation(identifier)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "installation".into(),
            identifier: identifier.into(),
            list_command: "installations list".into(),
        })
}

/// Resolve a device by id or label.
pub fn resolve_device(hub: &Hub, identifier: &str) -> Result<Device, CliError> {
    hub.directory()
        .find_device(identifier)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "device".into(),
            identifier: identifier.into(),
            list_command: "devices list".into(),
        })
}

/// Run `fut` behind a stderr spinner when attached to a terminal.
pub async fn with_spinner<F, T>(global: &GlobalOpts, message: &'static str, fut: F) -> T
where
    F: Future<Output = T>,
{
    if global.quiet || !std::io::stderr().is_terminal() {
        return fut.await;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    let result = fut.await;
    spinner.finish_and_clear();
    result
}

// ── Action reporting ────────────────────────────────────────────────

/// What a control command did, as printed to the user.
#[derive(Debug, Serialize)]
pub struct ActionReport {
    pub device_id: i64,
    pub label: String,
    pub action: String,
    pub outcome: AckOutcome,
}

/// Run a device action and print its outcome.
///
/// A device-reported failure becomes [`CliError::DeviceFailed`] after the
/// report has been printed.
pub async fn run_action<F>(
    hub: &Hub,
    global: &GlobalOpts,
    device: &Device,
    action: &str,
    fut: F,
) -> Result<(), CliError>
where
    F: Future<Output = Result<AckOutcome, CoreError>>,
{
    let message = match hub.config().ack_mode {
        AckMode::Wait => "Waiting for the device…",
        AckMode::FireAndForget => "Sending…",
    };
    let outcome = with_spinner(global, message, fut).await?;

    let report = ActionReport {
        device_id: device.id(),
        label: device.label().to_owned(),
        action: action.to_owned(),
        outcome,
    };
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &report,
        |r| {
            format!(
                "{} ({}): {} {}",
                r.label,
                r.device_id,
                r.action,
                output::paint_state(&r.outcome.to_string(), color)
            )
        },
        |r| r.outcome.to_string(),
    );
    output::print_output(&out, global.quiet);

    match report.outcome {
        AckOutcome::Failed { message_text } => Err(CliError::DeviceFailed { message_text }),
        AckOutcome::Pending | AckOutcome::Succeeded => Ok(()),
    }
}
