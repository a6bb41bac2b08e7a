//! Light command handlers.

use tracing::warn;

use daisy_core::{Device, Hub, Rgb};

use crate::cli::{GlobalOpts, LightsArgs, LightsCommand};
use crate::error::CliError;

use super::{devices, util};

/// Parse `--rgb` and range-check `--brightness`.
fn validate_color(rgb: Option<&str>, brightness: Option<u8>) -> Result<Option<Rgb>, CliError> {
    let rgb = rgb.map(str::parse::<Rgb>).transpose()?;
    if let Some(b) = brightness {
        if b > 100 {
            return Err(CliError::Validation {
                field: "brightness".into(),
                reason: format!("must be between 0 and 100, got {b}"),
            });
        }
    }
    Ok(rgb)
}

pub async fn handle(hub: &Hub, args: LightsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    // Reject bad input before logging in
    let color = match args.command {
        LightsCommand::Color {
            ref rgb,
            brightness,
            ..
        } => Some(validate_color(rgb.as_deref(), brightness)?),
        _ => None,
    };

    util::connect(hub, global).await?;

    match args.command {
        LightsCommand::List => {
            let lights: Vec<Device> = hub
                .directory()
                .lights()
                .into_iter()
                .map(Device::Light)
                .collect();
            devices::print_devices(&lights, global);
            Ok(())
        }

        LightsCommand::On { device } => {
            let device = util::resolve_device(hub, &device)?;
            let fut = hub.turn_on(device.id());
            util::run_action(hub, global, &device, "on", fut).await
        }

        LightsCommand::Off { device } => {
            let device = util::resolve_device(hub, &device)?;
            let fut = hub.turn_off(device.id());
            util::run_action(hub, global, &device, "off", fut).await
        }

        LightsCommand::Color {
            device, brightness, ..
        } => {
            let rgb = color.flatten();
            let device = util::resolve_device(hub, &device)?;

            // Omitted values fall back to the last known state
            if rgb.is_none() || brightness.is_none() {
                if let Err(e) = hub.update_state(device.id()).await {
                    warn!(device_id = device.id(), error = %e, "could not read current color");
                }
            }

            let fut = hub.set_color(device.id(), rgb, brightness);
            util::run_action(hub, global, &device, "color", fut).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_input_is_checked_locally() {
        assert!(matches!(
            validate_color(Some("255,0,0"), Some(50)),
            Ok(Some(rgb)) if rgb == Rgb::new(255, 0, 0)
        ));
        assert!(matches!(validate_color(None, None), Ok(None)));
        assert!(matches!(
            validate_color(Some("300,0,0"), None),
            Err(CliError::Validation { .. })
        ));
        assert!(matches!(
            validate_color(None, Some(101)),
            Err(CliError::Validation { .. })
        ));
    }
}
