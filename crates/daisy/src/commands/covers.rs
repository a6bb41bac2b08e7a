//! Cover command handlers.

use daisy_core::{Device, Hub};

use crate::cli::{CoversArgs, CoversCommand, GlobalOpts};
use crate::error::CliError;

use super::{devices, util};

pub async fn handle(hub: &Hub, args: CoversArgs, global: &GlobalOpts) -> Result<(), CliError> {
    util::connect(hub, global).await?;

    match args.command {
        CoversCommand::List => {
            let covers: Vec<Device> = hub
                .directory()
                .covers()
                .into_iter()
                .map(Device::Cover)
                .collect();
            devices::print_devices(&covers, global);
            Ok(())
        }

        CoversCommand::Open { device, percent } => {
            let device = util::resolve_device(hub, &device)?;
            let action = percent.map_or_else(|| "open".to_owned(), |p| format!("open {p}%"));
            let fut = hub.open_cover(device.id(), percent);
            util::run_action(hub, global, &device, &action, fut).await
        }

        CoversCommand::Close { device } => {
            let device = util::resolve_device(hub, &device)?;
            let fut = hub.close_cover(device.id());
            util::run_action(hub, global, &device, "close", fut).await
        }

        CoversCommand::Stop { device } => {
            let device = util::resolve_device(hub, &device)?;
            let fut = hub.stop_cover(device.id());
            util::run_action(hub, global, &device, "stop", fut).await
        }

        CoversCommand::Position { device, percent } => {
            let device = util::resolve_device(hub, &device)?;
            let fut = hub.set_cover_position(device.id(), percent);
            util::run_action(hub, global, &device, &format!("position {percent}%"), fut).await
        }
    }
}
