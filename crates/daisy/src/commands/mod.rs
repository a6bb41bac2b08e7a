//! Command dispatch: bridges CLI args -> hub calls -> output formatting.

pub mod config_cmd;
pub mod covers;
pub mod devices;
pub mod installations;
pub mod lights;
pub mod login;
pub mod rooms;
pub mod util;

use daisy_core::Hub;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, hub: &Hub, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login => login::handle(hub, global).await,
        Command::Installations(args) => installations::handle(hub, args, global).await,
        Command::Rooms(args) => rooms::handle(hub, args, global).await,
        Command::Devices(args) => devices::handle(hub, args, global).await,
        Command::Lights(args) => lights::handle(hub, args, global).await,
        Command::Covers(args) => covers::handle(hub, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
