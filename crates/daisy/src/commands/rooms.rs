//! Room command handlers.

use tabled::Tabled;

use daisy_core::{Hub, Room};

use crate::cli::{GlobalOpts, RoomsArgs, RoomsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Installation")]
    installation: String,
    #[tabled(rename = "Room")]
    name: String,
    #[tabled(rename = "Devices")]
    devices: String,
}

impl From<&Room> for RoomRow {
    fn from(r: &Room) -> Self {
        Self {
            id: r.id.to_string(),
            installation: r.installation_id.to_string(),
            name: r.description.clone(),
            devices: r
                .devices
                .iter()
                .map(daisy_core::Device::label)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

pub async fn handle(hub: &Hub, args: RoomsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        RoomsCommand::List { installation } => {
            util::connect(hub, global).await?;

            let installations = match installation {
                Some(ref ident) => vec![util::resolve_installation(hub, ident)?],
                None => hub.directory().installations(),
            };

            let mut rooms: Vec<Room> = Vec::new();
            for inst in &installations {
                if let Some(list) = hub.directory().rooms(inst.id) {
                    rooms.extend(list.iter().cloned());
                }
            }
            rooms.sort_by_key(|r| (r.installation_id, r.order, r.id));

            let out = output::render_list(&global.output, &rooms, |r| RoomRow::from(r), |r| {
                r.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
