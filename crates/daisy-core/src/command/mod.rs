// ── Command API ──
//
// Action methods on `Light`/`Cover` resolve a `CommandSpec` from the
// tables and wrap it in a single-element `CommandBatch`. The hub turns a
// batch into wire requests and hands it to the dispatcher.

pub mod tables;

use serde::{Deserialize, Serialize};

use daisy_api::CommandRequest;

use crate::error::CoreError;
use crate::model::DeviceInfo;

pub use tables::{Action, Channel, CommandAction, CommandSpec, CommandTable, LevelStep};

/// One command addressed to one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCommand {
    pub installation_device_id: i64,
    pub device_index: i64,
    pub action: Action,
    pub spec: CommandSpec,
}

impl DeviceCommand {
    pub fn to_request(&self) -> CommandRequest {
        CommandRequest {
            device_code: self.device_index.to_string(),
            id_installation_device: self.installation_device_id,
            command_action: self.spec.action.to_string(),
            command_id: self.spec.command_id,
            command_param: self.spec.param.clone(),
            lowlevel_command: self.spec.low_level.map(|c| c.to_string()),
        }
    }
}

/// Commands sent together to one installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandBatch {
    pub installation_id: i64,
    pub commands: Vec<DeviceCommand>,
}

impl CommandBatch {
    pub fn requests(&self) -> Vec<CommandRequest> {
        self.commands.iter().map(DeviceCommand::to_request).collect()
    }
}

impl CommandTable {
    /// Resolve `action` for `device` and wrap it in a singleton batch.
    pub fn batch(&self, device: &DeviceInfo, action: Action) -> Result<CommandBatch, CoreError> {
        let spec = self.lookup(device.device_type, action)?;
        Ok(CommandBatch {
            installation_id: device.installation_id,
            commands: vec![DeviceCommand {
                installation_device_id: device.id,
                device_index: device.device_index,
                action,
                spec,
            }],
        })
    }
}
