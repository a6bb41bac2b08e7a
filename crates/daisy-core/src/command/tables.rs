// ── Command tables ──
//
// Pure data: (device type, logical action) -> (command id, parameter,
// low-level channel). Nothing here performs I/O.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::codec::encode_color;
use crate::config::WhiteLedCommandSet;
use crate::error::CoreError;
use crate::model::{DeviceType, Rgb};

/// `commandAction` values on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum CommandAction {
    #[strum(serialize = "OPEN_STOP_CLOSE")]
    #[serde(rename = "OPEN_STOP_CLOSE")]
    OpenStopClose,
    #[strum(serialize = "LEVEL")]
    #[serde(rename = "LEVEL")]
    Level,
    #[strum(serialize = "POWER")]
    #[serde(rename = "POWER")]
    Power,
    #[strum(serialize = "COLOR")]
    #[serde(rename = "COLOR")]
    Color,
}

/// Secondary device-protocol channel (`lowlevelCommand`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Channel {
    Ch1,
    Ch2,
    Ch3,
    Ch4,
    Ch5,
    Ch6,
    Ch7,
    Ch8,
}

/// Discrete cover positions supported by the LEVEL command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelStep {
    /// 33 %
    Lev2,
    /// 66 %
    Lev3,
    /// 100 %
    Lev4,
}

impl LevelStep {
    pub const fn from_percent(percent: u8) -> Option<Self> {
        match percent {
            33 => Some(Self::Lev2),
            66 => Some(Self::Lev3),
            100 => Some(Self::Lev4),
            _ => None,
        }
    }

    pub const fn percent(self) -> u8 {
        match self {
            Self::Lev2 => 33,
            Self::Lev3 => 66,
            Self::Lev4 => 100,
        }
    }

    const fn entry(self) -> (u32, &'static str, Channel) {
        match self {
            Self::Lev2 => (97, "LEV2", Channel::Ch2),
            Self::Lev3 => (98, "LEV3", Channel::Ch3),
            Self::Lev4 => (99, "LEV4", Channel::Ch4),
        }
    }
}

/// A logical action requested on a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Open,
    Stop,
    Close,
    Level(LevelStep),
    PowerOn,
    PowerOff,
    Color { brightness: u8, rgb: Rgb },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Stop => f.write_str("stop"),
            Self::Close => f.write_str("close"),
            Self::Level(step) => write!(f, "level {}%", step.percent()),
            Self::PowerOn => f.write_str("power on"),
            Self::PowerOff => f.write_str("power off"),
            Self::Color { .. } => f.write_str("color"),
        }
    }
}

/// A resolved table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub action: CommandAction,
    pub command_id: u32,
    pub param: String,
    pub low_level: Option<Channel>,
}

impl CommandSpec {
    fn new(action: CommandAction, command_id: u32, param: impl Into<String>, low_level: Option<Channel>) -> Self {
        Self {
            action,
            command_id,
            param: param.into(),
            low_level,
        }
    }
}

/// Lookup of command specs for every supported device type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandTable {
    pub white_led: WhiteLedCommandSet,
}

impl CommandTable {
    pub const fn new(white_led: WhiteLedCommandSet) -> Self {
        Self { white_led }
    }

    /// Resolve `(device_type, action)`.
    ///
    /// Combinations without an entry (a cover action on a light, etc.)
    /// are [`CoreError::UnsupportedDeviceType`]; there is no fallback.
    pub fn lookup(&self, device_type: DeviceType, action: Action) -> Result<CommandSpec, CoreError> {
        let unsupported = || CoreError::UnsupportedDeviceType {
            type_code: device_type.code(),
            action: action.to_string(),
        };

        let spec = match (device_type, action) {
            // ── Covers ───────────────────────────────────────────────
            (DeviceType::ZipCover, Action::Open) => osc(75, "OPEN", Channel::Ch5),
            (DeviceType::ZipCover, Action::Stop) => osc(76, "STOP", Channel::Ch7),
            (DeviceType::ZipCover, Action::Close) => osc(77, "CLOSE", Channel::Ch8),
            (DeviceType::PergolaCover, Action::Open) => osc(94, "OPEN", Channel::Ch4),
            (DeviceType::PergolaCover, Action::Stop) => osc(95, "STOP", Channel::Ch7),
            (DeviceType::PergolaCover, Action::Close) => osc(96, "CLOSE", Channel::Ch1),
            (DeviceType::ZipCover | DeviceType::PergolaCover, Action::Level(step)) => {
                let (id, param, channel) = step.entry();
                CommandSpec::new(CommandAction::Level, id, param, Some(channel))
            }

            // ── White LED ────────────────────────────────────────────
            (DeviceType::WhiteLed, Action::PowerOn) => {
                let id = match self.white_led {
                    WhiteLedCommandSet::Tmate => 146,
                    WhiteLedCommandSet::Legacy => 40,
                };
                CommandSpec::new(CommandAction::Power, id, "ON", Some(Channel::Ch1))
            }
            (DeviceType::WhiteLed, Action::PowerOff) => {
                let id = match self.white_led {
                    WhiteLedCommandSet::Tmate => 147,
                    WhiteLedCommandSet::Legacy => 41,
                };
                CommandSpec::new(CommandAction::Power, id, "OFF", Some(Channel::Ch8))
            }
            (DeviceType::WhiteLed, Action::Color { brightness, rgb }) => CommandSpec::new(
                CommandAction::Color,
                146,
                encode_color(brightness, rgb)?,
                Some(Channel::Ch1),
            ),

            // ── RGB LED ──────────────────────────────────────────────
            (DeviceType::RgbLed, Action::PowerOn) => {
                CommandSpec::new(CommandAction::Power, 138, "ON", None)
            }
            (DeviceType::RgbLed, Action::PowerOff) => {
                CommandSpec::new(CommandAction::Power, 138, "OFF", None)
            }
            (DeviceType::RgbLed, Action::Color { brightness, rgb }) => {
                CommandSpec::new(CommandAction::Color, 137, encode_color(brightness, rgb)?, None)
            }

            _ => return Err(unsupported()),
        };
        Ok(spec)
    }

    /// Resolve by raw `idDevicetype`. Unknown codes are unsupported.
    pub fn lookup_code(&self, type_code: i64, action: Action) -> Result<CommandSpec, CoreError> {
        let device_type =
            DeviceType::from_code(type_code).ok_or_else(|| CoreError::UnsupportedDeviceType {
                type_code,
                action: action.to_string(),
            })?;
        self.lookup(device_type, action)
    }
}

fn osc(command_id: u32, param: &'static str, channel: Channel) -> CommandSpec {
    CommandSpec::new(CommandAction::OpenStopClose, command_id, param, Some(channel))
}
