// ── Device domain types ──
//
// A device is one of a fixed variant set, chosen once from its
// `idDevicetype` when the directory is fetched. Action methods only build
// command batches; sending them is the hub's job.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::{ClosedState, StatusUpdate};
use crate::command::{Action, CommandBatch, CommandTable, LevelStep};
use crate::error::CoreError;

/// Device type codes the client understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    /// 21 -- white LED light.
    WhiteLed,
    /// 22 -- roller/ZIP cover.
    ZipCover,
    /// 23 -- RGB LED light.
    RgbLed,
    /// 24 -- pergola/lamella cover.
    PergolaCover,
}

impl DeviceType {
    pub const fn code(self) -> i64 {
        match self {
            Self::WhiteLed => 21,
            Self::ZipCover => 22,
            Self::RgbLed => 23,
            Self::PergolaCover => 24,
        }
    }

    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            21 => Some(Self::WhiteLed),
            22 => Some(Self::ZipCover),
            23 => Some(Self::RgbLed),
            24 => Some(Self::PergolaCover),
            _ => None,
        }
    }

    pub const fn is_light(self) -> bool {
        matches!(self, Self::WhiteLed | Self::RgbLed)
    }

    pub const fn is_cover(self) -> bool {
        matches!(self, Self::ZipCover | Self::PergolaCover)
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WhiteLed => "white LED",
            Self::ZipCover => "ZIP cover",
            Self::RgbLed => "RGB LED",
            Self::PergolaCover => "pergola cover",
        };
        write!(f, "{name} ({})", self.code())
    }
}

// ── Color ──────────────────────────────────────────────────────────

/// An RGB triple, each channel 0-255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from wider integers, rejecting any channel outside 0-255.
    pub fn try_from_channels(r: i64, g: i64, b: i64) -> Result<Self, CoreError> {
        let channel = |name: &str, v: i64| {
            u8::try_from(v).map_err(|_| {
                CoreError::validation(format!("{name} channel must be between 0 and 255, got {v}"))
            })
        };
        Ok(Self::new(channel("red", r)?, channel("green", g)?, channel("blue", b)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = CoreError;

    /// Parses `r,g,b`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [r, g, b] = parts.as_slice() else {
            return Err(CoreError::validation(format!(
                "expected color as r,g,b, got '{s}'"
            )));
        };
        let num = |v: &str| {
            v.parse::<i64>()
                .map_err(|_| CoreError::validation(format!("invalid color channel '{v}'")))
        };
        Self::try_from_channels(num(r)?, num(g)?, num(b)?)
    }
}

// ── Shared device data ─────────────────────────────────────────────

/// Fields every device variant carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Stable id (`idInstallationDevice`).
    pub id: i64,
    /// Owning installation (`idInstallation`).
    pub installation_id: i64,
    /// Protocol-local channel index, sent as `deviceCode` in commands.
    pub device_index: i64,
    pub device_type: DeviceType,
    pub label: String,
    pub order: i64,
    pub model_id: Option<i64>,
    pub device_code: Option<String>,
    pub remote_control_code: Option<String>,
    pub favorite: bool,
    pub feedback: bool,
}

// ── Light ──────────────────────────────────────────────────────────

/// Last decoded light state. `None` means never reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightState {
    pub is_on: Option<bool>,
    /// 0-100.
    pub brightness: Option<u8>,
    pub rgb: Option<Rgb>,
}

impl LightState {
    /// Merge a decoded status update. Applying the same update twice
    /// yields the same state.
    pub fn apply(&mut self, update: &StatusUpdate) {
        if let Some(on) = update.is_on {
            self.is_on = Some(on);
        }
        if let Some(color) = update.color {
            self.brightness = Some(color.brightness);
            self.rgb = Some(color.rgb);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Light {
    #[serde(flatten)]
    pub info: DeviceInfo,
    pub state: LightState,
}

impl Light {
    pub fn turn_on(&self, table: &CommandTable) -> Result<CommandBatch, CoreError> {
        table.batch(&self.info, Action::PowerOn)
    }

    pub fn turn_off(&self, table: &CommandTable) -> Result<CommandBatch, CoreError> {
        table.batch(&self.info, Action::PowerOff)
    }

    /// Set color and brightness.
    ///
    /// Omitted values fall back to the last known state, then to
    /// brightness 0 and white. Brightness above 100 is rejected.
    pub fn set_color(
        &self,
        table: &CommandTable,
        rgb: Option<Rgb>,
        brightness: Option<u8>,
    ) -> Result<CommandBatch, CoreError> {
        let brightness = brightness.or(self.state.brightness).unwrap_or(0);
        let rgb = rgb.or(self.state.rgb).unwrap_or(Rgb::WHITE);
        table.batch(&self.info, Action::Color { brightness, rgb })
    }
}

// ── Cover ──────────────────────────────────────────────────────────

/// Last decoded cover state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverState {
    pub position: Option<u8>,
    /// `None` when the device reports neither OPEN nor CLOSE.
    pub is_closed: Option<bool>,
}

impl CoverState {
    pub fn apply(&mut self, update: &StatusUpdate) {
        match update.closed {
            Some(ClosedState::Closed) => self.is_closed = Some(true),
            Some(ClosedState::Open) => self.is_closed = Some(false),
            Some(ClosedState::Unknown) => self.is_closed = None,
            None => {}
        }
        if let Some(position) = update.position {
            self.position = Some(position);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cover {
    #[serde(flatten)]
    pub info: DeviceInfo,
    pub state: CoverState,
}

impl Cover {
    /// Open fully (`None` or `Some(100)`) or move to the 33/66 % step.
    pub fn open(&self, table: &CommandTable, percent: Option<u8>) -> Result<CommandBatch, CoreError> {
        let action = match percent {
            None | Some(100) => Action::Open,
            Some(p @ (33 | 66)) => Action::Level(LevelStep::from_percent(p).ok_or_else(|| {
                CoreError::validation(format!("no level step for {p}%"))
            })?),
            Some(p) => {
                return Err(CoreError::validation(format!(
                    "cover open percent must be 33, 66 or 100, got {p}"
                )));
            }
        };
        table.batch(&self.info, action)
    }

    pub fn stop(&self, table: &CommandTable) -> Result<CommandBatch, CoreError> {
        table.batch(&self.info, Action::Stop)
    }

    pub fn close(&self, table: &CommandTable) -> Result<CommandBatch, CoreError> {
        table.batch(&self.info, Action::Close)
    }

    /// Move to an explicit level step.
    pub fn level(&self, table: &CommandTable, step: LevelStep) -> Result<CommandBatch, CoreError> {
        table.batch(&self.info, Action::Level(step))
    }

    /// Map an arbitrary 0-100 position onto the protocol's steps:
    /// 0-15 closes, 16-48 is 33 %, 49-81 is 66 %, 82-100 opens.
    pub fn set_position(&self, table: &CommandTable, percent: u8) -> Result<CommandBatch, CoreError> {
        match percent {
            0..=15 => self.close(table),
            16..=48 => self.open(table, Some(33)),
            49..=81 => self.open(table, Some(66)),
            82..=100 => self.open(table, None),
            _ => Err(CoreError::validation(format!(
                "cover position must be between 0 and 100, got {percent}"
            ))),
        }
    }
}

// ── Device ─────────────────────────────────────────────────────────

/// A device of one of the supported variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Device {
    Light(Light),
    Cover(Cover),
}

impl Device {
    pub fn info(&self) -> &DeviceInfo {
        match self {
            Self::Light(l) => &l.info,
            Self::Cover(c) => &c.info,
        }
    }

    pub fn id(&self) -> i64 {
        self.info().id
    }

    pub fn label(&self) -> &str {
        &self.info().label
    }

    pub fn device_type(&self) -> DeviceType {
        self.info().device_type
    }

    pub fn installation_id(&self) -> i64 {
        self.info().installation_id
    }

    pub fn as_light(&self) -> Option<&Light> {
        match self {
            Self::Light(l) => Some(l),
            Self::Cover(_) => None,
        }
    }

    pub fn as_cover(&self) -> Option<&Cover> {
        match self {
            Self::Cover(c) => Some(c),
            Self::Light(_) => None,
        }
    }

    /// Merge a decoded status update into the variant's state.
    pub fn apply_status(&mut self, update: &StatusUpdate) {
        match self {
            Self::Light(l) => l.state.apply(update),
            Self::Cover(c) => c.state.apply(update),
        }
    }
}
