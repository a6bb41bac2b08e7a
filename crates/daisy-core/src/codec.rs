// ── Status codec ──
//
// Turns the status items of `status-device-list` into a partial device
// state, and encodes/decodes the fixed-width color string
// `A###R###G###B###` used both in status reports and COLOR commands.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use strum::EnumString;
use tracing::{trace, warn};

use daisy_api::RawStatusItem;

use crate::error::CoreError;
use crate::model::Rgb;

/// Status item codes with a meaning for the supported devices.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum StatusCode {
    #[strum(serialize = "POWER")]
    Power,
    #[strum(serialize = "COLOR")]
    Color,
    #[strum(serialize = "OPEN_CLOSE")]
    OpenClose,
    #[strum(serialize = "LEVEL")]
    Level,
    #[strum(default)]
    Other(String),
}

/// One telemetry field of a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusItem {
    pub device_id: i64,
    pub code: StatusCode,
    pub raw_value: String,
}

impl StatusItem {
    pub fn from_raw(device_id: i64, raw: &RawStatusItem) -> Self {
        Self {
            device_id,
            code: raw
                .statusitem_code
                .parse()
                .unwrap_or_else(|_| StatusCode::Other(raw.statusitem_code.clone())),
            raw_value: raw.status_value.clone(),
        }
    }
}

/// Brightness plus RGB, as carried by the COLOR item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// 0-100.
    pub brightness: u8,
    pub rgb: Rgb,
}

/// Tri-state of the OPEN_CLOSE item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedState {
    Open,
    Closed,
    Unknown,
}

/// Partial device state decoded from a status list. `None` fields were
/// absent (or malformed) and leave the previous value untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusUpdate {
    pub is_on: Option<bool>,
    pub color: Option<Color>,
    pub closed: Option<ClosedState>,
    pub position: Option<u8>,
}

// ── Color string ───────────────────────────────────────────────────

/// Encode `A###R###G###B###`. Brightness above 100 is rejected.
pub fn encode_color(brightness: u8, rgb: Rgb) -> Result<String, CoreError> {
    if brightness > 100 {
        return Err(CoreError::validation(format!(
            "brightness must be between 0 and 100, got {brightness}"
        )));
    }
    let mut out = String::with_capacity(16);
    // Writing to a String cannot fail
    let _ = write!(
        out,
        "A{brightness:03}R{:03}G{:03}B{:03}",
        rgb.r, rgb.g, rgb.b
    );
    Ok(out)
}

/// Decode `A###R###G###B###` by fixed offsets.
///
/// Separator letters are not checked, so a value with missing or odd
/// separators still decodes as long as the digits sit at their offsets.
pub fn decode_color(value: &str) -> Option<Color> {
    let field = |range: std::ops::Range<usize>| value.get(range)?.parse::<u16>().ok();

    let brightness = u8::try_from(field(1..4)?).ok().filter(|b| *b <= 100)?;
    let r = u8::try_from(field(5..8)?).ok()?;
    let g = u8::try_from(field(9..12)?).ok()?;
    let b = u8::try_from(field(13..16)?).ok()?;

    Some(Color {
        brightness,
        rgb: Rgb::new(r, g, b),
    })
}

// ── Status list ────────────────────────────────────────────────────

/// Decode a status list into a partial state.
///
/// Unrecognized codes are ignored. When a code appears more than once
/// the last well-formed value wins.
pub fn decode_status_list(items: &[StatusItem]) -> StatusUpdate {
    let mut update = StatusUpdate::default();

    for item in items {
        match item.code {
            StatusCode::Power => update.is_on = Some(item.raw_value == "ON"),
            StatusCode::Color => match decode_color(&item.raw_value) {
                Some(color) => update.color = Some(color),
                None => warn!(
                    device_id = item.device_id,
                    value = %item.raw_value,
                    "malformed COLOR status value"
                ),
            },
            StatusCode::OpenClose => {
                update.closed = Some(match item.raw_value.as_str() {
                    "CLOSE" => ClosedState::Closed,
                    "OPEN" => ClosedState::Open,
                    _ => ClosedState::Unknown,
                });
            }
            StatusCode::Level => match item.raw_value.trim().parse::<u8>() {
                Ok(position) => update.position = Some(position),
                Err(_) => warn!(
                    device_id = item.device_id,
                    value = %item.raw_value,
                    "malformed LEVEL status value"
                ),
            },
            StatusCode::Other(ref code) => {
                trace!(device_id = item.device_id, code, "ignoring status item");
            }
        }
    }

    update
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{CoverState, LightState};

    fn item(code: &str, value: &str) -> StatusItem {
        StatusItem {
            device_id: 1,
            code: code.parse().unwrap(),
            raw_value: value.into(),
        }
    }

    #[test]
    fn decodes_reference_color_string() {
        let color = decode_color("A050R255G000B000").unwrap();
        assert_eq!(color.brightness, 50);
        assert_eq!(color.rgb, Rgb::new(255, 0, 0));
    }

    #[test]
    fn decode_ignores_separator_characters() {
        let color = decode_color("x100-010-020-030").unwrap();
        assert_eq!(color.brightness, 100);
        assert_eq!(color.rgb, Rgb::new(10, 20, 30));
    }

    #[test]
    fn decode_rejects_short_or_out_of_range() {
        assert_eq!(decode_color("A050R255G000"), None);
        assert_eq!(decode_color("A101R000G000B000"), None);
        assert_eq!(decode_color("A050R256G000B000"), None);
        assert_eq!(decode_color(""), None);
    }

    #[test]
    fn color_round_trips_over_the_valid_range() {
        for brightness in 0..=100u8 {
            for v in 0..=u8::MAX {
                let samples = [
                    Rgb::new(v, 0, 0),
                    Rgb::new(0, v, 0),
                    Rgb::new(0, 0, v),
                    Rgb::new(v, u8::MAX - v, v),
                ];
                for rgb in samples {
                    let encoded = encode_color(brightness, rgb).unwrap();
                    assert_eq!(encoded.len(), 16);
                    let decoded = decode_color(&encoded).unwrap();
                    assert_eq!((decoded.brightness, decoded.rgb), (brightness, rgb));
                }
            }
        }
    }

    #[test]
    fn encode_rejects_brightness_over_100() {
        assert!(matches!(
            encode_color(101, Rgb::WHITE),
            Err(CoreError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn decodes_light_status() {
        let update = decode_status_list(&[
            item("POWER", "ON"),
            item("COLOR", "A050R255G000B000"),
            item("SIGNAL", "42"),
        ]);
        assert_eq!(update.is_on, Some(true));
        assert_eq!(update.color.unwrap().brightness, 50);

        let off = decode_status_list(&[item("POWER", "OFF")]);
        assert_eq!(off.is_on, Some(false));
    }

    #[test]
    fn decodes_cover_status() {
        let update = decode_status_list(&[item("OPEN_CLOSE", "CLOSE"), item("LEVEL", "66")]);
        assert_eq!(update.closed, Some(ClosedState::Closed));
        assert_eq!(update.position, Some(66));

        let unknown = decode_status_list(&[item("OPEN_CLOSE", "MOVING")]);
        assert_eq!(unknown.closed, Some(ClosedState::Unknown));
    }

    #[test]
    fn malformed_values_leave_fields_unset() {
        let update = decode_status_list(&[item("COLOR", "garbage"), item("LEVEL", "high")]);
        assert_eq!(update, StatusUpdate::default());
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let items = [
            item("POWER", "ON"),
            item("COLOR", "A020R001G002B003"),
            item("OPEN_CLOSE", "OPEN"),
            item("LEVEL", "33"),
        ];

        let mut light = LightState::default();
        light.apply(&decode_status_list(&items));
        let once = light;
        light.apply(&decode_status_list(&items));
        assert_eq!(light, once);

        let mut cover = CoverState::default();
        cover.apply(&decode_status_list(&items));
        let once = cover;
        cover.apply(&decode_status_list(&items));
        assert_eq!(cover, once);
        assert_eq!(cover.is_closed, Some(false));
    }

    #[test]
    fn unknown_open_close_clears_closed_flag() {
        let mut cover = CoverState {
            position: Some(100),
            is_closed: Some(true),
        };
        cover.apply(&decode_status_list(&[item("OPEN_CLOSE", "??")]));
        assert_eq!(cover.is_closed, None);
        assert_eq!(cover.position, Some(100));
    }
}
