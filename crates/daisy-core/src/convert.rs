// ── API-to-domain type conversions ──
//
// Bridges raw `daisy_api` payloads into `daisy_core::model` types. Device
// entries with a type code outside the supported set are dropped here, so
// nothing downstream ever sees an unknown variant.

use tracing::warn;

use daisy_api::{RawDevice, RawInstallation, RawRoom};

use crate::model::{Cover, CoverState, Device, DeviceInfo, DeviceType, Installation, Light, LightState, Room};

/// `"S"`, `"true"`, `"1"` (any case) count as set.
fn flag(raw: Option<&String>) -> bool {
    raw.is_some_and(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "s" | "true" | "1" | "y"))
}

impl From<RawInstallation> for Installation {
    fn from(raw: RawInstallation) -> Self {
        Self {
            id: raw.id_installation,
            inst_code: raw.inst_code,
            description: raw.inst_description.unwrap_or_default(),
            order: raw.installation_order.unwrap_or_default(),
            firmware_version: raw.firmware_version,
            hub_device_id: raw.id_installation_device,
            latitude: raw.latitude,
            longitude: raw.longitude,
            active_timer: raw.active_timer,
            weekend: raw.weekend,
            workdays: raw.workdays,
        }
    }
}

/// Build a device from its raw entry, or `None` for an unsupported type.
pub(crate) fn device_from_raw(installation_id: i64, raw: RawDevice) -> Option<Device> {
    let Some(device_type) = DeviceType::from_code(raw.id_devicetype) else {
        warn!(
            device_id = raw.id_installation_device,
            type_code = raw.id_devicetype,
            label = raw.label.as_deref().unwrap_or_default(),
            "skipping device of unsupported type"
        );
        return None;
    };

    let info = DeviceInfo {
        id: raw.id_installation_device,
        installation_id,
        device_index: raw.device_index,
        device_type,
        label: raw.label.unwrap_or_default(),
        order: raw.device_order.unwrap_or_default(),
        model_id: raw.id_devicemodel,
        favorite: flag(raw.favorite.as_ref()),
        feedback: flag(raw.feedback.as_ref()),
        device_code: raw.device_code,
        remote_control_code: raw.remote_control_code,
    };

    Some(if device_type.is_light() {
        Device::Light(Light {
            info,
            state: LightState::default(),
        })
    } else {
        Device::Cover(Cover {
            info,
            state: CoverState::default(),
        })
    })
}

/// Build a room, keeping only devices of supported types.
pub(crate) fn room_from_raw(installation_id: i64, raw: RawRoom) -> Room {
    let devices = raw
        .device_list
        .into_iter()
        .filter_map(|d| device_from_raw(installation_id, d))
        .collect();

    Room {
        id: raw.id_installation_room,
        installation_id,
        room_type: raw.id_roomtype,
        description: raw.room_description.unwrap_or_default(),
        order: raw.room_order.unwrap_or_default(),
        devices,
    }
}
