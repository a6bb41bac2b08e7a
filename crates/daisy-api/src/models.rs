// Wire models for the tmate cloud API
//
// Field names follow the service's JSON verbatim (mostly camelCase with a
// few lowercase oddities such as `activetimer`). Everything the client does
// not interpret is optional so that firmware-dependent payloads still parse.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Result code the query endpoints use for success.
pub const QUERY_SUCCESS: &str = "S";
/// `MessageID` returned when a command batch is accepted.
pub const COMMAND_ACCEPTED: &str = "WS-000";
/// `MessageID` every acknowledgment reply must carry.
pub const ACK_MESSAGE_ID: &str = "WS-300";

// ── Envelope ────────────────────────────────────────────────────────

/// `{ codEsito, valRisultato }` envelope shared by every query endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse<T> {
    pub cod_esito: String,
    pub val_risultato: Option<T>,
}

// ── Login ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub id_account: i64,
    pub id_session: String,
}

// ── Installations ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationList {
    #[serde(default)]
    pub installation_list: Vec<RawInstallation>,
}

/// An installation (hub/site) as returned by `account-installation-list`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInstallation {
    pub id_installation: i64,
    pub inst_code: String,
    #[serde(default)]
    pub inst_description: Option<String>,
    #[serde(default)]
    pub installation_order: Option<i64>,
    #[serde(default)]
    pub firmware_version: Option<String>,
    #[serde(default)]
    pub id_installation_device: Option<i64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, rename = "activetimer")]
    pub active_timer: Option<String>,
    #[serde(default)]
    pub weekend: Option<String>,
    #[serde(default)]
    pub workdays: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatus {
    #[serde(default, deserialize_with = "lenient_flag")]
    pub node_active: bool,
}

// ── Rooms & devices ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomList {
    #[serde(default)]
    pub room_list: Vec<RawRoom>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRoom {
    pub id_installation_room: i64,
    #[serde(default)]
    pub id_roomtype: Option<i64>,
    #[serde(default)]
    pub room_description: Option<String>,
    #[serde(default)]
    pub room_order: Option<i64>,
    #[serde(default, deserialize_with = "device_entries")]
    pub device_list: Vec<RawDevice>,
}

/// Decode `deviceList` entry by entry. An entry that does not fit
/// [`RawDevice`] (typically a device type this client does not drive) is
/// skipped so the rest of the room still loads.
fn device_entries<'de, D>(deserializer: D) -> Result<Vec<RawDevice>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .filter_map(|entry| match RawDevice::deserialize(&entry) {
            Ok(device) => Some(device),
            Err(e) => {
                warn!(
                    device_type = ?entry.get("idDevicetype"),
                    device_id = ?entry.get("idInstallationDevice"),
                    error = %e,
                    "skipping undecodable device entry"
                );
                None
            }
        })
        .collect())
}

/// A device entry inside a room. `id_devicetype` selects the variant.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDevice {
    pub id_installation_device: i64,
    pub id_devicetype: i64,
    pub device_index: i64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub device_code: Option<String>,
    #[serde(default)]
    pub device_order: Option<i64>,
    #[serde(default)]
    pub id_devicemodel: Option<i64>,
    #[serde(default)]
    pub remote_control_code: Option<String>,
    #[serde(default)]
    pub favorite: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default, rename = "activetimer")]
    pub active_timer: Option<String>,
    #[serde(default)]
    pub direct_only: Option<serde_json::Value>,
}

// ── Status ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusItemList {
    #[serde(default)]
    pub statusitem_list: Vec<RawStatusItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStatusItem {
    #[serde(default)]
    pub id_installation_device_statusitem: Option<i64>,
    #[serde(default)]
    pub id_devicetype_statusitem_model: Option<i64>,
    pub statusitem_code: String,
    #[serde(default)]
    pub status_item: Option<String>,
    #[serde(default)]
    pub status_value: String,
    #[serde(default)]
    pub lowlevel_statusitem: Option<serde_json::Value>,
}

// ── Commands ────────────────────────────────────────────────────────

/// One entry of `commandsList`.
///
/// `lowlevel_command` is serialized as `null` when absent; the RGB
/// variants expect the key to be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    pub device_code: String,
    pub id_installation_device: i64,
    pub command_action: String,
    pub command_id: u32,
    pub command_param: String,
    pub lowlevel_command: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FeedRequest<'a> {
    pub commands_list: &'a [CommandRequest],
    pub id_installation: &'a str,
    pub id_session: &'a str,
    pub id_scenario: i64,
    pub is_scenario: bool,
}

/// Opaque handle of an accepted batch, echoed back to `getackcommand`.
///
/// Kept as raw JSON so it round-trips whether the service sends a string
/// or a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionReference(pub serde_json::Value);

impl fmt::Display for ActionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            serde_json::Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FeedResponse {
    #[serde(rename = "MessageID")]
    pub message_id: String,
    #[serde(rename = "ActionReference", default)]
    pub action_reference: Option<ActionReference>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AckRequest<'a> {
    pub id: &'a ActionReference,
    pub id_installation: &'a str,
    pub id_session: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AckReply {
    #[serde(rename = "MessageID")]
    pub message_id: String,
    #[serde(rename = "MessageText", default)]
    pub message_text: String,
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Accepts `true`, `"true"`, `"S"`, `"1"` or a non-zero number.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        serde_json::Value::String(s) => {
            matches!(s.to_ascii_lowercase().as_str(), "true" | "s" | "1" | "y" | "on")
        }
        _ => false,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_status_accepts_string_and_bool() {
        let a: NodeStatus = serde_json::from_value(json!({ "nodeActive": true })).unwrap();
        let b: NodeStatus = serde_json::from_value(json!({ "nodeActive": "S" })).unwrap();
        let c: NodeStatus = serde_json::from_value(json!({ "nodeActive": 0 })).unwrap();
        let d: NodeStatus = serde_json::from_value(json!({})).unwrap();
        assert!(a.node_active);
        assert!(b.node_active);
        assert!(!c.node_active);
        assert!(!d.node_active);
    }

    #[test]
    fn command_request_serializes_null_lowlevel() {
        let cmd = CommandRequest {
            device_code: "3".into(),
            id_installation_device: 42,
            command_action: "POWER".into(),
            command_id: 138,
            command_param: "ON".into(),
            lowlevel_command: None,
        };
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["deviceCode"], "3");
        assert_eq!(value["idInstallationDevice"], 42);
        assert_eq!(value["commandAction"], "POWER");
        assert!(value["lowlevelCommand"].is_null());
    }

    #[test]
    fn action_reference_displays_without_quotes() {
        let s = ActionReference(json!("abc-1"));
        let n = ActionReference(json!(991));
        assert_eq!(s.to_string(), "abc-1");
        assert_eq!(n.to_string(), "991");
    }

    #[test]
    fn installation_parses_service_field_names() {
        let inst: RawInstallation = serde_json::from_value(json!({
            "activetimer": "N",
            "firmwareVersion": "2.1",
            "idInstallation": 7,
            "idInstallationDevice": 70,
            "instCode": "TM-0007",
            "instDescription": "Home",
            "installationOrder": 1,
            "latitude": 45.1,
            "longitude": 9.2,
            "weekend": "[]",
            "workdays": "[]"
        }))
        .unwrap();
        assert_eq!(inst.inst_code, "TM-0007");
        assert_eq!(inst.active_timer.as_deref(), Some("N"));
        assert_eq!(inst.id_installation_device, Some(70));
    }

    #[test]
    fn malformed_device_entry_does_not_sink_the_room() {
        let room: RawRoom = serde_json::from_value(json!({
            "idInstallationRoom": 1,
            "deviceList": [
                { "idInstallationDevice": 101, "idDevicetype": 21, "deviceIndex": 1, "label": "Spots" },
                { "idInstallationDevice": 105, "idDevicetype": 99, "deviceIndex": null },
                { "idInstallationDevice": 106, "idDevicetype": 99, "deviceIndex": 6, "deviceOrder": "3" },
                { "idInstallationDevice": 102, "idDevicetype": 22, "deviceIndex": 2 }
            ]
        }))
        .unwrap();
        let ids: Vec<i64> = room.device_list.iter().map(|d| d.id_installation_device).collect();
        assert_eq!(ids, vec![101, 102]);
    }

    #[test]
    fn missing_or_null_device_list_is_empty() {
        let a: RawRoom = serde_json::from_value(json!({ "idInstallationRoom": 1 })).unwrap();
        let b: RawRoom =
            serde_json::from_value(json!({ "idInstallationRoom": 2, "deviceList": null })).unwrap();
        assert!(a.device_list.is_empty());
        assert!(b.device_list.is_empty());
    }
}
