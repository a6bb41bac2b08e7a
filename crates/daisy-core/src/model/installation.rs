// ── Installation domain type ──

use serde::{Deserialize, Serialize};

/// A physical site/hub grouping rooms and devices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installation {
    /// Numeric id used by every query endpoint.
    pub id: i64,
    /// String code used by the command and acknowledgment endpoints.
    pub inst_code: String,
    pub description: String,
    pub order: i64,
    pub firmware_version: Option<String>,
    /// Installation-device id of the hub itself.
    pub hub_device_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    // Timer schedule, passed through as the service encodes it
    pub active_timer: Option<String>,
    pub weekend: Option<String>,
    pub workdays: Option<String>,
}

impl Installation {
    /// Description, falling back to the installation code.
    pub fn display_name(&self) -> &str {
        if self.description.is_empty() {
            &self.inst_code
        } else {
            &self.description
        }
    }
}
