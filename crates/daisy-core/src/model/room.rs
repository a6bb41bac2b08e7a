use serde::{Deserialize, Serialize};

use super::device::Device;

/// A room as returned by one `room-list` fetch.
///
/// Device states inside a room are a snapshot from that fetch; the
/// [`Directory`](crate::Directory) holds the current ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub installation_id: i64,
    pub room_type: Option<i64>,
    pub description: String,
    pub order: i64,
    pub devices: Vec<Device>,
}
