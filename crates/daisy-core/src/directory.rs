// ── Directory registry ──
//
// Installations, rooms and devices from the last fetch, indexed by id.
// Devices hold their owning installation id instead of a back-reference,
// so a handle taken from here stays usable for building commands across
// re-logins.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;

use crate::codec::StatusUpdate;
use crate::model::{Cover, Device, Installation, Light, Room};

/// Concurrent registry of the fetched hierarchy.
#[derive(Debug, Default)]
pub struct Directory {
    installations: DashMap<i64, Arc<Installation>>,
    rooms: DashMap<i64, Arc<Vec<Room>>>,
    devices: DashMap<i64, Device>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Mutation (hub only) ──────────────────────────────────────────

    pub(crate) fn replace_installations(&self, installations: Vec<Installation>) {
        self.installations.clear();
        for inst in installations {
            self.installations.insert(inst.id, Arc::new(inst));
        }
    }

    /// Replace the rooms of one installation and re-index its devices.
    ///
    /// Known state of devices that are still present is carried over.
    pub(crate) fn replace_rooms(&self, installation_id: i64, rooms: Vec<Room>) {
        let mut fresh = HashSet::new();
        let rooms: Vec<Room> = rooms
            .into_iter()
            .map(|mut room| {
                for device in &mut room.devices {
                    if let Some(previous) = self.devices.get(&device.id()) {
                        carry_state(&previous, device);
                    }
                    fresh.insert(device.id());
                    self.devices.insert(device.id(), device.clone());
                }
                room
            })
            .collect();

        self.devices
            .retain(|id, d| d.installation_id() != installation_id || fresh.contains(id));
        self.rooms.insert(installation_id, Arc::new(rooms));
    }

    /// Apply a decoded status update to a device. Returns the new state,
    /// or `None` if the device is not in the directory.
    pub(crate) fn apply_status(&self, device_id: i64, update: &StatusUpdate) -> Option<Device> {
        let mut entry = self.devices.get_mut(&device_id)?;
        entry.apply_status(update);
        Some(entry.clone())
    }

    /// Swap in a complete fetch: every installation with its rooms.
    ///
    /// Installations missing from `fetched` disappear together with their
    /// rooms and devices; state of devices still present is carried over.
    pub(crate) fn replace_all(&self, installations: Vec<Installation>, fetched: Vec<(i64, Vec<Room>)>) {
        self.replace_installations(installations);
        for (installation_id, rooms) in fetched {
            self.replace_rooms(installation_id, rooms);
        }
        self.rooms.retain(|id, _| self.installations.contains_key(id));
        self.devices
            .retain(|_, d| self.installations.contains_key(&d.installation_id()));
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Installations sorted by their display order.
    pub fn installations(&self) -> Vec<Arc<Installation>> {
        let mut out: Vec<_> = self.installations.iter().map(|e| Arc::clone(e.value())).collect();
        out.sort_by_key(|i| (i.order, i.id));
        out
    }

    pub fn installation(&self, id: i64) -> Option<Arc<Installation>> {
        self.installations.get(&id).map(|e| Arc::clone(e.value()))
    }

    /// Find an installation by numeric id, `instCode` or description.
    pub fn find_installation(&self, identifier: &str) -> Option<Arc<Installation>> {
        if let Ok(id) = identifier.parse::<i64>() {
            if let Some(inst) = self.installation(id) {
                return Some(inst);
            }
        }
        self.installations
            .iter()
            .find(|e| {
                e.inst_code == identifier || e.description.eq_ignore_ascii_case(identifier)
            })
            .map(|e| Arc::clone(e.value()))
    }

    /// Rooms of an installation as of its last fetch.
    pub fn rooms(&self, installation_id: i64) -> Option<Arc<Vec<Room>>> {
        self.rooms.get(&installation_id).map(|e| Arc::clone(e.value()))
    }

    /// Every known device, with current state, ordered by installation
    /// then device order.
    pub fn devices(&self) -> Vec<Device> {
        let mut out: Vec<Device> = self.devices.iter().map(|e| e.value().clone()).collect();
        out.sort_by_key(|d| (d.installation_id(), d.info().order, d.id()));
        out
    }

    pub fn lights(&self) -> Vec<Light> {
        self.devices()
            .into_iter()
            .filter_map(|d| match d {
                Device::Light(l) => Some(l),
                Device::Cover(_) => None,
            })
            .collect()
    }

    pub fn covers(&self) -> Vec<Cover> {
        self.devices()
            .into_iter()
            .filter_map(|d| match d {
                Device::Cover(c) => Some(c),
                Device::Light(_) => None,
            })
            .collect()
    }

    pub fn device(&self, id: i64) -> Option<Device> {
        self.devices.get(&id).map(|e| e.value().clone())
    }

    /// Find a device by installation-device id, or by label
    /// (case-insensitive). The first match in device order wins.
    pub fn find_device(&self, identifier: &str) -> Option<Device> {
        if let Ok(id) = identifier.parse::<i64>() {
            if let Some(device) = self.device(id) {
                return Some(device);
            }
        }
        self.devices()
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(identifier))
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installations.is_empty()
    }
}

fn carry_state(previous: &Device, next: &mut Device) {
    match (previous, next) {
        (Device::Light(old), Device::Light(new)) => new.state = old.state,
        (Device::Cover(old), Device::Cover(new)) => new.state = old.state,
        _ => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codec::{Color, StatusUpdate};
    use crate::model::{CoverState, DeviceInfo, DeviceType, LightState, Rgb};

    fn info(id: i64, installation_id: i64, device_type: DeviceType, label: &str) -> DeviceInfo {
        DeviceInfo {
            id,
            installation_id,
            device_index: id % 10,
            device_type,
            label: label.into(),
            order: id,
            model_id: None,
            device_code: None,
            remote_control_code: None,
            favorite: false,
            feedback: false,
        }
    }

    fn installation(id: i64) -> Installation {
        Installation {
            id,
            inst_code: format!("INST{id}"),
            description: String::new(),
            order: id,
            firmware_version: None,
            hub_device_id: None,
            latitude: None,
            longitude: None,
            active_timer: None,
            weekend: None,
            workdays: None,
        }
    }

    fn room(installation_id: i64) -> Room {
        Room {
            id: 1,
            installation_id,
            room_type: None,
            description: "Garden".into(),
            order: 0,
            devices: vec![
                Device::Light(Light {
                    info: info(11, installation_id, DeviceType::RgbLed, "Strip"),
                    state: LightState::default(),
                }),
                Device::Cover(Cover {
                    info: info(12, installation_id, DeviceType::ZipCover, "Awning"),
                    state: CoverState::default(),
                }),
            ],
        }
    }

    #[test]
    fn indexes_devices_by_id_and_label() {
        let dir = Directory::new();
        dir.replace_rooms(7, vec![room(7)]);

        assert_eq!(dir.device_count(), 2);
        assert_eq!(dir.lights().len(), 1);
        assert_eq!(dir.covers().len(), 1);
        assert_eq!(dir.find_device("12").unwrap().label(), "Awning");
        assert_eq!(dir.find_device("strip").unwrap().id(), 11);
        assert!(dir.find_device("nothing").is_none());
        assert_eq!(dir.rooms(7).unwrap().len(), 1);
    }

    #[test]
    fn status_updates_survive_a_room_refresh() {
        let dir = Directory::new();
        dir.replace_rooms(7, vec![room(7)]);

        let update = StatusUpdate {
            is_on: Some(true),
            color: Some(Color {
                brightness: 40,
                rgb: Rgb::new(1, 2, 3),
            }),
            ..StatusUpdate::default()
        };
        let updated = dir.apply_status(11, &update).unwrap();
        assert_eq!(updated.as_light().unwrap().state.brightness, Some(40));

        dir.replace_rooms(7, vec![room(7)]);
        let light = dir.device(11).unwrap();
        assert_eq!(light.as_light().unwrap().state.is_on, Some(true));
        assert!(dir.apply_status(999, &update).is_none());
    }

    #[test]
    fn replace_all_drops_vanished_installations_and_keeps_state() {
        let dir = Directory::new();
        dir.replace_all(
            vec![installation(7), installation(8)],
            vec![(7, vec![room(7)]), (8, vec![])],
        );
        let update = StatusUpdate {
            is_on: Some(true),
            ..StatusUpdate::default()
        };
        dir.apply_status(11, &update).unwrap();

        dir.replace_all(vec![installation(7)], vec![(7, vec![room(7)])]);
        assert_eq!(dir.installations().len(), 1);
        assert!(dir.rooms(8).is_none());
        assert_eq!(
            dir.device(11).unwrap().as_light().unwrap().state.is_on,
            Some(true)
        );

        dir.replace_all(Vec::new(), Vec::new());
        assert!(dir.is_empty());
    }
}
