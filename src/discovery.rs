// src/discovery.rs
use std::collections::HashMap;

use log::debug;

use crate::labels::EntityLabels;
use crate::models::entity::StateSnapshot;
use crate::models::server::ServerRecord;

pub const STATUS_PREFIX: &str = "binary_sensor.";
pub const SENSOR_PREFIX: &str = "sensor.";
pub const CONNECTIVITY_CLASS: &str = "connectivity";

struct StatusCandidate<'a> {
    entity_id: &'a str,
    device_name: &'a str,
}

/// Groups the snapshot's entities into game servers.
///
/// A non-empty `manual_servers` list is returned as-is. Otherwise every
/// connectivity `binary_sensor` named `"<device> Status"` becomes a candidate,
/// and is kept only if a `"<device> Players"` sensor exists. Companion sensors
/// are attached when present. Servers named in `exclude_names` are dropped.
pub fn discover(
    snapshot: &StateSnapshot,
    manual_servers: Option<&[ServerRecord]>,
    exclude_names: &[String],
    labels: &EntityLabels,
) -> Vec<ServerRecord> {
    if let Some(manual) = manual_servers.filter(|s| !s.is_empty()) {
        debug!("Using {} manually configured servers", manual.len());
        return manual.to_vec();
    }

    let status_suffix = labels.status_suffix();
    let candidates: Vec<StatusCandidate> = snapshot
        .iter()
        .filter(|(id, obj)| {
            id.starts_with(STATUS_PREFIX) && obj.attr_str("device_class") == CONNECTIVITY_CLASS
        })
        .filter_map(|(id, obj)| {
            obj.friendly_name()
                .strip_suffix(status_suffix.as_str())
                .map(|device_name| StatusCandidate {
                    entity_id: id,
                    device_name,
                })
        })
        .collect();

    if candidates.is_empty() {
        return Vec::new();
    }

    let sensors = sensors_by_friendly_name(snapshot);
    let lookup = |device_name: &str, label: &str| -> Option<String> {
        sensors
            .get(labels.entity_name(device_name, label).as_str())
            .map(|id| id.to_string())
    };

    let mut servers: Vec<ServerRecord> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for candidate in candidates {
        let Some(players_entity) = lookup(candidate.device_name, labels.players) else {
            debug!(
                "Skipping {}: no '{}' sensor found",
                candidate.entity_id,
                labels.entity_name(candidate.device_name, labels.players)
            );
            continue;
        };

        let record = ServerRecord {
            name: candidate.device_name.to_string(),
            status_entity: candidate.entity_id.to_string(),
            players_entity: Some(players_entity),
            motd_entity: lookup(candidate.device_name, labels.motd),
            version_entity: lookup(candidate.device_name, labels.version),
            latency_entity: lookup(candidate.device_name, labels.latency),
            mods_entity: lookup(candidate.device_name, labels.mods),
        };

        match positions.get(&record.status_entity) {
            Some(&pos) => servers[pos] = record,
            None => {
                positions.insert(record.status_entity.clone(), servers.len());
                servers.push(record);
            }
        }
    }

    servers.retain(|s| !exclude_names.contains(&s.name));
    debug!("Discovered {} servers", servers.len());
    servers
}

// Duplicate friendly names collapse to the last entity seen.
fn sensors_by_friendly_name(snapshot: &StateSnapshot) -> HashMap<&str, &str> {
    let mut sensors = HashMap::new();
    for (id, obj) in snapshot.iter().filter(|(id, _)| id.starts_with(SENSOR_PREFIX)) {
        if let Some(previous) = sensors.insert(obj.friendly_name(), id) {
            debug!(
                "Friendly name '{}' shared by {} and {}, keeping {}",
                obj.friendly_name(),
                previous,
                id,
                id
            );
        }
    }
    sensors
}
