// src/labels.rs
use std::collections::HashMap;

use lazy_static::lazy_static;
use log::debug;

pub const DEFAULT_LABELS: &str = "en";

/// Friendly-name suffixes the upstream integration gives each entity of a
/// server device, e.g. `"Survival Players"` for device `"Survival"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLabels {
    pub status: &'static str,
    pub players: &'static str,
    pub motd: &'static str,
    pub version: &'static str,
    pub latency: &'static str,
    pub mods: &'static str,
}

impl EntityLabels {
    /// Looks up a preset by name, falling back to English.
    pub fn preset(name: &str) -> &'static EntityLabels {
        match PRESETS.get(name.to_ascii_lowercase().as_str()) {
            Some(labels) => labels,
            None => {
                debug!("Unknown label preset '{}', using '{}'", name, DEFAULT_LABELS);
                &PRESETS[DEFAULT_LABELS]
            }
        }
    }

    pub fn status_suffix(&self) -> String {
        format!(" {}", self.status)
    }

    pub fn entity_name(&self, device_name: &str, label: &str) -> String {
        format!("{} {}", device_name, label)
    }
}

impl Default for EntityLabels {
    fn default() -> Self {
        EntityLabels::preset(DEFAULT_LABELS).clone()
    }
}

lazy_static! {
    static ref PRESETS: HashMap<&'static str, EntityLabels> = {
        let mut presets = HashMap::new();
        presets.insert("en", EntityLabels {
            status: "Status",
            players: "Players",
            motd: "MOTD",
            version: "Version",
            latency: "Latency",
            mods: "Mods",
        });
        presets.insert("de", EntityLabels {
            status: "Status",
            players: "Spieler",
            motd: "MOTD",
            version: "Version",
            latency: "Latenz",
            mods: "Mods",
        });
        presets
    };
}
