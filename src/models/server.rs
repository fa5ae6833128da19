// src/models/server.rs
use serde::{Deserialize, Serialize};

/// One logical game server, grouped from its status entity and the sensors
/// that share its device name.
///
/// The same shape is accepted as a manual `servers` entry in the card
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    #[serde(default)]
    pub name: String,
    pub status_entity: String,
    #[serde(default)]
    pub players_entity: Option<String>,
    #[serde(default)]
    pub motd_entity: Option<String>,
    #[serde(default)]
    pub version_entity: Option<String>,
    #[serde(default)]
    pub latency_entity: Option<String>,
    #[serde(default)]
    pub mods_entity: Option<String>,
}

impl ServerRecord {
    pub fn new(name: impl Into<String>, status_entity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status_entity: status_entity.into(),
            players_entity: None,
            motd_entity: None,
            version_entity: None,
            latency_entity: None,
            mods_entity: None,
        }
    }

    pub fn with_players(mut self, entity_id: impl Into<String>) -> Self {
        self.players_entity = Some(entity_id.into());
        self
    }
}
