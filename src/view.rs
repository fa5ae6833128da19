// src/view.rs
use serde::Serialize;
use serde_json::Value;

use crate::models::entity::{StateObject, StateSnapshot};
use crate::models::server::ServerRecord;
use crate::utils::{display_value, is_truthy, parse_leading_float, parse_leading_int};

pub const UNKNOWN_MARKER: &str = "?";
pub const UNKNOWN_STATE: &str = "unknown";
pub const DEFAULT_SERVER_NAME: &str = "Minecraft Server";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModBadge {
    Modded { mod_count: String },
    Vanilla,
}

/// Everything the card shows for one server, read from the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerView {
    pub name: String,
    pub online: bool,
    pub player_count: i64,
    pub max_players: String,
    pub player_names: Vec<String>,
    pub motd: Option<String>,
    pub version: Option<String>,
    pub latency: f64,
    pub mods: Option<ModBadge>,
}

impl ServerView {
    pub fn project(server: &ServerRecord, snapshot: &StateSnapshot) -> Self {
        let entity = |id: &Option<String>| id.as_deref().and_then(|id| snapshot.get(id));

        let players = entity(&server.players_entity);
        let motd = entity(&server.motd_entity);
        let version = entity(&server.version_entity);
        let latency = entity(&server.latency_entity);
        let mods = entity(&server.mods_entity);

        let name = if server.name.is_empty() {
            DEFAULT_SERVER_NAME.to_string()
        } else {
            server.name.clone()
        };

        ServerView {
            name,
            online: snapshot
                .get(&server.status_entity)
                .map_or(false, StateObject::is_on),
            player_count: players.map_or(0, |p| parse_leading_int(&p.state)),
            max_players: players
                .and_then(|p| p.attr("max_players"))
                .map_or_else(|| UNKNOWN_MARKER.to_string(), display_value),
            player_names: players.map(player_names).unwrap_or_default(),
            motd: motd
                .map(|m| m.state.clone())
                .filter(|s| shown_state(s)),
            version: Some(version.map_or_else(|| UNKNOWN_MARKER.to_string(), |v| v.state.clone()))
                .filter(|s| shown_state(s)),
            latency: latency.map_or(0.0, |l| parse_leading_float(&l.state)),
            mods: mods.map(mod_badge),
        }
    }
}

fn shown_state(state: &str) -> bool {
    !state.is_empty() && state != UNKNOWN_STATE
}

fn player_names(players: &StateObject) -> Vec<String> {
    match players.attr("player_names") {
        Some(Value::Array(names)) => names
            .iter()
            .filter(|n| !n.is_null())
            .map(display_value)
            .collect(),
        _ => Vec::new(),
    }
}

fn mod_badge(mods: &StateObject) -> ModBadge {
    if mods.attr("modded").map_or(false, is_truthy) {
        ModBadge::Modded {
            mod_count: mods
                .attr("mod_count")
                .map_or_else(|| "0".to_string(), display_value),
        }
    } else {
        ModBadge::Vanilla
    }
}
