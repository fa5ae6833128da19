// src/models/entity.rs
use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const STATE_ON: &str = "on";

/// A single entity's state as reported by the dashboard host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateObject {
    #[serde(default, deserialize_with = "lenient_state")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient_attributes")]
    pub attributes: Map<String, Value>,
}

impl StateObject {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    /// String attribute, or `""` when missing or not a string.
    pub fn attr_str(&self, key: &str) -> &str {
        self.attributes
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn friendly_name(&self) -> &str {
        self.attr_str("friendly_name")
    }

    pub fn is_on(&self) -> bool {
        self.state == STATE_ON
    }
}

// Hosts occasionally report numeric or null states; keep them as text.
fn lenient_state<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_attributes<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

/// Entity shape used by the dashboard host's REST state listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListedEntity {
    pub entity_id: String,
    #[serde(flatten)]
    pub object: StateObject,
}

/// Either snapshot layout a host may hand over.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum RawSnapshot {
    List(Vec<ListedEntity>),
    Map(Map<String, Value>),
}

/// Immutable view of every entity's state at one point in time.
///
/// Iteration follows the order the host supplied the entities in, which is
/// the order discovery reports servers in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot", into = "Vec<ListedEntity>")]
pub struct StateSnapshot {
    entities: Vec<(String, StateObject)>,
    index: HashMap<String, usize>,
}

impl StateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entity; an existing id keeps its position and takes the new state.
    pub fn insert(&mut self, entity_id: impl Into<String>, object: StateObject) {
        let entity_id = entity_id.into();
        match self.index.get(&entity_id) {
            Some(&pos) => self.entities[pos].1 = object,
            None => {
                self.index.insert(entity_id.clone(), self.entities.len());
                self.entities.push((entity_id, object));
            }
        }
    }

    pub fn with(mut self, entity_id: impl Into<String>, object: StateObject) -> Self {
        self.insert(entity_id, object);
        self
    }

    pub fn get(&self, entity_id: &str) -> Option<&StateObject> {
        self.index.get(entity_id).map(|&pos| &self.entities[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StateObject)> {
        self.entities.iter().map(|(id, obj)| (id.as_str(), obj))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl FromIterator<(String, StateObject)> for StateSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, StateObject)>>(iter: I) -> Self {
        let mut snapshot = StateSnapshot::new();
        for (id, object) in iter {
            snapshot.insert(id, object);
        }
        snapshot
    }
}

impl TryFrom<RawSnapshot> for StateSnapshot {
    type Error = String;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        match raw {
            RawSnapshot::List(list) => Ok(list
                .into_iter()
                .map(|e| (e.entity_id, e.object))
                .collect()),
            RawSnapshot::Map(map) => map
                .into_iter()
                .map(|(id, value)| {
                    serde_json::from_value::<StateObject>(value)
                        .map(|object| (id.clone(), object))
                        .map_err(|e| format!("Invalid state for {}: {}", id, e))
                })
                .collect(),
        }
    }
}

impl From<StateSnapshot> for Vec<ListedEntity> {
    fn from(snapshot: StateSnapshot) -> Self {
        snapshot
            .entities
            .into_iter()
            .map(|(entity_id, object)| ListedEntity { entity_id, object })
            .collect()
    }
}
