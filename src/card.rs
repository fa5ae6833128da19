// src/card.rs
use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::config::CardConfig;
use crate::discovery::discover;
use crate::display::{repair_index, select_displayed, DisplayPhase, DisplayState};
use crate::models::entity::StateSnapshot;
use crate::models::server::ServerRecord;
use crate::view::ServerView;

/// Layout height hint reported to the dashboard.
pub const CARD_SIZE: u32 = 4;

/// What the card shows for the current snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum CardScreen {
    NoServers,
    AllOffline,
    Server {
        view: ServerView,
        index: usize,
        count: usize,
    },
}

impl CardScreen {
    pub fn phase(&self) -> DisplayPhase {
        match self {
            CardScreen::NoServers => DisplayPhase::NoServers,
            CardScreen::AllOffline => DisplayPhase::AllOffline,
            CardScreen::Server { index, .. } => DisplayPhase::ShowingServer(*index),
        }
    }
}

/// Per-instance card state: configuration, the last discovered servers and
/// the rotation cursor.
#[derive(Debug, Clone)]
pub struct Card {
    config: CardConfig,
    snapshot: Option<Arc<StateSnapshot>>,
    servers: Vec<ServerRecord>,
    current_index: usize,
}

impl Card {
    pub fn new(config: CardConfig) -> Self {
        Self {
            config,
            snapshot: None,
            servers: Vec::new(),
            current_index: 0,
        }
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn servers(&self) -> &[ServerRecord] {
        &self.servers
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Applies a new configuration. The cursor goes back to the first server
    /// and servers are rediscovered from the last snapshot, if any.
    pub fn reconfigure(mut self, config: CardConfig) -> Self {
        self.set_config(config);
        self
    }

    pub fn set_config(&mut self, config: CardConfig) {
        self.config = config;
        self.current_index = 0;
        self.servers.clear();
        self.rediscover();
    }

    /// Takes a new snapshot from the host and reruns discovery. The cursor is
    /// kept unless it no longer fits the displayable list.
    pub fn set_snapshot(&mut self, snapshot: Arc<StateSnapshot>) {
        self.snapshot = Some(snapshot);
        self.rediscover();
        self.current_index = self.display_state().current_index;
    }

    fn rediscover(&mut self) {
        let Some(snapshot) = self.snapshot.as_deref() else {
            return;
        };
        self.servers = discover(
            snapshot,
            self.config.manual_servers(),
            self.config.excluded(),
            self.config.entity_labels(),
        );
    }

    pub fn displayable(&self) -> Vec<&ServerRecord> {
        match self.snapshot.as_deref() {
            Some(snapshot) => select_displayed(&self.servers, snapshot, self.config.show_offline),
            None => Vec::new(),
        }
    }

    pub fn display_state(&self) -> DisplayState {
        let servers = self.displayable().into_iter().cloned().collect();
        DisplayState::new(servers, self.current_index)
    }

    pub fn phase(&self) -> DisplayPhase {
        DisplayPhase::of(self.servers.len(), &self.display_state())
    }

    /// Moves to the next displayable server. Returns whether the cursor moved.
    pub fn rotate(&mut self) -> bool {
        if self.snapshot.is_none() {
            return false;
        }
        let before = self.current_index;
        self.current_index = self.display_state().advance().current_index;
        debug!("Rotated card from {} to {}", before, self.current_index);
        before != self.current_index
    }

    /// Jumps straight to `index` in the displayable list.
    pub fn select(&mut self, index: usize) -> bool {
        let state = self.display_state();
        if index >= state.servers.len() {
            return false;
        }
        let changed = self.current_index != index;
        self.current_index = state.select(index).current_index;
        changed
    }

    pub fn screen(&mut self) -> CardScreen {
        let Some(snapshot) = self.snapshot.clone() else {
            return CardScreen::NoServers;
        };
        if self.servers.is_empty() {
            return CardScreen::NoServers;
        }

        let displayed = select_displayed(&self.servers, &snapshot, self.config.show_offline);
        if displayed.is_empty() {
            return CardScreen::AllOffline;
        }

        let index = repair_index(self.current_index, displayed.len());
        let screen = CardScreen::Server {
            view: ServerView::project(displayed[index], &snapshot),
            index,
            count: displayed.len(),
        };
        self.current_index = index;
        screen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entity::StateObject;

    fn snapshot(states: &[(&str, &str)]) -> Arc<StateSnapshot> {
        let mut snapshot = StateSnapshot::new();
        for (name, state) in states {
            let key = name.to_lowercase();
            snapshot.insert(
                format!("binary_sensor.{}_status", key),
                StateObject::new(*state)
                    .with_attribute("device_class", "connectivity")
                    .with_attribute("friendly_name", format!("{} Status", name)),
            );
            snapshot.insert(
                format!("sensor.{}_players", key),
                StateObject::new("1").with_attribute("friendly_name", format!("{} Players", name)),
            );
        }
        Arc::new(snapshot)
    }

    #[test]
    fn no_snapshot_shows_no_servers() {
        let mut card = Card::new(CardConfig::default());
        assert_eq!(card.screen(), CardScreen::NoServers);
        assert!(!card.rotate());
    }

    #[test]
    fn rotates_only_online_servers() {
        let mut card = Card::new(CardConfig::default());
        card.set_snapshot(snapshot(&[("A", "on"), ("B", "off"), ("C", "on")]));

        assert_eq!(card.servers().len(), 3);
        assert_eq!(card.displayable().len(), 2);
        assert!(card.rotate());
        match card.screen() {
            CardScreen::Server { view, index, count } => {
                assert_eq!(view.name, "C");
                assert_eq!(index, 1);
                assert_eq!(count, 2);
            }
            other => panic!("unexpected screen {:?}", other),
        }
        assert!(card.rotate());
        assert_eq!(card.current_index(), 0);
    }

    #[test]
    fn index_survives_snapshot_updates() {
        let mut card = Card::new(CardConfig::default());
        card.set_snapshot(snapshot(&[("A", "on"), ("B", "on"), ("C", "on")]));
        card.rotate();
        card.rotate();
        card.set_snapshot(snapshot(&[("A", "on"), ("B", "on"), ("C", "on")]));
        assert_eq!(card.current_index(), 2);

        card.set_snapshot(snapshot(&[("A", "on"), ("B", "on"), ("C", "off")]));
        assert_eq!(card.current_index(), 0);
    }

    #[test]
    fn reconfigure_resets_index() {
        let mut card = Card::new(CardConfig::default());
        card.set_snapshot(snapshot(&[("A", "on"), ("B", "on")]));
        card.rotate();
        assert_eq!(card.current_index(), 1);

        let config = CardConfig {
            show_offline: true,
            ..CardConfig::default()
        };
        let card = card.reconfigure(config);
        assert_eq!(card.current_index(), 0);
        assert_eq!(card.servers().len(), 2);
        assert!(card.config().show_offline);
    }

    #[test]
    fn all_offline_phase() {
        let mut card = Card::new(CardConfig::default());
        card.set_snapshot(snapshot(&[("A", "off")]));
        assert_eq!(card.phase(), DisplayPhase::AllOffline);
        assert_eq!(card.screen(), CardScreen::AllOffline);

        card.set_config(CardConfig {
            show_offline: true,
            ..CardConfig::default()
        });
        assert_eq!(card.phase(), DisplayPhase::ShowingServer(0));
    }

    #[test]
    fn select_jumps_within_bounds() {
        let mut card = Card::new(CardConfig::default());
        card.set_snapshot(snapshot(&[("A", "on"), ("B", "on"), ("C", "on")]));
        assert!(card.select(2));
        assert_eq!(card.current_index(), 2);
        assert!(!card.select(7));
        assert_eq!(card.current_index(), 2);
    }

    #[test]
    fn screen_phase_matches_card_phase() {
        let mut card = Card::new(CardConfig::default());
        card.set_snapshot(snapshot(&[("A", "on"), ("B", "on")]));
        card.rotate();
        assert_eq!(card.screen().phase(), card.phase());
    }
}
