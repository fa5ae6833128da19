// src/editor.rs
use log::debug;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::config::CardConfig;
use crate::models::server::ServerRecord;

/// A single field change made in the card editor.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigEdit {
    RotateInterval(f64),
    ShowHeader(bool),
    ShowOffline(bool),
    Servers(Option<Vec<ServerRecord>>),
    ExcludeServers(Option<Vec<String>>),
    Labels(Option<String>),
}

/// Notification sent after every edit, carrying the whole configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "config-changed")]
pub struct ConfigChanged {
    pub config: CardConfig,
}

pub struct CardEditor {
    config: CardConfig,
    listeners: Vec<mpsc::UnboundedSender<ConfigChanged>>,
}

impl CardEditor {
    pub fn new(config: CardConfig) -> Self {
        Self {
            config,
            listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ConfigChanged> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.push(tx);
        rx
    }

    pub fn apply(&mut self, edit: ConfigEdit) -> ConfigChanged {
        debug!("Card editor change: {:?}", edit);
        match edit {
            ConfigEdit::RotateInterval(secs) => self.config.rotate_interval = secs,
            ConfigEdit::ShowHeader(show) => self.config.show_header = show,
            ConfigEdit::ShowOffline(show) => self.config.show_offline = show,
            ConfigEdit::Servers(servers) => self.config.servers = servers,
            ConfigEdit::ExcludeServers(names) => self.config.exclude_servers = names,
            ConfigEdit::Labels(labels) => self.config.labels = labels,
        }

        let event = ConfigChanged {
            config: self.config.clone(),
        };
        self.listeners.retain(|tx| tx.send(event.clone()).is_ok());
        event
    }
}
