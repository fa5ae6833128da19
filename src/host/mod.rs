// src/host/mod.rs
pub mod timer;
pub mod watcher;

use std::sync::Arc;

use log::{debug, info};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::card::{Card, CardScreen};
use crate::config::CardConfig;
use crate::editor::ConfigChanged;
use crate::storage::snapshot::SnapshotStore;
use crate::utils::HostError;

use self::timer::RotationTimer;

const EVENT_QUEUE_SIZE: usize = 64;

#[derive(Debug, Clone)]
pub enum HostEvent {
    /// The shared store holds a newer snapshot.
    SnapshotChanged,
    Rotate { generation: u64 },
    Select(usize),
    Reconfigure(CardConfig),
    Shutdown,
}

impl From<ConfigChanged> for HostEvent {
    fn from(event: ConfigChanged) -> Self {
        HostEvent::Reconfigure(event.config)
    }
}

/// Drives one card: every snapshot update, rotation tick and
/// reconfiguration goes through a single event loop, so card state is
/// only ever mutated from one place at a time. Snapshots are written to the
/// store by whoever loads them and read back here on `SnapshotChanged`.
pub struct CardHost {
    card: Arc<Mutex<Card>>,
    store: Arc<SnapshotStore>,
    timer: RotationTimer,
    events: mpsc::Sender<HostEvent>,
    inbox: mpsc::Receiver<HostEvent>,
}

impl CardHost {
    pub fn new(config: CardConfig) -> Self {
        let (events, inbox) = mpsc::channel(EVENT_QUEUE_SIZE);
        Self {
            card: Arc::new(Mutex::new(Card::new(config))),
            store: Arc::new(SnapshotStore::new()),
            timer: RotationTimer::new(),
            events,
            inbox,
        }
    }

    pub fn sender(&self) -> mpsc::Sender<HostEvent> {
        self.events.clone()
    }

    pub fn card(&self) -> Arc<Mutex<Card>> {
        Arc::clone(&self.card)
    }

    pub fn store(&self) -> Arc<SnapshotStore> {
        Arc::clone(&self.store)
    }

    /// Runs until a `Shutdown` event arrives. `render` is called with the
    /// card's screen whenever it changes.
    pub async fn run<F>(mut self, mut render: F) -> Result<(), HostError>
    where
        F: FnMut(&CardScreen, &CardConfig),
    {
        let period = self.card.lock().config().rotation_period();
        self.timer.reschedule(period, self.events.clone());

        let mut last_screen: Option<CardScreen> = None;
        let mut applied_revision = 0;

        loop {
            let event = self.inbox.recv().await.ok_or(HostError::ChannelClosed)?;
            let dirty = match event {
                HostEvent::SnapshotChanged => {
                    let revision = self.store.revision();
                    if revision == applied_revision {
                        continue;
                    }
                    let snapshot = self.store.current();
                    debug!(
                        "Snapshot revision {} with {} entities",
                        revision,
                        snapshot.len()
                    );
                    applied_revision = revision;
                    self.card.lock().set_snapshot(snapshot);
                    true
                }
                HostEvent::Rotate { generation } => {
                    if !self.timer.is_current(generation) {
                        debug!("Dropping stale rotation tick {}", generation);
                        continue;
                    }
                    self.card.lock().rotate()
                }
                HostEvent::Select(index) => self.card.lock().select(index),
                HostEvent::Reconfigure(config) => {
                    info!("Card reconfigured");
                    let period = config.rotation_period();
                    self.card.lock().set_config(config);
                    self.timer.reschedule(period, self.events.clone());
                    // Header visibility may change without the screen changing.
                    last_screen = None;
                    true
                }
                HostEvent::Shutdown => {
                    info!("Card host shutting down");
                    self.timer.cancel();
                    return Ok(());
                }
            };

            if !dirty || applied_revision == 0 {
                continue;
            }

            let (screen, config) = {
                let mut card = self.card.lock();
                (card.screen(), card.config().clone())
            };
            if last_screen.as_ref() != Some(&screen) {
                render(&screen, &config);
                last_screen = Some(screen);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entity::{StateObject, StateSnapshot};

    fn snapshot(names: &[&str]) -> StateSnapshot {
        let mut snapshot = StateSnapshot::new();
        for name in names {
            snapshot.insert(
                format!("binary_sensor.{}_status", name),
                StateObject::new("on")
                    .with_attribute("device_class", "connectivity")
                    .with_attribute("friendly_name", format!("{} Status", name)),
            );
            snapshot.insert(
                format!("sensor.{}_players", name),
                StateObject::new("0").with_attribute("friendly_name", format!("{} Players", name)),
            );
        }
        snapshot
    }

    #[tokio::test]
    async fn renders_only_on_change() {
        let host = CardHost::new(CardConfig {
            rotate_interval: 0.0,
            ..CardConfig::default()
        });
        let tx = host.sender();
        let card = host.card();

        host.store().replace(snapshot(&["a", "b"]));
        tx.send(HostEvent::SnapshotChanged).await.unwrap();
        tx.send(HostEvent::SnapshotChanged).await.unwrap();
        host.store().replace(snapshot(&["a", "b"]));
        tx.send(HostEvent::SnapshotChanged).await.unwrap();
        tx.send(HostEvent::Select(1)).await.unwrap();
        tx.send(HostEvent::Shutdown).await.unwrap();

        let mut rendered = Vec::new();
        host.run(|screen, _| rendered.push(screen.clone())).await.unwrap();

        assert_eq!(rendered.len(), 2);
        assert!(matches!(rendered[1], CardScreen::Server { index: 1, .. }));
        assert_eq!(card.lock().current_index(), 1);
    }

    #[tokio::test]
    async fn stale_rotation_ticks_are_ignored() {
        let host = CardHost::new(CardConfig {
            rotate_interval: 0.0,
            ..CardConfig::default()
        });
        let tx = host.sender();
        let card = host.card();

        host.store().replace(snapshot(&["a", "b"]));
        tx.send(HostEvent::SnapshotChanged).await.unwrap();
        tx.send(HostEvent::Rotate { generation: 0 }).await.unwrap();
        tx.send(HostEvent::Shutdown).await.unwrap();
        host.run(|_, _| {}).await.unwrap();

        assert_eq!(card.lock().current_index(), 0);
    }

    #[tokio::test]
    async fn nothing_renders_before_first_snapshot() {
        let host = CardHost::new(CardConfig::default());
        let tx = host.sender();
        tx.send(HostEvent::Reconfigure(CardConfig::default())).await.unwrap();
        tx.send(HostEvent::Shutdown).await.unwrap();

        let mut renders = 0;
        host.run(|_, _| renders += 1).await.unwrap();
        assert_eq!(renders, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_rotates_between_servers() {
        let host = CardHost::new(CardConfig {
            rotate_interval: 1.0,
            ..CardConfig::default()
        });
        let tx = host.sender();
        host.store().replace(snapshot(&["a", "b"]));
        tx.send(HostEvent::SnapshotChanged).await.unwrap();

        let task = tokio::spawn(async move {
            let mut names = Vec::new();
            host.run(|screen, _| {
                if let CardScreen::Server { view, .. } = screen {
                    names.push(view.name.clone());
                }
            })
            .await
            .unwrap();
            names
        });

        tokio::time::sleep(std::time::Duration::from_millis(2500)).await;
        tx.send(HostEvent::Shutdown).await.unwrap();

        let names = task.await.unwrap();
        assert_eq!(names, vec!["a", "b", "a"]);
    }

    #[tokio::test]
    async fn card_reads_latest_store_revision() {
        let host = CardHost::new(CardConfig {
            rotate_interval: 0.0,
            ..CardConfig::default()
        });
        let tx = host.sender();
        let card = host.card();
        let store = host.store();

        store.replace(snapshot(&["a"]));
        store.replace(snapshot(&["a", "b", "c"]));
        tx.send(HostEvent::SnapshotChanged).await.unwrap();
        tx.send(HostEvent::SnapshotChanged).await.unwrap();
        tx.send(HostEvent::Shutdown).await.unwrap();

        let mut renders = 0;
        host.run(|_, _| renders += 1).await.unwrap();

        assert_eq!(renders, 1);
        assert_eq!(card.lock().servers().len(), 3);
    }

    #[tokio::test]
    async fn oversized_interval_keeps_host_running() {
        let host = CardHost::new(CardConfig::default());
        let tx = host.sender();
        let card = host.card();

        tx.send(HostEvent::Reconfigure(CardConfig {
            rotate_interval: 1e20,
            ..CardConfig::default()
        }))
        .await
        .unwrap();
        tx.send(HostEvent::Select(0)).await.unwrap();
        tx.send(HostEvent::Shutdown).await.unwrap();

        host.run(|_, _| {}).await.unwrap();
        assert_eq!(card.lock().config().rotate_interval, 1e20);
    }
}
