// src/host/timer.rs
use std::time::Duration;

use log::{debug, info};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::HostEvent;

/// Periodic rotation trigger. Rescheduling aborts the running ticker before
/// starting a new one, and every tick carries the generation it was started
/// with so ticks queued by an old ticker can be told apart.
pub struct RotationTimer {
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl RotationTimer {
    pub fn new() -> Self {
        Self {
            handle: None,
            generation: 0,
        }
    }

    pub fn reschedule(&mut self, period: Option<Duration>, events: mpsc::Sender<HostEvent>) {
        self.cancel();
        self.generation += 1;

        let Some(period) = period else {
            info!("Rotation disabled");
            return;
        };

        let generation = self.generation;
        info!("Rotating every {:?}", period);
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if events.send(HostEvent::Rotate { generation }).await.is_err() {
                    debug!("Rotation timer {} stopping, event loop gone", generation);
                    break;
                }
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.handle.is_some() && generation == self.generation
    }
}

impl Default for RotationTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RotationTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
