// src/main.rs
use env_logger::Env;
use log::{error, info, warn};
use mcstats_card::config::{load_card_config, stub_config, Config};
use mcstats_card::host::watcher::SnapshotWatcher;
use mcstats_card::host::{CardHost, HostEvent};
use mcstats_card::render::render_text;
use mcstats_card::storage::snapshot::load_snapshot;
use mcstats_card::utils::HostError;
use mcstats_card::CARD_SIZE;

#[tokio::main]
async fn main() -> Result<(), HostError> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env();

    let card_config = match &config.card_config_path {
        Some(path) => load_card_config(path).map_err(|e| {
            error!("{}", e);
            e
        })?,
        None => stub_config(),
    };
    info!(
        "Starting card (size {}) for {}",
        CARD_SIZE,
        config.snapshot_path.display()
    );

    let host = CardHost::new(card_config);
    let events = host.sender();

    match config.snapshot_reload_period() {
        Some(period) => {
            let watcher = SnapshotWatcher::new(config.snapshot_path.clone(), host.store());
            tokio::spawn(watcher.run(period, events.clone()));
        }
        None => match load_snapshot(&config.snapshot_path) {
            Ok(snapshot) => {
                host.store().replace(snapshot);
                events
                    .send(HostEvent::SnapshotChanged)
                    .await
                    .map_err(|_| HostError::ChannelClosed)?;
            }
            Err(e) => warn!("No snapshot loaded: {}", e),
        },
    }

    let shutdown = events.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown.send(HostEvent::Shutdown).await;
        }
    });

    host.run(|screen, card_config| {
        println!("{}", render_text(screen, card_config.show_header));
    })
    .await
}
