//! Game server status card for smart-home dashboards.
//!
//! Discovers game servers from a dashboard state snapshot by entity naming
//! convention, picks which of them to show and rotates between them.

pub mod card;
pub mod config;
pub mod discovery;
pub mod display;
pub mod editor;
pub mod host;
pub mod labels;
pub mod models;
pub mod render;
pub mod storage;
pub mod utils;
pub mod view;

pub use card::{Card, CardScreen, CARD_SIZE};
pub use config::{stub_config, CardConfig};
pub use discovery::discover;
pub use display::{select_displayed, DisplayPhase, DisplayState};
pub use labels::EntityLabels;
pub use models::entity::{StateObject, StateSnapshot};
pub use models::server::ServerRecord;
pub use view::ServerView;
