// src/render.rs
use crate::card::CardScreen;
use crate::view::{ModBadge, ServerView};

const HEADER_TITLE: &str = "MINECRAFT SERVER";

/// Plain-text rendering of a card screen for terminal output.
pub fn render_text(screen: &CardScreen, show_header: bool) -> String {
    let mut out = String::new();
    match screen {
        CardScreen::NoServers => {
            header(&mut out, show_header, None);
            out.push_str("No Minecraft servers found.\nSet up the integration first.\n");
        }
        CardScreen::AllOffline => {
            header(&mut out, show_header, None);
            out.push_str("All servers are offline\n");
        }
        CardScreen::Server { view, index, count } => {
            header(&mut out, show_header, Some((*index, *count)));
            server(&mut out, view);
        }
    }
    out
}

fn header(out: &mut String, show_header: bool, position: Option<(usize, usize)>) {
    if !show_header {
        return;
    }
    out.push_str(HEADER_TITLE);
    if let Some((index, count)) = position.filter(|(_, count)| *count > 1) {
        let dots: String = (0..count).map(|i| if i == index { '●' } else { '○' }).collect();
        out.push_str(&format!("  {}", dots));
    }
    out.push('\n');
}

fn server(out: &mut String, view: &ServerView) {
    let badge = if view.online { "ONLINE" } else { "OFFLINE" };
    out.push_str(&format!("{} [{}]\n", view.name, badge));

    if let Some(motd) = &view.motd {
        out.push_str(&format!("  {}\n", motd));
    }

    let mut badges = Vec::new();
    if let Some(version) = &view.version {
        badges.push(format!("Version {}", version));
    }
    match &view.mods {
        Some(ModBadge::Modded { mod_count }) => badges.push(format!("{} Mods", mod_count)),
        Some(ModBadge::Vanilla) => badges.push("Vanilla".to_string()),
        None => {}
    }
    if !badges.is_empty() {
        out.push_str(&format!("  {}\n", badges.join(" | ")));
    }

    if view.online {
        out.push_str(&format!(
            "  Players {}/{}   Latency {} ms\n",
            view.player_count, view.max_players, view.latency
        ));
    }

    let players = if !view.online {
        "Server is offline".to_string()
    } else if view.player_names.is_empty() {
        "No players online".to_string()
    } else {
        view.player_names.join(", ")
    };
    out.push_str(&format!("  Online players: {}\n", players));
}
