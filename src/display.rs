// src/display.rs
use crate::models::entity::StateSnapshot;
use crate::models::server::ServerRecord;

/// Whether `server`'s status entity currently reports `on`.
pub fn is_online(server: &ServerRecord, snapshot: &StateSnapshot) -> bool {
    snapshot
        .get(&server.status_entity)
        .map_or(false, |status| status.is_on())
}

/// Servers eligible for rotation. Offline servers, and servers whose status
/// entity is missing, are dropped unless `show_offline` is set.
pub fn select_displayed<'a>(
    servers: &'a [ServerRecord],
    snapshot: &StateSnapshot,
    show_offline: bool,
) -> Vec<&'a ServerRecord> {
    if show_offline {
        return servers.iter().collect();
    }
    servers
        .iter()
        .filter(|server| is_online(server, snapshot))
        .collect()
}

/// Cursor over the displayable list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    pub servers: Vec<ServerRecord>,
    pub current_index: usize,
}

impl DisplayState {
    /// Builds the state for a freshly computed list, resetting an
    /// out-of-bounds index to 0.
    pub fn new(servers: Vec<ServerRecord>, current_index: usize) -> Self {
        let current_index = repair_index(current_index, servers.len());
        Self {
            servers,
            current_index,
        }
    }

    pub fn advance(self) -> Self {
        let count = self.servers.len();
        if count <= 1 {
            return self;
        }
        Self {
            current_index: (self.current_index + 1) % count,
            ..self
        }
    }

    /// Jumps to `index`; ignored when it is out of range.
    pub fn select(self, index: usize) -> Self {
        if index >= self.servers.len() {
            return self;
        }
        Self {
            current_index: index,
            ..self
        }
    }

    pub fn current(&self) -> Option<&ServerRecord> {
        self.servers.get(self.current_index)
    }
}

pub fn repair_index(index: usize, count: usize) -> usize {
    if index >= count {
        0
    } else {
        index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPhase {
    NoServers,
    AllOffline,
    ShowingServer(usize),
}

impl DisplayPhase {
    pub fn of(discovered: usize, display: &DisplayState) -> Self {
        if discovered == 0 {
            DisplayPhase::NoServers
        } else if display.servers.is_empty() {
            DisplayPhase::AllOffline
        } else {
            DisplayPhase::ShowingServer(display.current_index)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entity::StateObject;

    fn servers(n: usize) -> Vec<ServerRecord> {
        (0..n)
            .map(|i| ServerRecord::new(format!("S{}", i), format!("binary_sensor.s{}_status", i)))
            .collect()
    }

    #[test]
    fn filters_offline_and_missing() {
        let all = servers(3);
        let snapshot = StateSnapshot::new()
            .with("binary_sensor.s0_status", StateObject::new("on"))
            .with("binary_sensor.s1_status", StateObject::new("off"));

        let online = select_displayed(&all, &snapshot, false);
        assert_eq!(online.len(), 1);
        assert_eq!(online[0].name, "S0");
        assert_eq!(select_displayed(&all, &snapshot, true).len(), 3);
    }

    #[test]
    fn unavailable_is_not_online() {
        let all = servers(1);
        let snapshot = StateSnapshot::new()
            .with("binary_sensor.s0_status", StateObject::new("unavailable"));
        assert!(select_displayed(&all, &snapshot, false).is_empty());
    }

    #[test]
    fn advance_wraps() {
        let state = DisplayState::new(servers(3), 0);
        let state = state.advance();
        assert_eq!(state.current_index, 1);
        let state = state.advance().advance();
        assert_eq!(state.current_index, 0);
    }

    #[test]
    fn advance_is_noop_for_small_lists() {
        assert_eq!(DisplayState::new(servers(0), 0).advance().current_index, 0);
        assert_eq!(DisplayState::new(servers(1), 0).advance().current_index, 0);
    }

    #[test]
    fn out_of_bounds_index_resets() {
        let state = DisplayState::new(servers(2), 5);
        assert_eq!(state.current_index, 0);
        assert_eq!(state.current().unwrap().name, "S0");
        assert_eq!(DisplayState::new(servers(3), 2).current_index, 2);
    }

    #[test]
    fn select_ignores_out_of_range() {
        let state = DisplayState::new(servers(3), 0).select(2);
        assert_eq!(state.current_index, 2);
        assert_eq!(state.select(3).current_index, 2);
    }

    #[test]
    fn phases() {
        assert_eq!(DisplayPhase::of(0, &DisplayState::default()), DisplayPhase::NoServers);
        assert_eq!(DisplayPhase::of(2, &DisplayState::default()), DisplayPhase::AllOffline);
        assert_eq!(
            DisplayPhase::of(2, &DisplayState::new(servers(2), 1)),
            DisplayPhase::ShowingServer(1)
        );
    }
}
