//! Display list arrangement.

use std::cmp::Ordering;

use rosterwatch_core::config::display::DisplayConfig;
use rosterwatch_core::locale::Strings;
use rosterwatch_core::types::{PeerEntry, PeerPresence, PresenceCounts, PresenceState, PresenceView};

/// Row limits and the offline-list toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPolicy {
    /// Maximum online rows.
    pub max_online: usize,
    /// Maximum offline rows.
    pub max_offline: usize,
    /// Whether the offline list is built at all.
    pub show_offline: bool,
}

impl DisplayPolicy {
    /// Policy from display configuration and the current user toggle.
    pub fn new(config: &DisplayConfig, show_offline: bool) -> Self {
        Self {
            max_online: config.max_online,
            max_offline: config.max_offline,
            show_offline,
        }
    }
}

/// Build the visible result set from one cycle's peers.
///
/// Counts cover every peer. Online rows sort by state rank then name;
/// offline rows sort by name. Each list is truncated to its limit. Row
/// avatars are copied from the peers' `avatar_ref`.
pub fn arrange(peers: &[PeerPresence], policy: &DisplayPolicy, strings: &Strings) -> PresenceView {
    let counts = PresenceCounts {
        online: peers.iter().filter(|p| p.state.is_online()).count(),
        in_game: peers.iter().filter(|p| p.state == PresenceState::InGame).count(),
        offline: peers.iter().filter(|p| !p.state.is_online()).count(),
    };

    let mut online: Vec<&PeerPresence> = peers.iter().filter(|p| p.state.is_online()).collect();
    online.sort_by(|a, b| a.state.rank().cmp(&b.state.rank()).then_with(|| by_name(a, b)));
    online.truncate(policy.max_online);

    let mut offline: Vec<&PeerPresence> = if policy.show_offline {
        peers.iter().filter(|p| !p.state.is_online()).collect()
    } else {
        Vec::new()
    };
    offline.sort_by(|a, b| by_name(a, b));
    offline.truncate(policy.max_offline);

    PresenceView {
        counts,
        online: online.into_iter().map(|p| entry(p, strings)).collect(),
        offline: offline.into_iter().map(|p| entry(p, strings)).collect(),
    }
}

/// Case-insensitive name order, then exact name, then id.
fn by_name(a: &PeerPresence, b: &PeerPresence) -> Ordering {
    a.display_name
        .to_lowercase()
        .cmp(&b.display_name.to_lowercase())
        .then_with(|| a.display_name.cmp(&b.display_name))
        .then_with(|| a.id.cmp(&b.id))
}

fn entry(peer: &PeerPresence, strings: &Strings) -> PeerEntry {
    PeerEntry {
        id: peer.id,
        display_name: peer.display_name.clone(),
        state: peer.state,
        state_label: strings.state_label(peer.state).to_string(),
        activity: peer.activity.clone(),
        avatar: peer.avatar_ref.clone(),
    }
}
