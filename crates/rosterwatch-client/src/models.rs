//! Wire models of the remote web API.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::trace;

use rosterwatch_core::types::{PeerId, RemotePresence};

/// Relationship value of a confirmed peer.
const CONFIRMED_RELATIONSHIP: &str = "friend";

/// `GetFriendList` response root.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FriendListResponse {
    /// Roster container, absent for private profiles.
    #[serde(default, rename = "friendslist")]
    pub friends_list: Option<FriendsList>,
}

/// Roster container.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FriendsList {
    /// Roster entries.
    #[serde(default)]
    pub friends: Vec<Friend>,
}

/// One roster entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Friend {
    /// Peer id as a decimal string.
    #[serde(default, rename = "steamid")]
    pub peer_id: String,
    /// Relationship kind.
    #[serde(default)]
    pub relationship: String,
}

impl FriendListResponse {
    /// Confirmed peer ids, de-duplicated in first-seen order.
    pub fn into_peer_ids(self) -> Vec<PeerId> {
        let friends = self.friends_list.map(|l| l.friends).unwrap_or_default();
        let mut seen = HashSet::with_capacity(friends.len());

        friends
            .into_iter()
            .filter(|f| f.relationship.eq_ignore_ascii_case(CONFIRMED_RELATIONSHIP))
            .filter_map(|f| match f.peer_id.parse::<PeerId>() {
                Ok(id) => Some(id),
                Err(e) => {
                    trace!(raw = %f.peer_id, error = %e, "Skipping roster entry with bad id");
                    None
                }
            })
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// `GetPlayerSummaries` response root.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerSummariesResponse {
    /// Payload.
    #[serde(default)]
    pub response: Option<PlayerSummaries>,
}

/// Presence payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerSummaries {
    /// One record per known id.
    #[serde(default)]
    pub players: Vec<PlayerSummary>,
}

/// One presence record.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerSummary {
    /// Peer id as a decimal string.
    #[serde(default, rename = "steamid")]
    pub peer_id: String,
    /// Display name.
    #[serde(default, rename = "personaname")]
    pub display_name: Option<String>,
    /// Numeric state code.
    #[serde(default, rename = "personastate")]
    pub state_code: i32,
    /// Running activity title.
    #[serde(default, rename = "gameextrainfo")]
    pub activity: Option<String>,
    /// Full-size avatar URL.
    #[serde(default, rename = "avatarfull")]
    pub avatar_url: Option<String>,
}

impl PlayerSummariesResponse {
    /// Convert to domain records, dropping entries without a valid id.
    pub fn into_presences(self) -> Vec<RemotePresence> {
        self.response
            .map(|r| r.players)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| {
                let id = p.peer_id.parse::<PeerId>().ok()?;
                Some(RemotePresence {
                    id,
                    display_name: p.display_name,
                    state_code: p.state_code,
                    activity: p.activity,
                    avatar_url: p.avatar_url.filter(|u| !u.trim().is_empty()),
                })
            })
            .collect()
    }
}

/// `ResolveVanityURL` response root.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveVanityResponse {
    /// Payload.
    #[serde(default)]
    pub response: Option<ResolveVanity>,
}

/// Vanity resolution payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveVanity {
    /// `1` on success.
    #[serde(default)]
    pub success: i32,
    /// Resolved id.
    #[serde(default, rename = "steamid")]
    pub peer_id: Option<String>,
    /// Failure reason.
    #[serde(default)]
    pub message: Option<String>,
}

impl ResolveVanityResponse {
    /// The resolved id, or `None` when the name is unknown.
    pub fn into_peer_id(self) -> Option<PeerId> {
        let payload = self.response?;
        if payload.success != 1 {
            return None;
        }
        payload.peer_id?.parse().ok()
    }
}
