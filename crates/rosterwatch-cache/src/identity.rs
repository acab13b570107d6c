//! Profile reference resolution.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, warn};

use rosterwatch_core::traits::PresenceApi;
use rosterwatch_core::types::PeerId;

/// Path segment introducing a numeric profile id in a profile URL.
const PROFILES_SEGMENT: &str = "/profiles/";
/// Path segment introducing a vanity name in a profile URL.
const VANITY_SEGMENT: &str = "/id/";

/// Turns a user-supplied profile reference into a canonical id.
///
/// Accepted forms: a bare canonical id, `.../profiles/<digits>`,
/// `.../id/<vanity>`, or a bare vanity name. Successful resolutions are
/// cached per input string; failures are never cached.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    api: Arc<dyn PresenceApi>,
    cache: Cache<String, PeerId>,
}

/// What a profile reference points at before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ProfileRef<'a> {
    Canonical(PeerId),
    Vanity(&'a str),
    /// A profile URL whose id is missing or out of range.
    Malformed,
}

impl IdentityResolver {
    /// Create a resolver whose entries live for `ttl`.
    pub fn new(api: Arc<dyn PresenceApi>, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(16).time_to_live(ttl).build();
        Self { api, cache }
    }

    /// Resolve `input`, returning `None` when it cannot be resolved this cycle.
    pub async fn resolve(&self, api_key: &str, input: &str) -> Option<PeerId> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if let Some(id) = PeerId::parse_canonical(input) {
            return Some(id);
        }
        if let Some(id) = self.cache.get(input).await {
            return Some(id);
        }

        let vanity = match parse_profile_ref(input) {
            ProfileRef::Canonical(id) => {
                self.cache.insert(input.to_string(), id).await;
                return Some(id);
            }
            ProfileRef::Vanity(name) => name,
            ProfileRef::Malformed => {
                debug!(input, "Profile URL carries no usable id");
                return None;
            }
        };
        if vanity.is_empty() || api_key.trim().is_empty() {
            return None;
        }

        match self.api.resolve_vanity(api_key, vanity).await {
            Ok(Some(id)) => {
                debug!(vanity, id = %id, "Resolved vanity name");
                self.cache.insert(input.to_string(), id).await;
                Some(id)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(vanity, error = %e, "Vanity resolution failed");
                None
            }
        }
    }
}

fn parse_profile_ref(input: &str) -> ProfileRef<'_> {
    if let Some(rest) = after_segment(input, PROFILES_SEGMENT) {
        let digits = leading_run(rest, |c| c.is_ascii_digit());
        return match digits.parse::<u64>() {
            Ok(raw) => ProfileRef::Canonical(PeerId(raw)),
            Err(_) => ProfileRef::Malformed,
        };
    }
    if let Some(rest) = after_segment(input, VANITY_SEGMENT) {
        return ProfileRef::Vanity(leading_run(rest, |c| {
            c.is_ascii_alphanumeric() || c == '_' || c == '-'
        }));
    }
    ProfileRef::Vanity(input)
}

/// The text following the first case-insensitive occurrence of `segment`.
fn after_segment<'a>(input: &'a str, segment: &str) -> Option<&'a str> {
    let start = input.to_ascii_lowercase().find(segment)? + segment.len();
    input.get(start..)
}

fn leading_run(input: &str, accept: impl Fn(char) -> bool) -> &str {
    let end = input
        .char_indices()
        .find(|(_, c)| !accept(*c))
        .map_or(input.len(), |(i, _)| i);
    &input[..end]
}
