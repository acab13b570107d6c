//! Canonical 64-bit peer identifier.
//!
//! The remote service serializes identifiers as decimal strings; the
//! canonical form is exactly 17 ASCII digits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AppError;

/// Number of digits in a canonical identifier.
pub const CANONICAL_ID_DIGITS: usize = 17;

/// Stable external identifier of a peer or of the primary account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u64);

impl PeerId {
    /// Parse input that already has the canonical numeric shape.
    ///
    /// Returns `None` for anything that is not exactly
    /// [`CANONICAL_ID_DIGITS`] ASCII digits.
    pub fn parse_canonical(input: &str) -> Option<Self> {
        if input.len() == CANONICAL_ID_DIGITS && input.bytes().all(|b| b.is_ascii_digit()) {
            input.parse().ok().map(Self)
        } else {
            None
        }
    }

    /// Return the raw numeric value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PeerId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| AppError::validation(format!("Invalid peer id '{s}': {e}")))
    }
}

impl From<u64> for PeerId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Serialize for PeerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PeerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
