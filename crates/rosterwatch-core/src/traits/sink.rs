//! UI layer sink.

use crate::types::BoardUpdate;

/// Receives externally visible state changes.
///
/// Implementations own thread affinity: apply directly when already on the
/// UI context, otherwise marshal the update there. `apply` must not block.
pub trait PresenceSink: Send + Sync + std::fmt::Debug + 'static {
    /// Deliver one update.
    fn apply(&self, update: BoardUpdate);
}
