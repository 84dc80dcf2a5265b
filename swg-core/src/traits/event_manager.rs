//! Client event sink Trait

use crate::types::ClientEvent;

/// Receives analytics events relayed from activity iframes.
///
/// The implementation owns batching and delivery; the channel only forwards.
pub trait EventManager: Send + Sync {
    fn log_event(&self, event: ClientEvent);
}
