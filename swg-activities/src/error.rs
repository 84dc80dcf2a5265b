use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by an activity transport.
///
/// `Aborted` is the cancellation kind: the user closed the activity or
/// declined the flow. It is an expected outcome, not a failure, and callers
/// usually branch on it via [`ActivityError::is_abort`].
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", content = "details")]
pub enum ActivityError {
    /// The activity was canceled.
    #[error("AbortError: {0}")]
    Aborted(String),

    /// The activity finished with a failure result.
    #[error("Activity failed: {0}")]
    Failed(String),

    /// The port was disconnected before a result arrived.
    #[error("Activity port disconnected")]
    Disconnected,

    /// The underlying messaging channel failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The environment refused to open a popup window.
    #[error("Popup blocked")]
    PopupBlocked,

    /// The requested window target cannot host an activity.
    #[error("Invalid activity target: {0}")]
    InvalidTarget(String),
}

impl ActivityError {
    /// Whether this error represents a user cancellation.
    #[must_use]
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }
}

/// Result alias for transport operations.
pub type Result<T> = std::result::Result<T, ActivityError>;
