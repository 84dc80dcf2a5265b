//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export transport error type
pub use swg_activities::ActivityError;

/// Core layer error type
#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Callback registered for a type without a resolvable message label
    #[error("Invalid data type: {0}")]
    InvalidMessageType(String),

    /// A callback is already bound to this message label
    #[error("Invalid type or duplicate callback for {0}")]
    DuplicateCallback(String),

    /// Flow canceled locally (the host-side counterpart of an aborted activity)
    #[error("AbortError: {0}")]
    Cancelled(String),

    /// Result arrived over a channel that does not satisfy the caller's policy
    #[error("channel mismatch: expected origin {expected}, got {actual}")]
    ChannelMismatch { expected: String, actual: String },

    /// Dialog accessed before its shell finished loading
    #[error("not opened yet")]
    NotOpened,

    /// Dialog shell is already attached to the document
    #[error("already opened")]
    AlreadyOpened,

    /// URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Host document rejected an operation
    #[error("Document error: {0}")]
    DocumentError(String),

    /// Platform crypto error
    #[error("Crypto error: {0}")]
    CryptoError(String),

    /// Transport error (converting from library)
    #[error("{0}")]
    Activity(#[from] ActivityError),
}

impl CoreError {
    /// Whether the error is a user cancellation.
    ///
    /// Covers both the local `Cancelled` kind and an aborted activity reported
    /// by the transport.
    #[must_use]
    pub fn is_cancel(&self) -> bool {
        match self {
            Self::Cancelled(_) => true,
            Self::Activity(e) => e.is_abort(),
            _ => false,
        }
    }

    /// Whether it is expected behavior (user cancellation, untrusted channel, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Cancelled(_) | Self::ChannelMismatch { .. } => true,
            Self::Activity(e) => e.is_abort() || matches!(e, ActivityError::PopupBlocked),
            _ => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
