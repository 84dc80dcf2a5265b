//! SwG Core Library
//!
//! Client runtime core embedded in publisher pages. Provides:
//! - Typed message channels to activities running in iframes, popups or
//!   redirects, with result verification ([`ActivityPorts`])
//! - Dialog and view orchestration with serialized transitions
//!   ([`DialogManager`])
//! - Redirect verifier for flows that survive a full-page navigation
//!   ([`RedirectVerifierHelper`])
//!
//! The library is platform-independent: the page, storage, crypto and the
//! activity transport are reached through traits.

pub mod components;
pub mod crypto;
pub mod error;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use components::{
    ActivityIframePort, ActivityIframeView, ActivityPorts, ActivityWindowPort, Dialog,
    DialogManager, View, ViewId, ViewOptions,
};
pub use crypto::{RedirectVerifierHelper, RedirectVerifierPair, RustCrypto};
pub use error::{CoreError, CoreResult};
pub use traits::{Document, EventManager, LocalStorage, PlatformCrypto, Storage};
pub use utils::activity_utils::ResultPolicy;
