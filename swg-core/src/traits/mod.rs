//! Platform abstraction trait definition

mod crypto;
mod document;
mod event_manager;
mod storage;

pub use crypto::PlatformCrypto;
pub use document::{ClickHandler, Declarations, Document, ListenerId, MediaListener};
pub use event_manager::EventManager;
pub use storage::{storage_keys, LocalStorage, Storage};
