//! Storage abstraction Trait

use async_trait::async_trait;

use crate::error::CoreResult;

/// Well-known storage keys
pub mod storage_keys {
    /// User token forwarded to activity iframes as `sut`.
    pub const USER_TOKEN: &str = "USER_TOKEN";

    /// Redirect verifier key, restored after a full-page redirect.
    pub const REDIRECT: &str = "subscribe.google.com:rk";
}

/// Key/value storage used by flows
///
/// `use_local_storage` selects persistent storage over the session-scoped one.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Get a value
    ///
    /// # Returns
    /// * `Ok(Some(value))` - value exists
    /// * `Ok(None)` - value does not exist
    async fn get(&self, key: &str, use_local_storage: bool) -> CoreResult<Option<String>>;

    async fn set(&self, key: &str, value: &str, use_local_storage: bool) -> CoreResult<()>;

    async fn remove(&self, key: &str, use_local_storage: bool) -> CoreResult<()>;
}

/// Synchronous persistent storage (`localStorage`).
///
/// Accessing it may fail at any time, for example when cookies are disabled
/// or the quota is exhausted.
pub trait LocalStorage: Send + Sync {
    /// Whether the storage can be accessed at all.
    fn is_available(&self) -> bool {
        true
    }

    fn get_item(&self, key: &str) -> CoreResult<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> CoreResult<()>;

    fn remove_item(&self, key: &str) -> CoreResult<()>;
}
