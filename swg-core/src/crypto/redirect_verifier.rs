//! Redirect verifier
//!
//! When a payment flow runs as a redirect, the response comes back through a
//! navigation to the publisher page and nothing held in page memory survives.
//! To tie that response to the user action that started it, a random key is
//! persisted before leaving and only a one-way verifier of that key is sent
//! out with the request. The page receiving the redirect restores the key.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tokio::sync::OnceCell;

use super::current_verifier_algorithm;
use crate::traits::{storage_keys, LocalStorage, PlatformCrypto};

const KEY_LENGTH: usize = 16; // 128-bit

/// Key and its one-way verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectVerifierPair {
    pub key: String,
    pub verifier: String,
}

/// Generates and hands out the redirect key/verifier pair.
///
/// The pair is computed at most once per instance. A platform lacking
/// storage, random numbers or a digest, as well as any failure while
/// computing the pair, memoizes to "unsupported" and every later call yields
/// `None`. Callers then fall back to another session verifier.
pub struct RedirectVerifierHelper {
    storage: Option<Arc<dyn LocalStorage>>,
    crypto: Option<Arc<dyn PlatformCrypto>>,
    pair: OnceCell<Option<RedirectVerifierPair>>,
}

impl RedirectVerifierHelper {
    #[must_use]
    pub fn new(
        storage: Option<Arc<dyn LocalStorage>>,
        crypto: Option<Arc<dyn PlatformCrypto>>,
    ) -> Self {
        Self {
            storage,
            crypto,
            pair: OnceCell::new(),
        }
    }

    /// Computes the pair ahead of time.
    ///
    /// Call this early: once prepared, [`use_verifier`](Self::use_verifier)
    /// completes without suspending, i.e. still inside the user gesture that
    /// opens the payment window.
    pub async fn prepare(&self) {
        self.get_or_create_pair().await;
    }

    /// Whether the pair (or its absence) has been settled.
    pub fn is_prepared(&self) -> bool {
        self.pair.initialized()
    }

    /// Calls `callback` with the verifier, or `None` when unsupported.
    ///
    /// The key is persisted first. If that fails the verifier is withheld,
    /// since a verifier whose key cannot be restored is worthless.
    pub async fn use_verifier<F>(&self, callback: F)
    where
        F: FnOnce(Option<String>),
    {
        let pair = self.get_or_create_pair().await;
        let verifier = pair.and_then(|pair| self.persist_key(pair));
        callback(verifier);
    }

    /// Reads the persisted key back. Read failures yield `None`.
    pub fn restore_key(&self) -> Option<String> {
        let storage = self.storage.as_ref()?;
        match storage.get_item(storage_keys::REDIRECT) {
            Ok(key) => key,
            Err(e) => {
                log::debug!("Failed to restore redirect key: {e}");
                None
            }
        }
    }

    fn persist_key(&self, pair: &RedirectVerifierPair) -> Option<String> {
        let storage = self.storage.as_ref()?;
        match storage.set_item(storage_keys::REDIRECT, &pair.key) {
            Ok(()) => Some(pair.verifier.clone()),
            Err(e) => {
                log::warn!("Failed to persist redirect key, dropping verifier: {e}");
                None
            }
        }
    }

    async fn get_or_create_pair(&self) -> Option<&RedirectVerifierPair> {
        self.pair
            .get_or_init(|| async {
                if self.supports_verification() {
                    self.create_pair().await
                } else {
                    log::debug!("Redirect verification is not supported on this platform");
                    None
                }
            })
            .await
            .as_ref()
    }

    fn supports_verification(&self) -> bool {
        let storage_ok = self.storage.as_ref().is_some_and(|s| s.is_available());
        let crypto_ok = self.crypto.as_ref().is_some_and(|c| c.supports_digest());
        storage_ok && crypto_ok
    }

    async fn create_pair(&self) -> Option<RedirectVerifierPair> {
        let crypto = self.crypto.as_ref()?;

        // 1. Random 128-bit key, base64 encoded.
        let mut key_bytes = [0u8; KEY_LENGTH];
        if let Err(e) = crypto.fill_random(&mut key_bytes) {
            log::warn!("Failed to generate redirect key: {e}");
            return None;
        }
        let key = BASE64.encode(key_bytes);

        // 2. One-way hash of the encoded key.
        let hash = match crypto
            .digest(current_verifier_algorithm(), key.as_bytes())
            .await
        {
            Ok(hash) => hash,
            Err(e) => {
                log::warn!("Failed to derive redirect verifier: {e}");
                return None;
            }
        };

        // 3. Verifier is the base64 encoded hash.
        let verifier = BASE64.encode(hash);
        Some(RedirectVerifierPair { key, verifier })
    }
}
