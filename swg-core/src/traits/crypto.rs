//! Platform crypto abstraction Trait

use async_trait::async_trait;

use crate::crypto::DigestAlgorithm;
use crate::error::CoreResult;

/// Cryptographic primitives offered by the platform (Web Crypto in browsers).
#[async_trait]
pub trait PlatformCrypto: Send + Sync {
    /// Whether a digest primitive is present.
    fn supports_digest(&self) -> bool {
        true
    }

    /// Fill `bytes` from a cryptographically secure source.
    fn fill_random(&self, bytes: &mut [u8]) -> CoreResult<()>;

    async fn digest(&self, algorithm: DigestAlgorithm, data: &[u8]) -> CoreResult<Vec<u8>>;
}
