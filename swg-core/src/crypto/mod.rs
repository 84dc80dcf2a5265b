//! Crypto module
//!
//! Digest algorithm versioning, a `rand` + `sha2` backed [`PlatformCrypto`]
//! and the redirect verifier built on top of it.

mod redirect_verifier;

pub use redirect_verifier::{RedirectVerifierHelper, RedirectVerifierPair};

use async_trait::async_trait;
use rand::RngCore;
use sha2::{Digest, Sha256, Sha384};

use crate::error::CoreResult;
use crate::traits::PlatformCrypto;

/// Digest algorithms a platform may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha256,
    Sha384,
}

/// Current redirect verifier version
///
/// Modify this constant to switch versions (the algorithm is derived from the version number)
pub const CURRENT_VERIFIER_VERSION: u32 = 1;

/// Get the digest algorithm for the specified verifier version
///
/// # Returns
/// - `Some(algorithm)` - the algorithm corresponding to this version
/// - `None` - Unsupported version number
pub const fn verifier_algorithm(version: u32) -> Option<DigestAlgorithm> {
    match version {
        1 => Some(DigestAlgorithm::Sha384),
        _ => None,
    }
}

/// Get the algorithm of the current verifier version (calculated at compile time)
///
/// # Panics
/// Panics at compile time if `CURRENT_VERIFIER_VERSION` does not map to a known algorithm.
#[allow(clippy::panic)]
pub const fn current_verifier_algorithm() -> DigestAlgorithm {
    match verifier_algorithm(CURRENT_VERIFIER_VERSION) {
        Some(algorithm) => algorithm,
        None => panic!("Invalid CURRENT_VERIFIER_VERSION"),
    }
}

/// [`PlatformCrypto`] backed by the thread-local CSPRNG and `sha2`.
///
/// Used where the host has no crypto of its own to offer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCrypto;

#[async_trait]
impl PlatformCrypto for RustCrypto {
    fn fill_random(&self, bytes: &mut [u8]) -> CoreResult<()> {
        rand::rng().fill_bytes(bytes);
        Ok(())
    }

    async fn digest(&self, algorithm: DigestAlgorithm, data: &[u8]) -> CoreResult<Vec<u8>> {
        Ok(match algorithm {
            DigestAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            DigestAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
        })
    }
}
