//! Activity result verification

use serde_json::Value;
use swg_activities::ActivityResult;

use crate::error::{CoreError, CoreResult};

/// Trust requirements a caller places on an activity result.
///
/// Which flags are required is a decision of the call site: results from a
/// popup may lack a verified origin while iframe results usually have one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPolicy {
    pub origin: String,
    pub require_origin_verified: bool,
    pub require_secure_channel: bool,
}

impl ResultPolicy {
    pub fn new(
        origin: impl Into<String>,
        require_origin_verified: bool,
        require_secure_channel: bool,
    ) -> Self {
        Self {
            origin: origin.into(),
            require_origin_verified,
            require_secure_channel,
        }
    }

    /// Requires the origin and both trust flags.
    pub fn strict(origin: impl Into<String>) -> Self {
        Self::new(origin, true, true)
    }

    /// Whether `result` satisfies every requirement.
    pub fn is_satisfied_by(&self, result: &ActivityResult) -> bool {
        result.origin == self.origin
            && (!self.require_origin_verified || result.origin_verified)
            && (!self.require_secure_channel || result.secure_channel)
    }

    /// Releases the payload of an accepted result, or fails with
    /// [`CoreError::ChannelMismatch`].
    pub fn verify(&self, result: ActivityResult) -> CoreResult<Value> {
        if !self.is_satisfied_by(&result) {
            log::warn!(
                "Rejected activity result from {} (verified: {}, secure: {})",
                result.origin,
                result.origin_verified,
                result.secure_channel
            );
            return Err(CoreError::ChannelMismatch {
                expected: self.origin.clone(),
                actual: result.origin,
            });
        }
        Ok(result.data)
    }
}

/// Apply `policy` to an accepted result.
///
/// Cancellation and failure outcomes pass through untouched; only a
/// successful result is checked against the policy.
pub fn accept_result_data(
    outcome: CoreResult<ActivityResult>,
    policy: &ResultPolicy,
) -> CoreResult<Value> {
    policy.verify(outcome?)
}
