use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ActivityError, Result};

/// Argument bag passed to an activity when it is opened.
pub type Args = Map<String, Value>;

/// Opaque handle to an element owned by the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementHandle(pub u64);

/// Opaque handle to a browsing context opened by the host (popup window).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowHandle(pub u64);

/// How an activity is hosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityMode {
    /// Same-page iframe.
    Iframe,
    /// Separate popup window.
    Popup,
    /// Full-page navigation away and back.
    Redirect,
}

/// Outcome code reported by the activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityResultCode {
    Ok,
    Canceled,
    Failed,
}

/// Result produced by an activity, tagged with the channel properties the
/// transport observed while delivering it.
///
/// None of the tags are checked here. The consumer decides which of them it
/// requires before trusting `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResult {
    pub code: ActivityResultCode,
    pub data: Value,
    pub mode: ActivityMode,
    pub origin: String,
    pub origin_verified: bool,
    pub secure_channel: bool,
}

impl ActivityResult {
    /// Successful result delivered over the given channel.
    pub fn ok(
        data: Value,
        mode: ActivityMode,
        origin: impl Into<String>,
        origin_verified: bool,
        secure_channel: bool,
    ) -> Self {
        Self {
            code: ActivityResultCode::Ok,
            data,
            mode,
            origin: origin.into(),
            origin_verified,
            secure_channel,
        }
    }

    /// Returns a copy of this result with a different code.
    #[must_use]
    pub fn with_code(mut self, code: ActivityResultCode) -> Self {
        self.code = code;
        self
    }

    /// Converts the result into the outcome a caller awaits on.
    ///
    /// `Ok` yields the result itself. `Canceled` becomes
    /// [`ActivityError::Aborted`] and `Failed` becomes
    /// [`ActivityError::Failed`] carrying the failure text from `data`.
    pub fn into_outcome(self) -> Result<Self> {
        match self.code {
            ActivityResultCode::Ok => Ok(self),
            ActivityResultCode::Canceled => Err(ActivityError::Aborted("cancel".to_string())),
            ActivityResultCode::Failed => {
                let reason = match &self.data {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                Err(ActivityError::Failed(reason))
            }
        }
    }
}

/// Options for opening an activity in a separate window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityOpenOptions {
    /// URL the redirect should come back to. Defaults to the current page.
    pub return_url: Option<String>,
    /// Do not append the request to the activity URL.
    pub skip_request_in_url: bool,
    /// Disable messaging with the opened window; results arrive by redirect only.
    pub disable_remote_messaging: bool,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Window opened for a popup or redirect activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenedWindow {
    /// `None` when the activity proceeds as a redirect or the popup was
    /// not exposed to the caller.
    pub target_win: Option<WindowHandle>,
}

/// Resolves the mode requested by a window target.
///
/// `_top` requests a redirect, `_blank` and named targets request a popup.
/// Targets that would replace the host's own frame are rejected.
pub fn mode_for_target(target: &str) -> Result<ActivityMode> {
    match target {
        "_top" => Ok(ActivityMode::Redirect),
        "_self" | "_parent" | "" => Err(ActivityError::InvalidTarget(target.to_string())),
        _ => Ok(ActivityMode::Popup),
    }
}
