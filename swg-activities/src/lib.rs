//! # swg-activities
//!
//! Contract for the low-level cross-context transport used by the client
//! runtime: iframe ports that exchange messages with an embedded activity, and
//! window ports for activities opened as a popup or a redirect.
//!
//! The crate only defines the surface. A host environment supplies the
//! implementation (for example a `postMessage` binding), and the core
//! library layers typed dispatch and result verification on top of it.
//!
//! ## Result delivery
//!
//! Every [`ActivityResult`] carries the origin the transport observed and
//! two trust flags (`origin_verified`, `secure_channel`). The transport never
//! decides whether a result is trustworthy; consumers apply their own policy.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ActivityError, Result};
pub use traits::{
    ActivityHost, ActivityIframePort, ActivityPort, MessageHandler, RedirectErrorHandler,
    ResizeHandler, ResultHandler,
};
pub use types::{
    mode_for_target, ActivityMode, ActivityOpenOptions, ActivityResult, ActivityResultCode, Args,
    ElementHandle, OpenedWindow, WindowHandle,
};
