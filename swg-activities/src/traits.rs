use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ActivityError, Result};
use crate::types::{ActivityMode, ActivityOpenOptions, ActivityResult, Args, ElementHandle, OpenedWindow};

/// Receives raw payloads posted by the remote context.
pub type MessageHandler = Box<dyn Fn(Value) + Send + Sync>;

/// Receives height requests from the remote context.
pub type ResizeHandler = Box<dyn Fn(f64) + Send + Sync>;

/// Receives the port of a popup/redirect activity once its result is available.
pub type ResultHandler = Box<dyn Fn(Arc<dyn ActivityPort>) + Send + Sync>;

/// Receives errors raised while restoring a redirect result.
pub type RedirectErrorHandler = Box<dyn Fn(ActivityError) + Send + Sync>;

/// Port to an activity hosted in a separate window (popup or redirect).
#[async_trait]
pub trait ActivityPort: Send + Sync {
    fn mode(&self) -> ActivityMode;

    /// Resolves with the activity result once it has been delivered.
    ///
    /// The transport reports the code as-is; no channel verification happens here.
    async fn accept_result(&self) -> Result<ActivityResult>;
}

/// Port to an activity hosted in an iframe on the same page.
///
/// Transport implementations deliver messages in order, tag results with the
/// origin they observed and never invoke handlers after `disconnect`.
#[async_trait]
pub trait ActivityIframePort: Send + Sync {
    fn mode(&self) -> ActivityMode {
        ActivityMode::Iframe
    }

    /// Waits for the handshake with the remote context.
    async fn connect(&self) -> Result<()>;

    /// Drops the binding and all registered handlers.
    fn disconnect(&self);

    /// Resolves once the remote context reports it can be displayed.
    async fn when_ready(&self) -> Result<()>;

    /// Installs the handler for inbound payloads. Replaces any previous handler.
    fn on_message(&self, handler: MessageHandler);

    /// Posts a payload to the remote context.
    fn message(&self, payload: Value);

    async fn accept_result(&self) -> Result<ActivityResult>;

    /// Installs the handler for resize requests. The owner must call
    /// [`ActivityIframePort::resized`] once the new size has been applied.
    fn on_resize_request(&self, handler: ResizeHandler);

    fn resized(&self);
}

/// Entry point of the transport: opens iframe ports and windows.
pub trait ActivityHost: Send + Sync {
    /// Binds a port to `iframe`, navigating it to `url` with `args`.
    fn open_iframe_port(
        &self,
        iframe: ElementHandle,
        url: &str,
        args: &Args,
    ) -> Arc<dyn ActivityIframePort>;

    /// Opens `url` in a popup or as a redirect depending on `target`
    /// and on what the environment allows.
    fn open(
        &self,
        request_id: &str,
        url: &str,
        target: &str,
        args: &Args,
        options: &ActivityOpenOptions,
    ) -> Result<OpenedWindow>;

    /// Registers the consumer of results for `request_id`. Results may arrive
    /// after a full page reload when the activity ran as a redirect.
    fn on_result(&self, request_id: &str, handler: ResultHandler);

    fn on_redirect_error(&self, handler: RedirectErrorHandler);
}
