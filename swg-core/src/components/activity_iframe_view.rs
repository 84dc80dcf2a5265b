//! View backed by an activity iframe

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;

use super::{ActivityIframePort, ActivityPorts, Dialog, View, ViewId};
use crate::error::{CoreError, CoreResult};
use crate::traits::Document;
use crate::types::{ActivityResult, Args, ElementHandle, Message};

const IFRAME_ATTRIBUTES: &[(&str, &str)] = &[("frameborder", "0"), ("scrolling", "no")];

/// Display hints of an [`ActivityIframeView`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewOptions {
    pub should_fade_body: bool,
    pub has_loading_indicator: bool,
    pub should_animate_fade: bool,
}

/// Shows an activity in an iframe inside the dialog.
///
/// The channel opens when the dialog initializes the view. Every channel
/// operation waits until then, so flows may register callbacks right after
/// creating the view.
pub struct ActivityIframeView {
    id: ViewId,
    ports: Arc<ActivityPorts>,
    iframe: ElementHandle,
    src: String,
    args: Args,
    options: ViewOptions,
    port: watch::Sender<Option<Arc<ActivityIframePort>>>,
}

impl ActivityIframeView {
    pub fn new(
        doc: &dyn Document,
        ports: Arc<ActivityPorts>,
        src: impl Into<String>,
        args: Args,
        options: ViewOptions,
    ) -> Self {
        Self {
            id: ViewId::next(),
            ports,
            iframe: doc.create_element("iframe", IFRAME_ATTRIBUTES),
            src: src.into(),
            args,
            options,
            port: watch::Sender::new(None),
        }
    }

    /// The channel, once the view has been initialized.
    pub async fn port(&self) -> CoreResult<Arc<ActivityIframePort>> {
        let mut opened = self.port.subscribe();
        let port = opened
            .wait_for(Option::is_some)
            .await
            .map_err(|_| CoreError::NotOpened)?;
        port.clone().ok_or(CoreError::NotOpened)
    }

    pub async fn on<M, F>(&self, callback: F) -> CoreResult<()>
    where
        M: Message,
        F: Fn(M) + Send + Sync + 'static,
    {
        self.port().await?.on(callback)
    }

    pub async fn execute<M: Message>(&self, request: &M) -> CoreResult<()> {
        self.port().await?.execute(request)
    }

    pub async fn accept_result(&self) -> CoreResult<ActivityResult> {
        self.port().await?.accept_result().await
    }

    pub async fn accept_result_and_verify(
        &self,
        expected_origin: &str,
        require_origin_verified: bool,
        require_secure_channel: bool,
    ) -> CoreResult<Value> {
        self.port()
            .await?
            .accept_result_and_verify(
                expected_origin,
                require_origin_verified,
                require_secure_channel,
            )
            .await
    }

    /// Calls `callback` if the activity is canceled. The outcome is returned
    /// either way.
    pub async fn on_cancel<F>(&self, callback: F) -> CoreResult<()>
    where
        F: FnOnce() + Send,
    {
        match self.accept_result().await {
            Ok(_) => Ok(()),
            Err(e) => {
                if e.is_cancel() {
                    callback();
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl View for ActivityIframeView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn element(&self) -> ElementHandle {
        self.iframe
    }

    async fn init(&self, dialog: Arc<Dialog>) -> CoreResult<()> {
        let port = self
            .ports
            .open_iframe(self.iframe, &self.src, Some(&self.args), false)
            .await?;
        self.port.send_replace(Some(Arc::clone(&port)));

        let dialog = Arc::downgrade(&dialog);
        let id = self.id;
        port.on_resize_request(move |height| {
            let Some(dialog) = dialog.upgrade() else {
                return;
            };
            tokio::spawn(async move { dialog.resize_view(id, height, true).await });
        });

        port.when_ready().await
    }

    fn should_fade_body(&self) -> bool {
        self.options.should_fade_body
    }

    fn has_loading_indicator(&self) -> bool {
        self.options.has_loading_indicator
    }

    fn should_animate_fade(&self) -> bool {
        self.options.should_animate_fade
    }

    async fn when_complete(&self) -> CoreResult<()> {
        self.accept_result().await.map(|_| ())
    }

    fn resized(&self) {
        let port = self.port.borrow().clone();
        if let Some(port) = port {
            port.resized();
        }
    }
}
