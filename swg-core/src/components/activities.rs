//! Typed message channel over the activity transport
//!
//! [`ActivityPorts`] opens activities in iframes or separate windows and
//! decorates the transport ports with typed dispatch, analytics forwarding
//! and result verification.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use swg_activities::{
    ActivityHost, ActivityIframePort as TransportIframePort, ActivityPort as TransportWindowPort,
};
use tokio::sync::OnceCell;

use crate::error::{CoreError, CoreResult};
use crate::traits::{storage_keys, EventManager, Storage};
use crate::types::messages::{parse_response, request_envelope, AnalyticsRequest};
use crate::types::{
    ActivityMode, ActivityOpenOptions, ActivityResult, Args, ClientContext, ClientEvent,
    ElementHandle, EventOriginator, Message, MessageKind, OpenedWindow,
};
use crate::utils::activity_utils::{accept_result_data, ResultPolicy};
use crate::utils::lock;
use crate::utils::url::{add_query_param, has_query_param};

type Callback = Arc<dyn Fn(Value) + Send + Sync>;

/// Settles an accepted result: cancellations and failures become errors.
fn settle(result: swg_activities::Result<ActivityResult>) -> CoreResult<ActivityResult> {
    result
        .and_then(ActivityResult::into_outcome)
        .map_err(CoreError::from)
}

/// Channel to an activity running in an iframe.
pub struct ActivityIframePort {
    port: Arc<dyn TransportIframePort>,
    event_manager: Option<Arc<dyn EventManager>>,
    callbacks: Arc<Mutex<HashMap<MessageKind, Callback>>>,
    result: OnceCell<CoreResult<ActivityResult>>,
}

impl ActivityIframePort {
    pub fn new(
        port: Arc<dyn TransportIframePort>,
        event_manager: Option<Arc<dyn EventManager>>,
    ) -> Self {
        Self {
            port,
            event_manager,
            callbacks: Arc::new(Mutex::new(HashMap::new())),
            result: OnceCell::new(),
        }
    }

    /// Waits for the handshake and starts dispatching inbound messages.
    ///
    /// Responses are routed to the callback registered for their label;
    /// anything else is ignored.
    pub async fn connect(&self) -> CoreResult<()> {
        self.port.connect().await?;

        let callbacks = Arc::clone(&self.callbacks);
        self.port.on_message(Box::new(move |data| {
            let Some((kind, payload)) = parse_response(&data) else {
                return;
            };
            let callback = lock(&callbacks).get(&kind).cloned();
            if let Some(callback) = callback {
                callback(payload);
            }
        }));

        if let Some(event_manager) = self.event_manager.clone() {
            self.on(move |request: AnalyticsRequest| {
                let meta = request.meta.unwrap_or_default();
                event_manager.log_event(ClientEvent {
                    event_type: request.event,
                    event_originator: EventOriginator::SwgServer,
                    is_from_user_action: meta.is_from_user_action,
                    additional_parameters: request.params,
                    configuration_id: meta.configuration_id,
                });
            })?;
        }
        Ok(())
    }

    pub fn disconnect(&self) {
        self.port.disconnect();
    }

    pub fn mode(&self) -> ActivityMode {
        self.port.mode()
    }

    /// Resolves once the activity can be displayed.
    pub async fn when_ready(&self) -> CoreResult<()> {
        Ok(self.port.when_ready().await?)
    }

    /// The settled result of the activity.
    ///
    /// Cancellation and failure resolve to errors. The outcome is fetched
    /// once; later calls return the same outcome. The result is not verified:
    /// use [`accept_result_and_verify`](Self::accept_result_and_verify)
    /// before trusting its data.
    pub async fn accept_result(&self) -> CoreResult<ActivityResult> {
        self.result
            .get_or_init(|| async { settle(self.port.accept_result().await) })
            .await
            .clone()
    }

    /// Releases the result data only if the channel meets the given
    /// requirements, otherwise fails with [`CoreError::ChannelMismatch`].
    pub async fn accept_result_and_verify(
        &self,
        expected_origin: &str,
        require_origin_verified: bool,
        require_secure_channel: bool,
    ) -> CoreResult<Value> {
        let policy = ResultPolicy::new(
            expected_origin,
            require_origin_verified,
            require_secure_channel,
        );
        accept_result_data(self.accept_result().await, &policy)
    }

    /// Installs the resize handler. Call [`resized`](Self::resized) once the
    /// new height has been applied.
    pub fn on_resize_request<F>(&self, callback: F)
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.port.on_resize_request(Box::new(callback));
    }

    /// Sends a typed request. No acknowledgment is expected.
    pub fn execute<M: Message>(&self, request: &M) -> CoreResult<()> {
        self.port.message(request_envelope(request)?);
        Ok(())
    }

    /// Binds `callback` to responses of type `M`.
    ///
    /// Fails if `M` has no known label or a callback is already bound to it.
    pub fn on<M, F>(&self, callback: F) -> CoreResult<()>
    where
        M: Message,
        F: Fn(M) + Send + Sync + 'static,
    {
        let kind = M::kind().ok_or_else(|| CoreError::InvalidMessageType(M::LABEL.to_string()))?;
        match lock(&self.callbacks).entry(kind) {
            Entry::Occupied(_) => Err(CoreError::DuplicateCallback(M::LABEL.to_string())),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(move |payload| {
                    match serde_json::from_value::<M>(payload) {
                        Ok(message) => callback(message),
                        Err(e) => log::warn!("Dropping malformed {} message: {e}", M::LABEL),
                    }
                }));
                Ok(())
            }
        }
    }

    pub fn resized(&self) {
        self.port.resized();
    }
}

/// Port of an activity that ran in a popup or as a redirect.
pub struct ActivityWindowPort {
    port: Arc<dyn TransportWindowPort>,
    result: OnceCell<CoreResult<ActivityResult>>,
}

impl ActivityWindowPort {
    pub fn new(port: Arc<dyn TransportWindowPort>) -> Self {
        Self {
            port,
            result: OnceCell::new(),
        }
    }

    pub fn mode(&self) -> ActivityMode {
        self.port.mode()
    }

    /// Same contract as [`ActivityIframePort::accept_result`].
    pub async fn accept_result(&self) -> CoreResult<ActivityResult> {
        self.result
            .get_or_init(|| async { settle(self.port.accept_result().await) })
            .await
            .clone()
    }

    /// Same contract as [`ActivityIframePort::accept_result_and_verify`].
    pub async fn accept_result_and_verify(
        &self,
        expected_origin: &str,
        require_origin_verified: bool,
        require_secure_channel: bool,
    ) -> CoreResult<Value> {
        let policy = ResultPolicy::new(
            expected_origin,
            require_origin_verified,
            require_secure_channel,
        );
        accept_result_data(self.accept_result().await, &policy)
    }
}

/// Opens activities on behalf of the client flows.
pub struct ActivityPorts {
    host: Arc<dyn ActivityHost>,
    storage: Arc<dyn Storage>,
    client: ClientContext,
    event_manager: Option<Arc<dyn EventManager>>,
}

impl ActivityPorts {
    pub fn new(host: Arc<dyn ActivityHost>, storage: Arc<dyn Storage>, client: ClientContext) -> Self {
        Self {
            host,
            storage,
            client,
            event_manager: None,
        }
    }

    /// Forward analytics events raised inside iframes to `event_manager`.
    #[must_use]
    pub fn with_event_manager(mut self, event_manager: Arc<dyn EventManager>) -> Self {
        self.event_manager = Some(event_manager);
        self
    }

    pub fn client(&self) -> &ClientContext {
        &self.client
    }

    /// Adds client version, publication, product and analytics context.
    ///
    /// Keys already present in `args` win over the defaults.
    pub fn add_default_arguments(&self, args: Option<&Args>) -> Args {
        let page = &self.client.page;
        let mut merged = Args::new();
        merged.insert(
            "analyticsContext".to_string(),
            self.client.analytics_context.clone(),
        );
        if let Some(publication_id) = &page.publication_id {
            merged.insert("publicationId".to_string(), Value::from(publication_id.as_str()));
        }
        if let Some(product_id) = &page.product_id {
            merged.insert("productId".to_string(), Value::from(product_id.as_str()));
        }
        merged.insert(
            "_client".to_string(),
            Value::from(format!("SwG {}", self.client.runtime_version)),
        );
        merged.insert("supportsEventManager".to_string(), Value::Bool(true));

        if let Some(args) = args {
            merged.extend(args.iter().map(|(key, value)| (key.clone(), value.clone())));
        }
        merged
    }

    fn build_args(&self, args: Option<&Args>, add_default_arguments: bool) -> Args {
        if add_default_arguments {
            self.add_default_arguments(args)
        } else {
            args.cloned().unwrap_or_default()
        }
    }

    /// Starts an activity in `iframe` and waits for its handshake.
    ///
    /// The stored user token and the publication id are appended to `url`
    /// unless it already carries them.
    pub async fn open_iframe(
        &self,
        iframe: ElementHandle,
        url: &str,
        args: Option<&Args>,
        add_default_arguments: bool,
    ) -> CoreResult<Arc<ActivityIframePort>> {
        let args = self.build_args(args, add_default_arguments);

        let user_token = match self.storage.get(storage_keys::USER_TOKEN, true).await {
            Ok(token) => token,
            Err(e) => {
                log::warn!("Failed to read user token: {e}");
                None
            }
        };

        let mut url = url.to_string();
        if let Some(token) = user_token {
            if !has_query_param(&url, "sut")? {
                url = add_query_param(&url, "sut", &token)?;
            }
        }
        if let Some(publication_id) = &self.client.page.publication_id {
            if !has_query_param(&url, "publicationId")? {
                url = add_query_param(&url, "publicationId", publication_id)?;
            }
        }

        let port = Arc::new(ActivityIframePort::new(
            self.host.open_iframe_port(iframe, &url, &args),
            self.event_manager.clone(),
        ));
        port.connect().await?;
        Ok(port)
    }

    /// Starts an activity in a separate window.
    ///
    /// `_top` requests a redirect, `_blank` or a name requests a popup.
    /// `_self` and `_parent` are rejected. The result is delivered to the
    /// handler registered with [`on_result`](Self::on_result) for
    /// `request_id`, possibly after a page reload.
    pub fn open(
        &self,
        request_id: &str,
        url: &str,
        target: &str,
        args: Option<&Args>,
        options: Option<&ActivityOpenOptions>,
        add_default_arguments: bool,
    ) -> CoreResult<OpenedWindow> {
        swg_activities::mode_for_target(target)?;
        let args = self.build_args(args, add_default_arguments);
        let options = options.cloned().unwrap_or_default();
        Ok(self.host.open(request_id, url, target, &args, &options)?)
    }

    /// Registers the consumer of results for `request_id`.
    ///
    /// The consumer should verify the port with
    /// [`ActivityWindowPort::accept_result_and_verify`] before trusting it.
    pub fn on_result<F>(&self, request_id: &str, callback: F)
    where
        F: Fn(ActivityWindowPort) + Send + Sync + 'static,
    {
        self.host.on_result(
            request_id,
            Box::new(move |port| callback(ActivityWindowPort::new(port))),
        );
    }

    pub fn on_redirect_error<F>(&self, handler: F)
    where
        F: Fn(CoreError) + Send + Sync + 'static,
    {
        self.host
            .on_redirect_error(Box::new(move |e| handler(CoreError::from(e))));
    }
}
