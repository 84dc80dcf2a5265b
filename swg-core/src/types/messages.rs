//! Typed messages exchanged with activity iframes
//!
//! Every message travels as a label-first array: `[label, payload]`.
//! Requests are wrapped as `{"REQUEST": [...]}`, responses arrive as
//! `{"RESPONSE": [...]}`. The label selects the [`MessageKind`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{CoreError, CoreResult};

/// Registry of message labels understood by the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    AccountCreationRequest,
    ActionRequest,
    AlreadySubscribedResponse,
    AnalyticsRequest,
    CompleteAudienceActionResponse,
    EntitlementsRequest,
    EntitlementsResponse,
    FinishedLoggingResponse,
    LinkSaveTokenRequest,
    LinkingInfoResponse,
    OpenDialogRequest,
    SkuSelectedResponse,
    SmartBoxMessage,
    SubscribeResponse,
    ToastCloseRequest,
    ViewSubscriptionsResponse,
}

impl MessageKind {
    pub const ALL: [Self; 16] = [
        Self::AccountCreationRequest,
        Self::ActionRequest,
        Self::AlreadySubscribedResponse,
        Self::AnalyticsRequest,
        Self::CompleteAudienceActionResponse,
        Self::EntitlementsRequest,
        Self::EntitlementsResponse,
        Self::FinishedLoggingResponse,
        Self::LinkSaveTokenRequest,
        Self::LinkingInfoResponse,
        Self::OpenDialogRequest,
        Self::SkuSelectedResponse,
        Self::SmartBoxMessage,
        Self::SubscribeResponse,
        Self::ToastCloseRequest,
        Self::ViewSubscriptionsResponse,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::AccountCreationRequest => "AccountCreationRequest",
            Self::ActionRequest => "ActionRequest",
            Self::AlreadySubscribedResponse => "AlreadySubscribedResponse",
            Self::AnalyticsRequest => "AnalyticsRequest",
            Self::CompleteAudienceActionResponse => "CompleteAudienceActionResponse",
            Self::EntitlementsRequest => "EntitlementsRequest",
            Self::EntitlementsResponse => "EntitlementsResponse",
            Self::FinishedLoggingResponse => "FinishedLoggingResponse",
            Self::LinkSaveTokenRequest => "LinkSaveTokenRequest",
            Self::LinkingInfoResponse => "LinkingInfoResponse",
            Self::OpenDialogRequest => "OpenDialogRequest",
            Self::SkuSelectedResponse => "SkuSelectedResponse",
            Self::SmartBoxMessage => "SmartBoxMessage",
            Self::SubscribeResponse => "SubscribeResponse",
            Self::ToastCloseRequest => "ToastCloseRequest",
            Self::ViewSubscriptionsResponse => "ViewSubscriptionsResponse",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

/// A typed message that can be sent to or received from an activity.
pub trait Message: Serialize + DeserializeOwned + Send + 'static {
    /// Wire label. Must match a [`MessageKind`] to be dispatchable.
    const LABEL: &'static str;

    fn kind() -> Option<MessageKind> {
        MessageKind::from_label(Self::LABEL)
    }
}

/// Wrap a message into the outbound `REQUEST` envelope.
pub fn request_envelope<M: Message>(message: &M) -> CoreResult<Value> {
    let payload = serde_json::to_value(message)
        .map_err(|e| CoreError::SerializationError(format!("{}: {e}", M::LABEL)))?;
    Ok(json!({ "REQUEST": [M::LABEL, payload] }))
}

/// Split an inbound `RESPONSE` envelope into its kind and payload.
///
/// Returns `None` for anything that is not a response with a known label.
pub fn parse_response(data: &Value) -> Option<(MessageKind, Value)> {
    let response = data.get("RESPONSE")?.as_array()?;
    let kind = MessageKind::from_label(response.first()?.as_str()?)?;
    let payload = response.get(1).cloned().unwrap_or(Value::Null);
    Some((kind, payload))
}

/// Event metadata attached to an [`AnalyticsRequest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsEventMeta {
    pub event_originator: Option<i32>,
    pub is_from_user_action: Option<bool>,
    pub configuration_id: Option<String>,
}

/// Analytics event raised inside an activity iframe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsRequest {
    pub context: Option<Value>,
    pub event: Option<i32>,
    pub meta: Option<AnalyticsEventMeta>,
    pub params: Option<Value>,
}

impl Message for AnalyticsRequest {
    const LABEL: &'static str = "AnalyticsRequest";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntitlementsRequest {
    pub used_entitlement: Option<String>,
    pub client_event_time: Option<i64>,
}

impl Message for EntitlementsRequest {
    const LABEL: &'static str = "EntitlementsRequest";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntitlementsResponse {
    pub jwt: Option<String>,
    pub swg_user_token: Option<String>,
}

impl Message for EntitlementsResponse {
    const LABEL: &'static str = "EntitlementsResponse";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkuSelectedResponse {
    pub sku: Option<String>,
    pub old_sku: Option<String>,
    pub one_time: Option<bool>,
    pub player_type: Option<i32>,
}

impl Message for SkuSelectedResponse {
    const LABEL: &'static str = "SkuSelectedResponse";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlreadySubscribedResponse {
    pub subscriber_or_member: Option<bool>,
    pub link_requested: Option<bool>,
}

impl Message for AlreadySubscribedResponse {
    const LABEL: &'static str = "AlreadySubscribedResponse";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewSubscriptionsResponse {
    pub native: Option<bool>,
}

impl Message for ViewSubscriptionsResponse {
    const LABEL: &'static str = "ViewSubscriptionsResponse";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkingInfoResponse {
    pub requested: Option<bool>,
}

impl Message for LinkingInfoResponse {
    const LABEL: &'static str = "LinkingInfoResponse";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToastCloseRequest {
    pub close: Option<bool>,
}

impl Message for ToastCloseRequest {
    const LABEL: &'static str = "ToastCloseRequest";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenDialogRequest {
    pub url_path: Option<String>,
    pub is_closable: Option<bool>,
}

impl Message for OpenDialogRequest {
    const LABEL: &'static str = "OpenDialogRequest";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompleteAudienceActionResponse {
    pub swg_user_token: Option<String>,
    pub action_completed: Option<bool>,
    pub user_email: Option<String>,
    pub already_completed: Option<bool>,
}

impl Message for CompleteAudienceActionResponse {
    const LABEL: &'static str = "CompleteAudienceActionResponse";
}
