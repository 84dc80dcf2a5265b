//! Client event type definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where an event was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventOriginator {
    SwgClient,
    SwgServer,
    AmpClient,
    PublisherClient,
}

/// Analytics event handed to the [`EventManager`](crate::traits::EventManager).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientEvent {
    pub event_type: Option<i32>,
    pub event_originator: EventOriginator,
    pub is_from_user_action: Option<bool>,
    pub additional_parameters: Option<Value>,
    pub configuration_id: Option<String>,
}
