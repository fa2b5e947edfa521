//! JSON wire contract for the gateway's text-send endpoint.

use serde::{Deserialize, Serialize};

/// Delivery group id the gateway assigns to accepted messages. Every other
/// group id is a rejection.
pub const ACCEPTED_GROUP_ID: i64 = 1;

/// Request body: `{from, to, content: {text}}`.
#[derive(Debug, Clone, Serialize)]
pub struct TextMessageRequest<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub content: TextContent<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextContent<'a> {
    pub text: &'a str,
}

/// Success response body: a list of per-message results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendResponse {
    #[serde(default)]
    pub messages: Vec<MessageResult>,
}

impl SendResponse {
    /// The result for the single message this client sends per request.
    pub fn into_first(self) -> Option<MessageResult> {
        self.messages.into_iter().next()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResult {
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub status: DeliveryGroupStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryGroupStatus {
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl MessageResult {
    pub fn accepted(&self) -> bool {
        self.status.group_id == Some(ACCEPTED_GROUP_ID)
    }
}
