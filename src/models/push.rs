use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The push gateway accepts at most this many messages per request.
pub const MAX_PUSH_BATCH: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PushToken {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PushData {
    pub notification_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutboundPushMessage {
    pub to: String,
    pub sound: String,
    pub title: String,
    pub body: String,
    pub data: PushData,
}

impl OutboundPushMessage {
    pub fn new(to: &str, sound: &str, title: &str, body: &str, notification_id: &str) -> Self {
        Self {
            to: to.to_string(),
            sound: sound.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            data: PushData {
                notification_id: notification_id.to_string(),
            },
        }
    }
}

/// Result of sending one group of tokens to the gateway.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Sent { tokens: usize, response: Value },
    Failed { tokens: usize, reason: String },
}

impl BatchOutcome {
    pub fn tokens(&self) -> usize {
        match self {
            BatchOutcome::Sent { tokens, .. } | BatchOutcome::Failed { tokens, .. } => *tokens,
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, BatchOutcome::Sent { .. })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", content = "batches", rename_all = "snake_case")]
pub enum DispatchReport {
    NoTokens,
    Batches(Vec<BatchOutcome>),
}

impl DispatchReport {
    pub fn batches(&self) -> &[BatchOutcome] {
        match self {
            DispatchReport::NoTokens => &[],
            DispatchReport::Batches(batches) => batches,
        }
    }
}
