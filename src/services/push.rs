use std::sync::Arc;
use anyhow::Result;

use crate::models::push::{BatchOutcome, DispatchReport, OutboundPushMessage, MAX_PUSH_BATCH};
use crate::services::{database::NotificationStore, expo::PushGateway};

/// Fans one notification out to every registered device.
pub struct PushDispatcher<S, G> {
    store: Arc<S>,
    gateway: G,
    sound: String,
}

impl<S: NotificationStore, G: PushGateway> PushDispatcher<S, G> {
    pub fn new(store: Arc<S>, gateway: G, sound: String) -> Self {
        Self { store, gateway, sound }
    }

    pub async fn dispatch(&self, title: &str, body: &str, notification_id: &str) -> Result<DispatchReport> {
        let tokens = self.store.list_tokens().await?;

        if tokens.is_empty() {
            log::info!("No push tokens available");
            return Ok(DispatchReport::NoTokens);
        }

        let mut outcomes = Vec::new();
        for (index, chunk) in tokens.chunks(MAX_PUSH_BATCH).enumerate() {
            let messages: Vec<OutboundPushMessage> = chunk
                .iter()
                .map(|token| OutboundPushMessage::new(token, &self.sound, title, body, notification_id))
                .collect();

            let outcome = match self.gateway.send_batch(&messages).await {
                Ok(response) => BatchOutcome::Sent {
                    tokens: messages.len(),
                    response,
                },
                Err(e) => {
                    log::error!("Error sending push notifications (batch {}): {:#}", index, e);
                    BatchOutcome::Failed {
                        tokens: messages.len(),
                        reason: format!("{:#}", e),
                    }
                }
            };
            outcomes.push(outcome);
        }

        Ok(DispatchReport::Batches(outcomes))
    }
}
