use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use anyhow::{Result, anyhow};
use std::sync::Arc;
use std::time::Duration;

use crate::config::PushConfig;
use crate::models::push::OutboundPushMessage;

#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Send one group of messages in a single request and return the
    /// gateway's JSON reply.
    async fn send_batch(&self, messages: &[OutboundPushMessage]) -> Result<Value>;
}

#[async_trait]
impl<T: PushGateway + ?Sized> PushGateway for Arc<T> {
    async fn send_batch(&self, messages: &[OutboundPushMessage]) -> Result<Value> {
        (**self).send_batch(messages).await
    }
}

#[derive(Clone)]
pub struct ExpoPushService {
    client: Client,
    config: PushConfig,
}

impl ExpoPushService {
    pub fn new(config: PushConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl PushGateway for ExpoPushService {
    async fn send_batch(&self, messages: &[OutboundPushMessage]) -> Result<Value> {
        log::info!("Sending {} push notifications to {}", messages.len(), self.config.endpoint);

        let mut request = self.client
            .post(&self.config.endpoint)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .json(messages);

        if let Some(access_token) = &self.config.access_token {
            request = request.header("Authorization", format!("Bearer {}", access_token));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow!("Push gateway returned {}: {}", status, error_text));
        }

        let push_response: Value = response.json().await?;
        log::info!("Push notifications sent: {}", push_response);

        Ok(push_response)
    }
}
