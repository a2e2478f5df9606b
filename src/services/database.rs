use async_trait::async_trait;
use surrealdb::{Surreal, engine::any::{self, Any}, opt::auth::Root};
use anyhow::{Result, Context};

use crate::config::DatabaseConfig;
use crate::models::{notification::FullNotification, push::PushToken};

pub const FULL_NOTIFICATIONS: &str = "full_notifications";
pub const PUSH_TOKENS: &str = "push_tokens";

#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist the untruncated notification and return its id.
    async fn save_full(&self, notification: &FullNotification) -> Result<String>;

    /// Every registered device token. An empty list is not an error.
    async fn list_tokens(&self) -> Result<Vec<String>>;

    async fn get_full(&self, notification_id: &str) -> Result<Option<FullNotification>>;
}

#[derive(Clone)]
pub struct DatabaseService {
    db: Surreal<Any>,
}

impl DatabaseService {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        // surrealdb spells the in-process engine "mem://"
        let endpoint = match config.url.strip_prefix("memory://") {
            Some(_) => "mem://".to_string(),
            None => config.url.clone(),
        };

        let db = any::connect(endpoint.as_str())
            .await
            .with_context(|| format!("Failed to connect to database at {}", config.url))?;

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            db.signin(Root {
                username: username.as_str(),
                password: password.as_str(),
            })
            .await
            .context("Database sign-in failed")?;
        }

        db.use_ns(config.namespace.as_str())
            .use_db(config.database.as_str())
            .await?;

        log::info!("Connected to notification store at {}", config.url);
        Ok(Self { db })
    }

    pub async fn health_check(&self) -> Result<()> {
        self.db.health().await?;
        Ok(())
    }
}

#[async_trait]
impl NotificationStore for DatabaseService {
    async fn save_full(&self, notification: &FullNotification) -> Result<String> {
        let notification_id = notification.notification_id();

        // UPDATE on a record id creates it when missing, so a second email in
        // the same second simply overwrites the first one.
        let _saved: Option<FullNotification> = self.db
            .update((FULL_NOTIFICATIONS, notification_id.as_str()))
            .content(notification)
            .await
            .with_context(|| format!("Failed to save notification {}", notification_id))?;

        log::info!("Saved full notification {}", notification_id);
        Ok(notification_id)
    }

    async fn list_tokens(&self) -> Result<Vec<String>> {
        let records: Vec<PushToken> = self.db
            .select(PUSH_TOKENS)
            .await
            .context("Failed to read push tokens")?;

        log::info!("Push tokens retrieved: {}", records.len());

        Ok(records
            .into_iter()
            .map(|record| record.token)
            .filter(|token| !token.is_empty())
            .collect())
    }

    async fn get_full(&self, notification_id: &str) -> Result<Option<FullNotification>> {
        let notification: Option<FullNotification> = self.db
            .select((FULL_NOTIFICATIONS, notification_id))
            .await?;
        Ok(notification)
    }
}
