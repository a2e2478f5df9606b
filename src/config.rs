use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_EXPO_PUSH_URL: &str = "https://exp.host/--/api/v2/push/send";

pub const REQUIRED_VARS: &str = "IMAP_USERNAME, IMAP_PASSWORD, IMAP_SENDER_FILTER, API_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub imap: ImapConfig,
    pub push: PushConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImapConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub mailbox: String,
    pub sender_filter: String,
    pub auth_timeout_ms: u64,
    pub conn_timeout_ms: u64,
    pub accept_invalid_certs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    pub endpoint: String,
    pub sound: String,
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub port: u16,
    #[serde(skip_serializing)]
    pub api_token: String,
    /// Browser origin allowed through CORS. Unset means same-origin only.
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "memory://".to_string()),
                namespace: env::var("DATABASE_NAMESPACE")
                    .unwrap_or_else(|_| "mail_relay".to_string()),
                database: env::var("DATABASE_NAME")
                    .unwrap_or_else(|_| "main".to_string()),
                username: env::var("DATABASE_USERNAME").ok(),
                password: env::var("DATABASE_PASSWORD").ok(),
            },

            imap: ImapConfig {
                host: env::var("IMAP_HOST")
                    .unwrap_or_else(|_| "imap.gmail.com".to_string()),
                port: parse_or("IMAP_PORT", 993),
                username: env::var("IMAP_USERNAME")?,
                password: env::var("IMAP_PASSWORD")?,
                mailbox: env::var("IMAP_MAILBOX")
                    .unwrap_or_else(|_| "INBOX".to_string()),
                sender_filter: env::var("IMAP_SENDER_FILTER")?,
                auth_timeout_ms: parse_or("IMAP_AUTH_TIMEOUT_MS", 3_000),
                conn_timeout_ms: parse_or("IMAP_CONN_TIMEOUT_MS", 10_000),
                accept_invalid_certs: parse_or("IMAP_ACCEPT_INVALID_CERTS", false),
            },

            push: PushConfig {
                endpoint: env::var("PUSH_ENDPOINT")
                    .unwrap_or_else(|_| DEFAULT_EXPO_PUSH_URL.to_string()),
                sound: env::var("PUSH_SOUND")
                    .unwrap_or_else(|_| "default".to_string()),
                access_token: env::var("PUSH_ACCESS_TOKEN").ok(),
                timeout_secs: parse_or("PUSH_TIMEOUT_SECS", 30),
            },

            app: AppConfig {
                port: parse_or("PORT", 8080),
                api_token: env::var("API_TOKEN")?,
                cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                    .ok()
                    .filter(|origin| !origin.trim().is_empty()),
            },
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_EXPO_PUSH_URL.to_string(),
            sound: "default".to_string(),
            access_token: None,
            timeout_secs: 30,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "memory://".to_string(),
            namespace: "mail_relay".to_string(),
            database: "main".to_string(),
            username: None,
            password: None,
        }
    }
}
