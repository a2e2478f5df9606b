use async_imap::{Client, Session};
use async_native_tls::{TlsConnector, TlsStream};
use async_trait::async_trait;
use futures::StreamExt;
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::config::ImapConfig;
use crate::error::RelayError;
use crate::models::email::RawEmail;

pub type ImapSession = Session<TlsStream<TcpStream>>;

/// Something that can open a mailbox session for one relay run.
#[async_trait]
pub trait MailSource: Send + Sync {
    type Session: MailSession;

    async fn open(&self) -> Result<Self::Session, RelayError>;
}

#[async_trait]
pub trait MailSession: Send {
    /// Fetch every unread message from `sender`. Fetching marks them seen.
    async fn fetch_unread_from(&mut self, sender: &str) -> Result<Vec<RawEmail>, RelayError>;

    /// Log out. Failures are logged, never returned.
    async fn close(&mut self);
}

#[derive(Clone)]
pub struct ImapMailbox {
    config: ImapConfig,
}

impl ImapMailbox {
    pub fn new(config: ImapConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MailSource for ImapMailbox {
    type Session = ImapMailSession;

    async fn open(&self) -> Result<ImapMailSession, RelayError> {
        let host = self.config.host.as_str();
        log::info!("Connecting to IMAP server {}:{}", host, self.config.port);

        let connection_failed = |reason: String| RelayError::Connection {
            host: host.to_string(),
            reason,
        };

        let tls_stream = with_timeout("IMAP connection", self.config.conn_timeout_ms, async {
            let tcp = TcpStream::connect((host, self.config.port))
                .await
                .map_err(|e| connection_failed(format!("TCP connection failed: {}", e)))?;

            TlsConnector::new()
                .danger_accept_invalid_certs(self.config.accept_invalid_certs)
                .connect(host, tcp)
                .await
                .map_err(|e| connection_failed(format!("TLS handshake failed: {}", e)))
        })
        .await?;

        let client = Client::new(tls_stream);
        let session = with_timeout("IMAP login", self.config.auth_timeout_ms, async {
            client
                .login(&self.config.username, &self.config.password)
                .await
                .map_err(|(e, _)| RelayError::Auth {
                    username: self.config.username.clone(),
                    reason: e.to_string(),
                })
        })
        .await?;

        Ok(ImapMailSession {
            session: Some(session),
            mailbox: self.config.mailbox.clone(),
        })
    }
}

pub struct ImapMailSession {
    session: Option<ImapSession>,
    mailbox: String,
}

#[async_trait]
impl MailSession for ImapMailSession {
    async fn fetch_unread_from(&mut self, sender: &str) -> Result<Vec<RawEmail>, RelayError> {
        let session = self.session.as_mut().ok_or_else(|| {
            RelayError::mailbox("SELECT")(async_imap::error::Error::ConnectionLost)
        })?;

        // Read-write SELECT so that fetching BODY[] sets \Seen.
        session
            .select(&self.mailbox)
            .await
            .map_err(RelayError::mailbox("SELECT"))?;

        let uids = session
            .uid_search(search_query(sender))
            .await
            .map_err(RelayError::mailbox("SEARCH"))?;

        if uids.is_empty() {
            return Ok(Vec::new());
        }

        let mut uids: Vec<u32> = uids.into_iter().collect();
        uids.sort_unstable();
        let uid_set = uids
            .iter()
            .map(|uid| uid.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let stream = session
            .uid_fetch(&uid_set, "(UID BODY[])")
            .await
            .map_err(RelayError::mailbox("FETCH"))?;
        futures::pin_mut!(stream);

        let mut messages = Vec::new();
        while let Some(result) = stream.next().await {
            match result {
                Ok(fetch) => messages.push(RawEmail {
                    uid: fetch.uid,
                    body: fetch.body().map(|body| body.to_vec()),
                }),
                Err(e) => log::error!("Unparseable FETCH response: {}", e),
            }
        }

        Ok(reconcile_fetched(&uids, messages))
    }

    async fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.logout().await {
                log::warn!("IMAP logout failed: {}", e);
            }
        }
    }
}

/// Every UID the search matched was flagged seen by the fetch, so one that
/// produced no readable response is kept as a body-less entry. The relay then
/// reports it as failed instead of losing it silently.
pub fn reconcile_fetched(requested: &[u32], mut fetched: Vec<RawEmail>) -> Vec<RawEmail> {
    let returned: HashSet<u32> = fetched.iter().filter_map(|message| message.uid).collect();

    for uid in requested.iter().filter(|uid| !returned.contains(uid)) {
        log::error!("Message {} was marked seen but could not be read", uid);
        fetched.push(RawEmail {
            uid: Some(*uid),
            body: None,
        });
    }

    fetched.sort_by_key(|message| message.uid);
    fetched
}

/// `UNSEEN FROM "<sender>"`, with the sender quoted as an IMAP string.
pub fn search_query(sender: &str) -> String {
    let escaped = sender.replace('\\', "\\\\").replace('"', "\\\"");
    format!("UNSEEN FROM \"{}\"", escaped)
}

async fn with_timeout<T, F>(stage: &'static str, millis: u64, future: F) -> Result<T, RelayError>
where
    F: Future<Output = Result<T, RelayError>>,
{
    tokio::time::timeout(Duration::from_millis(millis), future)
        .await
        .map_err(|_| RelayError::Timeout { stage, millis })?
}
