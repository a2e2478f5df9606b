use thiserror::Error;

/// Failures that abort a whole relay run. Anything that goes wrong with a
/// single message is logged and skipped instead of ending up here.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("could not connect to mail server {host}: {reason}")]
    Connection { host: String, reason: String },

    #[error("mail server rejected login for {username}: {reason}")]
    Auth { username: String, reason: String },

    #[error("{stage} timed out after {millis} ms")]
    Timeout { stage: &'static str, millis: u64 },

    #[error("{command} failed: {source}")]
    Mailbox {
        command: &'static str,
        #[source]
        source: async_imap::error::Error,
    },
}

impl RelayError {
    pub fn mailbox(command: &'static str) -> impl FnOnce(async_imap::error::Error) -> Self {
        move |source| RelayError::Mailbox { command, source }
    }
}
