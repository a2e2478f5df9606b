use std::sync::Arc;
use anyhow::{Result, Context};

use crate::error::RelayError;
use crate::models::{
    email::RawEmail,
    notification::FullNotification,
    relay::{ProcessedEmail, RunOutcome, RunReport},
};
use crate::services::{
    database::{DatabaseService, NotificationStore},
    expo::{ExpoPushService, PushGateway},
    mailbox::{ImapMailbox, MailSession, MailSource},
    parser::parse_email,
    push::PushDispatcher,
};
use crate::utils::truncate::{truncate_body, truncate_title};

pub type AppRelay = MailRelay<ImapMailbox, DatabaseService, ExpoPushService>;

/// One pass of the email → store → push pipeline.
pub struct MailRelay<M, S, G> {
    mailbox: M,
    store: Arc<S>,
    dispatcher: PushDispatcher<S, G>,
    sender_filter: String,
}

impl<M, S, G> MailRelay<M, S, G>
where
    M: MailSource,
    S: NotificationStore,
    G: PushGateway,
{
    pub fn new(mailbox: M, store: Arc<S>, dispatcher: PushDispatcher<S, G>, sender_filter: String) -> Self {
        Self {
            mailbox,
            store,
            dispatcher,
            sender_filter,
        }
    }

    /// Connection, login and search failures abort the run. Anything that
    /// goes wrong with a single message is logged and that message skipped.
    pub async fn run(&self) -> Result<RunOutcome, RelayError> {
        let mut session = self.mailbox.open().await.map_err(|e| {
            log::error!("Error connecting to IMAP: {}", e);
            e
        })?;

        let fetched = session.fetch_unread_from(&self.sender_filter).await;
        session.close().await;

        let messages = fetched.map_err(|e| {
            log::error!("Error searching emails: {}", e);
            e
        })?;

        if messages.is_empty() {
            log::info!("No new emails found.");
            return Ok(RunOutcome::NoNewEmails);
        }

        log::info!("Found {} new emails.", messages.len());

        let mut report = RunReport::default();
        for message in &messages {
            match self.process(message).await {
                Ok(processed) => report.processed.push(processed),
                Err(e) => {
                    log::error!("Error processing email {:?}: {:#}", message.uid, e);
                    report.failed += 1;
                }
            }
        }

        log::info!(
            "Relay run finished: {} processed, {} failed",
            report.processed.len(),
            report.failed
        );
        Ok(RunOutcome::Processed(report))
    }

    async fn process(&self, message: &RawEmail) -> Result<ProcessedEmail> {
        let parsed = parse_email(message)?;

        log::info!("Parsed subject: {}", parsed.subject);
        log::debug!("Parsed plain text: {}", parsed.plain_text_body);
        log::debug!("Parsed HTML: {}", parsed.html_body);

        let notification = FullNotification::from(parsed);
        let notification_id = self.store.save_full(&notification).await?;

        let title = truncate_title(&notification.title);
        let body = truncate_body(&notification.plain_text_body);

        let dispatch = self.dispatcher
            .dispatch(&title, &body, &notification_id)
            .await
            .with_context(|| format!("Push dispatch for notification {} failed", notification_id))?;

        let batches = dispatch.batches();
        if !batches.is_empty() {
            let delivered: usize = batches.iter().filter(|b| b.is_sent()).map(|b| b.tokens()).sum();
            log::info!(
                "Notification {}: {} of {} batches sent ({} devices)",
                notification_id,
                batches.iter().filter(|b| b.is_sent()).count(),
                batches.len(),
                delivered
            );
        }

        Ok(ProcessedEmail {
            uid: message.uid,
            notification_id,
            dispatch,
        })
    }
}
