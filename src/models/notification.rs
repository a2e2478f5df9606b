use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::models::email::ParsedEmail;

/// Untruncated copy of an email, stored so the app can show the whole thing
/// once the user taps the (truncated) push notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FullNotification {
    pub title: String,
    pub plain_text_body: String,
    pub html_body: String,
    pub created_at: DateTime<Utc>,
}

impl FullNotification {
    pub fn new(title: String, plain_text_body: String, html_body: String) -> Self {
        Self {
            title,
            plain_text_body,
            html_body,
            created_at: Utc::now(),
        }
    }

    /// Record key: creation time in whole Unix seconds.
    pub fn notification_id(&self) -> String {
        self.created_at.timestamp().to_string()
    }
}

impl From<ParsedEmail> for FullNotification {
    fn from(email: ParsedEmail) -> Self {
        FullNotification::new(email.subject, email.plain_text_body, email.html_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_notification_id_is_whole_seconds() {
        let mut notification = FullNotification::new(
            "Hello".to_string(),
            "body".to_string(),
            "<p>body</p>".to_string(),
        );
        notification.created_at = Utc.timestamp_opt(1_700_000_000, 999_000_000).unwrap();

        assert_eq!(notification.notification_id(), "1700000000");
    }

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let notification = FullNotification::new(
            "Hello".to_string(),
            "plain".to_string(),
            "<b>html</b>".to_string(),
        );
        let json = serde_json::to_value(&notification).unwrap();

        assert_eq!(json["title"], "Hello");
        assert_eq!(json["plainTextBody"], "plain");
        assert_eq!(json["htmlBody"], "<b>html</b>");
        assert!(json.get("createdAt").is_some());
    }
}
