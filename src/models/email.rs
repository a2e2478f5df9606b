use serde::{Deserialize, Serialize};

pub const DEFAULT_SUBJECT: &str = "No Subject";
pub const DEFAULT_PLAIN_TEXT_BODY: &str = "No plain text body";
pub const DEFAULT_HTML_BODY: &str = "No HTML body";

/// One message as it came off the wire, before any MIME parsing.
#[derive(Debug, Clone, Default)]
pub struct RawEmail {
    pub uid: Option<u32>,
    pub body: Option<Vec<u8>>,
}

#[cfg(test)]
impl RawEmail {
    pub fn new(uid: u32, body: impl Into<Vec<u8>>) -> Self {
        Self {
            uid: Some(uid),
            body: Some(body.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedEmail {
    pub uid: Option<u32>,
    pub subject: String,
    pub plain_text_body: String,
    pub html_body: String,
}
