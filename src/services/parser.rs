use anyhow::{Result, anyhow, Context};
use mailparse::{DispositionType, MailHeaderMap, ParsedMail};

use crate::models::email::{
    ParsedEmail, RawEmail, DEFAULT_HTML_BODY, DEFAULT_PLAIN_TEXT_BODY, DEFAULT_SUBJECT,
};

/// Parse a fetched message into subject, plain text and HTML, falling back
/// to placeholder text for anything the message does not carry.
pub fn parse_email(raw: &RawEmail) -> Result<ParsedEmail> {
    let bytes = raw
        .body
        .as_deref()
        .ok_or_else(|| anyhow!("Message {:?} has no body", raw.uid))?;

    let parsed = mailparse::parse_mail(bytes)
        .with_context(|| format!("Malformed message {:?}", raw.uid))?;

    let subject = parsed.headers.get_first_value("Subject");

    let mut text_parts = Vec::new();
    collect_parts(&parsed, "text/plain", &mut text_parts)?;
    let mut html_parts = Vec::new();
    collect_parts(&parsed, "text/html", &mut html_parts)?;

    let html_body = html_parts.into_iter().next();
    let plain_text_body = if text_parts.is_empty() {
        html_body.as_deref().map(nanohtml2text::html2text)
    } else {
        Some(text_parts.join("\n"))
    };

    Ok(ParsedEmail {
        uid: raw.uid,
        subject: or_default(subject, DEFAULT_SUBJECT),
        plain_text_body: or_default(plain_text_body, DEFAULT_PLAIN_TEXT_BODY),
        html_body: or_default(html_body, DEFAULT_HTML_BODY),
    })
}

/// Depth-first collection of every inline part with the given mime type.
fn collect_parts(part: &ParsedMail<'_>, mimetype: &str, found: &mut Vec<String>) -> Result<()> {
    if part.subparts.is_empty() {
        if part.ctype.mimetype.eq_ignore_ascii_case(mimetype) && !is_attachment(part) {
            let body = part
                .get_body()
                .with_context(|| format!("Failed to decode {} part", mimetype))?;
            found.push(body);
        }
        return Ok(());
    }

    for sub in &part.subparts {
        collect_parts(sub, mimetype, found)?;
    }
    Ok(())
}

fn is_attachment(part: &ParsedMail<'_>) -> bool {
    part.get_content_disposition().disposition == DispositionType::Attachment
}

fn or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTIPART: &str = "From: alerts@example.com\r\n\
Subject: Server down\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/alternative; boundary=\"XYZ\"\r\n\
\r\n\
--XYZ\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
The API is not responding.\r\n\
--XYZ\r\n\
Content-Type: text/html; charset=utf-8\r\n\
\r\n\
<p>The API is <b>not</b> responding.</p>\r\n\
--XYZ--\r\n";

    #[test]
    fn test_multipart_alternative() {
        let parsed = parse_email(&RawEmail::new(7, MULTIPART)).unwrap();

        assert_eq!(parsed.uid, Some(7));
        assert_eq!(parsed.subject, "Server down");
        assert_eq!(parsed.plain_text_body.trim_end(), "The API is not responding.");
        assert_eq!(parsed.html_body.trim_end(), "<p>The API is <b>not</b> responding.</p>");
    }

    #[test]
    fn test_plain_only_message_uses_defaults() {
        let raw = "From: alerts@example.com\r\n\
Content-Type: text/plain\r\n\
\r\n\
hello\r\n";
        let parsed = parse_email(&RawEmail::new(1, raw)).unwrap();

        assert_eq!(parsed.subject, DEFAULT_SUBJECT);
        assert_eq!(parsed.plain_text_body.trim_end(), "hello");
        assert_eq!(parsed.html_body, DEFAULT_HTML_BODY);
    }

    #[test]
    fn test_html_only_message_gets_text_from_html() {
        let raw = "Subject: Disk alert\r\n\
Content-Type: text/html\r\n\
\r\n\
<p>Disk <b>full</b> on db-1</p>\r\n";
        let parsed = parse_email(&RawEmail::new(2, raw)).unwrap();

        assert_eq!(parsed.subject, "Disk alert");
        assert_ne!(parsed.plain_text_body, DEFAULT_PLAIN_TEXT_BODY);
        assert!(parsed.plain_text_body.contains("Disk"));
        assert!(parsed.plain_text_body.contains("full"));
        assert!(parsed.plain_text_body.contains("on db-1"));
        assert!(!parsed.plain_text_body.contains("<p>"));
        assert_eq!(parsed.html_body.trim_end(), "<p>Disk <b>full</b> on db-1</p>");
    }

    #[test]
    fn test_no_text_parts_at_all_uses_both_defaults() {
        let raw = "Subject: Photo\r\n\
Content-Type: image/png\r\n\
\r\n\
abc\r\n";
        let parsed = parse_email(&RawEmail::new(6, raw)).unwrap();

        assert_eq!(parsed.plain_text_body, DEFAULT_PLAIN_TEXT_BODY);
        assert_eq!(parsed.html_body, DEFAULT_HTML_BODY);
    }

    #[test]
    fn test_inline_text_parts_are_joined() {
        let raw = "Subject: Digest\r\n\
Content-Type: multipart/mixed; boundary=\"M\"\r\n\
\r\n\
--M\r\n\
Content-Type: text/plain\r\n\
\r\n\
first\r\n\
--M\r\n\
Content-Type: text/plain\r\n\
\r\n\
second\r\n\
--M--\r\n";
        let parsed = parse_email(&RawEmail::new(8, raw)).unwrap();

        assert!(parsed.plain_text_body.contains("first"));
        assert!(parsed.plain_text_body.contains("second"));
        assert!(parsed.plain_text_body.find("first") < parsed.plain_text_body.find("second"));
    }

    #[test]
    fn test_whitespace_only_body_is_kept() {
        let raw = "Subject: Ping\r\nContent-Type: text/plain\r\n\r\n\r\n";
        let parsed = parse_email(&RawEmail::new(10, raw)).unwrap();

        assert_ne!(parsed.plain_text_body, DEFAULT_PLAIN_TEXT_BODY);
        assert!(parsed.plain_text_body.trim().is_empty());
    }

    #[test]
    fn test_empty_subject_falls_back() {
        let raw = "Subject: \r\nContent-Type: text/plain\r\n\r\nbody\r\n";
        let parsed = parse_email(&RawEmail::new(3, raw)).unwrap();
        assert_eq!(parsed.subject, DEFAULT_SUBJECT);
    }

    #[test]
    fn test_encoded_subject_is_decoded() {
        let raw = "Subject: =?UTF-8?B?Q2Fmw6kgb3BlbmluZw==?=\r\nContent-Type: text/plain\r\n\r\nx\r\n";
        let parsed = parse_email(&RawEmail::new(4, raw)).unwrap();
        assert_eq!(parsed.subject, "Café opening");
    }

    #[test]
    fn test_attachments_are_skipped() {
        let raw = "Subject: Report\r\n\
Content-Type: multipart/mixed; boundary=\"B\"\r\n\
\r\n\
--B\r\n\
Content-Type: text/plain\r\n\
Content-Disposition: attachment; filename=\"report.txt\"\r\n\
\r\n\
attached text\r\n\
--B\r\n\
Content-Type: text/html\r\n\
\r\n\
<p>see attachment</p>\r\n\
--B--\r\n";
        let parsed = parse_email(&RawEmail::new(5, raw)).unwrap();

        assert!(!parsed.plain_text_body.contains("attached text"));
        assert!(parsed.plain_text_body.contains("see attachment"));
        assert_eq!(parsed.html_body.trim_end(), "<p>see attachment</p>");
    }

    #[test]
    fn test_missing_body_is_an_error() {
        let raw = RawEmail { uid: Some(9), body: None };
        assert!(parse_email(&raw).is_err());
    }
}
