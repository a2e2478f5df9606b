/// Android notification titles are cut off past this many characters.
pub const TITLE_CHAR_LIMIT: usize = 65;
/// iOS notification bodies are cut off past this many characters.
pub const BODY_CHAR_LIMIT: usize = 178;
pub const ELLIPSIS: &str = "...";

/// Bound a notification title to `TITLE_CHAR_LIMIT` characters plus an ellipsis.
pub fn truncate_title(title: &str) -> String {
    truncate_chars(title, TITLE_CHAR_LIMIT)
}

/// Bound a notification body to `BODY_CHAR_LIMIT` characters plus an ellipsis.
pub fn truncate_body(body: &str) -> String {
    truncate_chars(body, BODY_CHAR_LIMIT)
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}
