//! HTML helper functions

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Only allow link targets with a safe scheme; anything else becomes `#`
pub fn safe_href(href: &str) -> String {
    let trimmed = href.trim();
    let lower = trimmed.to_ascii_lowercase();
    let allowed = ["http://", "https://", "mailto:", "tel:", "/", "#"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
        && !is_protocol_relative(&lower);

    if allowed {
        html_escape(trimmed)
    } else {
        "#".to_string()
    }
}

/// `//host` and `/\host` both leave the site once a browser normalizes them
fn is_protocol_relative(href: &str) -> bool {
    let mut chars = href.chars();
    chars.next() == Some('/') && matches!(chars.next(), Some('/') | Some('\\'))
}

/// Truncate a string to a specified length
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s
            .chars()
            .take(length.saturating_sub(omission.len()))
            .collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}
