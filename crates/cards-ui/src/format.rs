//! Text helpers for card rendering.

use cards_types::card::truncate_chars;
use cards_types::timestamp::parse_timestamp;

/// Characters of plain text shown on a carousel card
pub const PREVIEW_CHARS: usize = 120;

/// Remove markup tags and decode the common entities.
pub fn strip_html_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

/// Plain-text prefix of `html`, with an ellipsis when it was cut.
pub fn preview(html: &str, max_chars: usize) -> String {
    let text = strip_html_tags(html);
    let cut = truncate_chars(&text, max_chars);
    if cut.len() < text.len() {
        format!("{}...", cut.trim_end())
    } else {
        text
    }
}

/// "Mar 5, 2024"; unreadable timestamps are shown as they are.
pub fn format_date(timestamp: &str) -> String {
    match parse_timestamp(timestamp) {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => timestamp.to_string(),
    }
}
