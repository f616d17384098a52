//! Error extraction from server-rendered pages.
//!
//! Login and registration answer with a full HTML page. A failed attempt
//! re-renders the form with the message inside `.alert-danger span`.

/// Marker the server puts in a page that carries an error.
pub const ERROR_MARKER: &str = "errorMessage";

/// Whether a form-post response counts as success.
pub fn is_form_success(status_ok: bool, body: &str) -> bool {
    status_ok && !body.contains(ERROR_MARKER)
}

/// Text of the first `<span>` inside an element whose class list contains
/// `alert-danger`. Entities are decoded and whitespace collapsed.
pub fn extract_alert_danger(body: &str) -> Option<String> {
    let mut rest = body;
    while let Some(start) = rest.find('<') {
        rest = &rest[start + 1..];
        let tag_end = rest.find('>')?;
        let tag = &rest[..tag_end];
        rest = &rest[tag_end + 1..];

        if !has_class(tag, "alert-danger") {
            continue;
        }

        let span_open = rest.find("<span")?;
        let after_open = &rest[span_open..];
        let content_start = after_open.find('>')? + 1;
        let content = &after_open[content_start..];
        let content_end = content.find("</span>")?;

        let text = collapse_whitespace(&decode_entities(&strip_tags(&content[..content_end])));
        if !text.is_empty() {
            return Some(text);
        }
    }
    None
}

fn has_class(tag: &str, class: &str) -> bool {
    let lower = tag.to_ascii_lowercase();
    let Some(idx) = lower.find("class=") else {
        return false;
    };
    let value = &tag[idx + "class=".len()..];
    let quote = match value.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return false,
    };
    let value = &value[1..];
    let value = match value.find(quote) {
        Some(end) => &value[..end],
        None => value,
    };
    value.split_whitespace().any(|c| c == class)
}

fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
