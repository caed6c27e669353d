//! Snippet field helpers.
//!
//! Expanded snippets carry tab-stop fields in `${n}` / `${n:placeholder}`
//! form. The engine needs to strip them for previews and no-op comparisons,
//! and to find the first field for caret placement on insertion.

/// Remove field markers from a snippet, keeping placeholder text.
///
/// `"<a href=\"${1}\">${2:label}</a>"` becomes `"<a href=\"\">label</a>"`.
pub fn strip_fields(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < text.len() {
        if text[i..].starts_with("${") {
            if let Some((consumed, placeholder)) = parse_field(&text[i..]) {
                out.push_str(placeholder);
                i += consumed;
                continue;
            }
        }
        let ch = text[i..].chars().next().expect("in-bounds index");
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}

/// Char offset, within the stripped text, where the first field begins.
///
/// This is where the caret goes after a snippet is inserted as plain text.
pub fn first_field_offset(text: &str) -> Option<usize> {
    let mut chars_seen = 0usize;
    let mut i = 0;
    while i < text.len() {
        if text[i..].starts_with("${") && parse_field(&text[i..]).is_some() {
            return Some(chars_seen);
        }
        let ch = text[i..].chars().next().expect("in-bounds index");
        chars_seen += 1;
        i += ch.len_utf8();
    }
    None
}

/// Parse a leading `${n}` / `${n:placeholder}`.
/// Returns the byte length consumed and the placeholder text.
fn parse_field(s: &str) -> Option<(usize, &str)> {
    let rest = s.strip_prefix("${")?;
    let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if digits == 0 {
        return None;
    }
    let after = &rest[digits..];
    if let Some(placeholder_rest) = after.strip_prefix(':') {
        let close = placeholder_rest.find('}')?;
        Some((2 + digits + 1 + close + 1, &placeholder_rest[..close]))
    } else if after.starts_with('}') {
        Some((2 + digits + 1, ""))
    } else {
        None
    }
}
