//! Allowlist HTML sanitizer for admin-authored class text.
//!
//! Only the markup the class editor toolbar produces survives. Everything else
//! is either dropped (unknown tags, attributes) or escaped (text).

use html_escape::{decode_html_entities, encode_double_quoted_attribute, encode_text};

/// Tags kept verbatim (without attributes)
const ALLOWED_TAGS: &[&str] = &[
    "p", "h2", "h3", "strong", "em", "b", "i", "u", "ul", "ol", "li", "br", "a",
];

/// Elements removed together with everything inside them
const STRIPPED_ELEMENTS: &[&str] = &["script", "style", "iframe", "object"];

/// Void elements that are dropped without looking for a close tag
const DROPPED_VOID: &[&str] = &["embed"];

const SAFE_SCHEMES: &[&str] = &["http://", "https://", "mailto:"];

pub fn sanitize_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        push_text(&mut out, &rest[..open]);
        let after = &rest[open + 1..];
        if !after.starts_with(|c: char| c.is_ascii_alphabetic() || c == '/' || c == '!') {
            // A bare '<' in prose, not a tag
            out.push_str("&lt;");
            rest = after;
            continue;
        }
        let Some(close) = after.find('>') else {
            // Unterminated tag: treat the remainder as text
            push_text(&mut out, &rest[open..]);
            return out;
        };
        let tag = &after[..close];
        rest = &after[close + 1..];

        let (closing, name, attrs) = parse_tag(tag);
        if DROPPED_VOID.contains(&name.as_str()) {
            continue;
        }
        if !closing && STRIPPED_ELEMENTS.contains(&name.as_str()) {
            // Self-closed or unclosed: only the opening tag goes
            if !tag.trim_end().ends_with('/') {
                if let Some(after_close) = skip_element(rest, &name) {
                    rest = after_close;
                }
            }
            continue;
        }
        if !ALLOWED_TAGS.contains(&name.as_str()) {
            continue;
        }
        match (closing, name.as_str()) {
            (true, "br") => {}
            (true, _) => {
                out.push_str("</");
                out.push_str(&name);
                out.push('>');
            }
            (false, "a") => match attribute_value(attrs, "href").filter(|h| is_safe_href(h)) {
                Some(href) => {
                    out.push_str("<a href=\"");
                    out.push_str(&encode_double_quoted_attribute(&href));
                    out.push_str("\" rel=\"noopener noreferrer\">");
                }
                None => out.push_str("<a>"),
            },
            (false, _) => {
                out.push('<');
                out.push_str(&name);
                out.push('>');
            }
        }
    }
    push_text(&mut out, rest);
    out
}

fn push_text(out: &mut String, text: &str) {
    // Decode first so existing entities are not double-escaped
    let decoded = decode_html_entities(text);
    out.push_str(&encode_text(&decoded));
}

/// Split `/name attrs` into (is closing, lowercase name, attrs)
fn parse_tag(tag: &str) -> (bool, String, &str) {
    let tag = tag.trim();
    let (closing, body) = match tag.strip_prefix('/') {
        Some(body) => (true, body.trim_start()),
        None => (false, tag),
    };
    let name_len = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    let name = body[..name_len].to_ascii_lowercase();
    (closing, name, &body[name_len..])
}

/// Text after the matching close tag of a stripped element, if there is one
fn skip_element<'a>(rest: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("</{}", name);
    let lower = rest.to_ascii_lowercase();
    let start = lower.find(&needle)?;
    match rest[start..].find('>') {
        Some(end) => Some(&rest[start + end + 1..]),
        None => Some(""),
    }
}

fn attribute_value(attrs: &str, wanted: &str) -> Option<String> {
    let mut rest = attrs.trim_start_matches('/').trim();
    while !rest.is_empty() {
        let name_len = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let name = rest[..name_len].to_ascii_lowercase();
        rest = rest[name_len..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let (value, remaining) = match after_eq.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let inner = &after_eq[1..];
                    let end = inner.find(quote).unwrap_or(inner.len());
                    (&inner[..end], inner.get(end + 1..).unwrap_or(""))
                }
                _ => {
                    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                    (&after_eq[..end], &after_eq[end..])
                }
            };
            rest = remaining.trim_start();
            Some(value)
        } else {
            None
        };

        if name == wanted {
            return value.map(|v| decode_html_entities(v).trim().to_string());
        }
    }
    None
}

fn is_safe_href(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    SAFE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}
