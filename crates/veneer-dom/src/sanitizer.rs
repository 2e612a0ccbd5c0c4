//! String sanitizers.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::trace;

/// Strips unsafe content from a string before it reaches the DOM.
///
/// Implementations must be total. Running an already-safe value through
/// a sanitizer should leave it unchanged.
pub trait Sanitizer {
    /// Returns the safe form of `raw`.
    fn sanitize(&self, raw: &str) -> String;
}

impl<F> Sanitizer for F
where
    F: Fn(&str) -> String,
{
    fn sanitize(&self, raw: &str) -> String {
        self(raw)
    }
}

static DANGEROUS_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*/?\s*(script|iframe|object|embed|link|meta|style|base|frame|frameset)\b[^>]*>?")
        .expect("tag pattern compiles")
});

// `/` separates attributes as well as whitespace: `<img/onerror=..>`.
static EVENT_ATTRS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)[\s/]+on[a-z]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]*)"#)
        .expect("event attribute pattern compiles")
});

static URL_ATTRS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)[\s/]+(?:href|src|action|formaction|xlink:href)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#,
    )
    .expect("url attribute pattern compiles")
});

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)&#x([0-9a-f]+);?|&#([0-9]+);?|&(colon|tab|newline|lpar|rpar|sol|amp|quot|apos|lt|gt);")
        .expect("entity pattern compiles")
});

/// Decodes numeric and the common named character references.
pub(crate) fn decode_entities(raw: &str) -> String {
    ENTITY
        .replace_all(raw, |caps: &Captures<'_>| {
            let code = if let Some(hex) = caps.get(1) {
                u32::from_str_radix(hex.as_str(), 16).ok()
            } else if let Some(dec) = caps.get(2) {
                dec.as_str().parse().ok()
            } else {
                None
            };
            if let Some(code) = code {
                return char::from_u32(code).unwrap_or('\u{fffd}').to_string();
            }
            let named = caps.get(3).map_or("", |m| m.as_str()).to_ascii_lowercase();
            let decoded = match named.as_str() {
                "colon" => ":",
                "tab" => "\t",
                "newline" => "\n",
                "lpar" => "(",
                "rpar" => ")",
                "sol" => "/",
                "amp" => "&",
                "quot" => "\"",
                "apos" => "'",
                "lt" => "<",
                _ => ">",
            };
            decoded.to_string()
        })
        .into_owned()
}

/// True if a URL attribute value runs script once the browser decodes it.
fn is_script_url(value: &str) -> bool {
    let decoded: String = decode_entities(value)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .flat_map(char::to_lowercase)
        .collect();
    ["javascript:", "vbscript:", "data:text/html"]
        .iter()
        .any(|scheme| decoded.starts_with(scheme))
}

fn strip_once(raw: &str) -> String {
    let stripped = DANGEROUS_TAGS.replace_all(raw, "");
    let stripped = EVENT_ATTRS.replace_all(&stripped, "");
    URL_ATTRS
        .replace_all(&stripped, |caps: &Captures<'_>| {
            let value = (1..=3)
                .find_map(|i| caps.get(i))
                .map_or("", |m| m.as_str());
            if is_script_url(value) {
                String::new()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Removes executable markup while keeping harmless tags.
///
/// Drops `script`, `iframe`, `object`, `embed`, `link`, `meta`, `style`,
/// `base` and frame tags, inline event handler attributes, and URL
/// attributes whose value decodes to a `javascript:`, `vbscript:` or
/// `data:text/html` URL. Passes repeat until nothing changes, so pieces
/// that join into a tag once another is removed are caught too, and
/// sanitizing the output again leaves it unchanged. Text without markup
/// passes through as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupSanitizer;

impl Sanitizer for MarkupSanitizer {
    fn sanitize(&self, raw: &str) -> String {
        let mut current = raw.to_string();
        // Every pass that changes something makes the string shorter.
        loop {
            let next = strip_once(&current);
            if next == current {
                break;
            }
            current = next;
        }

        if current.len() != raw.len() {
            trace!(removed = raw.len() - current.len(), "sanitizer stripped markup");
        }
        current
    }
}

/// Treats every value as text by escaping HTML special characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapeSanitizer;

impl Sanitizer for EscapeSanitizer {
    fn sanitize(&self, raw: &str) -> String {
        html_escape(raw)
    }
}

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
