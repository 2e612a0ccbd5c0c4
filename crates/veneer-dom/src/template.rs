//! Markup templating with sanitized interpolation.

use crate::sanitizer::{MarkupSanitizer, Sanitizer};

/// Builds a markup string from trusted literals and untrusted values.
///
/// ```
/// use veneer_dom::Markup;
///
/// let name = "<script>x()</script>Ada";
/// let html = Markup::new().raw("<h1>").value(name).raw("</h1>").build();
/// assert_eq!(html, "<h1>x()Ada</h1>");
/// ```
pub struct Markup<'s> {
    sanitizer: &'s dyn Sanitizer,
    out: String,
}

impl Default for Markup<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Markup<'static> {
    /// Creates a builder that sanitizes values with [`MarkupSanitizer`].
    pub fn new() -> Self {
        Self::with_sanitizer(&MarkupSanitizer)
    }
}

impl<'s> Markup<'s> {
    /// Creates a builder using the given sanitizer for values.
    pub fn with_sanitizer(sanitizer: &'s dyn Sanitizer) -> Self {
        Self {
            sanitizer,
            out: String::new(),
        }
    }

    /// Appends an author-written literal. Only `'static` strings are
    /// accepted so runtime data has to go through [`Markup::value`].
    #[must_use]
    pub fn raw(mut self, literal: &'static str) -> Self {
        self.out.push_str(literal);
        self
    }

    /// Appends a sanitized value.
    #[must_use]
    pub fn value(mut self, value: &str) -> Self {
        self.out.push_str(&self.sanitizer.sanitize(value));
        self
    }

    /// Appends every item, sanitized, with nothing between them.
    #[must_use]
    pub fn values<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for item in items {
            self.out.push_str(&self.sanitizer.sanitize(item.as_ref()));
        }
        self
    }

    /// Returns the finished markup.
    pub fn build(self) -> String {
        self.out
    }
}

/// Sanitizes each fragment and joins them.
pub fn mapper<S: AsRef<str>>(items: &[S], sanitizer: &dyn Sanitizer) -> String {
    items
        .iter()
        .map(|item| sanitizer.sanitize(item.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EscapeSanitizer;

    #[test]
    fn test_values_are_sanitized() {
        let html = Markup::new()
            .raw("<a href=\"/u\">")
            .value("<img src=x onerror=alert(1)>")
            .raw("</a>")
            .build();
        assert_eq!(html, "<a href=\"/u\"><img src=x></a>");
    }

    #[test]
    fn test_custom_sanitizer() {
        let escape = EscapeSanitizer;
        let html = Markup::with_sanitizer(&escape)
            .raw("<li>")
            .value("<b>")
            .raw("</li>")
            .build();
        assert_eq!(html, "<li>&lt;b&gt;</li>");
    }

    #[test]
    fn test_values_joined() {
        let html = Markup::new().values(["<li>a</li>", "<li>b</li>"]).build();
        assert_eq!(html, "<li>a</li><li>b</li>");
    }

    #[test]
    fn test_mapper() {
        let items = vec!["<p>one</p>".to_string(), "<p onclick=x>two</p>".to_string()];
        assert_eq!(mapper(&items, &MarkupSanitizer), "<p>one</p><p>two</p>");
        assert_eq!(mapper::<&str>(&[], &MarkupSanitizer), "");
    }
}
