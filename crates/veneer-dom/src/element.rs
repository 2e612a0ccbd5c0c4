//! In-memory element tree.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::sanitizer::{decode_entities, html_escape, Sanitizer};

static OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<([a-zA-Z][a-zA-Z0-9-]*)((?:\s+[^\s=/>]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+))?)*)\s*(/?)>"#,
    )
    .expect("open tag pattern compiles")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s=/>]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+)))?"#)
        .expect("attribute pattern compiles")
});

fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    ATTRIBUTE
        .captures_iter(raw)
        .map(|caps| {
            let value = (2..=4).find_map(|i| caps.get(i)).map_or("", |m| m.as_str());
            (caps[1].to_string(), decode_entities(value))
        })
        .collect()
}

/// Tag and attribute names are limited to ASCII letters, digits, `-`, `_`,
/// `:` and `.`, which rules out anything that could close the tag early.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

/// Splits `markup` around an empty element whose `id` is `id`.
fn split_markup(markup: &str, id: &str) -> Option<(String, Element, String)> {
    for caps in OPEN_TAG.captures_iter(markup) {
        let attributes = parse_attributes(&caps[2]);
        if !attributes
            .iter()
            .any(|(key, value)| key.eq_ignore_ascii_case("id") && value == id)
        {
            continue;
        }

        let (start, end) = caps.get(0).map_or((0, 0), |m| (m.start(), m.end()));
        let tag = &caps[1];
        let rest = &markup[end..];
        let after = if &caps[3] == "/" {
            rest
        } else {
            let close = format!("</{tag}>");
            let trimmed = rest.trim_start();
            if !trimmed
                .get(..close.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(&close))
            {
                warn!(id, tag, "element in markup has content and cannot be lifted");
                return None;
            }
            &trimmed[close.len()..]
        };

        let element = Element {
            tag: tag.to_string(),
            attributes,
            children: Vec::new(),
        };
        return Some((markup[..start].to_string(), element, after.to_string()));
    }
    None
}

/// A node in an element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested element.
    Element(Element),
    /// Text content. Escaped when rendered.
    Text(String),
    /// Markup that already went through a sanitizer. Rendered verbatim.
    Markup(String),
}

/// A detached DOM element.
///
/// Route views render into an `Element` before it is mounted anywhere,
/// so nothing here touches a real document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Creates an empty element with the given tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets the `id` attribute.
    #[must_use]
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Sets the `class` attribute.
    #[must_use]
    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Sets an attribute.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Appends a text node.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.append_text(text);
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Returns the tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Gets an attribute value.
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Appends a child element and returns a handle to it.
    pub fn append_child(&mut self, child: Self) -> &mut Self {
        self.children.push(Node::Element(child));
        match self.children.last_mut() {
            Some(Node::Element(el)) => el,
            _ => unreachable!("an element was just pushed"),
        }
    }

    /// Appends a text node.
    pub fn append_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Replaces the content with sanitized markup.
    pub fn set_html(&mut self, markup: &str, sanitizer: &dyn Sanitizer) {
        self.children.clear();
        self.children.push(Node::Markup(sanitizer.sanitize(markup)));
    }

    /// Removes every child node.
    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Returns the child nodes.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Returns the direct child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Returns true if the element has no child nodes.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Finds a descendant by `id`, depth first. The element itself is not
    /// considered.
    pub fn find_by_id(&self, id: &str) -> Option<&Self> {
        self.child_elements().find_map(|child| {
            if child.get_attr("id") == Some(id) {
                Some(child)
            } else {
                child.find_by_id(id)
            }
        })
    }

    /// Mutable variant of [`Element::find_by_id`].
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Self> {
        for node in &mut self.children {
            if let Node::Element(child) = node {
                if child.get_attr("id") == Some(id) {
                    return Some(child);
                }
                if let Some(found) = child.find_by_id_mut(id) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Turns an empty element with the given `id` that sits inside a markup
    /// node into a real child element, so it can be found and filled.
    /// Returns true if one was lifted.
    ///
    /// ```
    /// use veneer_dom::{Element, MarkupSanitizer};
    ///
    /// let mut layout = Element::new("div");
    /// layout.set_html(r#"<h1>User</h1><div id="child"></div>"#, &MarkupSanitizer);
    /// assert!(layout.find_by_id("child").is_none());
    ///
    /// assert!(layout.lift_from_markup("child"));
    /// layout.find_by_id_mut("child").unwrap().append_text("posts");
    /// assert_eq!(layout.to_html(), r#"<div><h1>User</h1><div id="child">posts</div></div>"#);
    /// ```
    pub fn lift_from_markup(&mut self, id: &str) -> bool {
        for index in 0..self.children.len() {
            let split = match &self.children[index] {
                Node::Markup(markup) => split_markup(markup, id),
                Node::Element(_) | Node::Text(_) => None,
            };
            if let Some((before, element, after)) = split {
                let mut nodes = Vec::with_capacity(3);
                if !before.is_empty() {
                    nodes.push(Node::Markup(before));
                }
                nodes.push(Node::Element(element));
                if !after.is_empty() {
                    nodes.push(Node::Markup(after));
                }
                self.children.splice(index..=index, nodes);
                return true;
            }
        }

        self.children.iter_mut().any(|node| match node {
            Node::Element(el) => el.lift_from_markup(id),
            Node::Text(_) | Node::Markup(_) => false,
        })
    }

    /// Removes the first descendant with the given `id`. Returns it if found.
    pub fn remove_by_id(&mut self, id: &str) -> Option<Self> {
        let position = self
            .children
            .iter()
            .position(|node| matches!(node, Node::Element(el) if el.get_attr("id") == Some(id)));

        if let Some(index) = position {
            return match self.children.remove(index) {
                Node::Element(el) => Some(el),
                _ => None,
            };
        }

        self.children.iter_mut().find_map(|node| match node {
            Node::Element(el) => el.remove_by_id(id),
            _ => None,
        })
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Element(el) => el.collect_text(out),
                Node::Text(text) => out.push_str(text),
                Node::Markup(_) => {}
            }
        }
    }

    /// Renders the tree to an HTML string.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let tag = if is_valid_name(&self.tag) {
            self.tag.as_str()
        } else {
            warn!(tag = %self.tag, "invalid tag name rendered as div");
            "div"
        };

        out.push('<');
        out.push_str(tag);
        for (key, value) in &self.attributes {
            if !is_valid_name(key) {
                warn!(%key, "invalid attribute name skipped");
                continue;
            }
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&html_escape(value));
            out.push('"');
        }
        out.push('>');

        for node in &self.children {
            match node {
                Node::Element(el) => el.write_html(out),
                Node::Text(text) => out.push_str(&html_escape(text)),
                Node::Markup(markup) => out.push_str(markup),
            }
        }

        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MarkupSanitizer;

    fn page() -> Element {
        Element::new("main").with_child(
            Element::new("section")
                .class("content")
                .with_child(Element::new("div").id("child")),
        )
    }

    #[test]
    fn test_builder_and_render() {
        let el = Element::new("p").class("lead").text("a < b");
        assert_eq!(el.to_html(), r#"<p class="lead">a &lt; b</p>"#);
    }

    #[test]
    fn test_invalid_names_not_rendered() {
        let el = Element::new("div")
            .attr("x onmouseover=alert(1) y", "v")
            .attr("data-ok", "1")
            .text("t");
        assert_eq!(el.to_html(), r#"<div data-ok="1">t</div>"#);

        let el = Element::new("p><script").text("t");
        assert_eq!(el.to_html(), "<div>t</div>");
    }

    #[test]
    fn test_lift_outlet_from_markup() {
        let mut el = Element::new("div");
        el.set_html(
            r#"<h1>User</h1><section class="x" id='child'> </section><p>footer</p>"#,
            &MarkupSanitizer,
        );

        assert!(el.lift_from_markup("child"));
        let outlet = el.find_by_id("child").unwrap();
        assert_eq!(outlet.tag(), "section");
        assert_eq!(outlet.get_attr("class"), Some("x"));
        assert_eq!(
            el.to_html(),
            r#"<div><h1>User</h1><section class="x" id="child"></section><p>footer</p></div>"#
        );
        assert!(!el.lift_from_markup("missing"));
    }

    #[test]
    fn test_lift_skips_outlet_with_content() {
        let mut el = Element::new("div");
        el.set_html(r#"<div id="child"><b>x</b></div>"#, &MarkupSanitizer);
        assert!(!el.lift_from_markup("child"));
        assert!(el.find_by_id("child").is_none());
    }

    #[test]
    fn test_lift_in_nested_element() {
        let mut inner = Element::new("main");
        inner.set_html(r#"<div id="child"/>"#, &MarkupSanitizer);
        let mut el = Element::new("div").with_child(inner);

        assert!(el.lift_from_markup("child"));
        assert!(el.find_by_id_mut("child").is_some());
    }

    #[test]
    fn test_attribute_values_escaped() {
        let el = Element::new("a").attr("title", "\"quoted\"");
        assert_eq!(el.to_html(), r#"<a title="&quot;quoted&quot;"></a>"#);
    }

    #[test]
    fn test_set_attr_replaces() {
        let mut el = Element::new("div").id("a");
        el.set_attr("id", "b");
        assert_eq!(el.get_attr("id"), Some("b"));
        assert_eq!(el.to_html(), r#"<div id="b"></div>"#);
    }

    #[test]
    fn test_find_by_id_descends() {
        let mut el = page();
        assert_eq!(el.find_by_id("child").map(Element::tag), Some("div"));
        assert!(el.find_by_id("missing").is_none());

        let outlet = el.find_by_id_mut("child").unwrap();
        outlet.append_text("nested");
        assert_eq!(el.text_content(), "nested");
    }

    #[test]
    fn test_find_by_id_skips_self() {
        let el = Element::new("div").id("child");
        assert!(el.find_by_id("child").is_none());
    }

    #[test]
    fn test_remove_by_id() {
        let mut el = page();
        let removed = el.remove_by_id("child").unwrap();
        assert_eq!(removed.tag(), "div");
        assert!(el.find_by_id("child").is_none());
    }

    #[test]
    fn test_set_html_sanitizes_and_replaces() {
        let mut el = Element::new("div").text("old");
        el.set_html("<b onclick=\"x()\">new</b><script>bad()</script>", &MarkupSanitizer);
        assert_eq!(el.to_html(), "<div><b>new</b>bad()</div>");
        assert_eq!(el.children().len(), 1);
    }

    #[test]
    fn test_append_child_returns_handle() {
        let mut el = Element::new("div");
        el.append_child(Element::new("span")).append_text("hi");
        assert_eq!(el.to_html(), "<div><span>hi</span></div>");
        el.clear_children();
        assert!(el.is_empty());
    }
}
