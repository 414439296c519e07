//! Minimal owned DOM tree.
//!
//! Rendering builds a fresh tree every time; the tree serialises to HTML for
//! the host and can be queried by tests without a browser.

use std::fmt;

/// A node in the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

/// An element with ordered attributes, inline style declarations and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    style: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            style: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Add an inline style declaration.
    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.push((property.into(), value.into()));
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Replace all children.
    pub fn replace_children(&mut self, nodes: Vec<Node>) {
        self.children = nodes;
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(n, _)| n != name);
    }

    pub fn get_style(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Depth-first search for the element with the given `id`, self included.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.get_attr("id") == Some(id) {
            return Some(self);
        }
        self.child_elements().find_map(|e| e.find_by_id(id))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.get_attr("id") == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(e) => e.find_by_id_mut(id),
            Node::Text(_) => None,
        })
    }

    /// All descendant elements (self included) matching `pred`, in document order.
    pub fn find_all(&self, pred: impl Fn(&Element) -> bool + Copy) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_matching(pred, &mut out);
        out
    }

    fn collect_matching<'a>(&'a self, pred: impl Fn(&Element) -> bool + Copy, out: &mut Vec<&'a Element>) {
        if pred(self) {
            out.push(self);
        }
        for child in self.child_elements() {
            child.collect_matching(pred, out);
        }
    }

    fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Serialise to compact HTML.
    pub fn to_html(&self) -> String {
        self.to_string()
    }

    /// Serialise to indented HTML, one node per line.
    pub fn to_pretty_html(&self) -> String {
        Pretty(self).to_string()
    }

    fn write_open_tag(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attrs {
            write!(f, " {}=\"{}\"", name, escape(value))?;
        }
        if !self.style.is_empty() {
            let declarations = self
                .style
                .iter()
                .map(|(p, v)| format!("{}: {}", p, v))
                .collect::<Vec<_>>()
                .join("; ");
            write!(f, " style=\"{}\"", escape(&declarations))?;
        }
        f.write_str(">")
    }

    fn write_pretty(&self, indent: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_indent(indent, f)?;
        self.write_open_tag(f)?;
        writeln!(f)?;
        for child in &self.children {
            match child {
                Node::Text(text) => {
                    write_indent(indent + 1, f)?;
                    writeln!(f, "{}", escape(text))?;
                }
                Node::Element(element) => element.write_pretty(indent + 1, f)?,
            }
        }
        write_indent(indent, f)?;
        writeln!(f, "</{}>", self.tag)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_open_tag(f)?;
        for child in &self.children {
            match child {
                Node::Text(text) => f.write_str(&escape(text))?,
                Node::Element(element) => fmt::Display::fmt(element, f)?,
            }
        }
        write!(f, "</{}>", self.tag)
    }
}

/// Indented rendering of an element.
struct Pretty<'a>(&'a Element);

impl fmt::Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.write_pretty(0, f)
    }
}

fn write_indent(indent: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for _ in 0..indent {
        f.write_str("  ")?;
    }
    Ok(())
}

/// Escape text for use in element content or a double-quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Kind of DOM event a listener is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Change,
}

/// A user gesture delivered by the host, addressed by element id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Click { target: String },
    Change { target: String, checked: bool },
}

impl UiEvent {
    pub fn click(target: impl Into<String>) -> Self {
        UiEvent::Click {
            target: target.into(),
        }
    }

    pub fn change(target: impl Into<String>, checked: bool) -> Self {
        UiEvent::Change {
            target: target.into(),
            checked,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            UiEvent::Click { target } | UiEvent::Change { target, .. } => target,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            UiEvent::Click { .. } => EventKind::Click,
            UiEvent::Change { .. } => EventKind::Change,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("div")
            .id("root")
            .style("display", "flex")
            .child(Element::new("span").class("label big").child("Kitchen & Hall"))
            .child(Element::new("ha-switch").id("toggle-0").attr("checked", "true"))
    }

    #[test]
    fn test_to_html() {
        insta::assert_snapshot!(sample().to_html(), @r#"<div id="root" style="display: flex"><span class="label big">Kitchen &amp; Hall</span><ha-switch id="toggle-0" checked="true"></ha-switch></div>"#);
        assert_eq!(format!("{}", sample()), sample().to_html());
    }

    #[test]
    fn test_to_pretty_html() {
        insta::assert_snapshot!(sample().to_pretty_html(), @r#"
        <div id="root" style="display: flex">
          <span class="label big">
            Kitchen &amp; Hall
          </span>
          <ha-switch id="toggle-0" checked="true">
          </ha-switch>
        </div>
        "#);
    }

    #[test]
    fn test_queries() {
        let mut root = sample();
        assert_eq!(root.text_content(), "Kitchen & Hall");
        assert!(root.find_by_id("toggle-0").is_some());
        assert!(root.find_by_id("missing").is_none());
        assert_eq!(root.find_all(|e| e.has_class("big")).len(), 1);
        assert_eq!(root.find_all(|e| e.has_class("bi")).len(), 0);

        root.find_by_id_mut("toggle-0").unwrap().set_attr("checked", "false");
        assert_eq!(
            root.find_by_id("toggle-0").unwrap().get_attr("checked"),
            Some("false")
        );
        assert_eq!(root.get_style("display"), Some("flex"));
    }

    #[test]
    fn test_escape_attribute() {
        let e = Element::new("span").attr("title", "\"quoted\" <b>");
        assert_eq!(
            e.to_html(),
            "<span title=\"&quot;quoted&quot; &lt;b&gt;\"></span>"
        );
    }
}
