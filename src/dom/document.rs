//! In-memory document tree

use super::{Dom, DomError, NodeId};

/// Elements serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed document with a single `body` root
///
/// Detached nodes stay in the arena but are unreachable from [`Document::body`],
/// so queries and serialization only ever see the live tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    body: NodeId,
    text_writes: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only `<body>`
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            body: NodeId(0),
            text_writes: 0,
        };
        doc.body = doc.push(NodeKind::Element {
            tag: "body".to_string(),
            attributes: Vec::new(),
        });
        doc
    }

    /// The root element
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Number of text replacements performed through [`Dom::set_text`]
    pub fn text_writes(&self) -> usize {
        self.text_writes
    }

    /// Tag name of an element
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    /// Read an attribute of an element
    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    /// Parent of a node, if attached
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    /// Direct children of a node
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Direct children that are elements
    pub fn child_elements(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|&c| self.tag_name(c).is_some())
            .collect()
    }

    /// Find the first attached element whose `id` attribute matches
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .find(|&n| self.get_attribute(n, "id") == Some(id))
    }

    /// All attached elements with the given tag, in document order
    pub fn query_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|&n| self.tag_name(n).is_some_and(|t| t.eq_ignore_ascii_case(tag)))
            .collect()
    }

    /// Concatenated text of a node and all its descendants
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    /// Remove every child of a node
    pub fn clear_children(&mut self, node: NodeId) {
        let Some(data) = self.nodes.get_mut(node.0) else {
            return;
        };
        let children = std::mem::take(&mut data.children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    /// Serialize a node and its subtree
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    /// Serialize the children of a node
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(node) {
            self.write_html(child, &mut out);
        }
        out
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut NodeData, DomError> {
        self.nodes.get_mut(node.0).ok_or(DomError::UnknownNode(node))
    }

    /// Pre-order descendants, excluding `node` itself
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.nodes.get(node.0) else {
            return;
        };
        match &data.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { .. } => {
                for &child in &data.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.nodes.get(node.0) else {
            return;
        };
        match &data.kind {
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push_str(&format!(r#" {}="{}""#, name, escape_attribute(value)));
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) && data.children.is_empty() {
                    return;
                }
                for &child in &data.children {
                    self.write_html(child, out);
                }
                out.push_str(&format!("</{}>", tag));
            }
        }
    }
}

impl Dom for Document {
    fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_string(),
            attributes: Vec::new(),
        })
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !matches!(self.node_mut(parent)?.kind, NodeKind::Element { .. }) {
            return Err(DomError::NotAnElement(parent));
        }
        self.detach(child)?;
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        match &mut self.node_mut(element)?.kind {
            NodeKind::Element { attributes, .. } => {
                match attributes.iter_mut().find(|(n, _)| n == name) {
                    Some((_, v)) => *v = value.to_string(),
                    None => attributes.push((name.to_string(), value.to_string())),
                }
                Ok(())
            }
            NodeKind::Text(_) => Err(DomError::NotAnElement(element)),
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), DomError> {
        match &mut self.node_mut(node)?.kind {
            NodeKind::Text(data) => *data = text.to_string(),
            NodeKind::Element { .. } => return Err(DomError::NotAText(node)),
        }
        self.text_writes += 1;
        Ok(())
    }

    fn detach(&mut self, node: NodeId) -> Result<(), DomError> {
        if let Some(parent) = self.node_mut(node)?.parent.take() {
            self.node_mut(parent)?.children.retain(|&c| c != node);
        }
        Ok(())
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_container() -> (Document, NodeId) {
        let mut doc = Document::new();
        let container = doc.create_element("div");
        doc.set_attribute(container, "id", "container").unwrap();
        let body = doc.body();
        doc.append_child(body, container).unwrap();
        (doc, container)
    }

    #[test]
    fn test_get_element_by_id() {
        let (doc, container) = doc_with_container();
        assert_eq!(doc.get_element_by_id("container"), Some(container));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let (mut doc, container) = doc_with_container();
        let span = doc.create_element("span");
        let a = doc.create_text("foo");
        let b = doc.create_text("bar");
        doc.append_child(container, a).unwrap();
        doc.append_child(container, span).unwrap();
        doc.append_child(span, b).unwrap();
        assert_eq!(doc.text_content(container), "foobar");
        assert_eq!(doc.text_content(span), "bar");
    }

    #[test]
    fn test_query_tag_in_document_order() {
        let (mut doc, container) = doc_with_container();
        let first = doc.create_element("test-component");
        let second = doc.create_element("test-component");
        let inner = doc.create_element("test-component");
        doc.append_child(container, first).unwrap();
        doc.append_child(first, inner).unwrap();
        doc.append_child(container, second).unwrap();
        assert_eq!(doc.query_tag("test-component"), vec![first, inner, second]);
    }

    #[test]
    fn test_detached_nodes_are_not_queried() {
        let (mut doc, container) = doc_with_container();
        let el = doc.create_element("widget");
        doc.append_child(container, el).unwrap();
        doc.detach(el).unwrap();
        assert!(doc.query_tag("widget").is_empty());
        assert_eq!(doc.parent(el), None);
    }

    #[test]
    fn test_append_moves_node() {
        let (mut doc, container) = doc_with_container();
        let other = doc.create_element("section");
        let el = doc.create_element("p");
        doc.append_child(container, el).unwrap();
        doc.append_child(other, el).unwrap();
        assert!(doc.children(container).is_empty());
        assert_eq!(doc.parent(el), Some(other));
    }

    #[test]
    fn test_set_attribute_overwrites() {
        let (mut doc, container) = doc_with_container();
        doc.set_attribute(container, "class", "a").unwrap();
        doc.set_attribute(container, "class", "b").unwrap();
        assert_eq!(doc.get_attribute(container, "class"), Some("b"));
    }

    #[test]
    fn test_set_text_counts_writes() {
        let mut doc = Document::new();
        let text = doc.create_text("");
        doc.set_text(text, "one").unwrap();
        doc.set_text(text, "two").unwrap();
        assert_eq!(doc.text_writes(), 2);
    }

    #[test]
    fn test_type_errors() {
        let mut doc = Document::new();
        let text = doc.create_text("x");
        let el = doc.create_element("div");
        assert_eq!(doc.append_child(text, el), Err(DomError::NotAnElement(text)));
        assert_eq!(doc.set_text(el, "y"), Err(DomError::NotAText(el)));
        assert_eq!(
            doc.set_attribute(NodeId(99), "a", "b"),
            Err(DomError::UnknownNode(NodeId(99)))
        );
    }

    #[test]
    fn test_outer_html_escapes() {
        let (mut doc, container) = doc_with_container();
        let text = doc.create_text("a < b & c");
        let br = doc.create_element("br");
        doc.append_child(container, text).unwrap();
        doc.append_child(container, br).unwrap();
        doc.set_attribute(container, "title", "say \"hi\"").unwrap();
        assert_eq!(
            doc.outer_html(container),
            r#"<div id="container" title="say &quot;hi&quot;">a &lt; b &amp; c<br></div>"#
        );
    }

    #[test]
    fn test_clear_children() {
        let (mut doc, container) = doc_with_container();
        let el = doc.create_element("p");
        doc.append_child(container, el).unwrap();
        doc.clear_children(container);
        assert_eq!(doc.inner_html(container), "");
        assert_eq!(doc.parent(el), None);
    }
}
