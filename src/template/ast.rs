//! Syntax tree for component templates

use std::collections::BTreeSet;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Tags that never have children or a closing tag
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A single `name="value"` pair on a start tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// `None` for boolean attributes such as `disabled`
    pub value: Option<String>,
}

/// An opening tag as produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Written as `<tag ... />`
    pub self_closing: bool,
}

impl StartTag {
    /// Whether this tag has no body to parse
    pub fn is_void(&self) -> bool {
        self.self_closing || VOID_TAGS.contains(&self.name.to_ascii_lowercase().as_str())
    }
}

/// A model reference such as `{{ title }}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingRef {
    pub key: String,
    pub span: Span,
}

/// An element with its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn from_start(start: StartTag, children: Vec<Node>) -> Self {
        Self {
            tag: start.name,
            attributes: start.attributes,
            children,
        }
    }
}

/// A template node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Binding(BindingRef),
}

/// A parsed template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    pub nodes: Vec<Node>,
}

impl Template {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Every binding in document order, including repeats
    pub fn bindings(&self) -> Vec<&BindingRef> {
        fn walk<'a>(nodes: &'a [Node], out: &mut Vec<&'a BindingRef>) {
            for node in nodes {
                match node {
                    Node::Binding(b) => out.push(b),
                    Node::Element(el) => walk(&el.children, out),
                    Node::Text(_) => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.nodes, &mut out);
        out
    }

    /// Distinct model keys referenced by this template
    pub fn binding_keys(&self) -> BTreeSet<&str> {
        self.bindings().into_iter().map(|b| b.key.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(key: &str) -> Node {
        Node::Binding(BindingRef {
            key: key.to_string(),
            span: 0..1,
        })
    }

    #[test]
    fn test_bindings_include_nested_repeats() {
        let template = Template::new(vec![
            binding("foo"),
            Node::Element(Element {
                tag: "span".to_string(),
                attributes: vec![],
                children: vec![binding("bar"), binding("foo")],
            }),
        ]);
        let keys: Vec<_> = template.bindings().iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["foo", "bar", "foo"]);
        assert_eq!(template.binding_keys().len(), 2);
    }

    #[test]
    fn test_void_tags() {
        let br = StartTag {
            name: "BR".to_string(),
            attributes: vec![],
            self_closing: false,
        };
        assert!(br.is_void());
        let div = StartTag {
            name: "div".to_string(),
            attributes: vec![],
            self_closing: true,
        };
        assert!(div.is_void());
    }
}
