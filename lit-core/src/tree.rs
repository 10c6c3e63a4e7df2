//! Arena document tree
//!
//! Every node of a document lives in one `Vec` owned by [`Document`]; links between nodes
//! (parent, first/last child, prev/next sibling) are [`NodeId`] indices into that arena.
//!
//! Structural mutation goes through [`Document::append_child`] and
//! [`Document::insert_before`]. Both refuse a node that is already attached (it has a parent
//! or a sibling) and both update only the attached node and its new neighbours.

use crate::layout::{line_blocks, plain_text};
use crate::token::Token;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Fragment,
    Paragraph,
    Footnote,
    DisplayMath,
    Run,
    Token,
    /// Raw text; well-formed trees hold tokens instead
    Text,
    List,
    ListItem,
    Section,
    Comment,
    TexOnly,
    CenterAlign,
    RightAlign,
    Equation,
    Subequations,
    Image,
    Statement,
    Proof,
    Link,
    Table,
    TableHead,
    TableBody,
    TableRow,
    TableHeaderCell,
    TableCell,
    Quote,
    Div,
    Code,
    Pre,
    /// A comment carrying a decoded structured-data payload
    Json,
    /// Any element without a dedicated kind; `data` holds its tag name
    Opaque,
}

impl NodeKind {
    /// Short name used by the debug tree writer.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Fragment => "fragment",
            NodeKind::Paragraph => "¶",
            NodeKind::Footnote => "†",
            NodeKind::DisplayMath => "◇",
            NodeKind::Run => "‖",
            NodeKind::Token => "token",
            NodeKind::Text => "text",
            NodeKind::List => "⁝",
            NodeKind::ListItem => "‣",
            NodeKind::Section => "§",
            NodeKind::Comment => "comment",
            NodeKind::TexOnly => "tex",
            NodeKind::CenterAlign => "center",
            NodeKind::RightAlign => "right",
            NodeKind::Equation => "equation",
            NodeKind::Subequations => "subequations",
            NodeKind::Image => "image",
            NodeKind::Statement => "statement",
            NodeKind::Proof => "proof",
            NodeKind::Link => "link",
            NodeKind::Table => "table",
            NodeKind::TableHead => "thead",
            NodeKind::TableBody => "tbody",
            NodeKind::TableRow => "tr",
            NodeKind::TableHeaderCell => "th",
            NodeKind::TableCell => "td",
            NodeKind::Quote => "quote",
            NodeKind::Div => "div",
            NodeKind::Code => "code",
            NodeKind::Pre => "pre",
            NodeKind::Json => "json",
            NodeKind::Opaque => "opaque",
        }
    }

    /// Token and Text nodes never have children.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeKind::Token | NodeKind::Text)
    }

    /// Elements that sit inside a line of text rather than starting a block.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            NodeKind::Link
                | NodeKind::Code
                | NodeKind::Image
                | NodeKind::Footnote
                | NodeKind::Opaque
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub val: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, val: impl Into<String>) -> Self {
        Attribute {
            key: key.into(),
            val: val.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0} is already attached")]
    AlreadyAttached(NodeId),
    #[error("node {child} is not a child of node {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("{0} nodes cannot have children")]
    LeafParent(NodeKind),
    #[error("attaching node {child} under node {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Payload of text, comment, pre, structured-data and opaque nodes
    pub data: String,
    pub attrs: Vec<Attribute>,
    /// Present iff `kind` is [`NodeKind::Token`]
    pub token: Option<Token>,
    /// Decoded payload of a [`NodeKind::Json`] node
    pub structured: Option<BTreeMap<String, Value>>,

    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            data: String::new(),
            attrs: Vec::new(),
            token: None,
            structured: None,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    pub fn last_child(&self) -> Option<NodeId> {
        self.last_child
    }

    pub fn prev_sibling(&self) -> Option<NodeId> {
        self.prev_sibling
    }

    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }

    fn is_attached(&self) -> bool {
        self.parent.is_some() || self.prev_sibling.is_some() || self.next_sibling.is_some()
    }
}

/// A parsed document: the node arena plus its Fragment root.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document holding only an empty Fragment root.
    pub fn new() -> Self {
        Document {
            nodes: vec![Node::new(NodeKind::Fragment)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1 && self.nodes[0].first_child.is_none()
    }

    /// Allocate a detached node.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(Node::new(kind));
        NodeId(self.nodes.len() - 1)
    }

    pub fn create_token(&mut self, token: Token) -> NodeId {
        let id = self.create(NodeKind::Token);
        self.nodes[id.0].token = Some(token);
        id
    }

    pub fn create_with_data(&mut self, kind: NodeKind, data: impl Into<String>) -> NodeId {
        let id = self.create(kind);
        self.nodes[id.0].data = data.into();
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    pub fn token(&self, id: NodeId) -> Option<&Token> {
        self.nodes[id.0].token.as_ref()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].last_child
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].prev_sibling
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].next_sibling
    }

    /// Append `child` as the new last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `new_child` under `parent` immediately before `old_child`, or at the end when
    /// `old_child` is `None`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: Option<NodeId>,
    ) -> Result<(), TreeError> {
        self.check_attachable(parent, new_child)?;

        let (prev, next) = match old_child {
            Some(old) => {
                if self.nodes[old.0].parent != Some(parent) {
                    return Err(TreeError::NotAChild { parent, child: old });
                }
                (self.nodes[old.0].prev_sibling, Some(old))
            }
            None => (self.nodes[parent.0].last_child, None),
        };

        match prev {
            Some(p) => self.nodes[p.0].next_sibling = Some(new_child),
            None => self.nodes[parent.0].first_child = Some(new_child),
        }
        match next {
            Some(n) => self.nodes[n.0].prev_sibling = Some(new_child),
            None => self.nodes[parent.0].last_child = Some(new_child),
        }

        let node = &mut self.nodes[new_child.0];
        node.parent = Some(parent);
        node.prev_sibling = prev;
        node.next_sibling = next;
        Ok(())
    }

    fn check_attachable(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if self.nodes[child.0].is_attached() {
            return Err(TreeError::AlreadyAttached(child));
        }
        let parent_kind = self.nodes[parent.0].kind;
        if parent_kind.is_leaf() {
            return Err(TreeError::LeafParent(parent_kind));
        }
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(TreeError::Cycle { parent, child });
            }
            cursor = self.nodes[id.0].parent;
        }
        Ok(())
    }

    /// Direct children of `id`, in order. Call again to restart.
    pub fn kids(&self, id: NodeId) -> Kids<'_> {
        Kids {
            doc: self,
            next: self.nodes[id.0].first_child,
        }
    }

    /// `id` and all its descendants in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            let children: Vec<NodeId> = self.kids(current).collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Every token of the subtree rooted at `id`, in document order.
    pub fn tokens(&self, id: NodeId) -> Vec<&Token> {
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.nodes[n.0].token.as_ref())
            .collect()
    }

    /// The run of Token siblings starting at `first`, and the sibling that ends it.
    pub fn token_block(&self, first: NodeId) -> (Vec<&Token>, Option<NodeId>) {
        let mut block = Vec::new();
        let mut cursor = Some(first);
        while let Some(id) = cursor {
            match self.nodes[id.0].token.as_ref() {
                Some(token) if self.nodes[id.0].kind == NodeKind::Token => block.push(token),
                _ => break,
            }
            cursor = self.nodes[id.0].next_sibling;
        }
        (block, cursor)
    }

    /// Text of the first token block under `id`, unwrapped onto one line.
    pub fn first_token_text(&self, id: NodeId) -> String {
        let first = self.kids(id).find(|c| self.kind(*c) == NodeKind::Token);
        match first {
            Some(first) => {
                let (block, _) = self.token_block(first);
                line_blocks(&block, plain_text, usize::MAX).join(" ")
            }
            None => String::new(),
        }
    }

    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.nodes[id.0]
            .attrs
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.val.as_str())
    }

    /// Set `key` to `val`, replacing the value of an existing attribute with that key.
    pub fn set_attr(&mut self, id: NodeId, key: &str, val: impl Into<String>) {
        let val = val.into();
        let attrs = &mut self.nodes[id.0].attrs;
        match attrs.iter_mut().find(|a| a.key == key) {
            Some(existing) => existing.val = val,
            None => attrs.push(Attribute::new(key, val)),
        }
    }

    pub fn section_level(&self, id: NodeId) -> usize {
        self.attr(id, "section-level")
            .and_then(|v| v.parse().ok())
            .unwrap_or(1)
    }

    pub fn section_numbered(&self, id: NodeId) -> bool {
        self.attr(id, "section-numbered") == Some("true")
    }

    pub fn list_ordered(&self, id: NodeId) -> bool {
        self.attr(id, "list-type") == Some("ordered")
    }

    /// JSON view of the subtree rooted at `id`; empty fields are omitted.
    pub fn to_json(&self, id: NodeId) -> Value {
        let node = &self.nodes[id.0];
        let mut obj = Map::new();
        obj.insert("kind".to_string(), json!(node.kind));
        if !node.data.is_empty() {
            obj.insert("data".to_string(), json!(node.data));
        }
        if !node.attrs.is_empty() {
            obj.insert("attrs".to_string(), json!(node.attrs));
        }
        if let Some(token) = &node.token {
            obj.insert("token".to_string(), json!(token));
        }
        if let Some(structured) = &node.structured {
            obj.insert("structured".to_string(), json!(structured));
        }
        let children: Vec<Value> = self.kids(id).map(|c| self.to_json(c)).collect();
        if !children.is_empty() {
            obj.insert("children".to_string(), Value::Array(children));
        }
        Value::Object(obj)
    }
}

/// Iterator over the direct children of a node.
pub struct Kids<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Kids<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.doc.nodes[id.0].next_sibling;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kids_of(doc: &Document, id: NodeId) -> Vec<NodeId> {
        doc.kids(id).collect()
    }

    #[test]
    fn append_links_siblings_in_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create(NodeKind::Paragraph);
        let b = doc.create(NodeKind::Paragraph);
        doc.append_child(root, a).unwrap();
        doc.append_child(root, b).unwrap();

        assert_eq!(kids_of(&doc, root), vec![a, b]);
        assert_eq!(doc.first_child(root), Some(a));
        assert_eq!(doc.last_child(root), Some(b));
        assert_eq!(doc.next_sibling(a), Some(b));
        assert_eq!(doc.prev_sibling(b), Some(a));
        assert_eq!(doc.parent(b), Some(root));
    }

    #[test]
    fn insert_before_first_and_middle() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create(NodeKind::Run);
        let c = doc.create(NodeKind::Run);
        doc.append_child(root, c).unwrap();
        doc.insert_before(root, a, Some(c)).unwrap();
        let b = doc.create(NodeKind::Run);
        doc.insert_before(root, b, Some(c)).unwrap();

        assert_eq!(kids_of(&doc, root), vec![a, b, c]);
        assert_eq!(doc.first_child(root), Some(a));
        assert_eq!(doc.prev_sibling(b), Some(a));
        assert_eq!(doc.next_sibling(b), Some(c));
        assert_eq!(doc.prev_sibling(c), Some(b));
        assert_eq!(doc.prev_sibling(a), None);
    }

    #[test]
    fn insert_before_none_appends() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create(NodeKind::Run);
        let b = doc.create(NodeKind::Run);
        doc.append_child(root, a).unwrap();
        doc.insert_before(root, b, None).unwrap();
        assert_eq!(kids_of(&doc, root), vec![a, b]);
        assert_eq!(doc.last_child(root), Some(b));
    }

    #[test]
    fn attaching_twice_fails_and_leaves_tree_untouched() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.create(NodeKind::Paragraph);
        let r = doc.create(NodeKind::Run);
        doc.append_child(root, p).unwrap();
        doc.append_child(p, r).unwrap();

        assert_eq!(
            doc.append_child(root, r),
            Err(TreeError::AlreadyAttached(r))
        );
        assert_eq!(kids_of(&doc, root), vec![p]);
        assert_eq!(kids_of(&doc, p), vec![r]);
    }

    #[test]
    fn insert_before_requires_old_child_of_parent() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.create(NodeKind::Paragraph);
        let stray = doc.create(NodeKind::Run);
        let new = doc.create(NodeKind::Run);
        doc.append_child(root, p).unwrap();

        let err = doc.insert_before(root, new, Some(stray)).unwrap_err();
        assert_eq!(
            err,
            TreeError::NotAChild {
                parent: root,
                child: stray
            }
        );
        assert!(doc.parent(new).is_none());
    }

    #[test]
    fn leaves_reject_children() {
        let mut doc = Document::new();
        let t = doc.create_token(Token::word("x"));
        let r = doc.create(NodeKind::Run);
        assert_eq!(
            doc.append_child(t, r),
            Err(TreeError::LeafParent(NodeKind::Token))
        );
    }

    #[test]
    fn cycles_are_rejected() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.create(NodeKind::Paragraph);
        doc.append_child(root, p).unwrap();
        assert!(matches!(
            doc.append_child(p, root),
            Err(TreeError::Cycle { .. })
        ));
    }

    #[test]
    fn set_attr_replaces_existing_key() {
        let mut doc = Document::new();
        let n = doc.create(NodeKind::Section);
        doc.set_attr(n, "section-level", "1");
        doc.set_attr(n, "section-level", "2");
        assert_eq!(doc.node(n).attrs.len(), 1);
        assert_eq!(doc.section_level(n), 2);
    }

    #[test]
    fn set_attr_appends_new_key() {
        let mut doc = Document::new();
        let n = doc.create(NodeKind::Section);
        doc.set_attr(n, "foo", "bar");
        assert_eq!(doc.node(n).attrs, vec![Attribute::new("foo", "bar")]);
    }

    #[test]
    fn attribute_defaults() {
        let mut doc = Document::new();
        let s = doc.create(NodeKind::Section);
        assert_eq!(doc.section_level(s), 1);
        assert!(!doc.section_numbered(s));
        let l = doc.create(NodeKind::List);
        assert!(!doc.list_ordered(l));
        doc.set_attr(l, "list-type", "ordered");
        assert!(doc.list_ordered(l));
    }

    #[test]
    fn token_block_stops_at_first_element() {
        let mut doc = Document::new();
        let run = doc.create(NodeKind::Run);
        let a = doc.create_token(Token::word("a"));
        let sp = doc.create_token(Token::implicit_space());
        let b = doc.create_token(Token::word("b"));
        let note = doc.create(NodeKind::Footnote);
        let c = doc.create_token(Token::word("c"));
        for id in [a, sp, b, note, c] {
            doc.append_child(run, id).unwrap();
        }

        let (block, next) = doc.token_block(a);
        assert_eq!(block.len(), 3);
        assert_eq!(next, Some(note));
        assert_eq!(doc.first_token_text(run), "a b");
        assert_eq!(doc.tokens(run).len(), 4);
    }

    #[test]
    fn descendants_are_in_document_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.create(NodeKind::Paragraph);
        let r1 = doc.create(NodeKind::Run);
        let r2 = doc.create(NodeKind::Run);
        let q = doc.create(NodeKind::Paragraph);
        doc.append_child(root, p).unwrap();
        doc.append_child(p, r1).unwrap();
        doc.append_child(p, r2).unwrap();
        doc.append_child(root, q).unwrap();
        assert_eq!(doc.descendants(root), vec![root, p, r1, r2, q]);
    }

    #[test]
    fn json_view_omits_empty_fields() {
        let mut doc = Document::new();
        let root = doc.root();
        let t = doc.create_token(Token::word("hi"));
        doc.append_child(root, t).unwrap();
        let value = doc.to_json(root);
        assert_eq!(
            value,
            json!({
                "kind": "fragment",
                "children": [
                    {"kind": "token", "token": {"kind": "word", "value": "hi"}}
                ]
            })
        );
    }
}
