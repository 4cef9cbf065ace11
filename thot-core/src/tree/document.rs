//! The document: node arena and everything owned per parse run
//!
//! Besides the nodes, the document owns the label table (name to node, with the inverse
//! kept in each node's `labels` info entry), the completers run once parsing ends, the
//! feature set handed to back-ends, the hash sources resolving `#term` tags and the
//! variable environment.

use super::env::{Environment, Variables};
use super::info::{self, InfoValue};
use super::{Node, NodeId, NodeKind};
use crate::error::FormatError;
use crate::generator::{Generator, Role};
use crate::manager::Manager;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Hook run once after the end of the document has been processed.
pub type Completer = Box<dyn FnOnce(&mut Manager)>;

/// Side-channel hook consumed by back-ends. The core only stores and deduplicates them.
pub trait Feature {
    fn name(&self) -> &str;

    /// Called before traversal; may emit raw output through the generator.
    fn prepare(&self, _doc: &Document, _gen: &mut dyn Generator) -> Result<(), FormatError> {
        Ok(())
    }
}

/// Resolver for `#term` tags.
pub trait HashSource {
    fn resolve(&self, term: &str) -> Option<String>;
}

pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    labels: HashMap<String, NodeId>,
    completers: Vec<Completer>,
    features: Vec<Rc<dyn Feature>>,
    hash_sources: Vec<Box<dyn HashSource>>,
    hashes: HashMap<String, String>,
    hash_cache: RefCell<HashMap<String, Option<String>>>,
    env: Box<dyn Environment>,
}

impl Document {
    pub fn new() -> Self {
        Self::with_environment(Box::new(Variables::new()))
    }

    pub fn with_environment(env: Box<dyn Environment>) -> Self {
        Document {
            nodes: vec![Node::new(NodeKind::Document)],
            root: NodeId(0),
            labels: HashMap::new(),
            completers: Vec::new(),
            features: Vec::new(),
            hash_sources: Vec::new(),
            hashes: HashMap::new(),
            hash_cache: RefCell::new(HashMap::new()),
            env,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Move a node into the arena. It is not attached anywhere yet.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].children.last().copied()
    }

    pub fn is_empty(&self, id: NodeId) -> bool {
        self.nodes[id.0].is_empty()
    }

    /// Number of nodes in the arena, attached or not.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    pub fn header_title(&self, id: NodeId) -> Option<NodeId> {
        match self.kind(id) {
            NodeKind::Header { title, .. } => *title,
            _ => None,
        }
    }

    /// Traversal slots of a node: its children, preceded by the title of a header, or
    /// the term and body of a definition item.
    pub fn slots(&self, id: NodeId) -> Vec<(NodeId, Role)> {
        match self.kind(id) {
            NodeKind::DefItem { term, body } => vec![(*term, Role::Term), (*body, Role::Body)],
            NodeKind::Header { title, .. } => title
                .iter()
                .map(|title| (*title, Role::Title))
                .chain(self.children(id).iter().map(|child| (*child, Role::Child)))
                .collect(),
            _ => self
                .children(id)
                .iter()
                .map(|child| (*child, Role::Child))
                .collect(),
        }
    }

    /// All nodes reachable from `id`, in document order, `id` included.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            out.push(current);
            for (child, _) in self.slots(current).into_iter().rev() {
                pending.push(child);
            }
        }
        out
    }

    /// Plain text carried by a subtree.
    pub fn to_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for current in self.descendants(id) {
            match self.kind(current) {
                NodeKind::Word { text } => out.push_str(text),
                NodeKind::Glyph { code } => out.extend(char::from_u32(*code)),
                NodeKind::Ref { label } => out.push_str(label),
                NodeKind::Tag { term } => out.push_str(term),
                NodeKind::LineBreak => out.push('\n'),
                NodeKind::Block { lines, .. } => out.push_str(&lines.join("\n")),
                _ => {}
            }
        }
        out
    }

    /// Width of a table in columns, computed from its first row and cached.
    pub fn table_width(&self, id: NodeId) -> usize {
        let node = self.node(id);
        match &node.kind {
            NodeKind::Table { width } => *width.get_or_init(|| {
                node.children
                    .first()
                    .map(|row| {
                        self.children(*row)
                            .iter()
                            .map(|cell| {
                                self.node(*cell).info.int(info::HSPAN).unwrap_or(1).max(1) as usize
                            })
                            .sum()
                    })
                    .unwrap_or(0)
            }),
            _ => 0,
        }
    }

    /// Register `name` on `id`. Returns the node that previously held the name, if it
    /// was a different one; the name moves to `id` either way.
    pub fn add_label(&mut self, name: &str, id: NodeId) -> Option<NodeId> {
        let previous = self.labels.insert(name.to_string(), id);
        if let Some(old) = previous {
            if old != id {
                self.node_mut(old).info.remove_from_list(info::LABELS, name);
            }
        }
        self.node_mut(id).info.push_to_list(info::LABELS, name);
        previous.filter(|old| *old != id)
    }

    pub fn get_label(&self, name: &str) -> Option<NodeId> {
        self.labels.get(name).copied()
    }

    pub fn labels_of(&self, id: NodeId) -> &[String] {
        self.node(id).info.list(info::LABELS)
    }

    pub fn add_completer(&mut self, completer: Completer) {
        self.completers.push(completer);
    }

    pub(crate) fn take_completers(&mut self) -> Vec<Completer> {
        std::mem::take(&mut self.completers)
    }

    /// Add a feature unless one with the same name is already present.
    pub fn add_feature(&mut self, feature: Rc<dyn Feature>) -> bool {
        if self.has_feature(feature.name()) {
            return false;
        }
        self.features.push(feature);
        true
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.features.iter().any(|feature| feature.name() == name)
    }

    pub fn features(&self) -> &[Rc<dyn Feature>] {
        &self.features
    }

    pub fn add_hash_source(&mut self, source: Box<dyn HashSource>) {
        self.hash_sources.push(source);
        self.hash_cache.borrow_mut().clear();
    }

    pub fn define_hash(&mut self, term: &str, text: &str) {
        self.hashes.insert(term.to_string(), text.to_string());
        self.hash_cache.borrow_mut().remove(term);
    }

    /// Resolve a `#term`: explicit definitions first, then sources in order.
    pub fn resolve_hash(&self, term: &str) -> Option<String> {
        if let Some(cached) = self.hash_cache.borrow().get(term) {
            return cached.clone();
        }
        let resolved = self
            .hashes
            .get(term)
            .cloned()
            .or_else(|| self.hash_sources.iter().find_map(|source| source.resolve(term)));
        self.hash_cache
            .borrow_mut()
            .insert(term.to_string(), resolved.clone());
        resolved
    }

    pub fn get_var(&self, name: &str) -> Option<String> {
        self.env.get(name)
    }

    pub fn set_var(&mut self, name: &str, value: &str) {
        self.env.set(name, value);
    }

    pub fn reduce(&self, text: &str) -> String {
        self.env.reduce(text)
    }

    /// Caption paragraph attached to a node, if any.
    pub fn caption(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).info.node(info::CAPTION)
    }

    pub(crate) fn set_caption(&mut self, id: NodeId, caption: NodeId) {
        self.node_mut(id)
            .info
            .set(info::CAPTION, InfoValue::Node(caption));
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("labels", &self.labels)
            .field("completers", &self.completers.len())
            .field(
                "features",
                &self
                    .features
                    .iter()
                    .map(|feature| feature.name().to_string())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attach(doc: &mut Document, parent: NodeId, node: Node) -> NodeId {
        let id = doc.alloc(node);
        doc.node_mut(parent).children.push(id);
        id
    }

    #[test]
    fn test_label_last_writer_wins() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = attach(&mut doc, root, Node::new(NodeKind::Figure { path: "a".into() }));
        let b = attach(&mut doc, root, Node::new(NodeKind::Figure { path: "b".into() }));

        assert_eq!(doc.add_label("fig1", a), None);
        assert_eq!(doc.add_label("fig1", b), Some(a));
        assert_eq!(doc.get_label("fig1"), Some(b));
        assert!(doc.labels_of(a).is_empty());
        assert_eq!(doc.labels_of(b), ["fig1".to_string()]);
    }

    #[test]
    fn test_relabel_same_node_is_not_a_conflict() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = attach(&mut doc, root, Node::new(NodeKind::Par));
        doc.add_label("x", a);
        assert_eq!(doc.add_label("x", a), None);
    }

    #[test]
    fn test_to_text_walks_header_title_first() {
        let mut doc = Document::new();
        let root = doc.root();
        let title = doc.alloc(Node::new(NodeKind::Par));
        attach(&mut doc, title, Node::word("Title"));
        let header = attach(
            &mut doc,
            root,
            Node::new(NodeKind::Header {
                level: 1,
                title: Some(title),
                in_title: false,
            }),
        );
        let par = attach(&mut doc, header, Node::new(NodeKind::Par));
        attach(&mut doc, par, Node::word(" body"));
        assert_eq!(doc.to_text(root), "Title body");
    }

    #[test]
    fn test_table_width_uses_first_row_spans() {
        let mut doc = Document::new();
        let root = doc.root();
        let table = attach(
            &mut doc,
            root,
            Node::new(NodeKind::Table {
                width: Default::default(),
            }),
        );
        let row = attach(
            &mut doc,
            table,
            Node::new(NodeKind::Row {
                kind: Default::default(),
            }),
        );
        attach(
            &mut doc,
            row,
            Node::new(NodeKind::Cell {
                kind: Default::default(),
            })
            .with_info(info::HSPAN, InfoValue::Int(2)),
        );
        attach(
            &mut doc,
            row,
            Node::new(NodeKind::Cell {
                kind: Default::default(),
            }),
        );
        assert_eq!(doc.table_width(table), 3);
    }

    struct Upper;

    impl HashSource for Upper {
        fn resolve(&self, term: &str) -> Option<String> {
            Some(term.to_uppercase())
        }
    }

    #[test]
    fn test_hash_resolution_order() {
        let mut doc = Document::new();
        doc.define_hash("rust", "Rust language");
        doc.add_hash_source(Box::new(Upper));
        assert_eq!(doc.resolve_hash("rust").as_deref(), Some("Rust language"));
        assert_eq!(doc.resolve_hash("thot").as_deref(), Some("THOT"));
    }

    struct Named(&'static str);

    impl Feature for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_features_are_deduplicated() {
        let mut doc = Document::new();
        assert!(doc.add_feature(Rc::new(Named("math"))));
        assert!(!doc.add_feature(Rc::new(Named("math"))));
        assert!(doc.add_feature(Rc::new(Named("toc"))));
        assert_eq!(doc.features().len(), 2);
    }
}
