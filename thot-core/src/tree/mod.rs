//! Document tree
//!
//! Nodes live in an arena owned by the [`Document`] and refer to each other through
//! [`NodeId`] indices. A container owns the ordered list of its children's ids; there
//! are no parent links. The closed [`NodeKind`] enum is the node family: every variant
//! the parser can build, each carrying the state its event protocol needs.
//!
//! File structure:
//!
//! - `info.rs`: the open property bag attached to every node
//! - `document.rs`: the arena, label table, completers, features and hash sources
//! - `env.rs`: variable environment used to reduce `@(NAME)` references

pub mod document;
pub mod env;
pub mod info;

pub use document::{Completer, Document, Feature, HashSource};
pub use env::{Environment, Variables};
pub use info::{Align, Info, InfoValue};

use crate::error::Location;
use once_cell::unsync::OnceCell;
use serde::Serialize;
use std::fmt;

/// Index of a node inside its [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

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

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    Bold,
    Italic,
    Strong,
    Emphasized,
    Underline,
    Strike,
    Subscript,
    Superscript,
    Smaller,
    Bigger,
    Code,
    Cite,
    Custom(String),
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StyleKind::Bold => "bold",
            StyleKind::Italic => "italic",
            StyleKind::Strong => "strong",
            StyleKind::Emphasized => "emphasized",
            StyleKind::Underline => "underline",
            StyleKind::Strike => "strike",
            StyleKind::Subscript => "subscript",
            StyleKind::Superscript => "superscript",
            StyleKind::Smaller => "smaller",
            StyleKind::Bigger => "bigger",
            StyleKind::Code => "code",
            StyleKind::Cite => "cite",
            StyleKind::Custom(name) => name,
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Bullet,
    Number,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ListKind::Bullet => "bullet",
            ListKind::Number => "number",
        })
    }
}

/// Kind shared by table rows and cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    #[default]
    Normal,
    Header,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FootnoteKind {
    /// Mark in the text pointing to a note.
    Reference,
    /// Body of the note with the same reference.
    Definition,
}

/// Counter a numbered node participates in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Numbering {
    Header(u8),
    Figure,
    Table,
    Listing,
}

/// The node family.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Document,
    Word {
        text: String,
    },
    Glyph {
        code: u32,
    },
    LineBreak,
    HorizontalLine,
    Ref {
        label: String,
    },
    Tag {
        term: String,
    },
    Image {
        path: String,
    },
    Figure {
        path: String,
    },
    Block {
        kind: String,
        lines: Vec<String>,
    },
    /// Span closed by a matching style tag. Toggle styles remember the marker that
    /// opened them and whether they saw their own close.
    Style {
        style: StyleKind,
        marker: Option<String>,
        #[serde(skip)]
        terminated: bool,
    },
    OpenStyle {
        style: StyleKind,
    },
    FootNote {
        kind: FootnoteKind,
        reference: Option<String>,
    },
    Link {
        target: String,
    },
    Par,
    Quote {
        depth: usize,
    },
    List {
        kind: ListKind,
        depth: usize,
    },
    ListItem,
    DefList {
        depth: usize,
        alternate: bool,
        #[serde(skip)]
        in_term: bool,
    },
    DefItem {
        term: NodeId,
        body: NodeId,
    },
    Table {
        #[serde(skip)]
        width: OnceCell<usize>,
    },
    Row {
        kind: RowKind,
    },
    Cell {
        kind: RowKind,
    },
    Header {
        level: u8,
        title: Option<NodeId>,
        #[serde(skip)]
        in_title: bool,
    },
}

/// One element of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Info::is_empty")]
    pub info: Info,
    #[serde(skip)]
    pub source: Option<Location>,
    #[serde(skip)]
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            info: Info::new(),
            source: None,
            children: Vec::new(),
        }
    }

    pub fn word(text: impl Into<String>) -> Self {
        Node::new(NodeKind::Word { text: text.into() })
    }

    pub fn with_info(mut self, key: &str, value: InfoValue) -> Self {
        self.info.set(key, value);
        self
    }

    /// Record where the node entered the tree. Only the first call has an effect.
    pub fn set_source(&mut self, location: &Location) {
        if self.source.is_none() && location.is_known() {
            self.source = Some(location.clone());
        }
    }

    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Document => "Document",
            NodeKind::Word { .. } => "Word",
            NodeKind::Glyph { .. } => "Glyph",
            NodeKind::LineBreak => "LineBreak",
            NodeKind::HorizontalLine => "HorizontalLine",
            NodeKind::Ref { .. } => "Ref",
            NodeKind::Tag { .. } => "Tag",
            NodeKind::Image { .. } => "Image",
            NodeKind::Figure { .. } => "Figure",
            NodeKind::Block { .. } => "Block",
            NodeKind::Style { .. } => "Style",
            NodeKind::OpenStyle { .. } => "OpenStyle",
            NodeKind::FootNote { .. } => "FootNote",
            NodeKind::Link { .. } => "Link",
            NodeKind::Par => "Par",
            NodeKind::Quote { .. } => "Quote",
            NodeKind::List { .. } => "List",
            NodeKind::ListItem => "ListItem",
            NodeKind::DefList { .. } => "DefList",
            NodeKind::DefItem { .. } => "DefItem",
            NodeKind::Table { .. } => "Table",
            NodeKind::Row { .. } => "Row",
            NodeKind::Cell { .. } => "Cell",
            NodeKind::Header { .. } => "Header",
        }
    }

    /// Whether the node goes on the manager stack once added, to receive further events.
    ///
    /// List items and definition items are wrappers driven by their list; leaves never
    /// receive events.
    pub fn expects_events(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Style { .. }
                | NodeKind::OpenStyle { .. }
                | NodeKind::FootNote { .. }
                | NodeKind::Link { .. }
                | NodeKind::Par
                | NodeKind::Quote { .. }
                | NodeKind::List { .. }
                | NodeKind::DefList { .. }
                | NodeKind::Table { .. }
                | NodeKind::Row { .. }
                | NodeKind::Cell { .. }
                | NodeKind::Header { .. }
        )
    }

    /// Emptiness check used to prune trailing children.
    pub fn is_empty(&self) -> bool {
        match self.kind {
            NodeKind::Document
            | NodeKind::Par
            | NodeKind::Quote { .. }
            | NodeKind::Style { .. }
            | NodeKind::OpenStyle { .. }
            | NodeKind::Link { .. }
            | NodeKind::List { .. }
            | NodeKind::ListItem
            | NodeKind::DefList { .. } => self.children.is_empty(),
            _ => false,
        }
    }

    pub fn accepts_label(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Header { .. }
                | NodeKind::Table { .. }
                | NodeKind::Figure { .. }
                | NodeKind::Block { .. }
        )
    }

    pub fn accepts_caption(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Table { .. }
                | NodeKind::Figure { .. }
                | NodeKind::Image { .. }
                | NodeKind::Block { .. }
        )
    }

    pub fn numbering(&self) -> Option<Numbering> {
        match &self.kind {
            NodeKind::Header { level, .. } => Some(Numbering::Header(*level)),
            NodeKind::Figure { .. } => Some(Numbering::Figure),
            NodeKind::Table { .. } => Some(Numbering::Table),
            NodeKind::Block { .. } => Some(Numbering::Listing),
            _ => None,
        }
    }

    /// Short human label used by tree dumps.
    pub fn display_label(&self) -> String {
        match &self.kind {
            NodeKind::Word { text } => format!("{text:?}"),
            NodeKind::Glyph { code } => format!("U+{code:04X}"),
            NodeKind::Ref { label } => format!("@ref:{label}"),
            NodeKind::Tag { term } => format!("#{term}"),
            NodeKind::Image { path } | NodeKind::Figure { path } => path.clone(),
            NodeKind::Block { kind, lines } => format!("{kind} ({} lines)", lines.len()),
            NodeKind::Style { style, .. } | NodeKind::OpenStyle { style } => style.to_string(),
            NodeKind::FootNote { kind, reference } => match reference {
                Some(reference) => format!("{kind:?} [{reference}]"),
                None => format!("{kind:?}"),
            },
            NodeKind::Link { target } => target.clone(),
            NodeKind::Quote { depth } => format!("depth {depth}"),
            NodeKind::List { kind, depth } => format!("{kind} depth {depth}"),
            NodeKind::DefList { depth, .. } => format!("depth {depth}"),
            NodeKind::Row { kind } | NodeKind::Cell { kind } if *kind == RowKind::Header => {
                "header".to_string()
            }
            NodeKind::Header { level, .. } => format!("h{level}"),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_is_set_once() {
        let mut node = Node::word("a");
        node.set_source(&Location::new(Some("a.thot".into()), Some(1)));
        node.set_source(&Location::new(Some("a.thot".into()), Some(9)));
        assert_eq!(node.source.and_then(|loc| loc.line), Some(1));
    }

    #[test]
    fn test_leaves_do_not_expect_events() {
        assert!(!Node::word("a").expects_events());
        assert!(!Node::new(NodeKind::ListItem).expects_events());
        assert!(Node::new(NodeKind::Par).expects_events());
    }

    #[test]
    fn test_emptiness() {
        let mut par = Node::new(NodeKind::Par);
        assert!(par.is_empty());
        par.children.push(NodeId(3));
        assert!(!par.is_empty());
        assert!(!Node::new(NodeKind::Row {
            kind: RowKind::Normal
        })
        .is_empty());
    }

    #[test]
    fn test_numbering_groups() {
        let header = Node::new(NodeKind::Header {
            level: 2,
            title: None,
            in_title: true,
        });
        assert_eq!(header.numbering(), Some(Numbering::Header(2)));
        assert_eq!(Node::new(NodeKind::Par).numbering(), None);
    }
}
