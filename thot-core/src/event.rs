//! Parsing events
//!
//! An event describes one parsing occurrence: its structural [`Level`], its
//! [`EventKind`] and an optional [`Payload`]. Events are values; they are cloned freely
//! and never refer to nodes already in the tree.
//!
//! Front-end handlers emit events through [`Manager::send`](crate::manager::Manager::send);
//! the node on top of the stack decides whether to consume them or forward them to its
//! parent.

use crate::tree::{ListKind, Node, RowKind, StyleKind};
use std::fmt;
use std::rc::Rc;

/// Structural level an event belongs to, from outermost to innermost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Document,
    Header,
    Paragraph,
    Word,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Document => "DOC",
            Level::Header => "HEAD",
            Level::Paragraph => "PAR",
            Level::Word => "WORD",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    New,
    End,
    Title,
    NewItem,
    EndItem,
    NewDef,
    EndTerm,
    EndDef,
    NewStyle,
    EndStyle,
    NewLink,
    EndLink,
    NewRow,
    EndRow,
    NewCell,
    EndCell,
    NewQuote,
    EndQuote,
    Customize,
    Other(String),
}

impl EventKind {
    /// Whether the event closes something that some node opened before.
    pub fn is_closing(&self) -> bool {
        matches!(
            self,
            EventKind::End
                | EventKind::EndItem
                | EventKind::EndTerm
                | EventKind::EndDef
                | EventKind::EndStyle
                | EventKind::EndLink
                | EventKind::EndRow
                | EventKind::EndCell
                | EventKind::EndQuote
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::New => "new",
            EventKind::End => "end",
            EventKind::Title => "title",
            EventKind::NewItem => "new_item",
            EventKind::EndItem => "end_item",
            EventKind::NewDef => "new_def",
            EventKind::EndTerm => "end_term",
            EventKind::EndDef => "end_def",
            EventKind::NewStyle => "new_style",
            EventKind::EndStyle => "end_style",
            EventKind::NewLink => "new_link",
            EventKind::EndLink => "end_link",
            EventKind::NewRow => "new_row",
            EventKind::EndRow => "end_row",
            EventKind::NewCell => "new_cell",
            EventKind::EndCell => "end_cell",
            EventKind::NewQuote => "new_quote",
            EventKind::EndQuote => "end_quote",
            EventKind::Customize => "customize",
            EventKind::Other(name) => name,
        };
        f.write_str(name)
    }
}

/// Changes an already built node; applied to the first stack node it matches.
pub trait Customizer {
    fn matches(&self, _node: &Node) -> bool {
        true
    }

    fn process(&self, node: &mut Node);
}

#[derive(Clone, Default)]
pub enum Payload {
    #[default]
    None,
    /// A ready-made node, materialized into the tree as is.
    Node(Box<Node>),
    /// Style tag. `explicit` styles need a matching close; `marker` is the literal
    /// opener of a toggle style.
    Style {
        style: StyleKind,
        marker: Option<String>,
        explicit: bool,
    },
    Item {
        kind: ListKind,
        depth: usize,
    },
    Def {
        depth: usize,
        alternate: bool,
    },
    Quote {
        depth: usize,
    },
    Row {
        kind: RowKind,
    },
    Customize(Rc<dyn Customizer>),
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::None => f.write_str("None"),
            Payload::Node(node) => f.debug_tuple("Node").field(&node.type_name()).finish(),
            Payload::Style {
                style,
                marker,
                explicit,
            } => f
                .debug_struct("Style")
                .field("style", style)
                .field("marker", marker)
                .field("explicit", explicit)
                .finish(),
            Payload::Item { kind, depth } => f
                .debug_struct("Item")
                .field("kind", kind)
                .field("depth", depth)
                .finish(),
            Payload::Def { depth, alternate } => f
                .debug_struct("Def")
                .field("depth", depth)
                .field("alternate", alternate)
                .finish(),
            Payload::Quote { depth } => f.debug_struct("Quote").field("depth", depth).finish(),
            Payload::Row { kind } => f.debug_struct("Row").field("kind", kind).finish(),
            Payload::Customize(_) => f.write_str("Customize(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Event {
    pub level: Level,
    pub kind: EventKind,
    pub payload: Payload,
}

impl Event {
    pub fn new(level: Level, kind: EventKind) -> Self {
        Event {
            level,
            kind,
            payload: Payload::None,
        }
    }

    pub fn with_node(level: Level, kind: EventKind, node: Node) -> Self {
        Event {
            level,
            kind,
            payload: Payload::Node(Box::new(node)),
        }
    }

    /// Word-level event carrying a text word.
    pub fn word(text: impl Into<String>) -> Self {
        Self::with_node(Level::Word, EventKind::New, Node::word(text))
    }

    pub fn end_document() -> Self {
        Self::new(Level::Document, EventKind::End)
    }

    pub fn title() -> Self {
        Self::new(Level::Header, EventKind::Title)
    }

    pub fn style(style: StyleKind) -> Self {
        Event {
            level: Level::Word,
            kind: EventKind::NewStyle,
            payload: Payload::Style {
                style,
                marker: None,
                explicit: false,
            },
        }
    }

    /// Toggle style: the same event opens and closes the span.
    pub fn toggle_style(style: StyleKind, marker: impl Into<String>) -> Self {
        Event {
            level: Level::Word,
            kind: EventKind::NewStyle,
            payload: Payload::Style {
                style,
                marker: Some(marker.into()),
                explicit: false,
            },
        }
    }

    pub fn open_style(style: StyleKind) -> Self {
        Event {
            level: Level::Word,
            kind: EventKind::NewStyle,
            payload: Payload::Style {
                style,
                marker: None,
                explicit: true,
            },
        }
    }

    pub fn end_style(style: StyleKind) -> Self {
        Event {
            level: Level::Word,
            kind: EventKind::EndStyle,
            payload: Payload::Style {
                style,
                marker: None,
                explicit: false,
            },
        }
    }

    pub fn end_link() -> Self {
        Self::new(Level::Word, EventKind::EndLink)
    }

    pub fn item(kind: ListKind, depth: usize) -> Self {
        Event {
            level: Level::Paragraph,
            kind: EventKind::NewItem,
            payload: Payload::Item { kind, depth },
        }
    }

    pub fn definition(kind: EventKind, depth: usize, alternate: bool) -> Self {
        Event {
            level: Level::Paragraph,
            kind,
            payload: Payload::Def { depth, alternate },
        }
    }

    pub fn quote(kind: EventKind, depth: usize) -> Self {
        Event {
            level: Level::Paragraph,
            kind,
            payload: Payload::Quote { depth },
        }
    }

    pub fn row(kind: RowKind) -> Self {
        Event {
            level: Level::Paragraph,
            kind: EventKind::NewRow,
            payload: Payload::Row { kind },
        }
    }

    pub fn customize(level: Level, customizer: Rc<dyn Customizer>) -> Self {
        Event {
            level,
            kind: EventKind::Customize,
            payload: Payload::Customize(customizer),
        }
    }

    pub fn style_kind(&self) -> Option<&StyleKind> {
        match &self.payload {
            Payload::Style { style, .. } => Some(style),
            _ => None,
        }
    }

    /// Depth carried by quote, item and definition payloads.
    pub fn depth(&self) -> Option<usize> {
        match &self.payload {
            Payload::Quote { depth } | Payload::Item { depth, .. } | Payload::Def { depth, .. } => {
                Some(*depth)
            }
            _ => None,
        }
    }

    /// Node type carried by a ready-made payload.
    pub fn node(&self) -> Option<&Node> {
        match &self.payload {
            Payload::Node(node) => Some(node),
            _ => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.level, self.kind)?;
        match &self.payload {
            Payload::Style { style, .. } => write!(f, "({style})"),
            Payload::Quote { depth } => write!(f, "(depth={depth})"),
            Payload::Item { kind, depth } => write!(f, "({kind}, depth={depth})"),
            Payload::Def { depth, .. } => write!(f, "(depth={depth})"),
            Payload::Node(node) => write!(f, "({})", node.type_name()),
            _ => Ok(()),
        }
    }
}
