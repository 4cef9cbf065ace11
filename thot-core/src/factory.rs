//! Node construction indirection
//!
//! The manager builds every structural node through a [`Factory`], so a front-end can
//! substitute its own flavour of paragraph, quote or table (extra info, different
//! defaults) without touching the manager or the node protocol. Factories produce
//! detached [`Node`] values; the manager moves them into the arena.

use crate::tree::info::{self, Align, InfoValue};
use crate::tree::{FootnoteKind, ListKind, Node, NodeId, NodeKind, RowKind, StyleKind};

pub trait Factory {
    fn make_par(&self) -> Node {
        Node::new(NodeKind::Par)
    }

    fn make_header(&self, level: u8) -> Node {
        Node::new(NodeKind::Header {
            level,
            title: None,
            in_title: true,
        })
    }

    fn make_quote(&self, depth: usize) -> Node {
        Node::new(NodeKind::Quote { depth })
    }

    fn make_list(&self, kind: ListKind, depth: usize) -> Node {
        Node::new(NodeKind::List { kind, depth })
    }

    fn make_list_item(&self) -> Node {
        Node::new(NodeKind::ListItem)
    }

    fn make_def_list(&self, depth: usize, alternate: bool) -> Node {
        Node::new(NodeKind::DefList {
            depth,
            alternate,
            in_term: true,
        })
    }

    fn make_def_item(&self, term: NodeId, body: NodeId) -> Node {
        Node::new(NodeKind::DefItem { term, body })
    }

    fn make_table(&self) -> Node {
        Node::new(NodeKind::Table {
            width: Default::default(),
        })
    }

    fn make_row(&self, kind: RowKind) -> Node {
        Node::new(NodeKind::Row { kind })
    }

    fn make_cell(&self, kind: RowKind, align: Option<Align>, hspan: usize) -> Node {
        let mut cell = Node::new(NodeKind::Cell { kind });
        if let Some(align) = align {
            cell.info.set(info::ALIGN, InfoValue::Align(align));
        }
        if hspan > 1 {
            cell.info.set(info::HSPAN, InfoValue::Int(hspan as i64));
        }
        cell
    }

    fn make_word(&self, text: &str) -> Node {
        Node::word(text)
    }

    fn make_glyph(&self, code: u32) -> Node {
        Node::new(NodeKind::Glyph { code })
    }

    fn make_line_break(&self) -> Node {
        Node::new(NodeKind::LineBreak)
    }

    fn make_horizontal_line(&self) -> Node {
        Node::new(NodeKind::HorizontalLine)
    }

    fn make_style(&self, style: StyleKind) -> Node {
        Node::new(NodeKind::Style {
            style,
            marker: None,
            terminated: false,
        })
    }

    fn make_open_style(&self, style: StyleKind) -> Node {
        Node::new(NodeKind::OpenStyle { style })
    }

    fn make_footnote(&self, kind: FootnoteKind, reference: Option<&str>) -> Node {
        Node::new(NodeKind::FootNote {
            kind,
            reference: reference.map(str::to_string),
        })
    }

    fn make_link(&self, target: &str) -> Node {
        Node::new(NodeKind::Link {
            target: target.to_string(),
        })
    }

    fn make_ref(&self, label: &str) -> Node {
        Node::new(NodeKind::Ref {
            label: label.to_string(),
        })
    }

    fn make_tag(&self, term: &str) -> Node {
        Node::new(NodeKind::Tag {
            term: term.to_string(),
        })
    }

    fn make_image(
        &self,
        path: &str,
        width: Option<u32>,
        height: Option<u32>,
        alt: Option<&str>,
    ) -> Node {
        sized(Node::new(NodeKind::Image { path: path.to_string() }), width, height, alt)
    }

    fn make_figure(
        &self,
        path: &str,
        width: Option<u32>,
        height: Option<u32>,
        alt: Option<&str>,
    ) -> Node {
        sized(Node::new(NodeKind::Figure { path: path.to_string() }), width, height, alt)
    }

    fn make_block(&self, kind: &str) -> Node {
        Node::new(NodeKind::Block {
            kind: kind.to_string(),
            lines: Vec::new(),
        })
    }
}

fn sized(mut node: Node, width: Option<u32>, height: Option<u32>, alt: Option<&str>) -> Node {
    if let Some(width) = width {
        node.info.set(info::WIDTH, InfoValue::Int(i64::from(width)));
    }
    if let Some(height) = height {
        node.info.set(info::HEIGHT, InfoValue::Int(i64::from(height)));
    }
    if let Some(alt) = alt {
        node.info.set(info::ALT, InfoValue::Text(alt.to_string()));
    }
    node
}

/// Factory building the plain node family.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFactory;

impl Factory for DefaultFactory {}
