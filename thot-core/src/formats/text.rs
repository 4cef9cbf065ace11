//! Plain text rendering
//!
//! Paragraph-level nodes become blocks separated by a blank line. Header titles get
//! `#` marks, list items a bullet or a number, quoted blocks `>` marks, table rows keep
//! their cells on one line separated by `|`.
//!
//! Tables, figures and listings are numbered in document order; one with a caption is
//! followed by a block such as `Table 2: caption`. Footnotes show as `[n]`.

use crate::error::FormatError;
use crate::format::Format;
use crate::generator::{generate, Generator, Role, Walk};
use crate::tree::{Document, FootnoteKind, ListKind, NodeId, NodeKind, Numbering};
use std::collections::HashMap;

#[derive(Default)]
struct TextGenerator {
    blocks: Vec<String>,
    line: String,
    /// Marks prepended to the next flushed block.
    pending: String,
    quote_depth: usize,
    in_row: bool,
    lists: Vec<(ListKind, usize)>,
    counters: HashMap<Numbering, usize>,
}

impl TextGenerator {
    fn flush(&mut self) {
        let text = self.line.trim_end();
        if !text.is_empty() || !self.pending.is_empty() {
            let quote = "> ".repeat(self.quote_depth);
            self.blocks
                .push(format!("{quote}{}{}", self.pending, text).trim_end().to_string());
        }
        self.line.clear();
        self.pending.clear();
    }

    /// Count a numbered node and push its caption line, if it has one.
    fn number(&mut self, doc: &Document, id: NodeId) {
        let Some(numbering) = doc.node(id).numbering() else {
            return;
        };
        let name = match numbering {
            Numbering::Figure => "Figure",
            Numbering::Table => "Table",
            Numbering::Listing => "Listing",
            Numbering::Header(_) => return,
        };
        let count = self.counters.entry(numbering).or_default();
        *count += 1;
        let count = *count;
        if let Some(caption) = doc.caption(id) {
            self.flush();
            let text = doc.to_text(caption);
            self.blocks.push(format!("{name} {count}: {}", text.trim_end()));
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        let mut output = self.blocks.join("\n\n");
        if !output.is_empty() {
            output.push('\n');
        }
        output
    }
}

impl Generator for TextGenerator {
    fn backend(&self) -> &str {
        "text"
    }

    fn enter(&mut self, doc: &Document, id: NodeId, role: Role) -> Result<Walk, FormatError> {
        match &doc.node(id).kind {
            NodeKind::Word { text } => self.line.push_str(text),
            NodeKind::Glyph { code } => {
                if let Some(glyph) = char::from_u32(*code) {
                    self.line.push(glyph);
                }
            }
            NodeKind::LineBreak => self.line.push('\n'),
            NodeKind::Ref { label } => self.line.push_str(&format!("[{label}]")),
            NodeKind::Tag { term } => match doc.resolve_hash(term) {
                Some(text) => self.line.push_str(&text),
                None => self.line.push_str(term),
            },
            NodeKind::Image { path } => self.line.push_str(&format!("[image: {path}]")),
            NodeKind::FootNote { kind, reference } => {
                let mark = reference.as_deref().unwrap_or("*");
                match kind {
                    FootnoteKind::Reference => {
                        self.line.push_str(&format!("[{mark}]"));
                        return Ok(Walk::Skip);
                    }
                    FootnoteKind::Definition => self.line.push_str(&format!("[{mark}] ")),
                }
            }
            NodeKind::Figure { path } => {
                self.flush();
                self.line.push_str(&format!("[figure: {path}]"));
                self.flush();
            }
            NodeKind::HorizontalLine => {
                self.flush();
                self.line.push_str("----");
                self.flush();
            }
            NodeKind::Block { lines, .. } => {
                self.flush();
                self.blocks.push(lines.join("\n"));
                return Ok(Walk::Skip);
            }
            NodeKind::Header { level, .. } => {
                self.flush();
                self.pending = format!("{} ", "#".repeat(usize::from(*level)));
            }
            NodeKind::Quote { .. } => {
                self.flush();
                self.quote_depth += 1;
            }
            NodeKind::List { kind, .. } => self.lists.push((*kind, 0)),
            NodeKind::ListItem => {
                self.flush();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                if let Some((kind, count)) = self.lists.last_mut() {
                    *count += 1;
                    self.pending = match kind {
                        ListKind::Bullet => format!("{indent}- "),
                        ListKind::Number => format!("{indent}{count}. "),
                    };
                }
            }
            NodeKind::Row { .. } => {
                self.flush();
                self.in_row = true;
            }
            NodeKind::Cell { .. } if self.line.is_empty() => self.line.push_str("| "),
            NodeKind::Par if role == Role::Body => self.pending = ": ".to_string(),
            _ => {}
        }
        Ok(Walk::Children)
    }

    fn leave(&mut self, doc: &Document, id: NodeId, _role: Role) -> Result<(), FormatError> {
        match &doc.node(id).kind {
            NodeKind::Par if !self.in_row => self.flush(),
            NodeKind::Cell { .. } => {
                let trimmed = self.line.trim_end().len();
                self.line.truncate(trimmed);
                self.line.push_str(" | ");
            }
            NodeKind::Row { .. } => {
                self.in_row = false;
                self.flush();
            }
            NodeKind::Quote { .. } => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            NodeKind::List { .. } => {
                self.lists.pop();
            }
            NodeKind::Table { .. } | NodeKind::Figure { .. } | NodeKind::Block { .. } => {
                self.number(doc, id);
            }
            _ => {}
        }
        Ok(())
    }

    fn raw(&mut self, text: &str) {
        self.blocks.push(text.to_string());
    }
}

/// Format implementation for plain text output
pub struct TextFormat;

impl Format for TextFormat {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Plain text with light markup for structure"
    }

    fn file_extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        let mut gen = TextGenerator::default();
        generate(doc, &mut gen)?;
        Ok(gen.finish())
    }
}
