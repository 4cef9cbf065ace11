//! Treeviz formatter for document trees
//!
//! Treeviz is a visual representation of the node arena as seen by back-ends: one line
//! per node, with Unicode connectors for the structure and an icon per node type.
//!
//! So the format is :
//! <line number>?<connectors> <icon> <type> <label> <[role]>? <{info}>?
//!
//! Example:
//!
//! ⧉ Document (1 items)
//! └─ § Header h1
//!   ├─ ¶ Par [title]
//!   │ └─ ◦ Word "Title"
//!   ├─ ¶ Par
//!   │ └─ ◦ Word "Body text "
//!   └─ ☰ List bullet depth 1
//!     └─ • ListItem
//!       └─ ¶ Par
//!         └─ ◦ Word "a "
//!
//! Header titles and definition terms and bodies are shown in their slot, tagged with
//! their role. Captions only appear, as text, among the info entries.

use super::icons::get_icon;
use crate::error::FormatError;
use crate::format::{bool_option, Format};
use crate::generator::{generate, Generator, Role, Walk};
use crate::tree::{Document, InfoValue, NodeId};
use std::collections::HashMap;

/// Options of the treeviz dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreevizOptions {
    /// Prefix every node with the source line it was inserted at.
    pub show_line_numbers: bool,
    /// Append the info entries of every node.
    pub show_info: bool,
}

impl TreevizOptions {
    /// Options from `show-linum` and `show-info` parameters.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, FormatError> {
        Ok(TreevizOptions {
            show_line_numbers: bool_option(params, "show-linum")?.unwrap_or(false),
            show_info: bool_option(params, "show-info")?.unwrap_or(false),
        })
    }
}

struct Frame {
    remaining: usize,
    last: bool,
}

struct TreevizGenerator {
    options: TreevizOptions,
    output: String,
    frames: Vec<Frame>,
}

impl TreevizGenerator {
    fn new(options: TreevizOptions) -> Self {
        TreevizGenerator {
            options,
            output: String::new(),
            frames: Vec::new(),
        }
    }

    /// Connector columns of the open ancestors, the root excluded.
    fn prefix(&self) -> String {
        self.frames
            .iter()
            .skip(1)
            .map(|frame| if frame.last { "  " } else { "│ " })
            .collect()
    }

    fn line_number(&self, doc: &Document, id: NodeId) -> String {
        if !self.options.show_line_numbers {
            return String::new();
        }
        match doc.node(id).source.as_ref().and_then(|source| source.line) {
            Some(line) => format!("{line:02} "),
            None => "-- ".to_string(),
        }
    }

    fn info(&self, doc: &Document, id: NodeId) -> String {
        let info = &doc.node(id).info;
        if !self.options.show_info || info.is_empty() {
            return String::new();
        }
        let entries: Vec<String> = info
            .iter()
            .map(|(key, value)| format!("{key}={}", info_text(doc, value)))
            .collect();
        format!(" {{{}}}", entries.join(", "))
    }
}

fn info_text(doc: &Document, value: &InfoValue) -> String {
    match value {
        InfoValue::Text(text) => text.clone(),
        InfoValue::Int(value) => value.to_string(),
        InfoValue::Align(align) => format!("{align:?}").to_lowercase(),
        InfoValue::Node(id) => format!("{:?}", doc.to_text(*id)),
        InfoValue::List(items) => format!("[{}]", items.join(", ")),
    }
}

impl Generator for TreevizGenerator {
    fn backend(&self) -> &str {
        "treeviz"
    }

    fn enter(&mut self, doc: &Document, id: NodeId, role: Role) -> Result<Walk, FormatError> {
        let node = doc.node(id);
        let slots = doc.slots(id).len();
        let icon = get_icon(node.type_name());

        let position = self.frames.last_mut().map(|parent| {
            parent.remaining = parent.remaining.saturating_sub(1);
            parent.remaining == 0
        });
        let last = match position {
            None => {
                self.output.push_str(&format!(
                    "{icon} {} ({slots} items){}\n",
                    node.type_name(),
                    self.info(doc, id)
                ));
                true
            }
            Some(last) => {
                let connector = if last { "└─" } else { "├─" };
                let mut label = node.type_name().to_string();
                let detail = node.display_label();
                if !detail.is_empty() {
                    label.push(' ');
                    label.push_str(&detail);
                }
                match role {
                    Role::Title => label.push_str(" [title]"),
                    Role::Term => label.push_str(" [term]"),
                    Role::Body => label.push_str(" [body]"),
                    Role::Root | Role::Child => {}
                }
                self.output.push_str(&format!(
                    "{}{}{connector} {icon} {label}{}\n",
                    self.line_number(doc, id),
                    self.prefix(),
                    self.info(doc, id)
                ));
                last
            }
        };

        self.frames.push(Frame {
            remaining: slots,
            last,
        });
        Ok(Walk::Children)
    }

    fn leave(&mut self, _doc: &Document, _id: NodeId, _role: Role) -> Result<(), FormatError> {
        self.frames.pop();
        Ok(())
    }

    fn raw(&mut self, text: &str) {
        self.output.push_str(text);
    }
}

pub fn to_treeviz_str(doc: &Document) -> Result<String, FormatError> {
    to_treeviz_str_with_options(doc, TreevizOptions::default())
}

pub fn to_treeviz_str_with_options(
    doc: &Document,
    options: TreevizOptions,
) -> Result<String, FormatError> {
    let mut gen = TreevizGenerator::new(options);
    generate(doc, &mut gen)?;
    Ok(gen.output)
}

/// Format implementation for treeviz format
pub struct TreevizFormat;

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Visual tree representation with Unicode connectors and icons"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tree", "treeviz"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        to_treeviz_str(doc)
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        to_treeviz_str_with_options(doc, TreevizOptions::from_params(options)?)
    }
}
