//! Shared helpers for the integration tests.

use thot_core::error::{Diagnostic, Severity};
use thot_core::manager::{Manager, ParseOutput};
use thot_core::tree::{Document, NodeId};

/// Parse `text` as a textile file and close the document.
pub fn parse_textile(text: &str) -> ParseOutput {
    let mut man = Manager::new();
    man.parse_str(text, "test.textile").expect("parse");
    man.finish().expect("finish")
}

/// Type names of the children of `id`.
pub fn child_types(doc: &Document, id: NodeId) -> Vec<&'static str> {
    doc.children(id)
        .iter()
        .map(|child| doc.node(*child).type_name())
        .collect()
}

pub fn top_level(doc: &Document) -> Vec<NodeId> {
    doc.children(doc.root()).to_vec()
}

pub fn with_severity(output: &ParseOutput, severity: Severity) -> Vec<&Diagnostic> {
    output
        .diagnostics
        .iter()
        .filter(|diag| diag.severity == severity)
        .collect()
}
