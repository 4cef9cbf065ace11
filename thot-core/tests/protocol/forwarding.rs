use std::rc::Rc;
use thot_core::error::{ProtocolError, Severity};
use thot_core::event::{Customizer, Event, EventKind, Level};
use thot_core::manager::Manager;
use thot_core::tree::{InfoValue, Node, NodeKind, StyleKind};

#[test]
fn test_end_quote_deeper_than_any_open_quote_fails() {
    let mut man = Manager::new();
    man.send(Event::quote(EventKind::NewQuote, 1)).unwrap();
    man.send(Event::word("text")).unwrap();
    let err = man.send(Event::quote(EventKind::EndQuote, 2)).unwrap_err();
    assert!(matches!(err.kind, ProtocolError::ClosedNotOpened { .. }));
}

#[test]
fn test_row_end_outside_any_table_has_no_acceptor() {
    let mut man = Manager::new();
    man.send(Event::word("loose")).unwrap();
    let err = man
        .send(Event::new(Level::Paragraph, EventKind::EndRow))
        .unwrap_err();
    assert_eq!(
        err.kind,
        ProtocolError::NoAcceptor {
            event: Event::new(Level::Paragraph, EventKind::EndRow).to_string(),
        }
    );
}

#[test]
fn test_item_end_closes_the_list() {
    let mut man = Manager::new();
    man.send(Event::item(thot_core::tree::ListKind::Bullet, 1)).unwrap();
    man.send(Event::word("a")).unwrap();
    man.send(Event::new(Level::Paragraph, EventKind::EndItem)).unwrap();
    assert_eq!(man.depth(), 1);
    let err = man
        .send(Event::new(Level::Paragraph, EventKind::EndItem))
        .unwrap_err();
    assert!(matches!(err.kind, ProtocolError::NoAcceptor { .. }));
}

#[test]
fn test_explicit_style_closed_by_another_fails() {
    let mut man = Manager::new();
    man.send(Event::open_style(StyleKind::Code)).unwrap();
    man.send(Event::word("x")).unwrap();
    let err = man.send(Event::end_style(StyleKind::Bold)).unwrap_err();
    assert_eq!(
        err.kind,
        ProtocolError::StyleMismatch {
            open: "code".to_string(),
            found: "bold".to_string(),
        }
    );
}

#[test]
fn test_paragraph_event_closes_inline_spans() {
    let mut man = Manager::new();
    man.send(Event::style(StyleKind::Italic)).unwrap();
    man.send(Event::word("a")).unwrap();
    man.send(Event::quote(EventKind::NewQuote, 1)).unwrap();
    let doc = man.document();
    let types: Vec<_> = doc
        .children(doc.root())
        .iter()
        .map(|id| doc.node(*id).type_name())
        .collect();
    assert_eq!(types, ["Par", "Quote"]);
    assert_eq!(man.depth(), 2);
}

#[test]
fn test_finish_closes_everything() {
    let mut man = Manager::new();
    man.send(Event::item(thot_core::tree::ListKind::Bullet, 1)).unwrap();
    man.send(Event::item(thot_core::tree::ListKind::Bullet, 2)).unwrap();
    man.send(Event::word("deep")).unwrap();
    assert!(man.depth() > 2);
    let output = man.finish().unwrap();
    assert_eq!(output.document.to_text(output.document.root()), "deep");
}

#[test]
fn test_popping_the_root_is_refused() {
    let mut man = Manager::new();
    let err = man.pop().unwrap_err();
    assert_eq!(err.kind, ProtocolError::PopRoot);
}

struct Classify;

impl Customizer for Classify {
    fn matches(&self, node: &Node) -> bool {
        matches!(node.kind, NodeKind::Quote { .. })
    }

    fn process(&self, node: &mut Node) {
        node.info.set("class", InfoValue::Text("aside".to_string()));
    }
}

#[test]
fn test_customization_reaches_the_nearest_matching_node() {
    let mut man = Manager::new();
    man.send(Event::quote(EventKind::NewQuote, 1)).unwrap();
    man.send(Event::word("x")).unwrap();
    man.send(Event::customize(Level::Word, Rc::new(Classify))).unwrap();
    let doc = man.document();
    let quote = doc.children(doc.root())[0];
    assert_eq!(doc.node(quote).info.text("class"), Some("aside"));
    // the customization does not close the quote
    assert_eq!(man.top(), quote);
}

#[test]
fn test_customization_without_target_warns() {
    let mut man = Manager::new();
    man.send(Event::customize(Level::Word, Rc::new(Classify))).unwrap();
    let output = man.finish().unwrap();
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].severity, Severity::Warning);
}

#[test]
fn test_end_of_document_leaves_only_the_root() {
    let mut man = Manager::new();
    man.send(Event::quote(EventKind::NewQuote, 1)).unwrap();
    man.send(Event::quote(EventKind::NewQuote, 2)).unwrap();
    man.send(Event::open_style(StyleKind::Code)).unwrap();
    man.send(Event::word("x")).unwrap();
    man.end().unwrap();
    assert_eq!(man.depth(), 1);
    assert_eq!(man.top(), man.document().root());
}
