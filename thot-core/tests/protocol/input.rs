use std::collections::HashMap;
use std::io::Cursor;
use thot_core::error::ProtocolError;
use thot_core::factory::Factory;
use thot_core::manager::{Manager, ParseOptions};
use thot_core::syntax::textile::TextileModule;
use thot_core::syntax::{LinePattern, ModuleCatalog, SyntaxModule};
use thot_core::tree::info::{self, InfoValue};
use thot_core::tree::{Document, Environment, Node, NodeKind};

/// Lines starting with `!` are shouted.
struct Shout;

impl SyntaxModule for Shout {
    fn name(&self) -> &str {
        "shout"
    }

    fn file_extensions(&self) -> &[&str] {
        &["shout"]
    }

    fn lines(&self) -> Result<Vec<LinePattern>, ProtocolError> {
        Ok(vec![LinePattern::new(r"^!(?P<text>.*)", |man, caps| {
            man.parse_text(&caps["text"].to_uppercase())
        })?])
    }
}

struct MarkedParagraphs;

impl Factory for MarkedParagraphs {
    fn make_par(&self) -> Node {
        Node::new(NodeKind::Par).with_info(info::CLASS, InfoValue::Text("marked".to_string()))
    }
}

/// Variables with a fallback value for undefined names.
#[derive(Default)]
struct Defaulted(HashMap<String, String>);

impl Environment for Defaulted {
    fn raw(&self, name: &str) -> Option<String> {
        Some(self.0.get(name).cloned().unwrap_or_else(|| format!("<{name}>")))
    }

    fn set(&mut self, name: &str, value: &str) {
        self.0.insert(name.to_string(), value.to_string());
    }
}

#[test]
fn test_reader_input_matches_string_input() {
    let text = "h2. Same\n* a\n* b\n";
    let mut from_reader = Manager::new();
    from_reader
        .parse_reader(Cursor::new(text.as_bytes()), "doc.textile")
        .unwrap();
    let mut from_str = Manager::new();
    from_str.parse_str(text, "doc.textile").unwrap();

    let a = from_reader.finish().unwrap().document;
    let b = from_str.finish().unwrap().document;
    assert_eq!(a.to_text(a.root()), b.to_text(b.root()));
    assert_eq!(a.arena_len(), b.arena_len());
}

#[test]
fn test_unreadable_input_is_a_parse_error() {
    let mut man = Manager::new();
    let err = man
        .parse_reader(Cursor::new(vec![b'o', b'k', b'\n', 0xff, 0xfe, b'\n']), "bad.textile")
        .unwrap_err();
    assert!(matches!(err.kind, ProtocolError::Input(_)));
    assert_eq!(err.location.line, Some(2));
}

#[test]
fn test_module_activated_explicitly() {
    let mut man = Manager::with_options(ParseOptions::default());
    man.use_module(std::rc::Rc::new(TextileModule)).unwrap();
    assert!(man.is_used("textile"));
    man.parse_str("h1. Head", "").unwrap();
    let output = man.finish().unwrap();
    let doc = &output.document;
    assert_eq!(doc.children(doc.root()).len(), 1);
}

#[test]
fn test_use_directive_activates_a_module() {
    let mut man = Manager::new();
    man.parse_str("@use textile\nbq. inside", "plain").unwrap();
    assert!(man.is_used("textile"));
    let output = man.finish().unwrap();
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_without_a_module_lines_are_plain_text() {
    let mut man = Manager::new();
    man.parse_str("h1. not a header", "notes.txt").unwrap();
    let output = man.finish().unwrap();
    let doc = &output.document;
    let par = doc.children(doc.root())[0];
    assert_eq!(doc.node(par).type_name(), "Par");
    assert_eq!(doc.to_text(par), "h1. not a header ");
}

#[test]
fn test_host_catalog_module_detected_by_extension() {
    let mut catalog = ModuleCatalog::with_defaults();
    catalog.register(Shout);
    let mut man = Manager::new().with_catalog(catalog);
    man.parse_str("!hello\nquiet", "greeting.shout").unwrap();
    assert!(man.is_used("shout"));
    let doc = man.finish().unwrap().document;
    assert_eq!(doc.to_text(doc.root()), "HELLO quiet ");
}

#[test]
fn test_host_catalog_replaces_defaults() {
    let mut man = Manager::new().with_catalog(ModuleCatalog::new());
    man.parse_str("@use textile", "plain").unwrap();
    let output = man.finish().unwrap();
    assert_eq!(output.errors().count(), 1);
}

#[test]
fn test_custom_factory_builds_paragraphs() {
    let mut man = Manager::new().with_factory(Box::new(MarkedParagraphs));
    man.parse_str("some text", "plain").unwrap();
    let doc = man.finish().unwrap().document;
    let par = doc.children(doc.root())[0];
    assert_eq!(doc.node(par).info.text(info::CLASS), Some("marked"));
}

#[test]
fn test_custom_environment_reduces_lines() {
    let doc = Document::with_environment(Box::new(Defaulted::default()));
    let mut man = Manager::with_document(doc, ParseOptions::default());
    man.parse_str("@who = world\nhello @(who) and @(nobody)", "plain").unwrap();
    let doc = man.finish().unwrap().document;
    assert_eq!(doc.to_text(doc.root()), "hello world and <nobody> ");
}
