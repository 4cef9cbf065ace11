use crate::common::{child_types, parse_textile, top_level};
use thot_core::manager::{Manager, ParseOptions};
use thot_core::tree::{Document, ListKind, NodeId, NodeKind};

fn parse_without_suffix(text: &str) -> Document {
    let options = ParseOptions {
        line_suffix: String::new(),
        ..ParseOptions::default()
    };
    let mut man = Manager::with_options(options);
    man.parse_str(text, "test.textile").unwrap();
    man.finish().unwrap().document
}

fn definitions(doc: &Document, list: NodeId) -> Vec<(String, String)> {
    doc.children(list)
        .iter()
        .map(|item| match doc.kind(*item) {
            NodeKind::DefItem { term, body } => (doc.to_text(*term), doc.to_text(*body)),
            other => panic!("expected a definition item, got {other:?}"),
        })
        .collect()
}

#[test]
fn test_bullet_items_share_one_list() {
    let output = parse_textile("* a\n* b\n");
    let doc = &output.document;
    let top = top_level(doc);
    assert_eq!(top.len(), 1);
    assert!(matches!(
        doc.kind(top[0]),
        NodeKind::List {
            kind: ListKind::Bullet,
            depth: 1
        }
    ));
    let items = doc.children(top[0]);
    assert_eq!(child_types(doc, top[0]), ["ListItem", "ListItem"]);
    assert_eq!(doc.to_text(items[0]), "a ");
    assert_eq!(doc.to_text(items[1]), "b ");
}

#[test]
fn test_blank_line_closes_the_paragraph_not_the_list() {
    let output = parse_textile("* a\n* b\n\n* c");
    let doc = &output.document;
    let top = top_level(doc);
    assert_eq!(top.len(), 1);
    assert_eq!(doc.children(top[0]).len(), 3);
}

#[test]
fn test_text_after_blank_line_opens_a_paragraph() {
    let output = parse_textile("* a\n\nafter");
    let doc = &output.document;
    let top = top_level(doc);
    assert_eq!(child_types(doc, doc.root()), ["List", "Par"]);
    assert_eq!(doc.to_text(top[1]), "after ");
}

#[test]
fn test_nested_and_numbered_lists() {
    let output = parse_textile("# one\n## inner\n# two");
    let doc = &output.document;
    let list = top_level(doc)[0];
    assert!(matches!(
        doc.kind(list),
        NodeKind::List {
            kind: ListKind::Number,
            depth: 1
        }
    ));
    let items = doc.children(list);
    assert_eq!(items.len(), 2);
    assert_eq!(child_types(doc, items[0]), ["Par", "List"]);
    assert_eq!(doc.to_text(items[1]), "two ");
}

#[test]
fn test_definitions_aggregate_into_one_list() {
    let output = parse_textile("-cat := meows\n-dog := barks");
    let doc = &output.document;
    let top = top_level(doc);
    assert_eq!(top.len(), 1);
    assert_eq!(child_types(doc, top[0]), ["DefItem", "DefItem"]);
    let second = doc.children(top[0])[1];
    let NodeKind::DefItem { term, body } = doc.kind(second) else {
        panic!("expected a definition item");
    };
    assert_eq!(doc.to_text(*term), "dog");
    assert_eq!(doc.to_text(*body), "barks");
}

#[test]
fn test_empty_last_item_is_pruned() {
    let doc = parse_without_suffix("* a\n* ");
    let list = top_level(&doc)[0];
    assert_eq!(child_types(&doc, list), ["ListItem"]);
    assert_eq!(doc.to_text(list), "a");
}

#[test]
fn test_list_of_only_empty_items_disappears() {
    let doc = parse_without_suffix("* \n\nafter");
    assert_eq!(child_types(&doc, doc.root()), ["Par"]);
    assert_eq!(doc.to_text(doc.root()), "after");
}

#[test]
fn test_empty_item_before_nested_list_keeps_only_the_list() {
    let doc = parse_without_suffix("* \n** inner");
    let list = top_level(&doc)[0];
    let item = doc.children(list)[0];
    assert_eq!(child_types(&doc, item), ["List"]);
}

#[test]
fn test_alternate_definitions_take_term_then_body() {
    let output = parse_textile("; cat\n; meows\n; dog\n; barks");
    let doc = &output.document;
    let top = top_level(doc);
    assert_eq!(top.len(), 1);
    assert!(matches!(
        doc.kind(top[0]),
        NodeKind::DefList {
            alternate: true,
            ..
        }
    ));
    assert_eq!(
        definitions(doc, top[0]),
        [
            ("cat".to_string(), "meows".to_string()),
            ("dog".to_string(), "barks".to_string())
        ]
    );
}
