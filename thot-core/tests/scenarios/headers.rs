use crate::common::{child_types, parse_textile, top_level};
use thot_core::tree::NodeKind;

#[test]
fn test_header_title_and_body() {
    let output = parse_textile("h1.Title\nsome body\nh1.Next");
    let doc = &output.document;
    let top = top_level(doc);
    assert_eq!(child_types(doc, doc.root()), ["Header", "Header"]);

    let first = top[0];
    assert!(matches!(doc.kind(first), NodeKind::Header { level: 1, .. }));
    let title = doc.header_title(first).expect("title");
    assert_eq!(doc.to_text(title), "Title");
    assert_eq!(child_types(doc, first), ["Par"]);
    assert_eq!(doc.to_text(doc.children(first)[0]), "some body ");

    let next = doc.header_title(top[1]).expect("title");
    assert_eq!(doc.to_text(next), "Next");
}

#[test]
fn test_deeper_headers_nest() {
    let output = parse_textile("h1. A\nh2. B\nh3. C\nh2. D\nh1. E");
    let doc = &output.document;
    let top = top_level(doc);
    assert_eq!(top.len(), 2);
    assert_eq!(child_types(doc, top[0]), ["Header", "Header"]);
    let b = doc.children(top[0])[0];
    assert_eq!(child_types(doc, b), ["Header"]);
}

#[test]
fn test_header_level_is_kept_as_written() {
    let output = parse_textile("h3. Deep start");
    let doc = &output.document;
    assert!(matches!(
        doc.kind(top_level(doc)[0]),
        NodeKind::Header { level: 3, .. }
    ));
}
