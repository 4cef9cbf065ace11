use crate::common::parse_textile;
use thot_core::manager::{parse_with, ParseOptions};
use thot_core::tree::{NodeKind, StyleKind};

#[test]
fn test_bold_span_contains_its_word() {
    let output = parse_textile("**bold**");
    let doc = &output.document;
    let par = doc.children(doc.root())[0];
    let style = doc.children(par)[0];
    assert!(matches!(
        doc.kind(style),
        NodeKind::Style {
            style: StyleKind::Bold,
            ..
        }
    ));
    assert_eq!(doc.to_text(style), "bold");
}

#[test]
fn test_mismatched_toggle_is_literal_at_end_of_line() {
    let output = parse_textile("**bold*");
    let doc = &output.document;
    let par = doc.children(doc.root())[0];
    assert_eq!(doc.to_text(par), "**bold* ");
    let styles = doc
        .descendants(par)
        .into_iter()
        .filter(|id| matches!(doc.kind(*id), NodeKind::Style { .. }))
        .count();
    assert_eq!(styles, 0);
    assert!(!output.has_errors());
}

#[test]
fn test_unterminated_toggle_can_be_kept_as_a_span() {
    let options = ParseOptions {
        literal_unterminated_styles: false,
        ..ParseOptions::default()
    };
    let output = parse_with("*strong", "", "textile", options).unwrap();
    let doc = &output.document;
    let par = doc.children(doc.root())[0];
    let style = doc.children(par)[0];
    assert!(matches!(
        doc.kind(style),
        NodeKind::Style {
            style: StyleKind::Strong,
            terminated: false,
            ..
        }
    ));
}

#[test]
fn test_toggle_does_not_cross_lines() {
    let output = parse_textile("_open\nclose_");
    let doc = &output.document;
    let par = doc.children(doc.root())[0];
    assert_eq!(doc.to_text(par), "_open close_ ");
}
