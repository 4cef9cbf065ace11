use crate::common::{parse_textile, top_level, with_severity};
use thot_core::error::Severity;

#[test]
fn test_reference_to_a_labelled_header_resolves() {
    let output = parse_textile("h1. Intro\n@label intro\nsee @ref:intro@");
    assert!(!output.has_errors());
    let doc = &output.document;
    assert_eq!(doc.get_label("intro"), Some(top_level(doc)[0]));
}

#[test]
fn test_unresolved_reference_is_an_error_with_location() {
    let output = parse_textile("first line\n\nsee @ref:nowhere@ please");
    let errors: Vec<_> = output.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].location.file.as_deref(), Some("test.textile"));
    assert_eq!(errors[0].location.line, Some(3));
    assert_eq!(errors[0].message, "unresolved reference 'nowhere'");
}

#[test]
fn test_redefined_label_moves_with_a_warning() {
    let output = parse_textile("h1. A\n@label x\nh1. B\n@label x");
    let doc = &output.document;
    let top = top_level(doc);
    assert_eq!(doc.get_label("x"), Some(top[1]));
    assert!(doc.labels_of(top[0]).is_empty());
    assert_eq!(doc.labels_of(top[1]), ["x"]);

    let warnings = with_severity(&output, Severity::Warning);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("redefined"));
}

#[test]
fn test_label_outside_any_container_is_dropped() {
    let output = parse_textile("plain text\n@label lost");
    assert_eq!(output.document.get_label("lost"), None);
    assert_eq!(with_severity(&output, Severity::Warning).len(), 1);
}

#[test]
fn test_caption_attaches_to_the_table() {
    let output = parse_textile("|a|b|\n@caption Numbers\n@label tab");
    let doc = &output.document;
    let table = top_level(doc)[0];
    let caption = doc.caption(table).expect("caption");
    assert_eq!(doc.to_text(caption), "Numbers");
    assert_eq!(doc.get_label("tab"), Some(table));
}

#[test]
fn test_unknown_module_is_reported_and_parsing_goes_on() {
    let output = parse_textile("@use nope\nstill here");
    let errors: Vec<_> = output.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "unknown module 'nope'");
    let doc = &output.document;
    assert_eq!(doc.to_text(doc.root()), "still here ");
}

#[test]
fn test_malformed_image_is_skipped_with_an_error() {
    let output = parse_textile("see !pic.png 99999999999x2! here");
    assert_eq!(output.errors().count(), 1);
    let doc = &output.document;
    assert_eq!(doc.to_text(doc.root()), "see  here ");
}
