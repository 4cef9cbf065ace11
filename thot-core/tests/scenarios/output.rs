use crate::common::parse_textile;
use insta::assert_snapshot;
use std::collections::HashMap;
use thot_core::registry::FormatRegistry;

#[test]
fn test_treeviz_dump() {
    let output = parse_textile("h1. Title\nBody text\n* a");
    let registry = FormatRegistry::default();
    let dump = registry.serialize(&output.document, "treeviz").unwrap();
    assert_snapshot!(dump.trim_end(), @r#"
    ⧉ Document (1 items)
    └─ § Header h1
      ├─ ¶ Par [title]
      │ └─ ◦ Word "Title"
      ├─ ¶ Par
      │ └─ ◦ Word "Body text "
      └─ ☰ List bullet depth 1
        └─ • ListItem
          └─ ¶ Par
            └─ ◦ Word "a "
    "#);
}

#[test]
fn test_treeviz_with_line_numbers() {
    let output = parse_textile("first\n\nbq. quoted");
    let registry = FormatRegistry::default();
    let mut options = HashMap::new();
    options.insert("show-linum".to_string(), "true".to_string());
    let dump = registry
        .serialize_with_options(&output.document, "treeviz", &options)
        .unwrap();
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines[1], "01 ├─ ¶ Par");
    assert_eq!(lines[3], "03 └─ \" Quote depth 1");
}

#[test]
fn test_json_dump_of_a_figure() {
    let output = parse_textile("!chart.png 20x10 (A chart)!\n@caption Results\n@label fig");
    let registry = FormatRegistry::default();
    let json = registry.serialize(&output.document, "json").unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let figure = &value["children"][0];
    assert_eq!(figure["type"], "figure");
    assert_eq!(figure["path"], "chart.png");
    assert_eq!(figure["info"]["width"], 20);
    assert_eq!(figure["info"]["height"], 10);
    assert_eq!(figure["info"]["alt"], "A chart");
    assert_eq!(figure["info"]["labels"][0], "fig");
    assert_eq!(figure["info"]["caption"]["children"][0]["text"], "Results");
}

#[test]
fn test_text_rendering() {
    let output = parse_textile("h1. Notes\n* one\n* two\n\n|x|y|");
    let registry = FormatRegistry::default();
    let text = registry.serialize(&output.document, "text").unwrap();
    assert_eq!(text, "# Notes\n\n- one\n\n- two\n\n| x | y |\n");
}

#[test]
fn test_json_dump_of_footnotes() {
    let output = parse_textile("note[3]\n\nfn3. Body");
    let registry = FormatRegistry::default();
    let json = registry.serialize(&output.document, "json").unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let reference = &value["children"][0]["children"][1];
    assert_eq!(reference["type"], "foot_note");
    assert_eq!(reference["kind"], "reference");
    assert_eq!(reference["reference"], "3");
    assert!(reference.get("children").is_none());
    let definition = &value["children"][1]["children"][0];
    assert_eq!(definition["kind"], "definition");
    assert_eq!(definition["children"][0]["text"], "Body");
}

#[test]
fn test_text_rendering_of_captioned_table_and_rule() {
    let output = parse_textile("|x|\n@caption Totals\n---\nend\\\\line");
    let registry = FormatRegistry::default();
    let text = registry.serialize(&output.document, "text").unwrap();
    assert_eq!(text, "| x |\n\nTable 1: Totals\n\n----\n\nend\nline\n");
}
