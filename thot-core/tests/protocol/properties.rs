//! Closure and order properties over random textile documents.

use proptest::prelude::*;
use thot_core::manager::{Manager, ParseOptions};
use thot_core::tree::Document;

/// Line shapes; `{}` is replaced by a unique word.
const SHAPES: &[&str] = &[
    "{}",
    "",
    "* {}",
    "* ",
    "** {}",
    "# {}",
    "h1. {}",
    "h2. {}",
    "h3. {}",
    "bq. {}",
    "-{} := def",
    "|{}|cell|",
    "**{}**",
    "_{}_ tail",
    "{}[1] tail",
    "fn1. {}",
    "---",
];

fn document(shapes: &[usize]) -> (String, Vec<String>) {
    let mut words = Vec::new();
    let lines: Vec<String> = shapes
        .iter()
        .enumerate()
        .map(|(index, shape)| {
            let shape = SHAPES[*shape];
            if shape.contains("{}") {
                let word = format!("w{index}x");
                words.push(word.clone());
                shape.replace("{}", &word)
            } else {
                shape.to_string()
            }
        })
        .collect();
    (lines.join("\n"), words)
}

fn has_trailing_empty(doc: &Document) -> bool {
    doc.descendants(doc.root()).into_iter().any(|id| {
        doc.last_child(id).is_some_and(|last| doc.is_empty(last))
    })
}

proptest! {
    #[test]
    fn parse_always_closes(
        shapes in prop::collection::vec(0..SHAPES.len(), 0..16),
        soft_breaks in any::<bool>(),
    ) {
        let (text, _) = document(&shapes);
        let options = ParseOptions {
            line_suffix: if soft_breaks { " " } else { "" }.to_string(),
            ..ParseOptions::default()
        };
        let mut man = Manager::with_options(options);
        man.parse_str(&text, "random.textile").unwrap();
        let output = man.finish().unwrap();
        prop_assert!(!output.has_errors());
        prop_assert!(!has_trailing_empty(&output.document));
    }

    #[test]
    fn words_keep_their_order(shapes in prop::collection::vec(0..SHAPES.len(), 0..16)) {
        let (text, words) = document(&shapes);
        let mut man = Manager::new();
        man.parse_str(&text, "random.textile").unwrap();
        let doc = man.finish().unwrap().document;
        let rendered = doc.to_text(doc.root());
        let mut from = 0;
        for word in &words {
            let found = rendered[from..].find(word.as_str());
            prop_assert!(found.is_some(), "{} missing after {} in {:?}", word, from, rendered);
            from += found.unwrap_or(0) + word.len();
        }
    }
}
