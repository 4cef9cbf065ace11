//! Shared icon mapping for tree visualization
//!
//! Keeps the treeviz dump and any future line-oriented view consistent.

/// Get the Unicode icon for a node type name, as returned by `Node::type_name`.
pub fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "Document" => "⧉",
        "Header" => "§",
        "Par" => "¶",
        "Word" => "◦",
        "Glyph" => "©",
        "LineBreak" => "↵",
        "HorizontalLine" => "⎯",
        "Ref" => "⊕",
        "Tag" => "#",
        "Image" | "Figure" => "▣",
        "Block" => "𝒱",
        "Style" => "𝐁",
        "OpenStyle" => "ƒ",
        "FootNote" => "³",
        "Link" => "↗",
        "Quote" => "\"",
        "List" => "☰",
        "ListItem" => "•",
        "DefList" => "≔",
        "DefItem" => "⊤",
        "Table" => "▦",
        "Row" => "≡",
        "Cell" => "▢",
        _ => "○",
    }
}
