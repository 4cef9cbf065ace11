//! Textile-flavoured front-end
//!
//! Not a complete dialect. It covers headers, explicit paragraphs, quotes, lists,
//! both definition forms, tables, `<pre>` blocks, figures, rules, footnotes and the
//! usual inline styles, which is enough to drive every part of the event protocol.
//!
//! The four emphasis markers (`**`, `__`, `*`, `_`) are toggles: the same marker opens
//! and closes the span, and a span still open at the end of the line turns back into
//! literal text. The other spans (`??`, `^`, `~`, `@`) are matched as a whole.
//!
//! Headers and explicit paragraphs take attributes between the tag and the dot:
//! `(class#id)`, `{css}` and `[lang]`, as in `p(note#intro)[en]. text`. Footnotes are
//! referenced with `[1]` and defined on a `fn1. text` line. `\\` forces a line break
//! and a line of three or more dashes is a horizontal rule.

use super::{LinePattern, SyntaxModule, WordPattern};
use crate::error::{ParseError, ProtocolError};
use crate::event::{Event, EventKind, Level};
use crate::factory::Factory;
use crate::manager::Manager;
use crate::protocol::FOOTNOTE_STYLE;
use crate::tree::info::{self, Align, InfoValue};
use crate::tree::{FootnoteKind, ListKind, Node, NodeKind, RowKind, StyleKind};
use once_cell::sync::Lazy;
use regex::{Captures, Match, Regex};

/// Class given to nodes built by this front-end.
pub const CLASS: &str = "textile";

/// Attribute groups of a block tag, in any order.
const ATTRS: &str = r"(?P<attrs>(?:\([^)]*\)|\{[^}]*\}|\[[^\]]*\])*)";

static PRE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"^</pre>\s*$").expect("pre end pattern"));
static CELL_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<head>_)?(?P<align><>|[<=>])?(?P<valign>[\^~-])?(?:\\(?P<span>[0-9]+))?(?:/(?P<vspan>[0-9]+))?\.\s",
    )
    .expect("cell prefix pattern")
});
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\((?P<class>[^)#]*)(?:#(?P<id>[^)]*))?\)|\{(?P<css>[^}]*)\}|\[(?P<lang>[^\]]*)\]")
        .expect("attribute pattern")
});

const GLYPHS: &[(&str, u32)] = &[("(c)", 0x00a9), ("(r)", 0x00ae), ("(tm)", 0x2122)];

pub struct TextileModule;

impl SyntaxModule for TextileModule {
    fn name(&self) -> &str {
        "textile"
    }

    fn description(&self) -> &str {
        "Textile-like lightweight markup"
    }

    fn file_extensions(&self) -> &[&str] {
        &["textile"]
    }

    fn replaces_syntax(&self) -> bool {
        true
    }

    fn lines(&self) -> Result<Vec<LinePattern>, ProtocolError> {
        Ok(vec![
            LinePattern::new(r"^$", |man, _| paragraph_break(man))?,
            LinePattern::new(&format!(r"^h(?P<level>[1-6]){ATTRS}\.\s*(?P<title>.*)"), header)?,
            LinePattern::new(&format!(r"^p{ATTRS}\.\s*(?P<text>.*)"), |man, caps| {
                paragraph_break(man)?;
                let par = with_attributes(man.factory().make_par(), caps.name("attrs"));
                man.send(Event::with_node(Level::Paragraph, EventKind::New, par))?;
                man.parse_text(&caps["text"])
            })?,
            LinePattern::new(r"^fn(?P<fnid>[0-9]+)\.\s+(?P<text>.*)", footnote)?,
            LinePattern::new(r"^bq\.\.\s*(?P<text>.*)", |man, caps| {
                paragraph_break(man)?;
                man.send(Event::quote(EventKind::NewQuote, 1))?;
                man.parse_text(&caps["text"])
            })?,
            LinePattern::new(r"^bq\.\s*(?P<text>.*)", |man, caps| {
                paragraph_break(man)?;
                man.send(Event::quote(EventKind::NewQuote, 1))?;
                man.parse_text_with(&caps["text"], "")?;
                man.send(Event::quote(EventKind::EndQuote, 1))
            })?,
            LinePattern::new(r"^(?P<marks>[#*]+)\s+(?P<text>.*)", list_item)?,
            LinePattern::new(r"^-{3,}\s*$", |man, _| {
                paragraph_break(man)?;
                let rule = man.factory().make_horizontal_line();
                man.send(Event::with_node(Level::Paragraph, EventKind::New, rule))
            })?,
            LinePattern::new(r"^-(?P<term>(?:[^:]|:[^=])*):=(?P<def>.*)", definition)?,
            LinePattern::new(r"^;(?P<text>.*)", |man, caps| {
                man.send(Event::definition(EventKind::NewDef, 0, true))?;
                man.parse_text_with(caps["text"].trim(), "")
            })?,
            LinePattern::new(r"^\|(?P<cells>.*)\|\s*$", row)?,
            LinePattern::new(r"^<pre>\s*$", |man, _| {
                let block = man.factory().make_block("pre");
                man.begin_block(block, PRE_END.clone())
            })?,
            LinePattern::new(
                r"^!(?P<fpath>[^!\s(]+)(?:\s+(?P<fw>[^\s!xX()]+)[xX](?P<fh>[^\s!()]+))?\s*(?:\((?P<falt>[^)]*)\))?!\s*$",
                figure,
            )?,
        ])
    }

    fn words(&self) -> Result<Vec<WordPattern>, ProtocolError> {
        let toggle = |pattern: &str, style: StyleKind, marker: &'static str| {
            WordPattern::new(pattern, move |man, _| {
                man.send(Event::toggle_style(style.clone(), marker))
            })
        };
        let span = |pattern: &str, group: &'static str, style: StyleKind| {
            WordPattern::new(pattern, move |man, caps| {
                man.send(Event::open_style(style.clone()))?;
                man.parse_text_with(&caps[group], "")?;
                man.send(Event::end_style(style.clone()))
            })
        };
        Ok(vec![
            toggle(r"\*\*", StyleKind::Bold, "**")?,
            toggle(r"__", StyleKind::Italic, "__")?,
            toggle(r"\*", StyleKind::Strong, "*")?,
            toggle(r"_", StyleKind::Emphasized, "_")?,
            span(r"\?\?(?P<cite>[^?]+)\?\?", "cite", StyleKind::Cite)?,
            span(r"\^(?P<sup>[^\^\s][^\^]*)\^", "sup", StyleKind::Superscript)?,
            span(r"~(?P<sub>[^~\s][^~]*)~", "sub", StyleKind::Subscript)?,
            WordPattern::new(r"@(?P<code>[^@\s][^@]*)@", |man, caps| {
                man.send(Event::open_style(StyleKind::Code))?;
                man.send_word(&caps["code"])?;
                man.send(Event::end_style(StyleKind::Code))
            })?,
            WordPattern::new(r"==(?P<esc>.+?)==", |man, caps| man.send_word(&caps["esc"]))?,
            WordPattern::new(
                r"!(?P<ipath>[^!\s(]+)(?:\s+(?P<iw>[^\s!xX()]+)[xX](?P<ih>[^\s!()]+))?\s*(?:\((?P<ialt>[^)]*)\))?!",
                image,
            )?,
            WordPattern::new(r#""(?P<ltext>[^"]+)":(?P<lurl>\S+)"#, link)?,
            WordPattern::new(r"\[(?P<fnref>[0-9]+)\]", |man, caps| {
                let note = man
                    .factory()
                    .make_footnote(FootnoteKind::Reference, Some(&caps["fnref"]));
                man.send(Event::with_node(Level::Word, EventKind::New, note))?;
                man.send(Event::end_style(footnote_style()))
            })?,
            WordPattern::new(r"\\\\", |man, _| {
                let line_break = man.factory().make_line_break();
                man.send(Event::with_node(Level::Word, EventKind::New, line_break))
            })?,
            WordPattern::new(r"\((?:c|r|tm)\)", |man, caps| {
                match GLYPHS.iter().find(|(text, _)| *text == &caps[0]) {
                    Some((_, code)) => {
                        let glyph = man.factory().make_glyph(*code);
                        man.send(Event::with_node(Level::Word, EventKind::New, glyph))
                    }
                    None => man.send_word(&caps[0]),
                }
            })?,
        ])
    }

    fn factory(&self) -> Option<Box<dyn Factory>> {
        Some(Box::new(TextileFactory))
    }
}

/// Default nodes, with the front-end class on quotes and tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextileFactory;

impl Factory for TextileFactory {
    fn make_quote(&self, depth: usize) -> Node {
        Node::new(NodeKind::Quote { depth })
            .with_info(info::CLASS, InfoValue::Text(CLASS.to_string()))
    }

    fn make_table(&self) -> Node {
        Node::new(NodeKind::Table {
            width: Default::default(),
        })
        .with_info(info::CLASS, InfoValue::Text(CLASS.to_string()))
    }
}

/// Closes the current paragraph; the empty paragraph it leaves is pruned later.
fn paragraph_break(man: &mut Manager) -> Result<(), ParseError> {
    let par = man.factory().make_par();
    man.send(Event::with_node(Level::Paragraph, EventKind::End, par))
}

/// Copy `(class#id)`, `{css}` and `[lang]` groups into the info of `node`.
fn with_attributes(mut node: Node, attrs: Option<Match<'_>>) -> Node {
    let Some(attrs) = attrs else {
        return node;
    };
    for caps in ATTRIBUTE.captures_iter(attrs.as_str()) {
        let entries = [
            (info::CLASS, caps.name("class")),
            (info::ID, caps.name("id")),
            (info::CSS, caps.name("css")),
            (info::LANG, caps.name("lang")),
        ];
        for (key, value) in entries {
            let value = value.map(|value| value.as_str().trim()).unwrap_or_default();
            if !value.is_empty() {
                node.info.set(key, InfoValue::Text(value.to_string()));
            }
        }
    }
    node
}

fn footnote_style() -> StyleKind {
    StyleKind::Custom(FOOTNOTE_STYLE.to_string())
}

/// `fnN. text`: the body of note N, in a paragraph of its own.
fn footnote(man: &mut Manager, caps: &Captures<'_>) -> Result<(), ParseError> {
    paragraph_break(man)?;
    let note = man
        .factory()
        .make_footnote(FootnoteKind::Definition, Some(&caps["fnid"]));
    man.send(Event::with_node(Level::Word, EventKind::New, note))?;
    man.parse_text_with(caps["text"].trim_end(), "")?;
    man.send(Event::end_style(footnote_style()))
}

fn header(man: &mut Manager, caps: &Captures<'_>) -> Result<(), ParseError> {
    let level = caps["level"].parse::<u8>().unwrap_or(1);
    let node = with_attributes(man.factory().make_header(level), caps.name("attrs"));
    man.send(Event::with_node(Level::Header, EventKind::New, node))?;
    man.parse_text_with(caps["title"].trim_end(), "")?;
    man.send(Event::title())
}

fn list_item(man: &mut Manager, caps: &Captures<'_>) -> Result<(), ParseError> {
    let marks = &caps["marks"];
    let kind = if marks.ends_with('#') {
        ListKind::Number
    } else {
        ListKind::Bullet
    };
    man.send(Event::item(kind, marks.len()))?;
    man.parse_text(&caps["text"])
}

fn definition(man: &mut Manager, caps: &Captures<'_>) -> Result<(), ParseError> {
    man.send(Event::definition(EventKind::NewDef, 0, false))?;
    man.parse_text_with(caps["term"].trim(), "")?;
    man.send(Event::definition(EventKind::EndTerm, 0, false))?;
    man.parse_text_with(caps["def"].trim(), "")
}

/// One table row. Cells are separated by `|`; a `_.` prefix marks a header cell and
/// `<`, `=` or `>` before the dot sets the alignment.
fn row(man: &mut Manager, caps: &Captures<'_>) -> Result<(), ParseError> {
    let cells: Vec<Cell<'_>> = caps["cells"].split('|').map(Cell::parse).collect();
    let kind = if cells.iter().any(|cell| cell.kind == RowKind::Header) {
        RowKind::Header
    } else {
        RowKind::Normal
    };
    man.send(Event::row(kind))?;
    for cell in cells {
        let mut node = man.factory().make_cell(cell.kind, cell.align, cell.span);
        if let Some(valign) = cell.valign {
            node.info.set(info::VALIGN, InfoValue::Align(valign));
        }
        if cell.vspan > 1 {
            node.info.set(info::VSPAN, InfoValue::Int(cell.vspan as i64));
        }
        man.send(Event::with_node(Level::Paragraph, EventKind::NewCell, node))?;
        man.parse_text_with(cell.text.trim(), "")?;
    }
    man.send(Event::new(Level::Paragraph, EventKind::EndRow))
}

struct Cell<'t> {
    kind: RowKind,
    align: Option<Align>,
    valign: Option<Align>,
    span: usize,
    vspan: usize,
    text: &'t str,
}

impl<'t> Cell<'t> {
    fn parse(text: &'t str) -> Self {
        let trimmed = text.trim_start();
        match CELL_PREFIX.captures(trimmed) {
            Some(prefix) => Cell {
                kind: if prefix.name("head").is_some() {
                    RowKind::Header
                } else {
                    RowKind::Normal
                },
                align: prefix.name("align").and_then(|align| match align.as_str() {
                    "<" => Some(Align::Left),
                    "=" => Some(Align::Center),
                    ">" => Some(Align::Right),
                    "<>" => Some(Align::Justify),
                    _ => None,
                }),
                valign: prefix.name("valign").and_then(|valign| match valign.as_str() {
                    "^" => Some(Align::Top),
                    "-" => Some(Align::Center),
                    "~" => Some(Align::Bottom),
                    _ => None,
                }),
                span: span(prefix.name("span")),
                vspan: span(prefix.name("vspan")),
                text: &trimmed[prefix.get(0).map_or(0, |whole| whole.end())..],
            },
            None => Cell {
                kind: RowKind::Normal,
                align: None,
                valign: None,
                span: 1,
                vspan: 1,
                text,
            },
        }
    }
}

fn span(text: Option<Match<'_>>) -> usize {
    text.and_then(|span| span.as_str().parse().ok()).unwrap_or(1)
}

type Size = (Option<u32>, Option<u32>);

/// Width and height of an image, when given. A malformed dimension is reported and
/// gives `None`, so that the image is dropped.
fn dimensions(man: &mut Manager, width: Option<&str>, height: Option<&str>) -> Option<Size> {
    let mut size = [None, None];
    for (slot, text) in size.iter_mut().zip([width, height]) {
        let Some(text) = text else {
            continue;
        };
        match text.parse::<u32>() {
            Ok(value) => *slot = Some(value),
            Err(err) => {
                man.error(format!("bad image dimension '{text}': {err}"));
                return None;
            }
        }
    }
    Some((size[0], size[1]))
}

fn image(man: &mut Manager, caps: &Captures<'_>) -> Result<(), ParseError> {
    let text = |name: &str| caps.name(name).map(|m| m.as_str());
    let Some((width, height)) = dimensions(man, text("iw"), text("ih")) else {
        return Ok(());
    };
    let node = man.factory().make_image(&caps["ipath"], width, height, text("ialt"));
    man.send(Event::with_node(Level::Word, EventKind::New, node))
}

fn figure(man: &mut Manager, caps: &Captures<'_>) -> Result<(), ParseError> {
    let text = |name: &str| caps.name(name).map(|m| m.as_str());
    let Some((width, height)) = dimensions(man, text("fw"), text("fh")) else {
        return Ok(());
    };
    let node = man.factory().make_figure(&caps["fpath"], width, height, text("falt"));
    man.send(Event::with_node(Level::Paragraph, EventKind::New, node))
}

fn link(man: &mut Manager, caps: &Captures<'_>) -> Result<(), ParseError> {
    let node = man.factory().make_link(&caps["lurl"]);
    man.send(Event::with_node(Level::Word, EventKind::New, node))?;
    man.parse_text_with(&caps["ltext"], "")?;
    man.send(Event::end_link())
}
