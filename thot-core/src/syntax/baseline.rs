//! Built-in patterns, registered before any syntax module
//!
//! Lines: `@@` comments, `@NAME = value` assignments, `@use MODULE`, `@caption TEXT`
//! and `@label NAME`. Words: late variable references, `@ref:NAME@`, `##` and hashed
//! terms (`#TERM`, `#(TERM)`).

use super::{LinePattern, WordPattern};
use crate::error::{ParseError, Severity};
use crate::event::{Event, EventKind, Level};
use crate::manager::Manager;
use crate::tree::NodeKind;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@@.*").expect("comment pattern"));
static ASSIGN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@([a-zA-Z_0-9]+)\s*=(.*)").expect("assignment pattern"));
static USE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@use\s+(\S+)").expect("use pattern"));
static CAPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@caption\s+(.*)").expect("caption pattern"));
static LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@label\s+(\S+)").expect("label pattern"));

static VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@\((?P<varid>[a-zA-Z_0-9]+)\)").expect("variable pattern"));
static REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@ref:(?P<ref>[^@]+)@").expect("reference pattern"));
static DOUBLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"##").expect("double sharp pattern"));
static PTERM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#\((?P<pterm>[^)\s]+)\)").expect("term pattern"));
static TERM: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(?P<term>\w+)").expect("term pattern"));

pub fn lines() -> Vec<LinePattern> {
    vec![
        LinePattern::from_regex(COMMENT.clone(), |_, _| Ok(())),
        LinePattern::from_regex(ASSIGN.clone(), assign),
        LinePattern::from_regex(USE.clone(), use_module),
        LinePattern::from_regex(CAPTION.clone(), caption),
        LinePattern::from_regex(LABEL.clone(), label),
    ]
}

pub fn words() -> Vec<WordPattern> {
    vec![
        WordPattern::from_regex(&VAR, variable),
        WordPattern::from_regex(&REF, reference),
        WordPattern::from_regex(&DOUBLE, |man, _| man.send_word("#")),
        WordPattern::from_regex(&PTERM, |man, caps| tag(man, &caps["pterm"])),
        WordPattern::from_regex(&TERM, |man, caps| tag(man, &caps["term"])),
    ]
}

/// Registers the completer reporting references to unknown labels.
pub fn init(man: &mut Manager) {
    man.document_mut()
        .add_completer(Box::new(check_references));
}

fn assign(man: &mut Manager, caps: &Captures<'_>) -> Result<(), ParseError> {
    man.document_mut().set_var(&caps[1], caps[2].trim());
    Ok(())
}

fn use_module(man: &mut Manager, caps: &Captures<'_>) -> Result<(), ParseError> {
    man.use_named(&caps[1])?;
    Ok(())
}

/// Parse the caption text into a detached paragraph, then attach it to the closest
/// node accepting captions.
fn caption(man: &mut Manager, caps: &Captures<'_>) -> Result<(), ParseError> {
    let par = man.make_par();
    man.push(par);
    man.parse_text_with(caps[1].trim(), "")?;
    while man.stack().contains(&par) {
        man.pop()?;
    }
    match man.find_target(|node| node.accepts_caption()) {
        Some(target) => man.document_mut().set_caption(target, par),
        None => man.error("caption unsupported here"),
    }
    Ok(())
}

fn label(man: &mut Manager, caps: &Captures<'_>) -> Result<(), ParseError> {
    let name = &caps[1];
    match man.find_target(|node| node.accepts_label()) {
        Some(target) => man.add_label(name, target),
        None => man.warn(format!("label {name} out of any container")),
    }
    Ok(())
}

fn variable(man: &mut Manager, caps: &Captures<'_>) -> Result<(), ParseError> {
    let value = man.document().get_var(&caps["varid"]).unwrap_or_default();
    man.send_word(&value)
}

fn reference(man: &mut Manager, caps: &Captures<'_>) -> Result<(), ParseError> {
    let node = man.factory().make_ref(&caps["ref"]);
    man.send(Event::with_node(Level::Word, EventKind::New, node))
}

fn tag(man: &mut Manager, term: &str) -> Result<(), ParseError> {
    let node = man.factory().make_tag(term);
    man.send(Event::with_node(Level::Word, EventKind::New, node))
}

fn check_references(man: &mut Manager) {
    let doc = man.document();
    let mut roots = vec![doc.root()];
    let mut unresolved = Vec::new();
    while let Some(root) = roots.pop() {
        for id in doc.descendants(root) {
            if let Some(caption) = doc.caption(id) {
                roots.push(caption);
            }
            if let NodeKind::Ref { label } = doc.kind(id) {
                if doc.get_label(label).is_none() {
                    unresolved.push((id, label.clone()));
                }
            }
        }
    }
    for (id, label) in unresolved {
        let location = man.document().node(id).source.clone().unwrap_or_default();
        man.report(Severity::Error, format!("unresolved reference '{label}'"), location);
    }
}
