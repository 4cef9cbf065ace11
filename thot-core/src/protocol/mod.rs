//! Node protocol: how each variant reacts to events
//!
//! The manager hands every event to [`on_event`] for the node on top of its stack. The
//! node answers with a [`Dispatch`]:
//!
//! - `Done`: the event was consumed (children may have been added or pushed, the node
//!   may have popped itself on its own close event).
//! - `Forward`: the event does not belong here; the manager pops this node and retries
//!   with the new top.
//! - `Resend`: the node pushed a new top (an implicit paragraph, a definition term, a
//!   first table row) that must receive the same event.
//!
//! Containers share [`add`], which gives the previous sibling a chance to
//! [`aggregate`] the new child, and [`complete`], run when a node is popped.
//!
//! File structure:
//!
//! - `blocks.rs`: document root, headers and quotes
//! - `inline.rs`: paragraphs, cells, styles, footnotes and links
//! - `lists.rs`: lists and definition lists
//! - `table.rs`: tables and rows

mod blocks;
mod inline;
mod lists;
mod table;

pub(crate) use inline::unwrap_unterminated;
pub(crate) use lists::{new_def_item, new_item as new_list_item};

use crate::error::ParseError;
use crate::event::{Customizer, Event, EventKind, Payload};
use crate::manager::Manager;
use crate::tree::{NodeId, NodeKind, RowKind, StyleKind};
use tracing::trace;

/// Style name carried by footnotes, which close like explicit styles.
pub const FOOTNOTE_STYLE: &str = "footnote";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Done,
    Forward,
    Resend,
}

pub(crate) fn on_event(
    man: &mut Manager,
    id: NodeId,
    event: &Event,
) -> Result<Dispatch, ParseError> {
    if let Payload::Customize(customizer) = &event.payload {
        return customize(man, id, customizer.as_ref());
    }
    match man.document().kind(id) {
        NodeKind::Document => blocks::document(man, id, event),
        NodeKind::Header {
            level, in_title, ..
        } => {
            let (level, in_title) = (*level, *in_title);
            blocks::header(man, id, level, in_title, event)
        }
        NodeKind::Quote { depth } => {
            let depth = *depth;
            blocks::quote(man, id, depth, event)
        }
        NodeKind::Par | NodeKind::Cell { .. } => inline::par(man, id, event),
        NodeKind::Style { style, .. } => {
            let style = style.clone();
            inline::style(man, id, &style, event)
        }
        NodeKind::OpenStyle { style } => {
            let style = style.clone();
            inline::open_style(man, id, &style, event)
        }
        NodeKind::FootNote { .. } => {
            inline::open_style(man, id, &StyleKind::Custom(FOOTNOTE_STYLE.to_string()), event)
        }
        NodeKind::Link { .. } => inline::link(man, id, event),
        NodeKind::List { kind, depth } => {
            let (kind, depth) = (*kind, *depth);
            lists::list(man, id, kind, depth, event)
        }
        NodeKind::DefList {
            depth,
            alternate,
            in_term,
        } => {
            let state = lists::DefState {
                depth: *depth,
                alternate: *alternate,
                in_term: *in_term,
            };
            lists::def_list(man, id, state, event)
        }
        NodeKind::Table { .. } => table::table(man, id, event),
        NodeKind::Row { .. } => table::row(man, id, event),
        _ => Ok(Dispatch::Forward),
    }
}

/// Apply a customization to the first stack node it matches.
fn customize(
    man: &mut Manager,
    id: NodeId,
    customizer: &dyn Customizer,
) -> Result<Dispatch, ParseError> {
    if customizer.matches(man.document().node(id)) {
        customizer.process(man.document_mut().node_mut(id));
        return Ok(Dispatch::Done);
    }
    if id == man.document().root() {
        man.warn("customization matched no open node");
        return Ok(Dispatch::Done);
    }
    Ok(Dispatch::Forward)
}

/// Append `child` to `container`, after pruning an empty last child and letting the
/// remaining last child aggregate it. Children expecting events are pushed.
pub(crate) fn add(
    man: &mut Manager,
    container: NodeId,
    child: NodeId,
) -> Result<(), ParseError> {
    if let Some(last) = man.document().last_child(container) {
        if man.document().is_empty(last) {
            man.document_mut().node_mut(container).children.pop();
        }
    }
    if let Some(last) = man.document().last_child(container) {
        if aggregate(man, last, child)? {
            return Ok(());
        }
    }
    append(man, container, child);
    if man.document().node(child).expects_events() {
        man.push(child);
    }
    Ok(())
}

/// Attach without aggregation or push.
pub(crate) fn append(man: &mut Manager, container: NodeId, child: NodeId) {
    let location = man.location();
    let doc = man.document_mut();
    doc.node_mut(child).set_source(&location);
    doc.node_mut(container).children.push(child);
    man.set_owner(child, container);
}

/// Merge `new` into `last` when they continue the same structure.
pub(crate) fn aggregate(
    man: &mut Manager,
    last: NodeId,
    new: NodeId,
) -> Result<bool, ParseError> {
    let doc = man.document();
    let merge = match (doc.kind(last), doc.kind(new)) {
        (
            NodeKind::List { kind, depth },
            NodeKind::List {
                kind: new_kind,
                depth: new_depth,
            },
        ) => kind == new_kind && depth == new_depth,
        (
            NodeKind::DefList {
                depth, alternate, ..
            },
            NodeKind::DefList {
                depth: new_depth,
                alternate: new_alternate,
                ..
            },
        ) => depth == new_depth && alternate == new_alternate,
        _ => false,
    };
    if !merge {
        return Ok(false);
    }

    trace!(%last, %new, "aggregate");
    let items = std::mem::take(&mut man.document_mut().node_mut(new).children);
    for item in items {
        append(man, last, item);
    }
    if let NodeKind::DefList { in_term, .. } = &mut man.document_mut().node_mut(last).kind {
        *in_term = true;
    }
    man.push(last);
    Ok(true)
}

/// Closing hook: prune trailing empty children. List items are never on the stack, so
/// a list prunes them as it closes.
pub(crate) fn complete(man: &mut Manager, id: NodeId) {
    if matches!(man.document().kind(id), NodeKind::List { .. }) {
        for item in man.document().children(id).to_vec() {
            prune_trailing(man, item);
        }
    }
    prune_trailing(man, id);
}

fn prune_trailing(man: &mut Manager, id: NodeId) {
    let doc = man.document_mut();
    while let Some(last) = doc.last_child(id) {
        if !doc.is_empty(last) {
            break;
        }
        doc.node_mut(id).children.pop();
    }
}

/// Shared handling of a structural event by a block container: make the child and add
/// it. A cell with no table around it opens a table first. Closings of list and table
/// parts travel on up to their container; past the root nothing accepts them.
pub(crate) fn adopt(
    man: &mut Manager,
    container: NodeId,
    event: &Event,
) -> Result<Dispatch, ParseError> {
    if matches!(
        event.kind,
        EventKind::EndItem
            | EventKind::EndTerm
            | EventKind::EndDef
            | EventKind::EndRow
            | EventKind::EndCell
    ) {
        return Ok(Dispatch::Forward);
    }
    if event.kind == EventKind::NewCell {
        let table = man.new_table(RowKind::Normal);
        add(man, container, table)?;
        return Ok(Dispatch::Resend);
    }
    match man.make(event)? {
        Some(child) => add(man, container, child)?,
        None => trace!(%event, "event ignored"),
    }
    Ok(Dispatch::Done)
}
