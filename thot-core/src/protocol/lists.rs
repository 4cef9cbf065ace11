//! Lists and definition lists
//!
//! Both are driven by line-level events carrying a depth. Items of the same depth are
//! appended to the list on top; deeper items nest inside the current item; shallower
//! ones forward so that an outer list can take them.

use super::{add, append, Dispatch};
use crate::error::ParseError;
use crate::event::{Event, EventKind, Level, Payload};
use crate::manager::Manager;
use crate::tree::{ListKind, NodeId, NodeKind};

pub(super) fn list(
    man: &mut Manager,
    id: NodeId,
    kind: ListKind,
    depth: usize,
    event: &Event,
) -> Result<Dispatch, ParseError> {
    if event.level == Level::Word {
        let par = item_par(man, id);
        if let Some(child) = man.make(event)? {
            add(man, par, child)?;
        }
        return Ok(Dispatch::Done);
    }
    match (&event.kind, &event.payload) {
        (
            EventKind::NewItem,
            Payload::Item {
                kind: new_kind,
                depth: new_depth,
            },
        ) => {
            if *new_depth == depth && *new_kind == kind {
                new_item(man, id);
                Ok(Dispatch::Done)
            } else if *new_depth > depth {
                let item = last_item(man, id);
                if let Some(child) = man.make(event)? {
                    add(man, item, child)?;
                }
                Ok(Dispatch::Done)
            } else {
                Ok(Dispatch::Forward)
            }
        }
        (EventKind::EndItem, _) => {
            man.pop()?;
            Ok(Dispatch::Done)
        }
        _ => Ok(Dispatch::Forward),
    }
}

/// Append a fresh item, holding an empty paragraph, to `list`.
pub(crate) fn new_item(man: &mut Manager, list: NodeId) -> NodeId {
    let item = {
        let node = man.factory().make_list_item();
        man.document_mut().alloc(node)
    };
    let par = man.make_par();
    append(man, item, par);
    append(man, list, item);
    item
}

fn last_item(man: &mut Manager, list: NodeId) -> NodeId {
    match man.document().last_child(list) {
        Some(item) => item,
        None => new_item(man, list),
    }
}

/// Paragraph receiving words in the current item. Text following a nested list goes
/// to a new paragraph after it.
fn item_par(man: &mut Manager, list: NodeId) -> NodeId {
    let item = last_item(man, list);
    match man.document().last_child(item) {
        Some(par) if *man.document().kind(par) == NodeKind::Par => par,
        _ => {
            let par = man.make_par();
            append(man, item, par);
            par
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) struct DefState {
    pub depth: usize,
    pub alternate: bool,
    pub in_term: bool,
}

/// Definition list: words go to the term or the body of the last item depending on
/// the sub-state, which `EndTerm` flips. In alternate mode, a new definition at the
/// same depth flips it too.
pub(super) fn def_list(
    man: &mut Manager,
    id: NodeId,
    state: DefState,
    event: &Event,
) -> Result<Dispatch, ParseError> {
    if event.level == Level::Word {
        let (term, body) = last_def_item(man, id);
        man.push(if state.in_term { term } else { body });
        return Ok(Dispatch::Resend);
    }
    match &event.kind {
        EventKind::EndTerm => {
            let (_, body) = last_def_item(man, id);
            set_in_term(man, id, false);
            man.push(body);
            Ok(Dispatch::Done)
        }
        EventKind::NewDef => {
            let depth = event.depth().unwrap_or(state.depth);
            if depth < state.depth {
                Ok(Dispatch::Forward)
            } else if depth > state.depth {
                let (_, body) = last_def_item(man, id);
                if let Some(child) = man.make(event)? {
                    add(man, body, child)?;
                }
                Ok(Dispatch::Done)
            } else if state.alternate && state.in_term {
                let (_, body) = last_def_item(man, id);
                set_in_term(man, id, false);
                man.push(body);
                Ok(Dispatch::Done)
            } else {
                new_def_item(man, id);
                set_in_term(man, id, true);
                Ok(Dispatch::Done)
            }
        }
        EventKind::EndDef => {
            man.pop()?;
            Ok(Dispatch::Done)
        }
        _ => Ok(Dispatch::Forward),
    }
}

fn set_in_term(man: &mut Manager, id: NodeId, value: bool) {
    if let NodeKind::DefList { in_term, .. } = &mut man.document_mut().node_mut(id).kind {
        *in_term = value;
    }
}

/// Append a definition item with empty term and body paragraphs.
pub(crate) fn new_def_item(man: &mut Manager, list: NodeId) -> (NodeId, NodeId) {
    let term = man.make_par();
    let body = man.make_par();
    let item = {
        let node = man.factory().make_def_item(term, body);
        man.document_mut().alloc(node)
    };
    let location = man.location();
    for part in [term, body] {
        man.document_mut().node_mut(part).set_source(&location);
        man.set_owner(part, item);
    }
    append(man, list, item);
    (term, body)
}

fn last_def_item(man: &mut Manager, list: NodeId) -> (NodeId, NodeId) {
    let last = man.document().last_child(list);
    match last.map(|item| man.document().kind(item)) {
        Some(NodeKind::DefItem { term, body }) => (*term, *body),
        _ => new_def_item(man, list),
    }
}
