//! Paragraph-level flow and inline spans

use super::{add, Dispatch};
use crate::error::{ParseError, ProtocolError};
use crate::event::{Event, EventKind, Level};
use crate::manager::Manager;
use crate::tree::{NodeId, NodeKind, StyleKind};
use tracing::debug;

/// Paragraphs and cells take word-level events and forward the rest.
pub(super) fn par(man: &mut Manager, id: NodeId, event: &Event) -> Result<Dispatch, ParseError> {
    if event.level != Level::Word {
        return Ok(Dispatch::Forward);
    }
    if let Some(child) = man.make(event)? {
        add(man, id, child)?;
    }
    Ok(Dispatch::Done)
}

/// Closed style: ends on its own style tag, lets other closings through to an outer
/// span, nests everything else.
pub(super) fn style(
    man: &mut Manager,
    id: NodeId,
    style: &StyleKind,
    event: &Event,
) -> Result<Dispatch, ParseError> {
    if event.level != Level::Word {
        return Ok(Dispatch::Forward);
    }
    match &event.kind {
        EventKind::NewStyle | EventKind::EndStyle if event.style_kind() == Some(style) => {
            if let NodeKind::Style { terminated, .. } = &mut man.document_mut().node_mut(id).kind {
                *terminated = true;
            }
            man.pop()?;
            Ok(Dispatch::Done)
        }
        EventKind::EndStyle | EventKind::EndLink => Ok(Dispatch::Forward),
        _ => {
            if let Some(child) = man.make(event)? {
                add(man, id, child)?;
            }
            Ok(Dispatch::Done)
        }
    }
}

/// Explicit style: only its own end tag closes it; any other end tag is an error.
pub(super) fn open_style(
    man: &mut Manager,
    id: NodeId,
    style: &StyleKind,
    event: &Event,
) -> Result<Dispatch, ParseError> {
    if event.level != Level::Word {
        return Ok(Dispatch::Forward);
    }
    match &event.kind {
        EventKind::EndStyle => match event.style_kind() {
            Some(found) if found == style => {
                man.pop()?;
                Ok(Dispatch::Done)
            }
            found => Err(man.fail(ProtocolError::StyleMismatch {
                open: style.to_string(),
                found: found.map(ToString::to_string).unwrap_or_else(|| "unnamed".to_string()),
            })),
        },
        EventKind::EndLink => Ok(Dispatch::Forward),
        _ => {
            if let Some(child) = man.make(event)? {
                add(man, id, child)?;
            }
            Ok(Dispatch::Done)
        }
    }
}

/// Link: everything at word level is content until its own end. A style closed here
/// was never opened inside the link.
pub(super) fn link(man: &mut Manager, id: NodeId, event: &Event) -> Result<Dispatch, ParseError> {
    if event.level != Level::Word {
        return Ok(Dispatch::Forward);
    }
    match &event.kind {
        EventKind::EndLink => {
            man.pop()?;
            Ok(Dispatch::Done)
        }
        _ => {
            if let Some(child) = man.make(event)? {
                add(man, id, child)?;
            }
            Ok(Dispatch::Done)
        }
    }
}

/// Replace a toggle style that never saw its own close by its literal opener followed
/// by its content, in place inside its owner.
pub(crate) fn unwrap_unterminated(man: &mut Manager, id: NodeId) {
    let marker = match &man.document().kind(id) {
        NodeKind::Style {
            marker: Some(marker),
            terminated: false,
            ..
        } => marker.clone(),
        _ => return,
    };
    let Some(owner) = man.owner(id) else {
        return;
    };
    let Some(position) = man.document().children(owner).iter().position(|child| *child == id) else {
        return;
    };

    debug!(%id, %marker, "unterminated style kept as text");
    let opener = {
        let word = man.factory().make_word(&marker);
        man.document_mut().alloc(word)
    };
    let location = man.document().node(id).source.clone();
    if let Some(location) = location {
        man.document_mut().node_mut(opener).set_source(&location);
    }
    let content = std::mem::take(&mut man.document_mut().node_mut(id).children);
    for child in &content {
        man.set_owner(*child, owner);
    }
    man.set_owner(opener, owner);
    man.document_mut()
        .node_mut(owner)
        .children
        .splice(position..=position, std::iter::once(opener).chain(content));
    man.clear_owner(id);
}
