//! Document root, headers and quotes

use super::{add, adopt, Dispatch};
use crate::error::ParseError;
use crate::event::{Event, EventKind, Level};
use crate::manager::Manager;
use crate::tree::{NodeId, NodeKind};

/// The root never forwards. Words open an implicit paragraph; anything else is made
/// and added as a structural child.
pub(super) fn document(
    man: &mut Manager,
    id: NodeId,
    event: &Event,
) -> Result<Dispatch, ParseError> {
    match (event.level, &event.kind) {
        (Level::Word, _) => {
            let par = man.make_par();
            add(man, id, par)?;
            Ok(Dispatch::Resend)
        }
        (Level::Document, EventKind::End) => Ok(Dispatch::Done),
        _ => adopt(man, id, event),
    }
}

pub(super) fn header(
    man: &mut Manager,
    id: NodeId,
    level: u8,
    in_title: bool,
    event: &Event,
) -> Result<Dispatch, ParseError> {
    match event.level {
        Level::Word if in_title => {
            let title = title_of(man, id);
            if let Some(child) = man.make(event)? {
                add(man, title, child)?;
            }
            Ok(Dispatch::Done)
        }
        Level::Word => {
            let par = man.make_par();
            add(man, id, par)?;
            Ok(Dispatch::Resend)
        }
        Level::Paragraph => adopt(man, id, event),
        Level::Document => Ok(Dispatch::Forward),
        Level::Header => match &event.kind {
            EventKind::Title => {
                if let NodeKind::Header { in_title, .. } =
                    &mut man.document_mut().node_mut(id).kind
                {
                    *in_title = false;
                }
                Ok(Dispatch::Done)
            }
            EventKind::End => {
                man.pop()?;
                Ok(Dispatch::Done)
            }
            _ => match event.node().map(|node| &node.kind) {
                Some(NodeKind::Header { level: other, .. }) if *other <= level => {
                    Ok(Dispatch::Forward)
                }
                _ => adopt(man, id, event),
            },
        },
    }
}

/// Title paragraph of a header, created on first use.
fn title_of(man: &mut Manager, id: NodeId) -> NodeId {
    if let Some(title) = man.document().header_title(id) {
        return title;
    }
    let title = man.make_par();
    let location = man.location();
    let doc = man.document_mut();
    doc.node_mut(title).set_source(&location);
    if let NodeKind::Header { title: slot, .. } = &mut doc.node_mut(id).kind {
        *slot = Some(title);
    }
    title
}

/// A quote collects words directly. It closes on an end event of its own depth,
/// continues on a new quote of its depth and nests deeper ones.
pub(super) fn quote(
    man: &mut Manager,
    id: NodeId,
    depth: usize,
    event: &Event,
) -> Result<Dispatch, ParseError> {
    match (&event.kind, event.depth()) {
        (EventKind::EndQuote, Some(other)) if other != depth => Ok(Dispatch::Forward),
        (EventKind::EndQuote, _) => {
            man.pop()?;
            Ok(Dispatch::Done)
        }
        (EventKind::NewQuote, Some(other)) if other == depth => Ok(Dispatch::Done),
        (EventKind::NewQuote, Some(other)) if other > depth => adopt(man, id, event),
        (EventKind::NewQuote, _) => Ok(Dispatch::Forward),
        _ if event.level == Level::Word => {
            if let Some(child) = man.make(event)? {
                add(man, id, child)?;
            }
            Ok(Dispatch::Done)
        }
        _ => Ok(Dispatch::Forward),
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ProtocolError;
    use crate::event::{Event, EventKind, Level};
    use crate::manager::Manager;
    use crate::tree::NodeKind;

    fn header_event(man: &Manager, level: u8) -> Event {
        Event::with_node(Level::Header, EventKind::New, man.factory().make_header(level))
    }

    #[test]
    fn test_header_nests_deeper_and_closes_on_same_level() {
        let mut man = Manager::new();
        let h1 = header_event(&man, 1);
        man.send(h1).unwrap();
        man.send(Event::word("One")).unwrap();
        man.send(Event::title()).unwrap();
        let h2 = header_event(&man, 2);
        man.send(h2).unwrap();
        man.send(Event::title()).unwrap();
        let again = header_event(&man, 1);
        man.send(again).unwrap();

        let doc = man.document();
        let top = doc.children(doc.root()).to_vec();
        assert_eq!(top.len(), 2);
        let nested = doc.children(top[0]);
        assert_eq!(nested.len(), 1);
        assert!(matches!(doc.kind(nested[0]), NodeKind::Header { level: 2, .. }));
    }

    #[test]
    fn test_words_after_title_open_a_body_paragraph() {
        let mut man = Manager::new();
        let h1 = header_event(&man, 1);
        man.send(h1).unwrap();
        man.send(Event::word("Title")).unwrap();
        man.send(Event::title()).unwrap();
        man.send(Event::word("body")).unwrap();

        let doc = man.document();
        let header = doc.children(doc.root())[0];
        let title = doc.header_title(header).unwrap();
        assert_eq!(doc.to_text(title), "Title");
        assert_eq!(doc.children(header).len(), 1);
        assert_eq!(doc.kind(doc.children(header)[0]), &NodeKind::Par);
    }

    #[test]
    fn test_header_end_event_closes_the_header() {
        let mut man = Manager::new();
        let h2 = header_event(&man, 2);
        man.send(h2).unwrap();
        man.send(Event::word("Title")).unwrap();
        man.send(Event::title()).unwrap();
        man.send(Event::word("inside")).unwrap();
        man.send(Event::new(Level::Header, EventKind::End)).unwrap();
        assert_eq!(man.depth(), 1);

        man.send(Event::word("outside")).unwrap();
        let doc = man.document();
        let top = doc.children(doc.root()).to_vec();
        assert_eq!(top.len(), 2);
        assert_eq!(doc.to_text(top[0]), "Titleinside");
        assert_eq!(doc.kind(top[1]), &NodeKind::Par);
        assert_eq!(doc.to_text(top[1]), "outside");
    }

    #[test]
    fn test_list_closing_inside_header_has_no_acceptor() {
        let mut man = Manager::new();
        let h1 = header_event(&man, 1);
        man.send(h1).unwrap();
        man.send(Event::title()).unwrap();
        let err = man
            .send(Event::new(Level::Paragraph, EventKind::EndItem))
            .unwrap_err();
        assert!(matches!(err.kind, ProtocolError::NoAcceptor { .. }));
    }

    #[test]
    fn test_end_quote_forwards_through_shallower_quote() {
        let mut man = Manager::new();
        man.send(Event::quote(EventKind::NewQuote, 1)).unwrap();
        man.send(Event::quote(EventKind::NewQuote, 2)).unwrap();
        man.send(Event::word("deep")).unwrap();
        man.send(Event::quote(EventKind::EndQuote, 1)).unwrap();
        assert_eq!(man.depth(), 1);
    }

    #[test]
    fn test_end_quote_without_opener_is_a_protocol_error() {
        let mut man = Manager::new();
        man.send(Event::quote(EventKind::NewQuote, 1)).unwrap();
        man.send(Event::word("shallow")).unwrap();
        let err = man
            .send(Event::quote(EventKind::EndQuote, 2))
            .unwrap_err();
        assert!(matches!(err.kind, ProtocolError::ClosedNotOpened { .. }));
    }
}
