//! Tables and rows

use super::{add, Dispatch};
use crate::error::ParseError;
use crate::event::{Event, EventKind, Payload};
use crate::manager::Manager;
use crate::tree::{NodeId, RowKind};

/// Rows are added as they come. A cell reaching the table itself goes to the first row,
/// which is created when missing.
pub(super) fn table(man: &mut Manager, id: NodeId, event: &Event) -> Result<Dispatch, ParseError> {
    match &event.kind {
        EventKind::NewCell => {
            let row = match man.document().children(id).first() {
                Some(row) => *row,
                None => {
                    let row = man.make_row(RowKind::Normal);
                    super::append(man, id, row);
                    row
                }
            };
            man.push(row);
            Ok(Dispatch::Resend)
        }
        EventKind::NewRow => {
            let kind = match &event.payload {
                Payload::Row { kind } => *kind,
                _ => RowKind::Normal,
            };
            let row = man.make_row(kind);
            add(man, id, row)?;
            Ok(Dispatch::Done)
        }
        _ => Ok(Dispatch::Forward),
    }
}

pub(super) fn row(man: &mut Manager, id: NodeId, event: &Event) -> Result<Dispatch, ParseError> {
    match &event.kind {
        EventKind::NewCell => {
            if let Some(cell) = man.make(event)? {
                add(man, id, cell)?;
            }
            Ok(Dispatch::Done)
        }
        EventKind::EndCell => Ok(Dispatch::Done),
        EventKind::EndRow => {
            man.pop()?;
            Ok(Dispatch::Done)
        }
        _ => Ok(Dispatch::Forward),
    }
}

#[cfg(test)]
mod tests {
    use crate::event::{Event, EventKind, Level};
    use crate::manager::Manager;
    use crate::tree::{NodeKind, RowKind};

    fn cell(man: &Manager, kind: RowKind) -> Event {
        let cell = man.factory().make_cell(kind, None, 1);
        Event::with_node(Level::Paragraph, EventKind::NewCell, cell)
    }

    #[test]
    fn test_rows_and_cells() {
        let mut man = Manager::new();
        for (kind, texts) in [(RowKind::Header, ["a", "b"]), (RowKind::Normal, ["1", "2"])] {
            man.send(Event::row(kind)).unwrap();
            for text in texts {
                let event = cell(&man, kind);
                man.send(event).unwrap();
                man.send(Event::word(text)).unwrap();
            }
        }
        let doc = man.document();
        let tables = doc.children(doc.root());
        assert_eq!(tables.len(), 1);
        let rows = doc.children(tables[0]);
        assert_eq!(rows.len(), 2);
        assert!(matches!(doc.kind(rows[0]), NodeKind::Row { kind: RowKind::Header }));
        assert_eq!(doc.children(rows[1]).len(), 2);
        assert_eq!(doc.table_width(tables[0]), 2);
    }

    #[test]
    fn test_cell_outside_table_opens_one() {
        let mut man = Manager::new();
        let event = cell(&man, RowKind::Normal);
        man.send(event).unwrap();
        man.send(Event::word("x")).unwrap();
        let doc = man.document();
        let table = doc.children(doc.root())[0];
        assert!(matches!(doc.kind(table), NodeKind::Table { .. }));
        assert_eq!(doc.to_text(table), "x");
    }
}
