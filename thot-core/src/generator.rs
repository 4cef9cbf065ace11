//! Generator contract: how back-ends consume a closed document
//!
//! A back-end implements [`Generator`] and hands it to [`generate`], which walks the
//! tree depth-first in child order. Header titles and definition terms and bodies are
//! not ordinary children; they are visited in their own slot, with a distinct [`Role`],
//! before (title) or instead of (term, body) the children.
//!
//! Features registered on the document get a chance to emit raw output through
//! [`Feature::prepare`](crate::tree::Feature::prepare) before the walk starts.

use crate::error::FormatError;
use crate::tree::{Document, NodeId};

/// Position of a node relative to its parent during the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Root,
    Child,
    Title,
    Term,
    Body,
}

/// What to do after entering a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Children,
    Skip,
}

pub trait Generator {
    /// Back-end name, e.g. `"treeviz"`, used by features to pick their output.
    fn backend(&self) -> &str;

    fn enter(&mut self, doc: &Document, id: NodeId, role: Role) -> Result<Walk, FormatError>;

    fn leave(&mut self, _doc: &Document, _id: NodeId, _role: Role) -> Result<(), FormatError> {
        Ok(())
    }

    /// Output text verbatim.
    fn raw(&mut self, text: &str);
}

/// Walk `doc` from its root. The walk uses an explicit stack, so deep documents do not
/// grow the call stack.
pub fn generate(doc: &Document, gen: &mut dyn Generator) -> Result<(), FormatError> {
    for feature in doc.features() {
        feature.prepare(doc, gen)?;
    }
    generate_from(doc, doc.root(), Role::Root, gen)
}

/// Walk the subtree rooted at `id`, e.g. a caption paragraph.
pub fn generate_from(
    doc: &Document,
    id: NodeId,
    role: Role,
    gen: &mut dyn Generator,
) -> Result<(), FormatError> {
    enum Step {
        Enter(NodeId, Role),
        Leave(NodeId, Role),
    }

    let mut pending = vec![Step::Enter(id, role)];
    while let Some(step) = pending.pop() {
        match step {
            Step::Enter(id, role) => {
                let walk = gen.enter(doc, id, role)?;
                pending.push(Step::Leave(id, role));
                if walk == Walk::Children {
                    for (child, role) in doc.slots(id).into_iter().rev() {
                        pending.push(Step::Enter(child, role));
                    }
                }
            }
            Step::Leave(id, role) => gen.leave(doc, id, role)?,
        }
    }
    Ok(())
}
