//! Event-driven document tree construction for lightweight markup
//!
//!     Thot turns line-oriented markup into a typed document tree. Syntax modules
//!     recognize lines and words with regular expressions and emit events; a stack
//!     machine (the manager) routes every event to the innermost open node, which either
//!     consumes it, forwards it outward or hands it to a child it just opened. The closed
//!     tree is then walked by back-ends through the generator contract.
//!
//!     TLDR: For syntax authors:
//!         - A module never builds the tree directly, it sends events and lets the nodes decide.
//!         - Patterns are tried in registration order; for words the first alternative wins.
//!         - Node creation goes through the factory, so a module can decorate what it builds.
//!         - Problems in the input are diagnostics, not failures. Only protocol violations
//!           (closing what was never opened, popping the root) abort a parse.
//!
//! Architecture
//!
//!     The tree is an arena owned by the Document, nodes refer to each other by NodeId.
//!     The manager keeps the stack of open node ids and the owner of every pushed node,
//!     so forwarding never needs parent links.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # Locations, diagnostics, protocol and format errors
//!     ├── event.rs                # Events: level, kind, payload
//!     ├── factory.rs              # Node construction hooks
//!     ├── tree                    # Node family, info bag, Document arena, environment
//!     ├── protocol                # Per-variant event handling
//!     ├── manager.rs              # Stack machine and recognition loop
//!     ├── syntax                  # Pattern registry, module catalog, baseline and textile
//!     ├── generator.rs            # Generator contract for back-ends
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     └── formats                 # textile, treeviz, json, text
//!
//! Testing
//!     tests
//!     ├── common                  # parse helpers
//!     ├── protocol                # event level behaviour through the manager
//!     └── scenarios               # whole documents through textile
//!
//! Diagnostics
//!
//!     Every diagnostic is logged through tracing as it is recorded and returned with
//!     the document in a ParseOutput. The library never installs a subscriber.

pub mod error;
pub mod event;
pub mod factory;
pub mod format;
pub mod formats;
pub mod generator;
pub mod manager;
pub mod protocol;
pub mod registry;
pub mod syntax;
pub mod tree;

pub use error::{Diagnostic, FormatError, Location, ParseError, ProtocolError, Severity};
pub use event::{Event, EventKind, Level, Payload};
pub use factory::{DefaultFactory, Factory};
pub use format::Format;
pub use generator::{generate, Generator, Role, Walk};
pub use manager::{parse_with, Manager, ParseOptions, ParseOutput};
pub use registry::FormatRegistry;
pub use syntax::{ModuleCatalog, SyntaxModule};
pub use tree::{Document, Node, NodeId, NodeKind};
