//! The manager: stack machine and line/word recognition loop
//!
//! A [`Manager`] owns everything a parse run needs: the [`Document`] being built, the
//! stack of open nodes (the path from the root to the node receiving events), the
//! [`Factory`], the [`SyntaxRegistry`] and the module catalog.
//!
//! Input is consumed line by line:
//!
//! 1. variable references are reduced through the document environment;
//! 2. line patterns are tried in registration order, the first match runs its handler;
//! 3. otherwise the line is scanned for word patterns: text between matches becomes
//!    word events and each match runs its handler;
//! 4. the rest of the line is sent as a final word followed by the line suffix, and
//!    toggle styles left open by the line are closed.
//!
//! Events go to the node on top of the stack. When that node declines, it is popped and
//! the event is retried on the new top, in a loop, so that deep documents do not grow
//! the call stack.

use crate::error::{Diagnostic, Location, ParseError, ProtocolError, Severity};
use crate::event::{Event, EventKind, Level, Payload};
use crate::factory::{DefaultFactory, Factory};
use crate::protocol::{self, Dispatch};
use crate::syntax::{baseline, ModuleCatalog, SyntaxModule, SyntaxRegistry};
use crate::tree::{Document, Node, NodeId, NodeKind, RowKind};
use regex::Regex;
use std::collections::HashMap;
use std::io::BufRead;
use std::rc::Rc;
use tracing::{debug, error, info, trace, warn};

/// Knobs of the recognition loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Appended to the last word of every line, so that soft breaks become spaces.
    pub line_suffix: String,
    /// Turn toggle styles left open at the end of a line back into literal text.
    pub literal_unterminated_styles: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            line_suffix: " ".to_string(),
            literal_unterminated_styles: true,
        }
    }
}

/// Result of a completed parse: the closed document and everything reported on the way.
#[derive(Debug)]
pub struct ParseOutput {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == Severity::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}

/// Raw line collection into a block node until an end pattern.
#[derive(Debug)]
struct BlockMode {
    block: NodeId,
    end: Regex,
}

pub struct Manager {
    doc: Document,
    stack: Vec<NodeId>,
    owners: HashMap<NodeId, NodeId>,
    factory: Box<dyn Factory>,
    syntax: SyntaxRegistry,
    catalog: ModuleCatalog,
    used: Vec<String>,
    block: Option<BlockMode>,
    location: Location,
    diagnostics: Vec<Diagnostic>,
    options: ParseOptions,
    ended: bool,
}

impl Manager {
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self::with_document(Document::new(), options)
    }

    /// Start from a prepared document, e.g. one with a custom environment.
    pub fn with_document(doc: Document, options: ParseOptions) -> Self {
        let root = doc.root();
        let mut man = Manager {
            doc,
            stack: vec![root],
            owners: HashMap::new(),
            factory: Box::new(DefaultFactory),
            syntax: SyntaxRegistry::new(baseline::lines(), baseline::words()),
            catalog: ModuleCatalog::with_defaults(),
            used: Vec::new(),
            block: None,
            location: Location::default(),
            diagnostics: Vec::new(),
            options,
            ended: false,
        };
        baseline::init(&mut man);
        man
    }

    /// Replace the default factory. A module used later installs its own on top.
    pub fn with_factory(mut self, factory: Box<dyn Factory>) -> Self {
        self.factory = factory;
        self
    }

    /// Replace the built-in module catalog, e.g. to add modules of the host.
    pub fn with_catalog(mut self, catalog: ModuleCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn factory(&self) -> &dyn Factory {
        self.factory.as_ref()
    }

    pub fn syntax(&self) -> &SyntaxRegistry {
        &self.syntax
    }

    pub fn syntax_mut(&mut self) -> &mut SyntaxRegistry {
        &mut self.syntax
    }

    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn location(&self) -> Location {
        self.location.clone()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    // stack

    pub fn top(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.doc.root())
    }

    /// Number of open nodes, the root included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn stack(&self) -> &[NodeId] {
        &self.stack
    }

    pub fn push(&mut self, id: NodeId) {
        debug!(node = %id, kind = self.doc.node(id).type_name(), "push");
        let location = self.location.clone();
        self.doc.node_mut(id).set_source(&location);
        self.stack.push(id);
    }

    /// Close the top node: run its completion hook and drop it from the stack.
    pub fn pop(&mut self) -> Result<NodeId, ParseError> {
        if self.stack.len() <= 1 {
            return Err(self.fail(ProtocolError::PopRoot));
        }
        let Some(id) = self.stack.pop() else {
            return Err(self.fail(ProtocolError::PopRoot));
        };
        debug!(node = %id, kind = self.doc.node(id).type_name(), "pop");
        protocol::complete(self, id);
        if self.options.literal_unterminated_styles {
            protocol::unwrap_unterminated(self, id);
        }
        Ok(id)
    }

    /// Close the top node and hand `event` to its parent.
    pub fn forward(&mut self, event: Event) -> Result<(), ParseError> {
        self.pop()?;
        self.send(event)
    }

    /// Deliver `event` to the top of the stack, popping nodes that decline it.
    pub fn send(&mut self, event: Event) -> Result<(), ParseError> {
        trace!(%event, "send");
        loop {
            let top = self.top();
            match protocol::on_event(self, top, &event)? {
                Dispatch::Done => return Ok(()),
                Dispatch::Resend => continue,
                Dispatch::Forward => {
                    if top == self.doc.root() {
                        return Err(self.fail(ProtocolError::NoAcceptor {
                            event: event.to_string(),
                        }));
                    }
                    trace!(%event, node = %top, "forward");
                    self.pop()?;
                }
            }
        }
    }

    /// Add `child` to `container` through the container protocol.
    pub fn add(&mut self, container: NodeId, child: NodeId) -> Result<(), ParseError> {
        protocol::add(self, container, child)
    }

    pub(crate) fn owner(&self, id: NodeId) -> Option<NodeId> {
        self.owners.get(&id).copied()
    }

    pub(crate) fn set_owner(&mut self, child: NodeId, container: NodeId) {
        self.owners.insert(child, container);
    }

    pub(crate) fn clear_owner(&mut self, id: NodeId) {
        self.owners.remove(&id);
    }

    // construction

    pub fn make_par(&mut self) -> NodeId {
        let node = self.factory.make_par();
        self.doc.alloc(node)
    }

    pub fn make_row(&mut self, kind: RowKind) -> NodeId {
        let node = self.factory.make_row(kind);
        self.doc.alloc(node)
    }

    /// A table holding one empty row of the given kind.
    pub fn new_table(&mut self, kind: RowKind) -> NodeId {
        let node = self.factory.make_table();
        let table = self.doc.alloc(node);
        let row = self.make_row(kind);
        protocol::append(self, table, row);
        table
    }

    /// Build the node an event stands for. Closing events have no node: reaching this
    /// point with one means nothing open matched it.
    pub fn make(&mut self, event: &Event) -> Result<Option<NodeId>, ParseError> {
        let node = match (&event.kind, &event.payload) {
            (_, Payload::Node(node)) => Node::clone(node),
            (
                EventKind::NewStyle,
                Payload::Style {
                    style,
                    marker,
                    explicit,
                },
            ) => {
                if *explicit {
                    self.factory.make_open_style(style.clone())
                } else {
                    let mut node = self.factory.make_style(style.clone());
                    if let NodeKind::Style { marker: slot, .. } = &mut node.kind {
                        slot.clone_from(marker);
                    }
                    node
                }
            }
            (EventKind::NewItem, Payload::Item { kind, depth }) => {
                let node = self.factory.make_list(*kind, *depth);
                let list = self.doc.alloc(node);
                protocol::new_list_item(self, list);
                return Ok(Some(list));
            }
            (EventKind::NewDef, Payload::Def { depth, alternate }) => {
                let node = self.factory.make_def_list(*depth, *alternate);
                let list = self.doc.alloc(node);
                protocol::new_def_item(self, list);
                return Ok(Some(list));
            }
            (EventKind::NewQuote, Payload::Quote { depth }) => self.factory.make_quote(*depth),
            (EventKind::NewRow, Payload::Row { kind }) => return Ok(Some(self.new_table(*kind))),
            (EventKind::NewCell, _) => self.factory.make_cell(RowKind::Normal, None, 1),
            (kind, _) if kind.is_closing() => {
                return Err(self.fail(ProtocolError::ClosedNotOpened {
                    what: event.to_string(),
                }));
            }
            _ => return Ok(None),
        };
        Ok(Some(self.doc.alloc(node)))
    }

    // diagnostics

    /// A protocol error located at the current input position.
    pub fn fail(&self, kind: ProtocolError) -> ParseError {
        ParseError::new(kind, self.location.clone())
    }

    pub fn report(&mut self, severity: Severity, message: impl Into<String>, location: Location) {
        let diag = Diagnostic {
            severity,
            message: message.into(),
            location,
        };
        match severity {
            Severity::Info => info!("{diag}"),
            Severity::Warning => warn!("{diag}"),
            Severity::Error => error!("{diag}"),
        }
        self.diagnostics.push(diag);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let location = self.location.clone();
        self.report(Severity::Info, message, location);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let location = self.location.clone();
        self.report(Severity::Warning, message, location);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let location = self.location.clone();
        self.report(Severity::Error, message, location);
    }

    // labels and attachments

    /// Register a label; redefinition moves it and emits a warning.
    pub fn add_label(&mut self, name: &str, id: NodeId) {
        if self.doc.add_label(name, id).is_some() {
            self.warn(format!("label '{name}' redefined"));
        }
    }

    /// Closest node satisfying `accepts`: for each open node from the top, its last
    /// child first, then the node itself.
    pub fn find_target(&self, accepts: impl Fn(&Node) -> bool) -> Option<NodeId> {
        self.stack.iter().rev().find_map(|id| {
            self.doc
                .last_child(*id)
                .filter(|last| accepts(self.doc.node(*last)))
                .or_else(|| Some(*id).filter(|id| accepts(self.doc.node(*id))))
        })
    }

    // modules

    /// Activate a syntax module: its patterns join the registry, its factory replaces
    /// the current one and its init hook runs. Using a module twice has no effect.
    pub fn use_module(&mut self, module: Rc<dyn SyntaxModule>) -> Result<(), ParseError> {
        let name = module.name().to_string();
        if self.used.contains(&name) {
            return Ok(());
        }
        let lines = module.lines().map_err(|err| self.fail(err))?;
        let words = module.words().map_err(|err| self.fail(err))?;
        if module.replaces_syntax() {
            self.syntax.set_syntax(lines, words);
        } else {
            for line in lines {
                self.syntax.add_line(line);
            }
            for word in words {
                self.syntax.add_word(word);
            }
        }
        if let Some(factory) = module.factory() {
            self.factory = factory;
        }
        self.used.push(name.clone());
        info!(module = %name, "syntax module in use");
        module.init(self)
    }

    /// Activate a module from the catalog. Unknown names are reported, not fatal.
    pub fn use_named(&mut self, name: &str) -> Result<bool, ParseError> {
        match self.catalog.get(name) {
            Some(module) => {
                self.use_module(module)?;
                Ok(true)
            }
            None => {
                self.error(format!("unknown module '{name}'"));
                Ok(false)
            }
        }
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.iter().any(|used| used == name)
    }

    // recognition loop

    /// Parse a whole text. `name` locates diagnostics and selects a module by extension.
    pub fn parse_str(&mut self, text: &str, name: &str) -> Result<(), ParseError> {
        self.begin_input(name)?;
        for (index, line) in text.lines().enumerate() {
            self.location.line = Some(index + 1);
            self.parse_line(line)?;
        }
        Ok(())
    }

    pub fn parse_reader<R: BufRead>(&mut self, reader: R, name: &str) -> Result<(), ParseError> {
        self.begin_input(name)?;
        for (index, line) in reader.lines().enumerate() {
            self.location.line = Some(index + 1);
            let line = line.map_err(|err| self.fail(ProtocolError::Input(err.to_string())))?;
            self.parse_line(&line)?;
        }
        Ok(())
    }

    fn begin_input(&mut self, name: &str) -> Result<(), ParseError> {
        self.location = Location::new((!name.is_empty()).then(|| name.to_string()), None);
        if let Some(module) = self.catalog.detect_from_filename(name) {
            self.use_module(module)?;
        }
        Ok(())
    }

    /// Process one raw input line.
    pub fn parse_line(&mut self, line: &str) -> Result<(), ParseError> {
        if self.feed_block(line) {
            return Ok(());
        }
        let line = self.doc.reduce(line);
        self.reparse(&line)?;
        self.end_line()
    }

    /// Dispatch an already reduced line, e.g. from a handler rewriting its input.
    pub fn reparse(&mut self, line: &str) -> Result<(), ParseError> {
        match self.syntax.match_line(line) {
            Some((handler, caps)) => handler(self, &caps),
            None => {
                let suffix = self.options.line_suffix.clone();
                self.parse_text_with(line, &suffix)
            }
        }
    }

    /// Scan `text` for words, ending with the default line suffix.
    pub fn parse_text(&mut self, text: &str) -> Result<(), ParseError> {
        let suffix = self.options.line_suffix.clone();
        self.parse_text_with(text, &suffix)
    }

    /// Scan `text` for word patterns, sending the text around matches as words.
    pub fn parse_text_with(&mut self, text: &str, suffix: &str) -> Result<(), ParseError> {
        let matcher = self.syntax.word_matcher().map_err(|err| self.fail(err))?;
        let mut rest = text;
        while let Some(caps) = matcher.captures(rest) {
            let Some(whole) = caps.get(0).filter(|whole| !whole.as_str().is_empty()) else {
                break;
            };
            if whole.start() > 0 {
                self.send_word(&rest[..whole.start()])?;
            }
            if let Some(handler) = matcher.handler_for(&caps) {
                handler(self, &caps)?;
            }
            rest = &rest[whole.end()..];
        }
        let tail = format!("{rest}{suffix}");
        if !tail.is_empty() {
            self.send_word(&tail)?;
        }
        Ok(())
    }

    pub fn send_word(&mut self, text: &str) -> Result<(), ParseError> {
        let word = self.factory.make_word(text);
        self.send(Event::with_node(Level::Word, EventKind::New, word))
    }

    /// Close toggle styles still open at the end of a line.
    pub fn end_line(&mut self) -> Result<(), ParseError> {
        while let NodeKind::Style {
            marker: Some(_),
            terminated: false,
            ..
        } = self.doc.kind(self.top())
        {
            self.pop()?;
        }
        Ok(())
    }

    /// Insert `block` in the tree and route the next raw lines into it until one
    /// matches `end`.
    pub fn begin_block(&mut self, block: Node, end: Regex) -> Result<(), ParseError> {
        self.send(Event::with_node(Level::Paragraph, EventKind::New, block))?;
        let top = self.top();
        match self.doc.last_child(top) {
            Some(id) if matches!(self.doc.kind(id), NodeKind::Block { .. }) => {
                self.block = Some(BlockMode { block: id, end });
            }
            _ => self.error("block could not be placed"),
        }
        Ok(())
    }

    fn feed_block(&mut self, line: &str) -> bool {
        let Some(mode) = &self.block else {
            return false;
        };
        if mode.end.is_match(line) {
            self.block = None;
            return true;
        }
        let block = mode.block;
        if let NodeKind::Block { lines, .. } = &mut self.doc.node_mut(block).kind {
            lines.push(line.to_string());
        }
        true
    }

    /// Send the end of the document and run the completers. Runs once.
    pub fn end(&mut self) -> Result<(), ParseError> {
        if self.ended {
            return Ok(());
        }
        self.ended = true;
        if self.block.take().is_some() {
            self.warn("block not closed before the end of the document");
        }
        self.send(Event::end_document())?;
        for completer in self.doc.take_completers() {
            completer(self);
        }
        Ok(())
    }

    /// Complete the parse and hand over the closed document.
    pub fn finish(mut self) -> Result<ParseOutput, ParseError> {
        self.end()?;
        let root = self.doc.root();
        protocol::complete(&mut self, root);
        self.stack.clear();
        Ok(ParseOutput {
            document: self.doc,
            diagnostics: self.diagnostics,
        })
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `text` with the named module active.
pub fn parse_with(
    text: &str,
    name: &str,
    module: &str,
    options: ParseOptions,
) -> Result<ParseOutput, ParseError> {
    let mut man = Manager::with_options(options);
    man.use_named(module)?;
    man.parse_str(text, name)?;
    man.finish()
}
