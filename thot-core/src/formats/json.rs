//! JSON dump of a document tree
//!
//! Every node becomes an object carrying its `type`, its variant fields, its `info`
//! entries when there are any and a `children` array for non-empty containers. Header
//! titles and definition terms and bodies are nested under `title`, `term` and `body`;
//! a caption is nested in place of its node id.

use crate::error::FormatError;
use crate::format::{bool_option, Format};
use crate::generator::{generate, generate_from, Generator, Role, Walk};
use crate::tree::info;
use crate::tree::{Document, NodeId};
use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Default)]
struct JsonGenerator {
    stack: Vec<Map<String, Value>>,
    raw: Vec<Value>,
    result: Option<Value>,
}

impl JsonGenerator {
    fn node_object(doc: &Document, id: NodeId) -> Result<Map<String, Value>, FormatError> {
        let mut object = match serde_json::to_value(doc.node(id))? {
            Value::Object(object) => object,
            other => {
                return Err(FormatError::SerializationError(format!(
                    "node {id} serialized to {other}"
                )))
            }
        };
        for slot in ["title", "term", "body"] {
            object.remove(slot);
        }
        if let Some(caption) = doc.caption(id) {
            let caption = subtree(doc, caption)?;
            if let Some(Value::Object(info)) = object.get_mut("info") {
                info.insert(info::CAPTION.to_string(), caption);
            }
        }
        if !doc.children(id).is_empty() {
            object.insert("children".to_string(), Value::Array(Vec::new()));
        }
        Ok(object)
    }
}

impl Generator for JsonGenerator {
    fn backend(&self) -> &str {
        "json"
    }

    fn enter(&mut self, doc: &Document, id: NodeId, _role: Role) -> Result<Walk, FormatError> {
        let object = Self::node_object(doc, id)?;
        self.stack.push(object);
        Ok(Walk::Children)
    }

    fn leave(&mut self, _doc: &Document, _id: NodeId, role: Role) -> Result<(), FormatError> {
        let Some(object) = self.stack.pop() else {
            return Ok(());
        };
        let value = Value::Object(object);
        let Some(parent) = self.stack.last_mut() else {
            self.result = Some(value);
            return Ok(());
        };
        match role {
            Role::Title => {
                parent.insert("title".to_string(), value);
            }
            Role::Term => {
                parent.insert("term".to_string(), value);
            }
            Role::Body => {
                parent.insert("body".to_string(), value);
            }
            Role::Root | Role::Child => {
                if let Some(Value::Array(children)) = parent.get_mut("children") {
                    children.push(value);
                }
            }
        }
        Ok(())
    }

    fn raw(&mut self, text: &str) {
        self.raw.push(Value::String(text.to_string()));
    }
}

impl JsonGenerator {
    /// The root object, with raw feature output kept under a top-level `raw` array.
    fn finish(self) -> Value {
        match self.result {
            Some(Value::Object(mut root)) if !self.raw.is_empty() => {
                root.insert("raw".to_string(), Value::Array(self.raw));
                Value::Object(root)
            }
            Some(value) => value,
            None => Value::Null,
        }
    }
}

fn subtree(doc: &Document, id: NodeId) -> Result<Value, FormatError> {
    let mut gen = JsonGenerator::default();
    generate_from(doc, id, Role::Root, &mut gen)?;
    Ok(gen.finish())
}

/// Convert a document to a JSON value.
pub fn to_json_value(doc: &Document) -> Result<Value, FormatError> {
    let mut gen = JsonGenerator::default();
    generate(doc, &mut gen)?;
    Ok(gen.finish())
}

/// Format implementation for the JSON dump
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Nested JSON dump of the document tree"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(&to_json_value(doc)?)?)
    }

    /// Accepts `pretty` (default true).
    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let value = to_json_value(doc)?;
        if bool_option(options, "pretty")?.unwrap_or(true) {
            Ok(serde_json::to_string_pretty(&value)?)
        } else {
            Ok(serde_json::to_string(&value)?)
        }
    }
}
