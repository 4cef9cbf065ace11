//! Open property bag attached to every node
//!
//! Info entries are metadata (CSS class, alignment, spans, caption, labels), never
//! structure. Keys are plain strings so that front-ends and back-ends can agree on
//! their own extensions; the well-known ones are listed as constants.

use super::NodeId;
use serde::Serialize;
use std::collections::BTreeMap;

pub const CLASS: &str = "class";
pub const CSS: &str = "css";
pub const ALIGN: &str = "align";
pub const VALIGN: &str = "valign";
pub const ID: &str = "id";
pub const LANG: &str = "lang";
pub const HSPAN: &str = "hspan";
pub const VSPAN: &str = "vspan";
pub const WIDTH: &str = "width";
pub const HEIGHT: &str = "height";
pub const ALT: &str = "alt";
pub const CAPTION: &str = "caption";
pub const LABELS: &str = "labels";

/// Horizontal or vertical alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
    Justify,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InfoValue {
    Text(String),
    Int(i64),
    Align(Align),
    Node(NodeId),
    List(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Info(BTreeMap<String, InfoValue>);

impl Info {
    pub fn new() -> Self {
        Info(BTreeMap::new())
    }

    pub fn set(&mut self, key: impl Into<String>, value: InfoValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&InfoValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<InfoValue> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &InfoValue)> {
        self.0.iter()
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(InfoValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.0.get(key) {
            Some(InfoValue::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn align(&self, key: &str) -> Option<Align> {
        match self.0.get(key) {
            Some(InfoValue::Align(align)) => Some(*align),
            _ => None,
        }
    }

    pub fn node(&self, key: &str) -> Option<NodeId> {
        match self.0.get(key) {
            Some(InfoValue::Node(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn list(&self, key: &str) -> &[String] {
        match self.0.get(key) {
            Some(InfoValue::List(items)) => items,
            _ => &[],
        }
    }

    /// Append `item` to the list stored under `key`, ignoring duplicates.
    pub fn push_to_list(&mut self, key: &str, item: &str) {
        let entry = self
            .0
            .entry(key.to_string())
            .or_insert_with(|| InfoValue::List(Vec::new()));
        match entry {
            InfoValue::List(items) => {
                if !items.iter().any(|existing| existing == item) {
                    items.push(item.to_string());
                }
            }
            other => *other = InfoValue::List(vec![item.to_string()]),
        }
    }

    /// Remove `item` from the list under `key`; the key goes away with its last item.
    pub fn remove_from_list(&mut self, key: &str, item: &str) {
        let emptied = match self.0.get_mut(key) {
            Some(InfoValue::List(items)) => {
                items.retain(|existing| existing != item);
                items.is_empty()
            }
            _ => false,
        };
        if emptied {
            self.0.remove(key);
        }
    }
}
