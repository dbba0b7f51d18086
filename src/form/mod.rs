//! Path-addressable form state.
//!
//! Every form in the console keeps its editable state in a single
//! [`FormValue`] tree. Input widgets carry the dotted path of the field
//! they edit (e.g. `dataToSubmit.subject_alts.2`), and each edit produces
//! a wholly new tree via [`set_path_value`] so the surrounding state
//! container can treat updates as replacements.
//!
//! The write path creates missing intermediate containers on demand: a
//! purely numeric segment addresses (and if necessary creates) a
//! sequence, any other segment a mapping. A node whose existing shape
//! conflicts with the shape its segment requires is discarded and
//! replaced, children included.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

mod errors;
mod input;
mod path;

pub use self::{
    errors::{renumber_after_removal, ValidationErrors},
    input::{apply_input, coerce, AlsoSet, Coercion, InputEvent, SelectOption},
};

/// A terminal scalar stored in a form tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Leaf {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Leaf {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Leaf::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Leaf::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Leaf::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl From<bool> for Leaf {
    fn from(value: bool) -> Self {
        Leaf::Bool(value)
    }
}

impl From<i64> for Leaf {
    fn from(value: i64) -> Self {
        Leaf::Int(value)
    }
}

impl From<&str> for Leaf {
    fn from(value: &str) -> Self {
        Leaf::Str(value.to_owned())
    }
}

impl From<String> for Leaf {
    fn from(value: String) -> Self {
        Leaf::Str(value)
    }
}

/// One form's editable state: a mapping, a sequence, or a leaf.
///
/// Serializes as plain JSON, which is also the submission wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Leaf(Leaf),
    Seq(Vec<FormValue>),
    Map(BTreeMap<String, FormValue>),
}

impl Default for FormValue {
    /// The empty mapping.
    fn default() -> Self {
        FormValue::Map(BTreeMap::new())
    }
}

impl From<Leaf> for FormValue {
    fn from(leaf: Leaf) -> Self {
        FormValue::Leaf(leaf)
    }
}

impl FormValue {
    /// Reads the node at `path`, if present. Never creates anything.
    pub fn get(&self, path: &str) -> Option<&FormValue> {
        value_at_path(self, path)
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            FormValue::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_leaf().and_then(Leaf::as_bool)
    }

    pub fn as_int(&self) -> Option<i64> {
        self.as_leaf().and_then(Leaf::as_int)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_leaf().and_then(Leaf::as_str)
    }

    /// Coerces this node to a mapping, discarding it if it is anything else.
    fn force_map(&mut self) -> &mut BTreeMap<String, FormValue> {
        if !matches!(self, FormValue::Map(_)) {
            *self = FormValue::Map(BTreeMap::new());
        }

        match self {
            FormValue::Map(map) => map,
            _ => unreachable!("just coerced to a map"),
        }
    }

    /// Coerces this node to a sequence, discarding it if it is anything else.
    fn force_seq(&mut self) -> &mut Vec<FormValue> {
        if !matches!(self, FormValue::Seq(_)) {
            *self = FormValue::Seq(Vec::new());
        }

        match self {
            FormValue::Seq(seq) => seq,
            _ => unreachable!("just coerced to a seq"),
        }
    }
}

/// The write operand of [`set_path_value`]: store a leaf, or remove the
/// addressed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Set(Leaf),
    Unset,
}

impl Edit {
    pub fn set(value: impl Into<Leaf>) -> Self {
        Edit::Set(value.into())
    }
}

/// Returns a new tree equal to `root` except for the node addressed by
/// `path`.
///
/// An empty `path` returns an unchanged copy. Missing intermediate
/// containers are created with the shape the following segment requires;
/// an existing node of the wrong shape is replaced outright (its children
/// are lost). Removal from a sequence splices, shifting later elements
/// down. Writes past the end of a sequence land on a new trailing
/// element. No path panics on any tree shape.
pub fn set_path_value(root: &FormValue, path: &str, edit: &Edit) -> FormValue {
    let mut next = root.clone();

    if path.is_empty() {
        return next;
    }

    let segments = path::split_segments(path);

    // a non-empty path with no segments at all is a caller bug
    debug_assert!(!segments.is_empty(), "path {path:?} has no segments");
    if segments.is_empty() {
        return next;
    }

    set_in(&mut next, &segments, edit);

    next
}

fn set_in(node: &mut FormValue, segments: &[&str], edit: &Edit) {
    let [key, rest @ ..] = segments else {
        return;
    };

    match path::decide_shape(key) {
        path::Shape::Seq => {
            // decide_shape answers Seq only for an all-digit segment
            let Some(index) = path::seq_index(key) else {
                return;
            };
            set_in_seq(node.force_seq(), index, rest, edit);
        }
        path::Shape::Map => set_in_map(node.force_map(), key, rest, edit),
    }
}

fn set_in_map(map: &mut BTreeMap<String, FormValue>, key: &str, rest: &[&str], edit: &Edit) {
    if rest.is_empty() {
        match edit {
            Edit::Unset => {
                map.remove(key);
            }
            Edit::Set(leaf) => {
                map.insert(key.to_owned(), FormValue::Leaf(leaf.clone()));
            }
        }
        return;
    }

    let child = map.entry(key.to_owned()).or_default();
    set_in(child, rest, edit);
}

fn set_in_seq(seq: &mut Vec<FormValue>, index: usize, rest: &[&str], edit: &Edit) {
    if rest.is_empty() {
        match edit {
            Edit::Unset => {
                // splice, never leave a hole
                if index < seq.len() {
                    seq.remove(index);
                }
            }
            Edit::Set(leaf) => {
                let leaf = FormValue::Leaf(leaf.clone());
                if index < seq.len() {
                    seq[index] = leaf;
                } else {
                    seq.push(leaf);
                }
            }
        }
        return;
    }

    if index >= seq.len() {
        seq.push(FormValue::default());
    }

    let end = seq.len() - 1;
    set_in(&mut seq[index.min(end)], rest, edit);
}

/// Reads the node addressed by `path`, returning `None` when any segment
/// fails to resolve. An empty `path` addresses the root itself.
pub fn value_at_path<'t>(root: &'t FormValue, path: &str) -> Option<&'t FormValue> {
    let mut node = root;

    for segment in path::split_segments(path) {
        node = match (path::seq_index(segment), node) {
            (Some(index), FormValue::Seq(seq)) => seq.get(index)?,
            (None, FormValue::Map(map)) => map.get(segment)?,
            _ => return None,
        };
    }

    Some(node)
}
