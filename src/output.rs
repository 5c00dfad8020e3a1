//! Order-preserving output tree and its indented text rendering.
//!
//! Every decoder in the crate produces an [`OutputNode`]. The text form is
//! JSON laid out with four spaces per level, keys in insertion order:
//!
//! ```text
//! {
//!     "revision": 1,
//!     "aces": [
//!         "…"
//!     ]
//! }
//! ```

use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{self, Display, Write};

use delegate::delegate;

const INDENT: &str = "    ";

/// One value of the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputNode {
    String(String),
    Integer(i64),
    Object(ObjectNode),
    Array(Vec<OutputNode>),
}

/// Ordered mapping of unique keys to nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectNode {
    entries: Vec<(String, OutputNode)>,
}

impl ObjectNode {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    delegate! {
        to self.entries {
            /// Number of keys.
            #[inline]
            pub fn len(&self) -> usize;
            /// Whether the object has no keys.
            #[inline]
            pub fn is_empty(&self) -> bool;
        }
    }

    /// Appends `key`, or replaces its value in place if already present.
    ///
    /// Returns the replaced value.
    #[inline]
    pub fn insert<K: Into<String>, V: Into<OutputNode>>(
        &mut self,
        key: K,
        value: V,
    ) -> Option<OutputNode> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(core::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder form of [`ObjectNode::insert`].
    #[inline]
    #[must_use]
    pub fn with<K: Into<String>, V: Into<OutputNode>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OutputNode> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in insertion order.
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Entries in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OutputNode)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl OutputNode {
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            Self::Object(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    /// Looks `key` up when this node is an object.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_object().and_then(|object| object.get(key))
    }

    /// The indented text form, same as `to_string()`.
    #[inline]
    #[must_use]
    pub fn to_pretty_string(&self) -> String {
        self.to_string()
    }

    /// Writes the indented text form into any [`fmt::Write`] sink.
    ///
    /// # Errors
    /// Propagates the sink's error.
    #[inline]
    pub fn write_pretty<W: Write>(&self, out: &mut W) -> fmt::Result {
        write_node(out, self, 0)
    }
}

impl Display for OutputNode {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self, 0)
    }
}

impl From<String> for OutputNode {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for OutputNode {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<i64> for OutputNode {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for OutputNode {
    #[inline]
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u16> for OutputNode {
    #[inline]
    fn from(value: u16) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u8> for OutputNode {
    #[inline]
    fn from(value: u8) -> Self {
        Self::Integer(value.into())
    }
}

impl From<ObjectNode> for OutputNode {
    #[inline]
    fn from(value: ObjectNode) -> Self {
        Self::Object(value)
    }
}

impl From<Vec<Self>> for OutputNode {
    #[inline]
    fn from(value: Vec<Self>) -> Self {
        Self::Array(value)
    }
}

impl FromIterator<(String, OutputNode)> for ObjectNode {
    #[inline]
    fn from_iter<T: IntoIterator<Item = (String, OutputNode)>>(iter: T) -> Self {
        let mut object = Self::new();
        for (key, value) in iter {
            object.insert(key, value);
        }
        object
    }
}

fn write_indent<W: Write>(out: &mut W, level: usize) -> fmt::Result {
    for _ in 0..level {
        out.write_str(INDENT)?;
    }
    Ok(())
}

fn write_string<W: Write>(out: &mut W, value: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in value.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

fn write_node<W: Write>(out: &mut W, node: &OutputNode, level: usize) -> fmt::Result {
    match node {
        OutputNode::String(value) => write_string(out, value),
        OutputNode::Integer(value) => write!(out, "{value}"),
        OutputNode::Object(object) => {
            if object.is_empty() {
                return out.write_str("{}");
            }
            out.write_str("{\n")?;
            for (index, (key, value)) in object.iter().enumerate() {
                if index > 0 {
                    out.write_str(",\n")?;
                }
                write_indent(out, level + 1)?;
                write_string(out, key)?;
                out.write_str(": ")?;
                write_node(out, value, level + 1)?;
            }
            out.write_char('\n')?;
            write_indent(out, level)?;
            out.write_char('}')
        }
        OutputNode::Array(values) => {
            if values.is_empty() {
                return out.write_str("[]");
            }
            out.write_str("[\n")?;
            for (index, value) in values.iter().enumerate() {
                if index > 0 {
                    out.write_str(",\n")?;
                }
                write_indent(out, level + 1)?;
                write_node(out, value, level + 1)?;
            }
            out.write_char('\n')?;
            write_indent(out, level)?;
            out.write_char(']')
        }
    }
}
