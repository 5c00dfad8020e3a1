//! Turns directory entries into output objects, one decoder per semantic type.
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use adsnap::{Catalog, DocumentBuilder};
//!
//! let catalog = Catalog::active_directory();
//! let mut entry: BTreeMap<String, Vec<Vec<u8>>> = BTreeMap::new();
//! entry.insert("sAMAccountName".into(), vec![b"krbtgt".to_vec()]);
//! entry.insert("accountExpires".into(), vec![b"9223372036854775807".to_vec()]);
//!
//! let mut document = DocumentBuilder::new(&catalog);
//! document.push_entry("users", &entry).unwrap();
//! let users = document.finish();
//! let user = &users.get("users").unwrap().as_array().unwrap()[0];
//! assert_eq!(user.get("accountExpires").unwrap().as_str(), Some("Never"));
//! ```

use alloc::borrow::{Cow, ToOwned};
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::str;

use tracing::{debug, trace};

use crate::{
    AttributeSpec, Catalog, INVALID, ObjectNode, OutputNode, ProjectionError, SemanticType,
    decode_filetime, decode_security_descriptor, decode_sid,
};

/// Read access to the raw values of one directory entry.
pub trait DirectoryEntry {
    /// Values of `attribute` in directory order, `None` when the entry does
    /// not carry it.
    fn values(&self, attribute: &str) -> Option<Vec<&[u8]>>;
}

impl<T: DirectoryEntry + ?Sized> DirectoryEntry for &T {
    #[inline]
    fn values(&self, attribute: &str) -> Option<Vec<&[u8]>> {
        (**self).values(attribute)
    }
}

/// Exact name first, then an ASCII case-insensitive match.
impl DirectoryEntry for BTreeMap<String, Vec<Vec<u8>>> {
    #[inline]
    fn values(&self, attribute: &str) -> Option<Vec<&[u8]>> {
        self.get(attribute)
            .or_else(|| {
                self.iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(attribute))
                    .map(|(_, values)| values)
            })
            .map(|values| values.iter().map(Vec::as_slice).collect())
    }
}

fn text(raw: &[u8]) -> String {
    match String::from_utf8_lossy(raw) {
        Cow::Borrowed(text) => text.to_owned(),
        Cow::Owned(text) => {
            debug!("attribute value is not valid UTF-8");
            text
        }
    }
}

fn integer(raw: &[u8]) -> OutputNode {
    str::from_utf8(raw)
        .ok()
        .and_then(|text| text.trim().parse::<i64>().ok())
        .map_or_else(
            || {
                debug!("enumerated integer rejected");
                OutputNode::from(INVALID)
            },
            OutputNode::Integer,
        )
}

/// Decodes the raw values of one attribute.
///
/// Returns `None` when there is nothing to render, so the caller can omit
/// the key. Every type but [`SemanticType::MultiValuedString`] looks at the
/// first value only.
///
/// # Examples
/// ```rust
/// # use adsnap::{project_value, OutputNode, SemanticType};
/// let admin_count = project_value(SemanticType::EnumeratedInteger, &[b"1".as_slice()]);
/// assert_eq!(admin_count, Some(OutputNode::Integer(1)));
/// assert_eq!(project_value(SemanticType::String, &[]), None);
/// ```
#[inline]
#[must_use]
pub fn project_value(semantic_type: SemanticType, values: &[&[u8]]) -> Option<OutputNode> {
    let first = *values.first()?;
    let node = match semantic_type {
        SemanticType::String => text(first).into(),
        SemanticType::MultiValuedString => values
            .iter()
            .map(|raw| OutputNode::from(text(raw)))
            .collect::<Vec<_>>()
            .into(),
        SemanticType::BinarySid => decode_sid(Some(first)).into(),
        SemanticType::Filetime => decode_filetime(Some(first)).into(),
        SemanticType::EnumeratedInteger => integer(first),
        SemanticType::BinarySecurityDescriptor => decode_security_descriptor(Some(first)),
    };
    Some(node)
}

/// Builds the output object of one entry, keys in `attributes` order.
///
/// Attributes the entry does not carry, or carries with no values, are left
/// out.
#[inline]
#[must_use]
pub fn project_entry<E: DirectoryEntry + ?Sized>(
    attributes: &[AttributeSpec],
    entry: &E,
) -> OutputNode {
    let mut object = ObjectNode::new();
    for spec in attributes {
        let Some(values) = entry.values(&spec.name) else {
            trace!(attribute = %spec.name, "attribute absent");
            continue;
        };
        if let Some(node) = project_value(spec.semantic_type, &values) {
            object.insert(spec.name.as_str(), node);
        }
    }
    object.into()
}

/// Collects projected entries into `{ category: [entry, …], … }`.
///
/// Every catalog category appears in the finished document, in catalog
/// order, even when no entry was pushed for it.
#[derive(Debug, Clone)]
pub struct DocumentBuilder<'a> {
    catalog: &'a Catalog,
    entries: Vec<Vec<OutputNode>>,
}

impl<'a> DocumentBuilder<'a> {
    #[inline]
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            entries: catalog.iter().map(|_| Vec::new()).collect(),
        }
    }

    /// Projects `entry` with the attributes of `category` and appends it.
    ///
    /// # Errors
    /// [`ProjectionError::UnknownCategory`] if the catalog has no such
    /// category.
    #[inline]
    pub fn push_entry<E: DirectoryEntry + ?Sized>(
        &mut self,
        category: &str,
        entry: &E,
    ) -> Result<(), ProjectionError> {
        let (index, spec) = self
            .catalog
            .iter()
            .enumerate()
            .find(|(_, candidate)| candidate.name == category)
            .ok_or_else(|| ProjectionError::UnknownCategory(category.to_owned()))?;
        let node = project_entry(&spec.attributes, entry);
        if let Some(bucket) = self.entries.get_mut(index) {
            bucket.push(node);
        }
        Ok(())
    }

    /// Number of entries pushed so far across all categories.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().map(Vec::len).sum()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    #[must_use]
    pub fn finish(self) -> OutputNode {
        self.catalog
            .iter()
            .zip(self.entries)
            .map(|(category, entries)| (category.name.clone(), OutputNode::Array(entries)))
            .collect::<ObjectNode>()
            .into()
    }
}
