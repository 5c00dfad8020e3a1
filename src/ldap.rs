use alloc::vec::Vec;
use std::collections::HashMap;

use ldap3::SearchEntry;

use crate::DirectoryEntry;

fn lookup<'a, V>(attributes: &'a HashMap<String, Vec<V>>, name: &str) -> Option<&'a Vec<V>> {
    attributes.get(name).or_else(|| {
        attributes
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, values)| values)
    })
}

/// `ldap3` files values that are not valid UTF-8 under `bin_attrs` and the
/// rest under `attrs`; binary values win when both carry the attribute.
impl DirectoryEntry for SearchEntry {
    #[inline]
    fn values(&self, attribute: &str) -> Option<Vec<&[u8]>> {
        lookup(&self.bin_attrs, attribute)
            .map(|values| values.iter().map(Vec::as_slice).collect())
            .or_else(|| {
                lookup(&self.attrs, attribute)
                    .map(|values| values.iter().map(String::as_bytes).collect())
            })
    }
}
