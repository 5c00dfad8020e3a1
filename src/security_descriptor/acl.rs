use alloc::vec::Vec;

use tracing::{debug, trace};

use super::ace::Ace;
use crate::{ByteReader, DecodeError, ObjectNode, OutputNode};

/// Size of the ACL header.
pub const ACL_HEADER_SIZE: usize = 8;

/// A decoded access-control list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acl {
    pub revision: u8,
    pub sbz1: u8,
    /// Declared size of the ACL, header and ACEs included.
    pub size: u16,
    /// Declared number of ACEs; `aces` may hold fewer.
    pub ace_count: u16,
    pub sbz2: u16,
    /// ACEs in on-wire order.
    pub aces: Vec<Ace>,
}

impl Acl {
    /// Decodes an ACL occupying the start of `bytes`.
    ///
    /// # Errors
    /// [`DecodeError::OutOfBounds`] if the 8-byte header does not fit.
    #[inline]
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::read(&ByteReader::new(bytes))
    }

    /// Decodes the ACL at the start of `reader`.
    ///
    /// The walk is confined to the ACL's declared size clamped to the
    /// reader. It stops after `ace_count` records, after a record declaring
    /// size 0, or once the next record would start at or past the end of
    /// that extent.
    pub(crate) fn read(reader: &ByteReader<'_>) -> Result<Self, DecodeError> {
        let [revision, sbz1, s0, s1, c0, c1, z0, z1] = reader.read_array(0)?;
        let size = u16::from_le_bytes([s0, s1]);
        let ace_count = u16::from_le_bytes([c0, c1]);
        let extent = reader.window_clamped(0, usize::from(size))?;

        let mut aces = Vec::new();
        let mut cursor = ACL_HEADER_SIZE;
        while aces.len() < usize::from(ace_count) {
            if cursor >= extent.len() {
                debug!(
                    decoded = aces.len(),
                    ace_count,
                    end = extent.base() + extent.len(),
                    "ACL ends before its declared ACE count"
                );
                break;
            }
            let ace = match Ace::read(&extent, cursor) {
                Ok(ace) => ace,
                Err(err) => {
                    debug!(%err, "ACE header truncated");
                    break;
                }
            };
            if let Some(err) = &ace.error {
                debug!(%err, ace_type = ace.header.ace_type, "ACE body truncated");
            }
            let step = usize::from(ace.header.size);
            aces.push(ace);
            if step == 0 {
                trace!(offset = extent.base() + cursor, "zero-size ACE ends the walk");
                break;
            }
            cursor += step;
        }

        Ok(Self {
            revision,
            sbz1,
            size,
            ace_count,
            sbz2: u16::from_le_bytes([z0, z1]),
            aces,
        })
    }

    /// Renders `revision`, `size`, `ace_count` and the `aces` array.
    #[inline]
    #[must_use]
    pub fn to_node(&self) -> OutputNode {
        ObjectNode::new()
            .with("revision", self.revision)
            .with("size", self.size)
            .with("ace_count", self.ace_count)
            .with("aces", self.aces.iter().map(Ace::to_node).collect::<Vec<_>>())
            .into()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod tests {
    use super::*;
    use crate::security_descriptor::ace::AceBody;
    use alloc::vec;
    use proptest::prelude::*;

    fn allow(mask: u32, sid: &[u8]) -> Vec<u8> {
        let size = u16::try_from(8 + sid.len()).unwrap();
        let mut out = vec![0x00, 0x00];
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&mask.to_le_bytes());
        out.extend_from_slice(sid);
        out
    }

    fn acl(ace_count: u16, aces: &[Vec<u8>]) -> Vec<u8> {
        let body: Vec<u8> = aces.concat();
        let size = u16::try_from(ACL_HEADER_SIZE + body.len()).unwrap();
        let mut out = vec![2, 0];
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&ace_count.to_le_bytes());
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(&body);
        out
    }

    #[test]
    fn walks_every_declared_ace() {
        let bytes = acl(
            2,
            &[
                allow(1, &sid_macro::sid!("S-1-5-18")),
                allow(2, &sid_macro::sid!("S-1-5-32-544")),
            ],
        );
        let parsed = Acl::parse(&bytes).unwrap();
        assert_eq!(parsed.aces.len(), 2);
        assert_eq!(parsed.size, 52);

        let node = parsed.to_node();
        let aces = node.get("aces").and_then(OutputNode::as_array).unwrap();
        assert_eq!(aces[1].get("trustee").and_then(OutputNode::as_str), Some("S-1-5-32-544"));
        assert_eq!(node.get("ace_count"), Some(&OutputNode::Integer(2)));
    }

    #[test]
    fn overclaimed_count_stops_at_extent() {
        let bytes = acl(9, &[allow(1, &sid_macro::sid!("S-1-5-18"))]);
        let parsed = Acl::parse(&bytes).unwrap();
        assert_eq!(parsed.ace_count, 9);
        assert_eq!(parsed.aces.len(), 1);
        assert_eq!(parsed.aces[0].error, None);
    }

    #[test]
    fn declared_size_bounds_the_walk() {
        let mut bytes = acl(2, &[allow(1, &sid_macro::sid!("S-1-5-18"))]);
        // a second ACE sits after the declared size and must be ignored
        bytes.extend_from_slice(&allow(2, &sid_macro::sid!("S-1-1-0")));
        assert_eq!(Acl::parse(&bytes).unwrap().aces.len(), 1);
    }

    #[test]
    fn zero_size_ace_is_emitted_then_ends_the_walk() {
        let mut zero = allow(5, &sid_macro::sid!("S-1-5-18"));
        zero[2] = 0;
        zero[3] = 0;
        let bytes = acl(3, &[zero, allow(1, &sid_macro::sid!("S-1-1-0"))]);
        let parsed = Acl::parse(&bytes).unwrap();

        assert_eq!(parsed.aces.len(), 1);
        let ace = &parsed.aces[0];
        assert_eq!(ace.header.size, 0);
        assert!(ace.error.is_some(), "an empty record cannot hold a mask");
        assert_eq!(ace.body, AceBody::Simple(Default::default()));
    }

    #[test]
    fn truncated_ace_still_advances() {
        // first record declares 12 bytes: enough for the mask, too short for the SID
        let mut short = allow(7, &sid_macro::sid!("S-1-5-18"));
        short.truncate(12);
        short[2] = 12;
        let bytes = acl(2, &[short, allow(1, &sid_macro::sid!("S-1-1-0"))]);
        let parsed = Acl::parse(&bytes).unwrap();

        assert_eq!(parsed.aces.len(), 2);
        assert!(parsed.aces[0].error.is_some(), "short record must flag the failed read");
        assert_eq!(parsed.aces[1].error, None);
        assert_eq!(
            parsed.to_node().get("aces").and_then(OutputNode::as_array).unwrap()[1]
                .get("trustee")
                .and_then(OutputNode::as_str),
            Some("S-1-1-0")
        );
    }

    #[test]
    fn header_must_fit() {
        assert!(
            matches!(Acl::parse(&[2, 0, 8, 0]), Err(DecodeError::OutOfBounds { .. })),
            "4 bytes cannot hold an ACL header"
        );
    }

    #[test]
    fn empty_acl_renders_empty_array() {
        let node = Acl::parse(&acl(0, &[])).unwrap().to_node();
        assert_eq!(node.get("aces"), Some(&OutputNode::Array(Vec::new())));
    }

    proptest! {
        #[test]
        fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            if let Ok(parsed) = Acl::parse(&bytes) {
                prop_assert!(parsed.aces.len() <= usize::from(parsed.ace_count), "walk exceeded ace_count");
                let _ = parsed.to_node().to_string();
            }
        }
    }
}
