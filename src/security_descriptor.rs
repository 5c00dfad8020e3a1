//! Self-relative security descriptors (MS-DTYP 2.4.6).
//!
//! ```text
//! 0     1      2         4             8             12           16           20
//! +-----+------+---------+-------------+-------------+------------+------------+
//! | rev | sbz1 | control | owner off.  | group off.  | sacl off.  | dacl off.  |
//! +-----+------+---------+-------------+-------------+------------+------------+
//! ```
//!
//! Offsets are relative to the start of the blob; `0` means absent. The owner
//! and group offsets point at SIDs, the DACL offset at an [`Acl`].
//!
//! [`SecurityDescriptor::parse`] gives a typed view; [`decode_security_descriptor`]
//! renders any blob, however malformed, into an [`OutputNode`].

mod ace;
mod acl;

use alloc::string::ToString;

use tracing::debug;

pub use ace::{
    ACE_HEADER_SIZE, ACE_INHERITED_OBJECT_TYPE_PRESENT, ACE_OBJECT_TYPE_PRESENT, Ace, AceBody,
    AceFamily, AceHeader, AceType, ObjectAce, SimpleAce,
};
pub use acl::{ACL_HEADER_SIZE, Acl};

use crate::{ByteReader, DecodeError, INVALID, ObjectNode, OutputNode, SidIdentity};

/// The fixed 20-byte descriptor header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SecurityDescriptorHeader {
    pub revision: u8,
    pub sbz1: u8,
    /// `SECURITY_DESCRIPTOR_CONTROL` bits.
    pub control: u16,
    pub owner_offset: u32,
    pub group_offset: u32,
    pub sacl_offset: u32,
    pub dacl_offset: u32,
}

impl SecurityDescriptorHeader {
    /// Size of the header on the wire.
    pub const SIZE: usize = 20;

    /// # Errors
    /// [`DecodeError::OutOfBounds`] if fewer than 20 bytes are readable.
    #[inline]
    pub fn read(reader: &ByteReader<'_>) -> Result<Self, DecodeError> {
        let [revision, sbz1, c0, c1] = reader.read_array(0)?;
        Ok(Self {
            revision,
            sbz1,
            control: u16::from_le_bytes([c0, c1]),
            owner_offset: reader.read_u32_le(4)?,
            group_offset: reader.read_u32_le(8)?,
            sacl_offset: reader.read_u32_le(12)?,
            dacl_offset: reader.read_u32_le(16)?,
        })
    }
}

/// A decoded self-relative security descriptor.
///
/// Each optional part is `None` when its offset is 0, and holds the decode
/// error when the bytes it points at are unusable. The SACL is only located,
/// never decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityDescriptor {
    pub header: SecurityDescriptorHeader,
    pub owner: Option<Result<SidIdentity, DecodeError>>,
    pub group: Option<Result<SidIdentity, DecodeError>>,
    pub dacl: Option<Result<Acl, DecodeError>>,
}

fn to_offset(offset: u32) -> usize {
    usize::try_from(offset).unwrap_or(usize::MAX)
}

fn read_sid_at(reader: &ByteReader<'_>, offset: u32) -> Option<Result<SidIdentity, DecodeError>> {
    (offset != 0).then(|| {
        reader
            .tail(to_offset(offset))
            .and_then(|sid| SidIdentity::read(&sid))
    })
}

impl SecurityDescriptor {
    /// Decodes a self-relative security descriptor.
    ///
    /// Only a missing header is fatal; owner, group and DACL failures are
    /// kept on the returned value.
    ///
    /// # Errors
    /// [`DecodeError::OutOfBounds`] if `bytes` is shorter than 20 bytes.
    ///
    /// # Examples
    /// ```rust
    /// # use adsnap::SecurityDescriptor;
    /// let mut blob = vec![1, 0, 0x00, 0x80, 20, 0, 0, 0];
    /// blob.extend_from_slice(&[0; 12]);
    /// blob.extend_from_slice(&[1, 1, 0, 0, 0, 0, 0, 5, 18, 0, 0, 0]);
    /// let sd = SecurityDescriptor::parse(&blob).unwrap();
    /// assert_eq!(sd.owner.unwrap().unwrap().to_string(), "S-1-5-18");
    /// assert!(sd.dacl.is_none());
    /// ```
    #[inline]
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let reader = ByteReader::new(bytes);
        let header = SecurityDescriptorHeader::read(&reader)?;

        let dacl_offset = to_offset(header.dacl_offset);
        let dacl = if header.dacl_offset == 0 {
            None
        } else if dacl_offset >= reader.len() {
            debug!(dacl_offset, len = reader.len(), "DACL offset past end of descriptor");
            None
        } else {
            Some(reader.tail(dacl_offset).and_then(|acl| Acl::read(&acl)))
        };

        Ok(Self {
            owner: read_sid_at(&reader, header.owner_offset),
            group: read_sid_at(&reader, header.group_offset),
            header,
            dacl,
        })
    }

    /// Renders `revision`, `control`, then `owner`, `group` and `dacl` when
    /// present. Unusable SIDs render as `"Invalid"`; an unusable DACL as an
    /// object holding only `decode_error`.
    #[inline]
    #[must_use]
    pub fn to_node(&self) -> OutputNode {
        let mut node = ObjectNode::new()
            .with("revision", self.header.revision)
            .with("control", self.header.control);

        for (key, sid) in [("owner", &self.owner), ("group", &self.group)] {
            match sid {
                Some(Ok(sid)) => {
                    node.insert(key, sid.to_string());
                }
                Some(Err(err)) => {
                    debug!(%err, key, "descriptor SID rejected");
                    node.insert(key, INVALID);
                }
                None => {}
            }
        }

        match &self.dacl {
            Some(Ok(acl)) => {
                node.insert("dacl", acl.to_node());
            }
            Some(Err(err)) => {
                debug!(%err, "DACL header rejected");
                node.insert("dacl", ObjectNode::new().with("decode_error", err.to_string()));
            }
            None => {}
        }
        node.into()
    }
}

/// Renders a raw `nTSecurityDescriptor` value.
///
/// Never fails: an absent or header-less blob yields
/// `{"revision": 0, "control": 0}`, and damage further in shows up as
/// `"Invalid"` SIDs or `decode_error` fields.
///
/// # Examples
/// ```rust
/// # use adsnap::decode_security_descriptor;
/// let node = decode_security_descriptor(None);
/// assert_eq!(node.to_string(), "{\n    \"revision\": 0,\n    \"control\": 0\n}");
/// ```
#[inline]
#[must_use]
pub fn decode_security_descriptor(raw: Option<&[u8]>) -> OutputNode {
    match raw.map(SecurityDescriptor::parse) {
        Some(Ok(descriptor)) => descriptor.to_node(),
        Some(Err(err)) => {
            debug!(%err, "security descriptor header rejected");
            empty_descriptor()
        }
        None => empty_descriptor(),
    }
}

fn empty_descriptor() -> OutputNode {
    ObjectNode::new()
        .with("revision", 0_i64)
        .with("control", 0_i64)
        .into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn header(control: u16, owner: u32, group: u32, dacl: u32) -> Vec<u8> {
        let mut out = vec![1, 0];
        out.extend_from_slice(&control.to_le_bytes());
        for offset in [owner, group, 0, dacl] {
            out.extend_from_slice(&offset.to_le_bytes());
        }
        out
    }

    #[test]
    fn short_blob_renders_zero_header() {
        for len in [0, 1, 19] {
            let bytes = vec![1u8; len];
            let node = decode_security_descriptor(Some(bytes.as_slice()));
            assert_eq!(
                node.as_object().unwrap().keys().collect::<Vec<_>>(),
                ["revision", "control"]
            );
            assert_eq!(node.get("revision"), Some(&OutputNode::Integer(0)));
        }
    }

    #[test]
    fn header_only_descriptor() {
        let bytes = header(0x8000, 0, 0, 0);
        let parsed = SecurityDescriptor::parse(&bytes).unwrap();
        assert_eq!(parsed.header.control, 0x8000);
        assert_eq!(parsed.owner, None);
        assert_eq!(parsed.dacl, None);
        assert_eq!(
            parsed.to_node().to_string(),
            "{\n    \"revision\": 1,\n    \"control\": 32768\n}"
        );
    }

    #[test]
    fn owner_offset_past_end_is_invalid() {
        let mut bytes = header(0x8000, 200, 20, 0);
        bytes.extend_from_slice(&sid_macro::sid!("S-1-5-18"));
        let node = decode_security_descriptor(Some(bytes.as_slice()));
        assert_eq!(node.get("owner").and_then(OutputNode::as_str), Some(INVALID));
        assert_eq!(node.get("group").and_then(OutputNode::as_str), Some("S-1-5-18"));
    }

    #[test]
    fn truncated_owner_sid_is_invalid() {
        let mut bytes = header(0x8000, 20, 0, 0);
        bytes.extend_from_slice(&sid_macro::sid!("S-1-5-32-544")[..12]);
        let node = decode_security_descriptor(Some(bytes.as_slice()));
        assert_eq!(node.get("owner").and_then(OutputNode::as_str), Some(INVALID));
        assert!(node.get("group").is_none(), "absent group must be omitted");
    }

    #[test]
    fn dacl_offset_past_end_is_omitted() {
        let bytes = header(0x8004, 0, 0, 20);
        let parsed = SecurityDescriptor::parse(&bytes).unwrap();
        assert_eq!(parsed.dacl, None);
        assert!(parsed.to_node().get("dacl").is_none(), "no DACL beyond the blob");
    }

    #[test]
    fn dacl_without_room_for_header_reports_error() {
        let mut bytes = header(0x8004, 0, 0, 20);
        bytes.extend_from_slice(&[2, 0, 8, 0]);
        let node = decode_security_descriptor(Some(bytes.as_slice()));
        let dacl = node.get("dacl").and_then(OutputNode::as_object).unwrap();
        assert_eq!(dacl.keys().collect::<Vec<_>>(), ["decode_error"]);
        assert_eq!(
            dacl.get("decode_error").and_then(OutputNode::as_str),
            Some("read of 8 bytes at offset 20 exceeds buffer end 24")
        );
    }

    #[test]
    fn sacl_offset_is_kept_but_not_rendered() {
        let mut bytes = header(0x8010, 0, 0, 0);
        bytes[12..16].copy_from_slice(&20_u32.to_le_bytes());
        bytes.extend_from_slice(&[2, 0, 8, 0, 0, 0, 0, 0]);
        let parsed = SecurityDescriptor::parse(&bytes).unwrap();
        assert_eq!(parsed.header.sacl_offset, 20);
        assert_eq!(
            parsed.to_node().as_object().unwrap().keys().collect::<Vec<_>>(),
            ["revision", "control"]
        );
    }

    proptest! {
        #[test]
        fn arbitrary_blobs_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let node = decode_security_descriptor(Some(bytes.as_slice()));
            prop_assert!(node.get("revision").is_some(), "revision is always rendered");
            prop_assert!(node.get("control").is_some(), "control is always rendered");
        }

        #[test]
        fn offsets_anywhere_never_panic(
            owner in any::<u32>(),
            group in any::<u32>(),
            dacl in any::<u32>(),
            tail in proptest::collection::vec(any::<u8>(), 0..128),
        ) {
            let mut bytes = header(0x8004, owner % 160, group % 160, dacl % 160);
            bytes.extend_from_slice(&tail);
            let _ = decode_security_descriptor(Some(bytes.as_slice())).to_string();
        }
    }
}
