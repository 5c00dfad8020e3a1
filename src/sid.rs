//! Binary Security Identifier (SID) decoding.
//!
//! Wire layout (MS-DTYP 2.4.2.2):
//!
//! ```text
//! 0      1      2                      8
//! +------+------+----------------------+------------------------------+
//! | rev  | cnt  | authority (6, BE)    | cnt × sub-authority (4, LE)  |
//! +------+------+----------------------+------------------------------+
//! ```

use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{self, Display};
use core::str::FromStr;

use parsing::SidComponents;
use tracing::debug;

pub use parsing::{InvalidSidFormat, MAX_SUBAUTHORITY_COUNT, SID_HEADER_SIZE};

use crate::{ByteReader, DecodeError, INVALID, SidIdentifierAuthority};

/// An owned, decoded SID.
///
/// Unlike the wire form, the number of sub-authorities is not capped at 15
/// here: a decoder takes whatever count byte the blob carries as long as the
/// buffer is long enough to hold it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SidIdentity {
    /// The SID revision value, always [`SidIdentity::REVISION`] once decoded.
    pub revision: u8,
    /// The SID identifier authority value.
    pub identifier_authority: SidIdentifierAuthority,
    /// The SID sub-authority values.
    pub sub_authorities: Vec<u32>,
}

impl SidIdentity {
    /// The only SID revision in use.
    pub const REVISION: u8 = 1;

    /// Builds a revision-1 SID from parts.
    ///
    /// # Examples
    /// ```rust
    /// # use adsnap::{SidIdentity, SidIdentifierAuthority};
    /// let sid = SidIdentity::new(SidIdentifierAuthority::NT_AUTHORITY, [32, 544]);
    /// assert_eq!(sid.to_string(), "S-1-5-32-544");
    /// ```
    #[inline]
    #[must_use]
    pub fn new<I: Into<SidIdentifierAuthority>, S: AsRef<[u32]>>(
        identifier_authority: I,
        sub_authorities: S,
    ) -> Self {
        Self {
            revision: Self::REVISION,
            identifier_authority: identifier_authority.into(),
            sub_authorities: sub_authorities.as_ref().to_vec(),
        }
    }

    /// Decodes the SID found at the start of `bytes`, ignoring whatever
    /// follows it.
    ///
    /// # Errors
    /// - [`DecodeError::OutOfBounds`] if the buffer is shorter than the header
    ///   or than the sub-authorities it announces.
    /// - [`DecodeError::SidRevision`] if the revision byte is not 1.
    ///
    /// # Examples
    /// ```rust
    /// # use adsnap::SidIdentity;
    /// let bytes = [1, 2, 0, 0, 0, 0, 0, 5, 32, 0, 0, 0, 32, 2, 0, 0, 0xAA];
    /// let sid = SidIdentity::from_prefix(&bytes).unwrap();
    /// assert_eq!(sid.to_string(), "S-1-5-32-544");
    /// ```
    #[inline]
    pub fn from_prefix(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::read(&ByteReader::new(bytes))
    }

    /// Decodes a buffer that holds exactly one SID.
    ///
    /// # Errors
    /// Same as [`SidIdentity::from_prefix`], plus
    /// [`DecodeError::TrailingBytes`] when bytes follow the SID.
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let sid = Self::from_prefix(bytes)?;
        let expected = sid.encoded_len();
        if expected == bytes.len() {
            Ok(sid)
        } else {
            Err(DecodeError::TrailingBytes {
                expected,
                actual: bytes.len(),
            })
        }
    }

    /// Decodes the SID at the start of `reader`.
    pub(crate) fn read(reader: &ByteReader<'_>) -> Result<Self, DecodeError> {
        let [revision, count, a0, a1, a2, a3, a4, a5] = reader.read_array(0)?;
        if revision != Self::REVISION {
            return Err(DecodeError::SidRevision(revision));
        }
        let count = usize::from(count);
        let tail = reader.slice(SID_HEADER_SIZE, count * 4)?;
        let sub_authorities = tail
            .chunks_exact(4)
            .map(|chunk| {
                let mut word = [0u8; 4];
                word.copy_from_slice(chunk);
                u32::from_le_bytes(word)
            })
            .collect();
        Ok(Self {
            revision,
            identifier_authority: SidIdentifierAuthority::new([a0, a1, a2, a3, a4, a5]),
            sub_authorities,
        })
    }

    /// Size of the wire encoding.
    #[inline]
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        SID_HEADER_SIZE + 4 * self.sub_authorities.len()
    }

    /// Encodes the SID in its wire layout.
    ///
    /// The count byte wraps if more than 255 sub-authorities were pushed by
    /// hand; decoded values never exceed it.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.push(self.revision);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "decoded SIDs carry at most 255 sub-authorities"
        )]
        out.push(self.sub_authorities.len() as u8);
        out.extend_from_slice(&self.identifier_authority.value);
        for sub_authority in &self.sub_authorities {
            out.extend_from_slice(&sub_authority.to_le_bytes());
        }
        out
    }
}

impl Display for SidIdentity {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}-{}", self.revision, self.identifier_authority.as_u64())?;
        for sub_authority in &self.sub_authorities {
            write!(f, "-{sub_authority}")?;
        }
        Ok(())
    }
}

impl FromStr for SidIdentity {
    type Err = InvalidSidFormat;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = SidComponents::from_str(s)?;
        Ok(Self {
            revision: components.revision,
            identifier_authority: components.identifier_authority.into(),
            sub_authorities: components.sub_authority.to_vec(),
        })
    }
}

impl TryFrom<&[u8]> for SidIdentity {
    type Error = DecodeError;

    #[inline]
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(value)
    }
}

/// Renders a raw binary SID attribute as `S-1-…`, or `"Invalid"` when the
/// value is absent, truncated, or not revision 1.
///
/// # Examples
/// ```rust
/// # use adsnap::decode_sid;
/// let bytes: [u8; 12] = [1, 1, 0, 0, 0, 0, 0, 5, 18, 0, 0, 0];
/// assert_eq!(decode_sid(Some(bytes.as_slice())), "S-1-5-18");
/// assert_eq!(decode_sid(bytes.get(..7)), "Invalid");
/// assert_eq!(decode_sid(None), "Invalid");
/// ```
#[inline]
#[must_use]
pub fn decode_sid(raw: Option<&[u8]>) -> String {
    match raw.map(SidIdentity::from_prefix) {
        Some(Ok(sid)) => sid.to_string(),
        Some(Err(err)) => {
            debug!(%err, "binary SID rejected");
            INVALID.to_owned()
        }
        None => INVALID.to_owned(),
    }
}
