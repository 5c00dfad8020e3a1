//! GUIDs embedded in object ACEs.
//!
//! The wire form is the Windows `GUID` struct: `Data1` (u32), `Data2` and
//! `Data3` (u16) little-endian, then `Data4` as eight raw bytes. Its canonical
//! text therefore byte-swaps the first three groups relative to the wire.

use alloc::string::{String, ToString};

use uuid::Uuid;

use crate::{ByteReader, DecodeError};

/// Size of a wire GUID.
pub const GUID_SIZE: usize = 16;

/// Reads the mixed-endian GUID at `offset`.
///
/// # Errors
/// [`DecodeError::OutOfBounds`] if fewer than 16 bytes remain.
#[inline]
pub fn read_guid(reader: &ByteReader<'_>, offset: usize) -> Result<Uuid, DecodeError> {
    reader.read_array::<GUID_SIZE>(offset).map(Uuid::from_bytes_le)
}

/// Formats wire GUID bytes as `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`.
///
/// # Examples
/// ```rust
/// # use adsnap::format_guid;
/// let wire = [
///     0xba, 0x7a, 0x96, 0xbf, 0xe6, 0x0d, 0xd0, 0x11,
///     0xa2, 0x85, 0x00, 0xaa, 0x00, 0x30, 0x49, 0xe2,
/// ];
/// assert_eq!(format_guid(wire), "bf967aba-0de6-11d0-a285-00aa003049e2");
/// ```
#[inline]
#[must_use]
pub fn format_guid(wire: [u8; GUID_SIZE]) -> String {
    guid_text(&Uuid::from_bytes_le(wire))
}

/// Lowercase hyphenated text of a decoded GUID.
pub(crate) fn guid_text(guid: &Uuid) -> String {
    guid.hyphenated().to_string()
}
