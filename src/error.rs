use alloc::string::String;

use thiserror::Error;

/// Failure raised by the typed decoders.
///
/// Rendering entry points such as [`decode_sid`](crate::decode_sid) never
/// surface this type: they substitute a marker instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// A fixed-width read would run past the end of the buffer.
    #[error("read of {width} bytes at offset {offset} exceeds buffer end {end}")]
    OutOfBounds {
        /// Absolute offset of the read inside the original blob.
        offset: usize,
        /// Number of bytes requested.
        width: usize,
        /// Absolute end of the readable window.
        end: usize,
    },
    /// An ACE declares a size smaller than its own header.
    #[error("ACE declares {0} bytes, less than its 4-byte header")]
    AceTooSmall(u16),
    /// The SID revision byte is not 1.
    #[error("unsupported SID revision {0}")]
    SidRevision(u8),
    /// A SID buffer carries bytes beyond its declared sub-authorities.
    #[error("SID occupies {expected} bytes but the buffer holds {actual}")]
    TrailingBytes {
        /// Size implied by the sub-authority count.
        expected: usize,
        /// Size of the buffer handed in.
        actual: usize,
    },
    /// A FILETIME attribute is not a decimal tick count.
    #[error("FILETIME is not a decimal tick count")]
    InvalidFiletime,
    /// A FILETIME tick count cannot be represented as a calendar date.
    #[error("FILETIME tick count {0} is outside the calendar range")]
    FiletimeOutOfRange(u64),
}

/// Failure raised while building a catalog or aggregating a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum ProjectionError {
    /// An entry was filed under a category the catalog does not declare.
    #[error("unknown category `{0}`")]
    UnknownCategory(String),
    /// Two catalog categories share a name.
    #[error("category `{0}` is declared twice")]
    DuplicateCategory(String),
}
