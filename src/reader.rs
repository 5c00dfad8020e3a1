//! Bounds-checked little-endian access to a byte blob.
//!
//! Every read names an offset relative to the reader and a width, and either
//! returns the value or a [`DecodeError::OutOfBounds`] carrying the absolute
//! position inside the original blob. Sub-readers created with
//! [`ByteReader::tail`] and [`ByteReader::window`] keep that absolute base so
//! errors raised deep inside an ACE still point at the right byte.

use crate::DecodeError;

/// Read-only cursor over a borrowed byte slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    base: usize,
}

impl<'a> ByteReader<'a> {
    /// Wraps a whole blob; offsets reported in errors start at 0.
    #[inline]
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, base: 0 }
    }

    /// Number of readable bytes.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether nothing can be read.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Absolute offset of the first readable byte.
    #[inline]
    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }

    /// The readable bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    const fn out_of_bounds(&self, offset: usize, width: usize) -> DecodeError {
        DecodeError::OutOfBounds {
            offset: self.base.saturating_add(offset),
            width,
            end: self.base.saturating_add(self.bytes.len()),
        }
    }

    /// Borrows `width` bytes starting at `offset`.
    ///
    /// # Errors
    /// [`DecodeError::OutOfBounds`] if the range leaves the reader.
    #[inline]
    pub fn slice(&self, offset: usize, width: usize) -> Result<&'a [u8], DecodeError> {
        offset
            .checked_add(width)
            .and_then(|stop| self.bytes.get(offset..stop))
            .ok_or_else(|| self.out_of_bounds(offset, width))
    }

    /// Copies `N` bytes starting at `offset`.
    ///
    /// # Errors
    /// [`DecodeError::OutOfBounds`] if the range leaves the reader.
    #[inline]
    pub fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N], DecodeError> {
        self.slice(offset, N)?
            .try_into()
            .map_err(|_| self.out_of_bounds(offset, N))
    }

    /// # Errors
    /// [`DecodeError::OutOfBounds`] if `offset` is past the end.
    #[inline]
    pub fn read_u8(&self, offset: usize) -> Result<u8, DecodeError> {
        self.bytes
            .get(offset)
            .copied()
            .ok_or_else(|| self.out_of_bounds(offset, 1))
    }

    /// # Errors
    /// [`DecodeError::OutOfBounds`] if fewer than 2 bytes remain at `offset`.
    #[inline]
    pub fn read_u16_le(&self, offset: usize) -> Result<u16, DecodeError> {
        self.read_array(offset).map(u16::from_le_bytes)
    }

    /// # Errors
    /// [`DecodeError::OutOfBounds`] if fewer than 4 bytes remain at `offset`.
    #[inline]
    pub fn read_u32_le(&self, offset: usize) -> Result<u32, DecodeError> {
        self.read_array(offset).map(u32::from_le_bytes)
    }

    /// Sub-reader over everything from `offset` to the end.
    ///
    /// `offset == len()` yields an empty reader.
    ///
    /// # Errors
    /// [`DecodeError::OutOfBounds`] if `offset` is past the end.
    #[inline]
    pub fn tail(&self, offset: usize) -> Result<Self, DecodeError> {
        self.bytes
            .get(offset..)
            .map(|bytes| Self {
                bytes,
                base: self.base.saturating_add(offset),
            })
            .ok_or_else(|| self.out_of_bounds(offset, 0))
    }

    /// Sub-reader over exactly `width` bytes starting at `offset`.
    ///
    /// # Errors
    /// [`DecodeError::OutOfBounds`] if the range leaves the reader.
    #[inline]
    pub fn window(&self, offset: usize, width: usize) -> Result<Self, DecodeError> {
        self.slice(offset, width).map(|bytes| Self {
            bytes,
            base: self.base.saturating_add(offset),
        })
    }

    /// Sub-reader over at most `width` bytes starting at `offset`, shortened
    /// to whatever the reader still holds.
    ///
    /// # Errors
    /// [`DecodeError::OutOfBounds`] if `offset` is past the end.
    #[inline]
    pub fn window_clamped(&self, offset: usize, width: usize) -> Result<Self, DecodeError> {
        let tail = self.tail(offset)?;
        Ok(Self {
            bytes: tail.bytes.get(..width).unwrap_or(tail.bytes),
            base: tail.base,
        })
    }
}
