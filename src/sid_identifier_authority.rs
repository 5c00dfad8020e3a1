use core::fmt::{self, Display};

/// The 6-byte, big-endian identifier authority of a SID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SidIdentifierAuthority {
    /// Raw authority bytes in wire (big-endian) order.
    pub value: [u8; 6],
}

impl SidIdentifierAuthority {
    /// `S-1-0-…`
    pub const NULL_AUTHORITY: Self = Self::new([0, 0, 0, 0, 0, 0]);
    /// `S-1-1-…`
    pub const WORLD_AUTHORITY: Self = Self::new([0, 0, 0, 0, 0, 1]);
    /// `S-1-2-…`
    pub const LOCAL_AUTHORITY: Self = Self::new([0, 0, 0, 0, 0, 2]);
    /// `S-1-3-…`
    pub const CREATOR_AUTHORITY: Self = Self::new([0, 0, 0, 0, 0, 3]);
    /// `S-1-5-…`
    pub const NT_AUTHORITY: Self = Self::new([0, 0, 0, 0, 0, 5]);

    #[inline]
    #[must_use]
    pub const fn new(value: [u8; 6]) -> Self {
        Self { value }
    }

    /// The authority as a 48-bit integer.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        let [a0, a1, a2, a3, a4, a5] = self.value;
        u64::from_be_bytes([0, 0, a0, a1, a2, a3, a4, a5])
    }

    /// Builds an authority from a 48-bit integer, `None` if it is wider.
    #[inline]
    #[must_use]
    pub const fn from_u64(value: u64) -> Option<Self> {
        match value.to_be_bytes() {
            [0, 0, a0, a1, a2, a3, a4, a5] => Some(Self::new([a0, a1, a2, a3, a4, a5])),
            _ => None,
        }
    }
}

impl From<[u8; 6]> for SidIdentifierAuthority {
    #[inline]
    fn from(value: [u8; 6]) -> Self {
        Self { value }
    }
}

impl From<SidIdentifierAuthority> for [u8; 6] {
    #[inline]
    fn from(value: SidIdentifierAuthority) -> Self {
        value.value
    }
}

impl Display for SidIdentifierAuthority {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u64())
    }
}
