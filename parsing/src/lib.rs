//! SID text grammar and wire encoding shared by `adsnap` and its proc macro.
//!
//! Do not depend on this crate directly, use `adsnap` instead.
#![cfg_attr(not(feature = "std"), no_std)]

use core::str::FromStr;

use arrayvec::ArrayVec;
use thiserror::Error;

/// Largest number of sub-authorities a SID may carry.
pub const MAX_SUBAUTHORITY_COUNT: u8 = 15;

/// Size of the fixed SID header: revision, count and 6-byte authority.
pub const SID_HEADER_SIZE: usize = 8;

/// Size of the largest encodable SID.
pub const MAX_SID_SIZE: usize = SID_HEADER_SIZE + 4 * MAX_SUBAUTHORITY_COUNT as usize;

/// Largest value the 48-bit identifier authority can hold.
pub const MAX_IDENTIFIER_AUTHORITY: u64 = 0xFFFF_FFFF_FFFF;

pub struct SidComponents {
    /// The SID revision value, generally 1.
    pub revision: u8,
    /// The SID identifier authority value, big-endian.
    pub identifier_authority: [u8; 6],
    /// The SID sub-authority values.
    pub sub_authority: ArrayVec<u32, { MAX_SUBAUTHORITY_COUNT as usize }>,
}

/// Error returned when a SID string is not of the form `S-R-A-S1-S2-…`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid format for SID")]
pub struct InvalidSidFormat;

impl SidComponents {
    /// Encodes the components in the self-relative wire layout:
    /// revision, count, big-endian authority, then little-endian sub-authorities.
    #[must_use]
    pub fn to_binary(&self) -> ArrayVec<u8, MAX_SID_SIZE> {
        let mut out = ArrayVec::new();
        // capacity covers the header plus the sub-authority maximum
        out.push(self.revision);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "sub_authority is bounded by MAX_SUBAUTHORITY_COUNT"
        )]
        out.push(self.sub_authority.len() as u8);
        for byte in self.identifier_authority {
            out.push(byte);
        }
        for sub_authority in &self.sub_authority {
            for byte in sub_authority.to_le_bytes() {
                out.push(byte);
            }
        }
        out
    }
}

impl FromStr for SidComponents {
    type Err = InvalidSidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut s_cmp = s.split('-');
        if !s_cmp
            .next()
            .is_some_and(|head| head.eq_ignore_ascii_case("s"))
        {
            return Err(InvalidSidFormat);
        }
        let revision = s_cmp
            .next()
            .ok_or(InvalidSidFormat)?
            .parse::<u8>()
            .map_err(|_| InvalidSidFormat)?;

        let authority = s_cmp
            .next()
            .ok_or(InvalidSidFormat)?
            .parse::<u64>()
            .map_err(|_| InvalidSidFormat)?;
        if authority > MAX_IDENTIFIER_AUTHORITY {
            return Err(InvalidSidFormat);
        }
        let [_, _, a0, a1, a2, a3, a4, a5] = authority.to_be_bytes();

        let mut sub_authority = ArrayVec::new();
        for item in s_cmp {
            let item = item.parse::<u32>().map_err(|_| InvalidSidFormat)?;
            sub_authority.try_push(item).map_err(|_| InvalidSidFormat)?;
        }

        Ok(Self {
            revision,
            identifier_authority: [a0, a1, a2, a3, a4, a5],
            sub_authority,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod tests {
    use super::*;

    #[test]
    fn parses_builtin_administrators() {
        let components: SidComponents = "S-1-5-32-544".parse().unwrap();
        assert_eq!(components.revision, 1);
        assert_eq!(components.identifier_authority, [0, 0, 0, 0, 0, 5]);
        assert_eq!(components.sub_authority.as_slice(), &[32, 544]);
        assert_eq!(
            components.to_binary().as_slice(),
            &[1, 2, 0, 0, 0, 0, 0, 5, 32, 0, 0, 0, 32, 2, 0, 0],
            "wire layout mismatch"
        );
    }

    #[test]
    fn accepts_lowercase_prefix_and_no_sub_authorities() {
        let components: SidComponents = "s-1-5".parse().unwrap();
        assert!(components.sub_authority.is_empty(), "no sub-authorities expected");
        assert_eq!(components.to_binary().len(), SID_HEADER_SIZE);
    }

    #[test]
    fn wide_authority_is_big_endian() {
        let components: SidComponents = "S-1-281474976710655-7".parse().unwrap();
        assert_eq!(components.identifier_authority, [0xFF; 6]);
    }

    #[test]
    fn rejects_malformed_strings() {
        for input in [
            "",
            "X-1-5-32",
            "S-1",
            "S-x-5-32",
            "S-1-281474976710656-1",
            "S-1-5-32-4294967296",
            "S-1-5--3",
            "S-1-5-1-2-3-4-5-6-7-8-9-10-11-12-13-14-15-16",
        ] {
            assert!(input.parse::<SidComponents>().is_err(), "{input:?} should not parse");
        }
    }

    #[test]
    fn fifteen_sub_authorities_fill_the_buffer() {
        let components: SidComponents =
            "S-1-5-1-2-3-4-5-6-7-8-9-10-11-12-13-14-15".parse().unwrap();
        assert_eq!(components.to_binary().len(), MAX_SID_SIZE);
    }
}
