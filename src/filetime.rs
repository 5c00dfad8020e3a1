//! FILETIME attributes (`pwdLastSet`, `lastLogonTimestamp`, `accountExpires`…).
//!
//! Directory servers hand these out as the decimal text of a 64-bit count of
//! 100-nanosecond intervals since 1601-01-01T00:00:00Z, not as raw binary.

use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};
use core::fmt::{self, Display};
use core::str::{self, FromStr};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{DecodeError, INVALID};

/// Marker rendered for the "never" sentinels.
pub const NEVER: &str = "Never";

const TICKS_PER_SECOND: u64 = 10_000_000;
const UNIX_EPOCH_OFFSET_SECONDS: i64 = 11_644_473_600;
const NEVER_SENTINEL: u64 = 0x7FFF_FFFF_FFFF_FFFF;
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// A Windows FILETIME tick count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Filetime(u64);

impl Filetime {
    #[inline]
    #[must_use]
    pub const fn from_ticks(ticks: u64) -> Self {
        Self(ticks)
    }

    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// `0` and `0x7FFF_FFFF_FFFF_FFFF` both mean "never expires / never happened".
    #[inline]
    #[must_use]
    pub const fn is_never(self) -> bool {
        self.0 == 0 || self.0 == NEVER_SENTINEL
    }

    /// Parses the decimal text carried by a raw attribute value.
    ///
    /// # Errors
    /// [`DecodeError::InvalidFiletime`] if the value is not UTF-8 digits that
    /// fit in 64 bits.
    #[inline]
    pub fn from_raw(raw: &[u8]) -> Result<Self, DecodeError> {
        str::from_utf8(raw)
            .map_err(|_| DecodeError::InvalidFiletime)?
            .parse()
    }

    /// Whole seconds relative to the Unix epoch, truncating sub-second ticks.
    #[inline]
    #[must_use]
    pub const fn to_unix_seconds(self) -> i64 {
        #[expect(
            clippy::cast_possible_wrap,
            clippy::integer_division,
            reason = "u64::MAX / 10^7 fits in i64 and truncation to whole seconds is intended"
        )]
        let seconds = (self.0 / TICKS_PER_SECOND) as i64;
        seconds - UNIX_EPOCH_OFFSET_SECONDS
    }

    /// # Errors
    /// [`DecodeError::FiletimeOutOfRange`] if the calendar cannot represent
    /// the instant.
    #[inline]
    pub fn to_datetime(self) -> Result<DateTime<Utc>, DecodeError> {
        DateTime::from_timestamp(self.to_unix_seconds(), 0)
            .ok_or(DecodeError::FiletimeOutOfRange(self.0))
    }
}

impl FromStr for Filetime {
    type Err = DecodeError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| DecodeError::InvalidFiletime)
    }
}

impl From<u64> for Filetime {
    #[inline]
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// `Never`, `YYYY-MM-DD HH:MM:SS UTC`, or `Invalid` when out of range.
impl Display for Filetime {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_never() {
            return f.write_str(NEVER);
        }
        match self.to_datetime() {
            Ok(datetime) => write!(f, "{}", datetime.format(DISPLAY_FORMAT)),
            Err(_) => f.write_str(INVALID),
        }
    }
}

/// Renders a raw FILETIME attribute value.
///
/// Returns `"Invalid"` when the value is absent or not a representable tick
/// count, `"Never"` for the sentinels, and a UTC timestamp otherwise.
///
/// # Examples
/// ```rust
/// # use adsnap::decode_filetime;
/// assert_eq!(decode_filetime(Some(b"0".as_slice())), "Never");
/// assert_eq!(
///     decode_filetime(Some(b"116444736000000000".as_slice())),
///     "1970-01-01 00:00:00 UTC"
/// );
/// assert_eq!(decode_filetime(Some(b"soon".as_slice())), "Invalid");
/// ```
#[inline]
#[must_use]
pub fn decode_filetime(raw: Option<&[u8]>) -> String {
    let Some(raw) = raw else {
        return INVALID.to_owned();
    };
    match Filetime::from_raw(raw) {
        Ok(filetime) if filetime.is_never() => NEVER.to_owned(),
        Ok(filetime) => match filetime.to_datetime() {
            Ok(datetime) => datetime.format(DISPLAY_FORMAT).to_string(),
            Err(err) => {
                debug!(%err, "FILETIME outside calendar range");
                INVALID.to_owned()
            }
        },
        Err(err) => {
            debug!(%err, "FILETIME rejected");
            INVALID.to_owned()
        }
    }
}
