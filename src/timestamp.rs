use std::fmt::Display;

use chrono::{DateTime, FixedOffset, TimeZone};

/// A point in time together with the UTC offset it was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp(pub DateTime<FixedOffset>);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::offset::Local::now().into())
    }

    /// Build a timestamp from unix seconds and an offset east of UTC in seconds.
    pub fn from_unix(unix: i64, offset_seconds: i32) -> Option<Self> {
        let offset = FixedOffset::east_opt(offset_seconds)?;
        offset.timestamp_opt(unix, 0).single().map(Self)
    }

    /// Parse a timestamp from a unix + HH + mm offset, e.g. `1658312219 +0100`.
    pub fn from_git(s: &str) -> Option<Self> {
        let (unix, offset) = s.split_once(' ')?;
        let unix = unix.parse::<i64>().ok()?;

        let (sign, digits) = match offset.as_bytes() {
            [b'+', rest @ ..] => (1, rest),
            [b'-', rest @ ..] => (-1, rest),
            _ => return None,
        };
        if digits.len() != 4 || !digits.iter().all(u8::is_ascii_digit) {
            return None;
        }
        let hours = i32::from(digits[0] - b'0') * 10 + i32::from(digits[1] - b'0');
        let minutes = i32::from(digits[2] - b'0') * 10 + i32::from(digits[3] - b'0');

        Self::from_unix(unix, sign * (hours * 3600 + minutes * 60))
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0.timestamp(), self.0.format("%z"))
    }
}
