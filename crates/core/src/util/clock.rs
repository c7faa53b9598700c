// SPDX-FileCopyrightText: The phonotek Authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use jiff::Timestamp;

pub type TimestampMillis = i64;

/// An UTC timestamp with truncated millisecond precision.
///
/// This is the only time representation that is ever persisted.
#[derive(Clone, Debug, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UtcDateTimeMs {
    unix_timestamp_millis: TimestampMillis,
}

impl UtcDateTimeMs {
    #[must_use]
    pub const fn from_unix_timestamp_millis(unix_timestamp_millis: TimestampMillis) -> Self {
        Self {
            unix_timestamp_millis,
        }
    }

    #[must_use]
    pub const fn unix_timestamp_millis(&self) -> TimestampMillis {
        self.unix_timestamp_millis
    }

    #[must_use]
    pub fn from_timestamp(timestamp: &Timestamp) -> Self {
        Self::from_unix_timestamp_millis(timestamp.as_millisecond())
    }

    #[must_use]
    #[allow(clippy::missing_panics_doc)] // Millisecond precision never exceeds the timestamp range.
    pub fn to_timestamp(self) -> Timestamp {
        Timestamp::from_millisecond(self.unix_timestamp_millis).expect("valid timestamp")
    }

    #[must_use]
    pub fn now() -> Self {
        Self::from_timestamp(&Timestamp::now())
    }

    #[must_use]
    pub const fn is_before(self, other: Self) -> bool {
        self.unix_timestamp_millis < other.unix_timestamp_millis
    }
}

impl From<Timestamp> for UtcDateTimeMs {
    fn from(from: Timestamp) -> Self {
        Self::from_timestamp(&from)
    }
}

impl From<UtcDateTimeMs> for Timestamp {
    fn from(from: UtcDateTimeMs) -> Self {
        from.to_timestamp()
    }
}

impl fmt::Display for UtcDateTimeMs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_timestamp().fmt(f)
    }
}
