//! Open/closed gate for the exchange trading session.

use serde::Serialize;
use time::{OffsetDateTime, Time, UtcOffset, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketSession {
    Open,
    Closed,
}

impl MarketSession {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }

    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Fixed daily session in exchange-local time.
///
/// Comparison is by hour and minute only, with both bounds inclusive, so the
/// whole closing minute (`15:30:00`..`15:30:59`) still counts as open.
/// Weekends are treated like any other day unless `exclude_weekends` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    pub open: Time,
    pub close: Time,
    pub utc_offset: UtcOffset,
    pub exclude_weekends: bool,
}

impl Default for SessionWindow {
    fn default() -> Self {
        Self {
            open: time::macros::time!(09:15),
            close: time::macros::time!(15:30),
            utc_offset: time::macros::offset!(+05:30),
            exclude_weekends: false,
        }
    }
}

impl SessionWindow {
    /// `now` converted to the exchange offset.
    pub fn local_time(&self, now: OffsetDateTime) -> OffsetDateTime {
        now.to_offset(self.utc_offset)
    }

    pub fn is_open(&self, now: OffsetDateTime) -> bool {
        let local = self.local_time(now);
        if self.exclude_weekends && matches!(local.weekday(), Weekday::Saturday | Weekday::Sunday) {
            return false;
        }

        let minute = minute_of_day(local.time());
        (minute_of_day(self.open)..=minute_of_day(self.close)).contains(&minute)
    }

    pub fn session_at(&self, now: OffsetDateTime) -> MarketSession {
        if self.is_open(now) {
            MarketSession::Open
        } else {
            MarketSession::Closed
        }
    }
}

fn minute_of_day(time: Time) -> u16 {
    u16::from(time.hour()) * 60 + u16::from(time.minute())
}
