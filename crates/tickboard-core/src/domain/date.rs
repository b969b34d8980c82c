use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::{date, format_description};
use time::{Date, Duration, OffsetDateTime, Weekday};

use crate::ValidationError;

/// Calendar date of a trading session, rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradingDate(Date);

impl TradingDate {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input.trim(), format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    /// Exchange-local session date for a unix timestamp and a UTC offset in seconds.
    pub fn from_unix_with_offset(timestamp: i64, gmt_offset: i64) -> Result<Self, ValidationError> {
        let shifted = timestamp.saturating_add(gmt_offset);
        OffsetDateTime::from_unix_timestamp(shifted)
            .map(|value| Self(value.date()))
            .map_err(|_| ValidationError::InvalidDate {
                value: timestamp.to_string(),
            })
    }

    pub const fn from_date(value: Date) -> Self {
        Self(value)
    }

    /// Unix timestamp of midnight UTC on this date.
    pub fn unix_midnight(self) -> i64 {
        self.0.midnight().assume_utc().unix_timestamp()
    }

    pub fn next_day(self) -> Option<Self> {
        self.0.next_day().map(Self)
    }

    pub fn is_weekend(self) -> bool {
        matches!(self.0.weekday(), Weekday::Saturday | Weekday::Sunday)
    }

    pub fn add_days(self, days: i64) -> Option<Self> {
        self.0.checked_add(Duration::days(days)).map(Self)
    }

    pub fn format(self) -> String {
        self.0
            .format(format_description!("[year]-[month]-[day]"))
            .unwrap_or_else(|_| String::from("<unformattable>"))
    }
}

impl Display for TradingDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}

impl Serialize for TradingDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format())
    }
}

impl<'de> Deserialize<'de> for TradingDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// Requested history window. `start` is inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: TradingDate,
    end: TradingDate,
}

impl DateRange {
    pub fn new(start: TradingDate, end: TradingDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidDateRange {
                start: start.format(),
                end: end.format(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        Self::new(TradingDate::parse(start)?, TradingDate::parse(end)?)
    }

    pub const fn start(&self) -> TradingDate {
        self.start
    }

    pub const fn end(&self) -> TradingDate {
        self.end
    }

    pub fn contains(&self, date: TradingDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            start: TradingDate(date!(2020 - 01 - 01)),
            end: TradingDate(date!(2024 - 12 - 31)),
        }
    }
}
