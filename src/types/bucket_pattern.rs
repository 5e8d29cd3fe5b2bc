//! Defines `BucketPattern`, the validated date truncation pattern used to collapse
//! daily observations into time buckets.

use chrono::format::{Item, Numeric, StrftimeItems};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Year assigned to buckets whose pattern does not carry a year.
pub const DEFAULT_YEAR: i32 = 1900;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("Bucket pattern is empty or contains no year, month or day specifier: '{0}'")]
    Empty(String),

    #[error("Bucket pattern '{0}' could not be parsed")]
    Invalid(String),

    #[error(
        "Bucket pattern '{pattern}' has unsupported item {item}; only %Y, %m and %d are allowed"
    )]
    UnsupportedSpecifier { pattern: String, item: String },

    #[error("Value '{value}' does not match bucket pattern '{pattern}'")]
    InvalidValue { value: String, pattern: String },

    #[error("Date {date} cannot be represented by bucket pattern '{pattern}'")]
    Unrepresentable { date: NaiveDate, pattern: String },
}

/// A strftime-style pattern that defines how a full date collapses to a bucket key.
///
/// Only `%Y`, `%m` and `%d` (and composites such as `%F`) plus literal text are accepted.
/// Formatting a date with the pattern and parsing the string back discards every
/// component the pattern does not carry; missing components take the canonical
/// values year 1900, month 1 and day 1. For example `%Y-%m` maps 2020-01-17 to
/// 2020-01-01, and `%m` maps it to 1900-01-01.
///
/// # Examples
///
/// ```
/// use irish_climate::BucketPattern;
/// use chrono::NaiveDate;
///
/// let year_month = BucketPattern::new("%Y-%m").unwrap();
/// let day = NaiveDate::from_ymd_opt(2020, 1, 17).unwrap();
///
/// assert_eq!(year_month.format(day), "2020-01");
/// assert_eq!(year_month.truncate(day).unwrap(), NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
/// assert_eq!(year_month.parse("2020-01").unwrap(), NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
///
/// assert!(BucketPattern::new("%H:%M").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BucketPattern {
    format: String,
    has_year: bool,
    has_month: bool,
    has_day: bool,
}

impl BucketPattern {
    /// Validates `format` and builds a pattern from it.
    ///
    /// # Errors
    ///
    /// * [`PatternError::Invalid`] if chrono cannot parse the format string.
    /// * [`PatternError::UnsupportedSpecifier`] for any specifier other than year, month or day.
    /// * [`PatternError::Empty`] if the format carries none of year, month or day.
    pub fn new(format: &str) -> Result<Self, PatternError> {
        let mut has_year = false;
        let mut has_month = false;
        let mut has_day = false;

        for item in StrftimeItems::new(format) {
            match item {
                Item::Numeric(Numeric::Year, _) => has_year = true,
                Item::Numeric(Numeric::Month, _) => has_month = true,
                Item::Numeric(Numeric::Day, _) => has_day = true,
                Item::Literal(_)
                | Item::OwnedLiteral(_)
                | Item::Space(_)
                | Item::OwnedSpace(_) => {}
                Item::Error => return Err(PatternError::Invalid(format.to_string())),
                other => {
                    return Err(PatternError::UnsupportedSpecifier {
                        pattern: format.to_string(),
                        item: format!("{:?}", other),
                    })
                }
            }
        }

        if !(has_year || has_month || has_day) {
            return Err(PatternError::Empty(format.to_string()));
        }

        Ok(Self {
            format: format.to_string(),
            has_year,
            has_month,
            has_day,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.format
    }

    /// Formats `date` into its bucket string, e.g. `"2020-01"` for `%Y-%m`.
    pub fn format(&self, date: NaiveDate) -> String {
        date.format(&self.format).to_string()
    }

    /// Parses a bucket string produced by [`BucketPattern::format`] back into a date.
    ///
    /// Components the pattern does not carry are filled with their canonical values.
    pub fn parse(&self, value: &str) -> Result<NaiveDate, PatternError> {
        let mut input = value.to_string();
        let mut format = self.format.clone();
        if !self.has_year {
            input.push_str(&format!("|{}", DEFAULT_YEAR));
            format.push_str("|%Y");
        }
        if !self.has_month {
            input.push_str("|01");
            format.push_str("|%m");
        }
        if !self.has_day {
            input.push_str("|01");
            format.push_str("|%d");
        }

        NaiveDate::parse_from_str(&input, &format).map_err(|_| PatternError::InvalidValue {
            value: value.to_string(),
            pattern: self.format.clone(),
        })
    }

    /// Collapses `date` to the canonical date of its bucket.
    ///
    /// Equivalent to `self.parse(&self.format(date))`, without the string round trip.
    /// Fails only for a day-and-month pattern without a year applied to February 29th,
    /// which does not exist in the default year.
    pub fn truncate(&self, date: NaiveDate) -> Result<NaiveDate, PatternError> {
        let year = if self.has_year { date.year() } else { DEFAULT_YEAR };
        let month = if self.has_month { date.month() } else { 1 };
        let day = if self.has_day { date.day() } else { 1 };

        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| PatternError::Unrepresentable {
            date,
            pattern: self.format.clone(),
        })
    }
}

impl fmt::Display for BucketPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format)
    }
}

impl FromStr for BucketPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BucketPattern::new(s)
    }
}

impl TryFrom<String> for BucketPattern {
    type Error = PatternError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BucketPattern::new(&value)
    }
}

impl From<BucketPattern> for String {
    fn from(pattern: BucketPattern) -> Self {
        pattern.format
    }
}
