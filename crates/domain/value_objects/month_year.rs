use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// Wire format of every subscription date, e.g. `03-2024`.
pub const MONTH_YEAR_FORMAT: &str = "%m-%Y";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonthYearError {
    #[error("malformed date `{0}`, expected MM-YYYY")]
    MalformedDate(String),
}

/// A calendar month. Stored as the first day of that month; the day of any
/// date converted into it is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear(NaiveDate);

impl MonthYear {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Parses `MM-YYYY`: exactly two month digits, a dash, exactly four year digits.
    pub fn parse(raw: &str) -> Result<Self, MonthYearError> {
        let malformed = || MonthYearError::MalformedDate(raw.to_string());

        let (month, year) = raw.split_once('-').ok_or_else(malformed)?;
        let all_digits = month
            .bytes()
            .chain(year.bytes())
            .all(|byte| byte.is_ascii_digit());
        if month.len() != 2 || year.len() != 4 || !all_digits {
            return Err(malformed());
        }

        let month: u32 = month.parse().map_err(|_| malformed())?;
        let year: i32 = year.parse().map_err(|_| malformed())?;

        Self::new(year, month).ok_or_else(malformed)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for MonthYear {
    fn from(value: NaiveDate) -> Self {
        // Day 1 exists in every month.
        Self(value.with_day(1).unwrap_or(value))
    }
}

impl From<MonthYear> for NaiveDate {
    fn from(value: MonthYear) -> Self {
        value.0
    }
}

impl FromStr for MonthYear {
    type Err = MonthYearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(MONTH_YEAR_FORMAT))
    }
}

impl Serialize for MonthYear {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthYear {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

/// Serde helpers for an optional month. JSON `null`, a missing field and the
/// legacy string `"null"` all decode to `None`.
pub mod optional {
    use serde::{Deserialize, Deserializer, de};

    use super::MonthYear;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<MonthYear>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)?.as_deref() {
            None | Some("null") => Ok(None),
            Some(raw) => MonthYear::parse(raw).map(Some).map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_month_and_year() {
        let month_year = MonthYear::parse("03-2024").unwrap();
        assert_eq!(month_year.year(), 2024);
        assert_eq!(month_year.month(), 3);
        assert_eq!(
            month_year.first_day(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn formats_with_zero_padded_month() {
        let month_year = MonthYear::new(2025, 1).unwrap();
        assert_eq!(month_year.to_string(), "01-2025");
    }

    #[test]
    fn conversion_from_date_discards_the_day() {
        let date = NaiveDate::from_ymd_opt(2023, 11, 27).unwrap();
        let month_year = MonthYear::from(date);

        assert_eq!(month_year.to_string(), "11-2023");
        assert_eq!(
            NaiveDate::from(month_year),
            NaiveDate::from_ymd_opt(2023, 11, 1).unwrap()
        );
    }

    #[test]
    fn malformed_dates_are_rejected() {
        for raw in [
            "",
            "2024-03",
            "3-2024",
            "03-24",
            "13-2024",
            "00-2024",
            "03/2024",
            "03-2024-01",
            "ab-2024",
            "+3-2024",
        ] {
            let err = MonthYear::parse(raw).unwrap_err();
            assert_eq!(err, MonthYearError::MalformedDate(raw.to_string()));
        }
    }

    #[test]
    fn serializes_as_quoted_string() {
        let month_year = MonthYear::new(2024, 12).unwrap();
        assert_eq!(serde_json::to_string(&month_year).unwrap(), "\"12-2024\"");
    }

    #[test]
    fn deserialize_rejects_malformed_string() {
        let err = serde_json::from_str::<MonthYear>("\"2024-12\"")
            .unwrap_err()
            .to_string();
        assert!(err.contains("malformed date"), "got: {err}");
    }

    #[test]
    fn required_month_rejects_null_string() {
        assert!(serde_json::from_str::<MonthYear>("\"null\"").is_err());
    }

    #[derive(Debug, Deserialize)]
    struct Window {
        #[serde(default, deserialize_with = "optional::deserialize")]
        end: Option<MonthYear>,
    }

    #[test]
    fn optional_month_accepts_null_forms() {
        for raw in [r#"{}"#, r#"{"end":null}"#, r#"{"end":"null"}"#] {
            let window: Window = serde_json::from_str(raw).unwrap();
            assert_eq!(window.end, None, "input: {raw}");
        }
    }

    #[test]
    fn optional_month_parses_value() {
        let window: Window = serde_json::from_str(r#"{"end":"07-2026"}"#).unwrap();
        assert_eq!(window.end, MonthYear::new(2026, 7));
    }

    #[test]
    fn optional_month_propagates_malformed_date() {
        let err = serde_json::from_str::<Window>(r#"{"end":"July 2026"}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("malformed date"), "got: {err}");
    }
}
