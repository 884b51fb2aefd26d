//! Enumerated slot fields: the day of the week and the hour of the day.
//!
//! Both types only admit members of their fixed enumerations, so every task
//! is guaranteed to land in exactly one cell of the 7x24 grid.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FieldError;

/// Day of the week, Monday first.
///
/// Persisted as the English label. The legacy Spanish labels written by
/// earlier versions of the planner are accepted when reading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Day {
    #[serde(alias = "monday", alias = "Lunes")]
    #[value(alias = "mon")]
    Monday,
    #[serde(alias = "tuesday", alias = "Martes")]
    #[value(alias = "tue")]
    Tuesday,
    #[serde(alias = "wednesday", alias = "Miércoles", alias = "Miercoles")]
    #[value(alias = "wed")]
    Wednesday,
    #[serde(alias = "thursday", alias = "Jueves")]
    #[value(alias = "thu")]
    Thursday,
    #[serde(alias = "friday", alias = "Viernes")]
    #[value(alias = "fri")]
    Friday,
    #[serde(alias = "saturday", alias = "Sábado", alias = "Sabado")]
    #[value(alias = "sat")]
    Saturday,
    #[serde(alias = "sunday", alias = "Domingo")]
    #[value(alias = "sun")]
    Sunday,
}

impl Day {
    /// All days in grid column order.
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    /// Three-letter label for narrow columns.
    pub fn short(self) -> &'static str {
        &self.label()[..3]
    }

    /// Zero-based column index, Monday = 0.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Next day, wrapping Sunday to Monday.
    pub fn next(self) -> Day {
        Day::ALL[(self.index() + 1) % Day::ALL.len()]
    }

    /// Previous day, wrapping Monday to Sunday.
    pub fn prev(self) -> Day {
        Day::ALL[(self.index() + Day::ALL.len() - 1) % Day::ALL.len()]
    }
}

impl Default for Day {
    fn default() -> Self {
        Day::Monday
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl From<chrono::Weekday> for Day {
    fn from(w: chrono::Weekday) -> Self {
        Day::ALL[w.num_days_from_monday() as usize]
    }
}

impl FromStr for Day {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let day = match s.trim().to_lowercase().as_str() {
            "monday" | "mon" | "lunes" => Day::Monday,
            "tuesday" | "tue" | "martes" => Day::Tuesday,
            "wednesday" | "wed" | "miércoles" | "miercoles" => Day::Wednesday,
            "thursday" | "thu" | "jueves" => Day::Thursday,
            "friday" | "fri" | "viernes" => Day::Friday,
            "saturday" | "sat" | "sábado" | "sabado" => Day::Saturday,
            "sunday" | "sun" | "domingo" => Day::Sunday,
            _ => return Err(FieldError::InvalidDay(s.to_string())),
        };
        Ok(day)
    }
}

/// Hour of the day, 0 through 23, labelled `HH:00`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hour(u8);

impl Hour {
    pub const COUNT: usize = 24;

    pub fn new(hour: u8) -> Option<Hour> {
        (usize::from(hour) < Self::COUNT).then_some(Hour(hour))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> String {
        format!("{:02}:00", self.0)
    }

    /// All hours in grid row order.
    pub fn all() -> impl Iterator<Item = Hour> {
        (0..Self::COUNT as u8).map(Hour)
    }

    /// Next hour, wrapping 23:00 to 00:00.
    pub fn next(self) -> Hour {
        Hour((self.0 + 1) % Self::COUNT as u8)
    }

    /// Previous hour, wrapping 00:00 to 23:00.
    pub fn prev(self) -> Hour {
        Hour((self.0 + Self::COUNT as u8 - 1) % Self::COUNT as u8)
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.label())
    }
}

/// Accepts `HH:00`, `H:00` and a bare hour number.
impl FromStr for Hour {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FieldError::InvalidHour(s.to_string());
        let trimmed = s.trim();
        let digits = match trimmed.split_once(':') {
            Some((h, "00")) => h,
            Some(_) => return Err(invalid()),
            None => trimmed,
        };
        if digits.is_empty() || digits.len() > 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        digits
            .parse::<u8>()
            .ok()
            .and_then(Hour::new)
            .ok_or_else(invalid)
    }
}

impl Serialize for Hour {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for Hour {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The four editable fields of a task, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Day,
    Time,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Title,
        FormField::Description,
        FormField::Day,
        FormField::Time,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_parse_accepts_english_short_and_legacy_labels() {
        assert_eq!("Monday".parse::<Day>(), Ok(Day::Monday));
        assert_eq!("wed".parse::<Day>(), Ok(Day::Wednesday));
        assert_eq!("Miércoles".parse::<Day>(), Ok(Day::Wednesday));
        assert_eq!("Sabado".parse::<Day>(), Ok(Day::Saturday));
        assert_eq!(
            "Someday".parse::<Day>(),
            Err(FieldError::InvalidDay("Someday".to_string()))
        );
    }

    #[test]
    fn test_day_wraps_around_the_week() {
        assert_eq!(Day::Sunday.next(), Day::Monday);
        assert_eq!(Day::Monday.prev(), Day::Sunday);
        assert_eq!(Day::Wednesday.short(), "Wed");
        assert_eq!(Day::from(chrono::Weekday::Fri), Day::Friday);
    }

    #[test]
    fn test_hour_parse_and_label() {
        assert_eq!("09:00".parse::<Hour>().map(Hour::value), Ok(9));
        assert_eq!("7".parse::<Hour>().map(Hour::value), Ok(7));
        assert_eq!("23:00".parse::<Hour>().map(Hour::label), Ok("23:00".to_string()));
        assert!("24:00".parse::<Hour>().is_err());
        assert!("09:30".parse::<Hour>().is_err());
        assert!("".parse::<Hour>().is_err());
        assert!("-1".parse::<Hour>().is_err());
    }

    #[test]
    fn test_hour_enumeration_is_complete() {
        let labels: Vec<String> = Hour::all().map(Hour::label).collect();
        assert_eq!(labels.len(), 24);
        assert_eq!(labels.first().map(String::as_str), Some("00:00"));
        assert_eq!(labels.last().map(String::as_str), Some("23:00"));
        assert_eq!(Hour::new(23).map(Hour::next), Hour::new(0));
        assert_eq!(Hour::new(0).map(Hour::prev), Hour::new(23));
    }

    #[test]
    fn test_day_and_hour_serde_labels() {
        let json = serde_json::to_string(&(Day::Tuesday, Hour::new(9))).unwrap();
        assert_eq!(json, r#"["Tuesday","09:00"]"#);
        let back: (Day, Hour) = serde_json::from_str(r#"["Martes","09:00"]"#).unwrap();
        assert_eq!(back, (Day::Tuesday, Hour::new(9).unwrap()));
        assert!(serde_json::from_str::<Hour>(r#""9:15""#).is_err());
    }
}
