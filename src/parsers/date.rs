use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::Clock;
use crate::errors::SmsParseError;

static DAY_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})-(\d{1,2})-(\d{2})$").unwrap());

static DAY_MON_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})([A-Za-z]{3})(\d{2})$").unwrap());

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Date token as it appears in a bank SMS.
///
/// Two shapes are understood:
/// - `DD-MM-YY` (`03-10-25`)
/// - `DDMonYY` (`30Sep25`)
///
/// Years are always read as `20YY`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsDate(String);

impl SmsDate {
    pub fn parse(&self) -> Result<NaiveDate, SmsParseError> {
        let s = self.0.trim();
        let invalid = || SmsParseError::MalformedDate(s.to_string());

        if let Some(caps) = DAY_MONTH_YEAR.captures(s) {
            let day: u32 = caps[1].parse().map_err(|_| invalid())?;
            let month: u32 = caps[2].parse().map_err(|_| invalid())?;
            let year: i32 = caps[3].parse().map_err(|_| invalid())?;
            return NaiveDate::from_ymd_opt(2000 + year, month, day).ok_or_else(invalid);
        }

        if let Some(caps) = DAY_MON_YEAR.captures(s) {
            let day: u32 = caps[1].parse().map_err(|_| invalid())?;
            let mon = caps[2].to_lowercase();
            let month = MONTHS
                .iter()
                .position(|m| *m == mon)
                .ok_or_else(invalid)? as u32
                + 1;
            let year: i32 = caps[3].parse().map_err(|_| invalid())?;
            return NaiveDate::from_ymd_opt(2000 + year, month, day).ok_or_else(invalid);
        }

        Err(invalid())
    }

    /// Midnight UTC of the parsed date, or `clock.now()` if the token is unreadable.
    pub fn resolve(&self, clock: &dyn Clock) -> DateTime<Utc> {
        match self.parse() {
            Ok(date) => date.and_time(chrono::NaiveTime::MIN).and_utc(),
            Err(e) => {
                debug!("{}, using current time", e);
                clock.now()
            }
        }
    }
}

impl From<String> for SmsDate {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SmsDate {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl TryFrom<SmsDate> for NaiveDate {
    type Error = SmsParseError;

    fn try_from(date: SmsDate) -> Result<Self, Self::Error> {
        date.parse()
    }
}
