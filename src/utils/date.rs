//! Date parsing and formatting helpers.
//!
//! Posts are bucketed by zero-padded date components (`YYYY/MM/DD`), so most
//! of this module deals in fixed-width strings rather than rich date types.

use anyhow::{Result, anyhow, bail};
use chrono::Local;

/// A validated calendar date split into zero-padded components.
///
/// The components are kept as strings because the index compares and stores
/// them lexicographically; fixed-width zero-padding makes string order equal
/// numeric order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ymd {
    pub year: String,
    pub month: String,
    pub day: String,
}

impl Ymd {
    /// Parse a `YYYY-MM-DD` date string into validated components.
    ///
    /// Single-digit months and days are accepted and zero-padded.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, '-');
        let (year, month, day) = match (parts.next(), parts.next(), parts.next()) {
            (Some(y), Some(m), Some(d)) => (y, m, d),
            _ => bail!("invalid date {s:?}, expecting YYYY-MM-DD"),
        };

        let year: u16 = year.parse().map_err(|_| anyhow!("invalid year in {s:?}"))?;
        let month: u8 = month.parse().map_err(|_| anyhow!("invalid month in {s:?}"))?;
        let day: u8 = day.parse().map_err(|_| anyhow!("invalid day in {s:?}"))?;

        if !(1..=12).contains(&month) {
            bail!("month is invalid: {month}");
        }
        let max_days = days_in_month(year, month);
        if day == 0 || day > max_days {
            bail!("day is invalid: {day}");
        }

        Ok(Self {
            year: format!("{year:04}"),
            month: format!("{month:02}"),
            day: format!("{day:02}"),
        })
    }

    /// Render back to `YYYY-MM-DD`.
    pub fn to_date_string(&self) -> String {
        format!("{}-{}-{}", self.year, self.month, self.day)
    }

    /// RFC 2822 date at midnight GMT, as used in RSS `pubDate` elements.
    ///
    /// Components are re-validated on the way in: the fields are public, so
    /// an out-of-range month (say, from a hand-edited index) must not panic.
    pub fn to_rfc2822(&self) -> String {
        const WEEKDAYS: [&str; 7] = ["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"];
        const MONTHS: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];

        let year: i32 = self.year.parse().unwrap_or(0);
        let month: u32 = self
            .month
            .parse()
            .ok()
            .filter(|m| (1..=12).contains(m))
            .unwrap_or(1);
        let day: i32 = self
            .day
            .parse()
            .ok()
            .filter(|d| (1..=31).contains(d))
            .unwrap_or(1);

        // Zeller's congruence for the weekday
        let (y, m) = if month < 3 {
            (year - 1, month as i32 + 12)
        } else {
            (year, month as i32)
        };
        let weekday = ((day + (13 * (m + 1)) / 5 + y + y / 4 - y / 100 + y / 400) % 7) as usize;

        format!(
            "{}, {:02} {} {:04} 00:00:00 GMT",
            WEEKDAYS[weekday],
            day,
            MONTHS[(month - 1) as usize],
            year
        )
    }
}

#[inline]
fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

#[inline]
fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Normalize a front-matter date value to `YYYY-MM-DD`.
///
/// Accepts plain dates and RFC 3339 timestamps (the date part is kept, the
/// time discarded). Returns `None` when the value is not a recognizable date.
pub fn normalize_date(s: &str) -> Option<String> {
    let date_part = s.split(['T', ' ']).next()?;
    Ymd::parse(date_part).ok().map(|ymd| ymd.to_date_string())
}
