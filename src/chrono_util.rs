use std::str::FromStr;

use chrono::NaiveDate;
use regex::Captures;

use crate::schema::Month;

/// Normalizes a date label of a festival table.
///
/// A label that is exactly `DD.MM.YYYY` is parsed as is.  Otherwise the first
/// `DD.MM.YYYY` occurring inside the label (e.g. after a time range such as
/// `8:11 PM 10th to 5:27 PM 11th`) is used.  Returns `None` when there is no such
/// substring or it is not a valid calendar date.
pub fn parse_date(label: &str) -> Option<NaiveDate> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    if let Some(captures) = regex!(r"^([0-9]{2})\.([0-9]{2})\.([0-9]{4})$").captures(label) {
        if let Some(date) = date_from_captures(&captures) {
            return Some(date);
        }
    }
    let captures = regex!(r"([0-9]{2})\.([0-9]{2})\.([0-9]{4})").captures(label)?;
    date_from_captures(&captures)
}

fn date_from_captures(captures: &Captures) -> Option<NaiveDate> {
    let day = captures[1].parse().ok()?;
    let month = captures[2].parse().ok()?;
    let year = captures[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses labels written out in English, such as `January 1, 2026 / ०१ जानेवारी २०२६`.
/// Only the part before the first `/` is considered.
pub fn parse_long_date(label: &str) -> Option<NaiveDate> {
    let english = label.split('/').next()?.trim();
    let captures =
        regex!(r"^([A-Za-z]+)\s+([0-9]{1,2}),\s*([0-9]{4})$").captures(english)?;
    let month = Month::from_str(&captures[1].to_lowercase()).ok()?;
    let day = captures[2].parse().ok()?;
    let year = captures[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month as u32 + 1, day)
}
