//! Type inference for heterogeneous cell values

use std::sync::LazyLock;

use chrono::FixedOffset;
use chrono::NaiveDate;
use chrono::TimeZone;
use regex::Captures;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

use crate::model::CellValue;

/// Semantic type of a cell, chosen per value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Number,
    Boolean,
    Date,
    String,
}

impl CellType {
    /// Rank used when two values of different types meet in one sort pass.
    pub(crate) fn rank(self) -> u8 {
        match self {
            CellType::Number => 0,
            CellType::Date => 1,
            CellType::Boolean => 2,
            CellType::String => 3,
        }
    }
}

/// `YYYY-MM-DD`, optionally followed by a time and a zone.
static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})-(\d{2})-(\d{2})(?:[T ](\d{2}):(\d{2})(?::(\d{2})(?:\.(\d{1,9}))?)?)?\s*(Z|[+-]\d{2}:?\d{2})?$",
    )
    .expect("ISO date pattern is valid")
});

/// `YYYY년 MM월 DD일`
static KOREAN_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})\s*년\s*(\d{1,2})\s*월\s*(\d{1,2})\s*일$")
        .expect("Korean date pattern is valid")
});

/// `YYYY.MM.DD`, also the spaced `YYYY. M. D.` form.
static DOTTED_YMD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})\.\s?(\d{1,2})\.\s?(\d{1,2})\.?$").expect("dotted date pattern is valid")
});

/// `MM/DD/YYYY`
static SLASHED_MDY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("slashed date pattern is valid")
});

/// `DD.MM.YYYY`
static DOTTED_DMY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$").expect("dotted date pattern is valid")
});

/// Infer the semantic type of a cell value.
///
/// Total and deterministic: anything unrecognized is a string.
///
/// # Example
///
/// ```
/// use tableview_lib::model::CellValue;
/// use tableview_lib::sort::{CellType, infer};
///
/// assert_eq!(infer(&CellValue::from("2024-01-01")), CellType::Date);
/// assert_eq!(infer(&CellValue::from("123.45")), CellType::Number);
/// assert_eq!(infer(&CellValue::from("true")), CellType::Boolean);
/// assert_eq!(infer(&CellValue::from("hello")), CellType::String);
/// ```
pub fn infer(value: &CellValue) -> CellType {
    match value {
        CellValue::Null => CellType::String,
        CellValue::Bool(_) => CellType::Boolean,
        CellValue::Number(n) if n.is_finite() => CellType::Number,
        CellValue::Number(_) => CellType::String,
        CellValue::Text(s) => infer_str(s),
    }
}

/// Infer the semantic type of raw text.
///
/// Precedence: empty, number, boolean literal, date, string. `"1"` and
/// `"0"` therefore infer as numbers.
pub fn infer_str(text: &str) -> CellType {
    let text = text.trim();
    if text.is_empty() {
        return CellType::String;
    }
    if parse_number(text).is_some() {
        return CellType::Number;
    }
    if parse_bool(text).is_some() {
        return CellType::Boolean;
    }
    if parse_timestamp(text).is_some() {
        return CellType::Date;
    }
    CellType::String
}

/// Parse text as a finite number.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse one of the boolean literals `true`, `false`, `1`, `0`.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a recognized date shape into milliseconds since the Unix epoch.
///
/// Values without a zone are read as UTC. Shapes that name an impossible
/// calendar date (`2024-02-30`) yield `None`.
pub fn parse_timestamp(text: &str) -> Option<i64> {
    let text = text.trim();

    if let Some(caps) = ISO_DATE.captures(text) {
        return iso_timestamp(&caps);
    }
    if let Some(caps) = KOREAN_DATE
        .captures(text)
        .or_else(|| DOTTED_YMD.captures(text))
    {
        return ymd_timestamp(num(&caps, 1)?, num(&caps, 2)?, num(&caps, 3)?);
    }
    if let Some(caps) = SLASHED_MDY.captures(text) {
        return ymd_timestamp(num(&caps, 3)?, num(&caps, 1)?, num(&caps, 2)?);
    }
    if let Some(caps) = DOTTED_DMY.captures(text) {
        return ymd_timestamp(num(&caps, 3)?, num(&caps, 2)?, num(&caps, 1)?);
    }
    None
}

fn num(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

fn ymd_timestamp(year: u32, month: u32, day: u32) -> Option<i64> {
    let date = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

fn iso_timestamp(caps: &Captures<'_>) -> Option<i64> {
    let date = NaiveDate::from_ymd_opt(
        i32::try_from(num(caps, 1)?).ok()?,
        num(caps, 2)?,
        num(caps, 3)?,
    )?;

    let hour = caps.get(4).map_or(Some(0), |_| num(caps, 4))?;
    let minute = caps.get(5).map_or(Some(0), |_| num(caps, 5))?;
    let second = caps.get(6).map_or(Some(0), |_| num(caps, 6))?;
    let nanos = match caps.get(7) {
        Some(m) => format!("{:0<9}", m.as_str()).parse().ok()?,
        None => 0,
    };
    let naive = date.and_hms_nano_opt(hour, minute, second, nanos)?;

    match caps.get(8).map(|m| m.as_str()) {
        None | Some("Z") => Some(naive.and_utc().timestamp_millis()),
        Some(zone) => {
            let offset = parse_offset(zone)?;
            let local = offset.from_local_datetime(&naive).single()?;
            Some(local.timestamp_millis())
        }
    }
}

/// Parse `+HH:MM` or `+HHMM`.
fn parse_offset(zone: &str) -> Option<FixedOffset> {
    let sign = if zone.starts_with('-') { -1 } else { 1 };
    let digits: String = zone[1..].chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
