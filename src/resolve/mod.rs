// src/resolve/mod.rs
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

mod serial;

/// Outcome of resolving one raw date cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Input was empty or whitespace-only. Not an error.
    Empty,
    /// Canonical `YYYY-MM-DD` text. Strategies that compose from a contextual
    /// year/month do not calendar-check the result; callers validate before
    /// keying storage on it.
    Date(String),
    /// No strategy produced a date.
    Unparseable,
}

impl Resolution {
    pub fn as_date(&self) -> Option<&str> {
        match self {
            Resolution::Date(text) => Some(text),
            _ => None,
        }
    }
}

type Strategy = fn(&str, Option<i32>, Option<u32>) -> Option<String>;

/// The resolution cascade. Order is a correctness requirement: short numeric
/// values are ambiguous across formats, so the contextual bare-day rule must
/// run before any generic parsing, and the sheet-serial rule only after
/// every template has had its chance.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("bare-day", bare_day),
    ("full-date-template", full_date_template),
    ("month-day-template", month_day_template),
    ("normalized-full", normalized_full),
    ("sheet-serial", sheet_serial),
    ("digit-fallback", digit_fallback),
    ("lenient", lenient),
];

/// Resolve a raw date cell against an optional contextual year/month.
pub fn resolve(raw: &str, year: Option<i32>, month: Option<u32>) -> Resolution {
    let value = raw.trim();
    if value.is_empty() {
        return Resolution::Empty;
    }

    for (name, strategy) in STRATEGIES {
        if let Some(date) = strategy(value, year, month) {
            debug!(strategy = name, raw = value, date = %date, "resolved date");
            return Resolution::Date(date);
        }
    }

    warn!(raw = value, ?year, ?month, "unparseable date");
    Resolution::Unparseable
}

static BARE_DAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{1,2}$").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[年./]").unwrap());
static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").unwrap());

// Full-date templates. Years are exactly four digits; month and day accept
// one or two, which folds each padded template together with its unpadded
// variant.
static YMD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})$").unwrap());
static MDY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{1,2})-([0-9]{1,2})-([0-9]{4})$").unwrap());
static YMD_CJK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})年([0-9]{1,2})月([0-9]{1,2})日$").unwrap());
static YMD_COMPACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})([0-9]{2})([0-9]{2})$").unwrap());

// Month-day templates, completed from the contextual year.
static MONTH_DAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]{1,2})-([0-9]{1,2})$").unwrap());
static MONTH_DAY_CJK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{1,2})月([0-9]{1,2})日$").unwrap());

// Last-resort battery. Month-first forms come before year-first ones so that
// short two-digit years fall out as implausible rather than shadowing the
// month field.
const LENIENT_DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%Y/%m/%d",
    "%Y-%m-%d",
    "%d-%b-%Y",
    "%B %d, %Y",
];
const LENIENT_DATETIME_FORMATS: &[&str] =
    &["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Years outside these bounds are treated as a misparse of an underspecified
/// value rather than a date anyone would put on a duty roster.
const MIN_PLAUSIBLE_YEAR: i32 = 2000;
const MAX_PLAUSIBLE_YEAR: i32 = 2100;

fn compose(year: i32, month: u32, day: u32) -> String {
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Strip whitespace, rewrite the `年` marker and `.`/`/` separators to `-`.
fn normalize(value: &str) -> String {
    let collapsed = WHITESPACE.replace_all(value, "");
    SEPARATORS.replace_all(&collapsed, "-").into_owned()
}

fn captured_date(caps: &regex::Captures, yi: usize, mi: usize, di: usize) -> Option<NaiveDate> {
    let year: i32 = caps[yi].parse().ok()?;
    let month: u32 = caps[mi].parse().ok()?;
    let day: u32 = caps[di].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn bare_day(value: &str, year: Option<i32>, month: Option<u32>) -> Option<String> {
    let (year, month) = year.zip(month)?;
    if !BARE_DAY.is_match(value) {
        return None;
    }
    let day: u32 = value.parse().ok()?;
    Some(compose(year, month, day))
}

fn full_date_template(value: &str, _year: Option<i32>, _month: Option<u32>) -> Option<String> {
    let date = if let Some(caps) = YMD.captures(value).or_else(|| YMD_CJK.captures(value)) {
        captured_date(&caps, 1, 2, 3)
    } else if let Some(caps) = MDY.captures(value) {
        captured_date(&caps, 3, 1, 2)
    } else {
        None
    }?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn month_day_template(value: &str, year: Option<i32>, _month: Option<u32>) -> Option<String> {
    let year = year?;
    let caps = MONTH_DAY
        .captures(value)
        .or_else(|| MONTH_DAY_CJK.captures(value))?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    // these templates carry no year, so the pair must be real in the supplied one
    NaiveDate::from_ymd_opt(year, month, day)?;
    Some(compose(year, month, day))
}

fn normalized_full(value: &str, _year: Option<i32>, _month: Option<u32>) -> Option<String> {
    let normalized = normalize(value);
    let caps = YMD
        .captures(&normalized)
        .or_else(|| YMD_COMPACT.captures(&normalized))?;
    let date = captured_date(&caps, 1, 2, 3)?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn sheet_serial(value: &str, _year: Option<i32>, _month: Option<u32>) -> Option<String> {
    // bare one- and two-digit values are day numbers, not serials; without a
    // contextual month they stay unresolved instead of becoming 1900-era dates
    if BARE_DAY.is_match(value) {
        return None;
    }
    let numeric: f64 = value.parse().ok()?;
    if !(1.0..1_000_000.0).contains(&numeric) {
        return None;
    }
    match serial::serial_to_date(numeric) {
        Some(date) => Some(date.format("%Y-%m-%d").to_string()),
        None => {
            warn!(value, serial = numeric, "sheet serial does not decode to a real date");
            None
        }
    }
}

fn digit_fallback(value: &str, year: Option<i32>, month: Option<u32>) -> Option<String> {
    let (year, month) = year.zip(month)?;
    let digits = NON_DIGIT.replace_all(value, "");
    if digits.is_empty() || digits.chars().count() > 2 {
        return None;
    }
    let day: u32 = digits.parse().ok()?;
    Some(compose(year, month, day))
}

fn lenient(value: &str, year: Option<i32>, _month: Option<u32>) -> Option<String> {
    let parsed = LENIENT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            LENIENT_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })?;

    if (MIN_PLAUSIBLE_YEAR..=MAX_PLAUSIBLE_YEAR).contains(&parsed.year()) {
        return Some(parsed.format("%Y-%m-%d").to_string());
    }

    // implausible year: trust the contextual year over the parsed one
    let year = year?;
    debug!(
        raw = value,
        parsed = %parsed,
        year,
        "correcting implausible year from context"
    );
    Some(compose(year, parsed.month(), parsed.day()))
}
