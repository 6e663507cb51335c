// src/schedule/mod.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{btree_map::Entry, BTreeMap};
use thiserror::Error;
use tracing::{info, warn};

use crate::calendar::Calendar;
use crate::resolve::{self, Resolution};
use crate::rules::RuleSet;

/// Header cell marking the date column.
pub const DATE_HEADER: &str = "日期";
/// Header cell marking the optional weekday column.
pub const WEEKDAY_HEADER: &str = "星期";

/// Separator used when two rows land on the same date.
const MERGE_SEPARATOR: &str = " | ";

/// Structural problems in the input sheet. These abort the whole call;
/// malformed data in individual rows never does.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("roster has {0} rows; need a reserved row and a header row")]
    MissingHeaderRow(usize),
    #[error("no \"{DATE_HEADER}\" column in the header row")]
    MissingDateColumn,
    #[error("no column for {0:?} in the header row")]
    MissingTargetColumn(String),
}

/// One day of the aggregated schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub weekday: String,
    pub content: String,
    pub lunar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holiday: Option<String>,
}

/// Everything produced from one pass over a roster sheet: the date-keyed
/// schedule plus the rows that could not be placed into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub entries: BTreeMap<NaiveDate, ScheduleEntry>,
    pub remarks: Vec<String>,
}

/// Column indices located in the header row.
struct HeaderMap {
    date: usize,
    weekday: Option<usize>,
    target: usize,
}

impl HeaderMap {
    fn locate(header_row: &[String], target_name: &str) -> Result<Self, RosterError> {
        let cells: Vec<String> = header_row.iter().map(|cell| sanitize(cell)).collect();

        let date = cells
            .iter()
            .position(|cell| cell == DATE_HEADER)
            .ok_or(RosterError::MissingDateColumn)?;
        let weekday = cells.iter().position(|cell| cell == WEEKDAY_HEADER);

        let wanted = sanitize(target_name).to_lowercase();
        let target = cells
            .iter()
            .position(|cell| cell.to_lowercase() == wanted)
            .ok_or_else(|| RosterError::MissingTargetColumn(target_name.to_string()))?;

        Ok(Self {
            date,
            weekday,
            target,
        })
    }
}

/// Aggregate one decoded roster sheet into a per-person schedule.
///
/// `rows` is the sheet as text cells: row 0 is unused, row 1 is the header
/// row, data starts at row 2. Rows may be ragged; missing cells read as
/// empty. `year`/`month` disambiguate underspecified date cells such as bare
/// day numbers. The rule set is applied to each non-empty target cell before
/// the row is placed; `calendar` supplies the lunar/holiday annotations of
/// newly created entries.
#[tracing::instrument(level = "info", skip(rows, rules, calendar), fields(person = %target_name))]
pub fn process(
    rows: &[Vec<String>],
    target_name: &str,
    year: Option<i32>,
    month: Option<u32>,
    rules: &RuleSet,
    calendar: &dyn Calendar,
) -> Result<Schedule, RosterError> {
    if rows.len() < 2 {
        return Err(RosterError::MissingHeaderRow(rows.len()));
    }
    let header = HeaderMap::locate(&rows[1], target_name)?;

    let mut schedule = Schedule::default();

    for row in rows.iter().skip(2) {
        let raw_date = cell(row, header.date);
        let content = cell(row, header.target).trim();

        if raw_date.is_empty() && content.is_empty() {
            continue;
        }
        if content.is_empty() {
            schedule.remarks.push(compose_remark(row));
            continue;
        }

        let content = rules.apply(content);

        let resolved = match resolve::resolve(raw_date, year, month) {
            Resolution::Date(text) => text,
            Resolution::Empty | Resolution::Unparseable => {
                schedule.remarks.push(compose_remark(row));
                continue;
            }
        };
        let date = match NaiveDate::parse_from_str(&resolved, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                warn!(raw = raw_date, resolved = %resolved, "resolved text is not a real date");
                schedule.remarks.push(compose_remark(row));
                continue;
            }
        };

        match schedule.entries.entry(date) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                entry.content = format!("{}{}{}", entry.content, MERGE_SEPARATOR, content);
            }
            Entry::Vacant(vacant) => {
                let weekday = header
                    .weekday
                    .map(|idx| cell(row, idx).trim().to_string())
                    .unwrap_or_default();
                vacant.insert(ScheduleEntry {
                    weekday,
                    content,
                    lunar: calendar.lunar_date(date),
                    holiday: calendar.holiday(date),
                });
            }
        }
    }

    info!(
        entries = schedule.entries.len(),
        remarks = schedule.remarks.len(),
        "roster aggregated"
    );
    Ok(schedule)
}

/// Header text and the target name are compared with all whitespace removed.
fn sanitize(text: &str) -> String {
    text.split_whitespace().collect()
}

fn cell<'a>(row: &'a [String], idx: usize) -> &'a str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// Snapshot of a row that could not be placed: its non-empty cells, trimmed
/// and tab-joined.
fn compose_remark(row: &[String]) -> String {
    row.iter()
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .collect::<Vec<_>>()
        .join("\t")
}
