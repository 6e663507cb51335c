use chrono::NaiveDate;
use std::collections::HashMap;

/// Calendar annotations attached to schedule entries. Implementations are
/// pure lookups; the lunar string is empty when unknown.
pub trait Calendar {
    fn lunar_date(&self, date: NaiveDate) -> String;
    fn holiday(&self, date: NaiveDate) -> Option<String>;
}

/// Annotates nothing. Useful when no calendar source is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCalendar;

impl Calendar for NoCalendar {
    fn lunar_date(&self, _date: NaiveDate) -> String {
        String::new()
    }

    fn holiday(&self, _date: NaiveDate) -> Option<String> {
        None
    }
}

/// Serves caller-provided lookup tables, for callers that precompute their
/// lunar dates and holidays elsewhere.
#[derive(Debug, Clone, Default)]
pub struct TableCalendar {
    lunar: HashMap<NaiveDate, String>,
    holidays: HashMap<NaiveDate, String>,
}

impl TableCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lunar(mut self, date: NaiveDate, label: impl Into<String>) -> Self {
        self.lunar.insert(date, label.into());
        self
    }

    pub fn with_holiday(mut self, date: NaiveDate, name: impl Into<String>) -> Self {
        self.holidays.insert(date, name.into());
        self
    }
}

impl Calendar for TableCalendar {
    fn lunar_date(&self, date: NaiveDate) -> String {
        self.lunar.get(&date).cloned().unwrap_or_default()
    }

    fn holiday(&self, date: NaiveDate) -> Option<String> {
        self.holidays.get(&date).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_calendar_looks_up_annotations() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let other = NaiveDate::from_ymd_opt(2024, 2, 11).unwrap();
        let cal = TableCalendar::new()
            .with_lunar(day, "正月初一")
            .with_holiday(day, "春节");

        assert_eq!(cal.lunar_date(day), "正月初一");
        assert_eq!(cal.holiday(day), Some("春节".to_string()));
        assert_eq!(cal.lunar_date(other), "");
        assert_eq!(cal.holiday(other), None);
    }
}
