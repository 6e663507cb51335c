use chrono::{Duration, NaiveDate};

/// Converts a 1900-system spreadsheet date serial to a calendar date.
///
/// Day 1 is 1900-01-01. Serial 60 is the phantom 1900-02-29 the 1900 system
/// inherited from Lotus 1-2-3; it names no real date and is rejected, so
/// serials above 60 count from the shifted epoch 1899-12-30. The fractional
/// part encodes time of day and is dropped.
pub(crate) fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    let days = serial.trunc() as i64;
    if days < 1 || days == 60 {
        return None;
    }
    let epoch = if days < 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)
    }?;
    epoch.checked_add_signed(Duration::days(days))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_one_is_start_of_1900() {
        assert_eq!(serial_to_date(1.0), Some(ymd(1900, 1, 1)));
        assert_eq!(serial_to_date(2.0), Some(ymd(1900, 1, 2)));
    }

    #[test]
    fn phantom_leap_day_is_rejected() {
        assert_eq!(serial_to_date(59.0), Some(ymd(1900, 2, 28)));
        assert_eq!(serial_to_date(60.0), None);
        assert_eq!(serial_to_date(61.0), Some(ymd(1900, 3, 1)));
    }

    #[test]
    fn modern_serials_round_trip() {
        assert_eq!(serial_to_date(45292.0), Some(ymd(2024, 1, 1)));
        // time-of-day fraction is dropped
        assert_eq!(serial_to_date(45292.75), Some(ymd(2024, 1, 1)));
    }

    #[test]
    fn out_of_range_serials_are_rejected() {
        assert_eq!(serial_to_date(0.0), None);
        assert_eq!(serial_to_date(0.5), None);
        assert_eq!(serial_to_date(-3.0), None);
    }
}
