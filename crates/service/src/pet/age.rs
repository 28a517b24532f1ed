use chrono::{Local, NaiveDate};

/// Mean Gregorian year length in days.
pub const DAYS_PER_YEAR: f64 = 365.2425;
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Below one year keep two decimals (toward zero); from one year on keep whole years.
pub fn truncate_years(years: f64) -> f64 {
    if years < 1.0 {
        (years * 100.0).trunc() / 100.0
    } else {
        years.trunc()
    }
}

pub fn days_since(date: NaiveDate, today: NaiveDate) -> i64 {
    (today - date).num_days()
}

/// Whole or fractional years elapsed between `date` and `today`.
pub fn years_since(date: NaiveDate, today: NaiveDate) -> f64 {
    truncate_years(days_since(date, today) as f64 / DAYS_PER_YEAR)
}

pub fn months_to_years(months: f64) -> f64 {
    truncate_years(months / MONTHS_PER_YEAR)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn under_one_year_keeps_two_decimals() {
        let today = d(2024, 6, 1);
        assert_eq!(years_since(today - Duration::days(200), today), 0.54);
        assert_eq!(years_since(today - Duration::days(365), today), 0.99);
    }

    #[test]
    fn from_one_year_truncates_to_whole_years() {
        let today = d(2024, 6, 1);
        assert_eq!(years_since(today - Duration::days(366), today), 1.0);
        assert_eq!(years_since(today - Duration::days(730), today), 1.0);
        assert_eq!(years_since(today - Duration::days(731), today), 2.0);
    }

    #[test]
    fn months_convert_with_same_policy() {
        assert_eq!(months_to_years(6.0), 0.5);
        assert_eq!(months_to_years(11.0), 0.91);
        assert_eq!(months_to_years(30.0), 2.0);
    }
}
