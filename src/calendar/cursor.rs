use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The month the calendar is showing. `month` is 0-based.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCursor {
    year: i32,
    month: u32,
}

impl CalendarCursor {
    /// Normalises `month` into `0..12`, carrying whole years into `year`.
    pub fn new(year: i32, month: i32) -> Self {
        let total = i64::from(year) * 12 + i64::from(month);
        Self {
            year: total.div_euclid(12) as i32,
            month: total.rem_euclid(12) as u32,
        }
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month0() as i32)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Moves by `delta` months, rolling the year over at either end.
    pub fn navigate(&mut self, delta: i32) {
        *self = Self::new(self.year, self.month as i32 + delta);
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
    }

    pub fn days_in_month(&self) -> u32 {
        let next = Self::new(self.year, self.month as i32 + 1);
        match (self.first_day(), next.first_day()) {
            (Some(first), Some(next_first)) => (next_first - first).num_days() as u32,
            _ => 0,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month as usize]
    }

    /// "October 2026"
    pub fn title(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_rolls_year_over() {
        let mut cursor = CalendarCursor::new(2026, 11);
        cursor.navigate(1);
        assert_eq!((cursor.year(), cursor.month()), (2027, 0));
        cursor.navigate(-1);
        cursor.navigate(-1);
        assert_eq!((cursor.year(), cursor.month()), (2026, 10));

        let mut january = CalendarCursor::new(2026, 0);
        january.navigate(-1);
        assert_eq!((january.year(), january.month()), (2025, 11));
    }

    #[test]
    fn forward_then_back_is_identity() {
        for year in [1970, 1999, 2000, 2024, 2026, 2100] {
            for month in 0..12 {
                let original = CalendarCursor::new(year, month);
                let mut cursor = original;
                cursor.navigate(1);
                cursor.navigate(-1);
                assert_eq!(cursor, original);
            }
        }
    }

    #[test]
    fn constructor_normalises_month() {
        assert_eq!(CalendarCursor::new(2026, 12), CalendarCursor::new(2027, 0));
        assert_eq!(CalendarCursor::new(2026, -1), CalendarCursor::new(2025, 11));
        assert_eq!(CalendarCursor::new(2026, 25), CalendarCursor::new(2028, 1));
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(CalendarCursor::new(2024, 1).days_in_month(), 29);
        assert_eq!(CalendarCursor::new(2026, 1).days_in_month(), 28);
        assert_eq!(CalendarCursor::new(1900, 1).days_in_month(), 28);
        assert_eq!(CalendarCursor::new(2000, 1).days_in_month(), 29);
        assert_eq!(CalendarCursor::new(2026, 9).days_in_month(), 31);
        assert_eq!(CalendarCursor::new(2026, 10).days_in_month(), 30);
    }

    #[test]
    fn title_uses_month_name() {
        assert_eq!(CalendarCursor::new(2026, 9).title(), "October 2026");
    }
}
