use chrono::{Datelike, NaiveDate};

use super::CalendarCursor;
use crate::notes::format_iso_date;

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub date: NaiveDate,
    /// `YYYY-MM-DD`
    pub iso: String,
    pub is_today: bool,
}

/// One month laid out Monday-first in whole weeks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
    pub trailing_blanks: u32,
}

impl MonthGrid {
    pub fn cell_count(&self) -> usize {
        self.leading_blanks as usize + self.days.len() + self.trailing_blanks as usize
    }

    /// Cells in display order, `None` for blanks.
    pub fn cells(&self) -> impl Iterator<Item = Option<&DayCell>> {
        std::iter::repeat(None)
            .take(self.leading_blanks as usize)
            .chain(self.days.iter().map(Some))
            .chain(std::iter::repeat(None).take(self.trailing_blanks as usize))
    }

    pub fn weeks(&self) -> Vec<Vec<Option<&DayCell>>> {
        let cells: Vec<_> = self.cells().collect();
        cells.chunks(7).map(|week| week.to_vec()).collect()
    }
}

/// Blank cells before day 1: Sunday-based weekday shifted so Monday is column 0.
pub fn leading_blanks(first: NaiveDate) -> u32 {
    (first.weekday().num_days_from_sunday() + 6) % 7
}

pub fn build_month_grid(cursor: CalendarCursor, today: NaiveDate) -> MonthGrid {
    let Some(first) = cursor.first_day() else {
        return MonthGrid {
            leading_blanks: 0,
            days: Vec::new(),
            trailing_blanks: 0,
        };
    };

    let days: Vec<DayCell> = first
        .iter_days()
        .take(cursor.days_in_month() as usize)
        .map(|date| DayCell {
            day: date.day(),
            iso: format_iso_date(date),
            is_today: date == today,
            date,
        })
        .collect();

    let leading = leading_blanks(first);
    let used = leading + days.len() as u32;
    let trailing = (7 - used % 7) % 7;

    MonthGrid {
        leading_blanks: leading,
        days,
        trailing_blanks: trailing,
    }
}
