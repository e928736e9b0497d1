pub mod component;
pub mod cursor;
pub mod grid;

pub use component::{CalendarComponent, NoticeKind};
pub use cursor::CalendarCursor;
pub use grid::{build_month_grid, DayCell, MonthGrid};
