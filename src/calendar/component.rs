//! Month grid with navigation and daily-note opening.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use anyhow::Result;

use super::{build_month_grid, grid::WEEKDAY_LABELS, CalendarCursor};
use crate::{
    clock::Clock,
    deferred::{Deferred, DeferredRegistry},
    host::DocumentStore,
    log_debug, log_error,
    notes::{open_or_create, NoteOutcome, NoteTemplate},
    ui::Element,
};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Clears itself after the configured delay.
    Success,
    /// Stays until replaced.
    Error,
}

impl NoticeKind {
    fn class(&self) -> &'static str {
        match self {
            NoticeKind::Success => "notice-success",
            NoticeKind::Error => "notice-error",
        }
    }
}

struct CalendarElements {
    title: Element,
    grid: Element,
    notice: Element,
}

pub struct CalendarComponent {
    cursor: Mutex<CalendarCursor>,
    elements: CalendarElements,
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    template: NoteTemplate,
    deferred: DeferredRegistry,
    notice_duration: Duration,
    pending_clear: Mutex<Option<Deferred>>,
}

impl CalendarComponent {
    /// Builds the calendar's subtree under `parent` showing the current month.
    pub fn new(
        parent: &Element,
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        template: NoteTemplate,
        deferred: DeferredRegistry,
        notice_duration: Duration,
    ) -> Self {
        let root = parent.create_child_with_class("div", "daypanel-calendar");

        let header = root.create_child_with_class("div", "calendar-header");
        let prev = header.create_child_with_class("button", "calendar-prev");
        prev.set_attr("data-action", "calendarPrev");
        prev.set_text("‹");
        let title = header.create_child_with_class("span", "calendar-title");
        let next = header.create_child_with_class("button", "calendar-next");
        next.set_attr("data-action", "calendarNext");
        next.set_text("›");
        let today = header.create_child_with_class("button", "calendar-today");
        today.set_attr("data-action", "calendarToday");
        today.set_text("Today");

        let grid = root.create_child_with_class("div", "calendar-grid");
        let notice = root.create_child_with_class("div", "calendar-notice");

        let cursor = CalendarCursor::containing(clock.today());

        let component = Self {
            cursor: Mutex::new(cursor),
            elements: CalendarElements {
                title,
                grid,
                notice,
            },
            store,
            clock,
            template,
            deferred,
            notice_duration,
            pending_clear: Mutex::new(None),
        };
        component.render();
        component
    }

    fn cursor_guard(&self) -> MutexGuard<'_, CalendarCursor> {
        match self.cursor.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn cursor(&self) -> CalendarCursor {
        *self.cursor_guard()
    }

    pub fn notice(&self) -> &Element {
        &self.elements.notice
    }

    pub fn grid(&self) -> &Element {
        &self.elements.grid
    }

    /// Rebuilds the title and every grid cell from the cursor.
    pub fn render(&self) {
        let cursor = self.cursor();
        let grid = build_month_grid(cursor, self.clock.today());

        self.elements.title.set_text(cursor.title());

        let container = &self.elements.grid;
        container.empty();
        for label in WEEKDAY_LABELS {
            let cell = container.create_child_with_class("div", "calendar-weekday");
            cell.set_text(label);
        }
        for week in grid.weeks() {
            let row = container.create_child_with_class("div", "calendar-week");
            for cell in week {
                let Some(day) = cell else {
                    row.create_child_with_class("div", "calendar-blank");
                    continue;
                };
                let el = row.create_child_with_class("div", "calendar-day");
                el.set_text(day.day.to_string());
                el.set_attr("data-date", day.iso.clone());
                el.set_attr("data-action", "selectDay");
                if day.is_today {
                    el.add_class("today");
                }
            }
        }

        log_debug!(
            "rendered {} with {} leading blanks",
            cursor.title(),
            grid.leading_blanks
        );
    }

    pub fn navigate(&self, delta: i32) {
        self.cursor_guard().navigate(delta);
        self.render();
    }

    pub fn go_to_today(&self) {
        *self.cursor_guard() = CalendarCursor::containing(self.clock.today());
        self.render();
    }

    /// Opens or creates the daily note for `date` and reports the result.
    pub fn on_day_selected(&self, date: &str) -> Result<NoteOutcome> {
        match open_or_create(self.store.as_ref(), date, self.template) {
            Ok(outcome) => {
                let message = match &outcome {
                    NoteOutcome::Created(doc) => format!("Created {}", doc.name),
                    NoteOutcome::Opened(doc) => format!("Opened {}", doc.name),
                };
                self.show_notice(NoticeKind::Success, &message);
                Ok(outcome)
            }
            Err(err) => {
                log_error!("Daily note for {date} failed: {err:#}");
                self.show_notice(NoticeKind::Error, &format!("Error: {err:#}"));
                Err(err)
            }
        }
    }

    /// Replaces the current notice. Success notices clear themselves.
    pub fn show_notice(&self, kind: NoticeKind, message: &str) {
        let mut pending = match self.pending_clear.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = pending.take() {
            previous.cancel();
        }

        let notice = &self.elements.notice;
        notice.remove_class(NoticeKind::Success.class());
        notice.remove_class(NoticeKind::Error.class());
        notice.add_class(kind.class());
        notice.set_text(message);

        if kind == NoticeKind::Success {
            let target = notice.clone();
            *pending = self.deferred.schedule(self.notice_duration, move || {
                target.clear_text();
                target.remove_class(NoticeKind::Success.class());
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Document, MemoryDocumentStore};
    use anyhow::anyhow;
    use chrono::NaiveDate;

    struct FixedClock(NaiveDate);

    impl Clock for FixedClock {
        fn now_ms(&self) -> i64 {
            0
        }

        fn today(&self) -> NaiveDate {
            self.0
        }
    }

    struct BrokenStore;

    impl DocumentStore for BrokenStore {
        fn exists(&self, _name: &str) -> Result<bool> {
            Ok(false)
        }

        fn create(&self, _name: &str, _content: &str) -> Result<Document> {
            Err(anyhow!("permission denied"))
        }

        fn open(&self, _document: &Document) -> Result<()> {
            Ok(())
        }
    }

    fn calendar(store: Arc<dyn DocumentStore>) -> (Element, CalendarComponent) {
        let mount = Element::new("div");
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).expect("date");
        let component = CalendarComponent::new(
            &mount,
            store,
            Arc::new(FixedClock(today)),
            NoteTemplate::Checklist,
            DeferredRegistry::new(),
            Duration::from_secs(3),
        );
        (mount, component)
    }

    #[tokio::test]
    async fn renders_current_month_with_today_marked() {
        let (mount, calendar) = calendar(Arc::new(MemoryDocumentStore::new()));

        assert_eq!(calendar.cursor(), CalendarCursor::new(2026, 9));
        let today = mount.find_by_class("today");
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].attr("data-date").as_deref(), Some("2026-10-18"));
        assert_eq!(mount.find_by_class("calendar-day").len(), 31);
        assert_eq!(mount.find_by_class("calendar-blank").len(), 3 + 1);
        assert!(mount.to_html().contains("October 2026"));
    }

    #[tokio::test]
    async fn navigation_rerenders_whole_grid() {
        let (mount, calendar) = calendar(Arc::new(MemoryDocumentStore::new()));

        calendar.navigate(1);
        assert_eq!(calendar.cursor(), CalendarCursor::new(2026, 10));
        assert_eq!(mount.find_by_class("calendar-day").len(), 30);
        assert!(mount.find_by_class("today").is_empty());
        let weeks = calendar.grid().find_by_class("calendar-week");
        assert_eq!(weeks.len(), 6);
        assert!(weeks.iter().all(|week| week.children().len() == 7));
        assert_eq!(weeks[0].find_by_class("calendar-blank").len(), 6);

        calendar.navigate(-1);
        calendar.navigate(-1);
        assert_eq!(calendar.cursor(), CalendarCursor::new(2026, 8));

        calendar.go_to_today();
        assert_eq!(calendar.cursor(), CalendarCursor::new(2026, 9));
        assert_eq!(mount.find_by_class("today").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn success_notice_clears_after_delay() {
        let store = Arc::new(MemoryDocumentStore::new());
        let (_mount, calendar) = calendar(store.clone());

        let outcome = calendar.on_day_selected("2026-10-18").expect("created");
        assert!(matches!(outcome, NoteOutcome::Created(_)));
        assert_eq!(store.opened(), vec!["2026-10-18.md".to_string()]);
        assert!(calendar.notice().has_class("notice-success"));
        assert_eq!(calendar.notice().text().as_deref(), Some("Created 2026-10-18.md"));

        tokio::time::sleep(Duration::from_millis(3100)).await;
        assert_eq!(calendar.notice().text(), None);
        assert!(!calendar.notice().has_class("notice-success"));
    }

    #[tokio::test(start_paused = true)]
    async fn second_click_opens_existing_note() {
        let store = Arc::new(MemoryDocumentStore::new());
        let (_mount, calendar) = calendar(store.clone());

        calendar.on_day_selected("2026-10-18").expect("created");
        let outcome = calendar.on_day_selected("2026-10-18").expect("opened");

        assert!(matches!(outcome, NoteOutcome::Opened(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.opened().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_shows_persistent_error() {
        let (_mount, calendar) = calendar(Arc::new(BrokenStore));

        assert!(calendar.on_day_selected("2026-10-18").is_err());
        let text = calendar.notice().text().unwrap_or_default();
        assert!(calendar.notice().has_class("notice-error"));
        assert!(text.contains("permission denied"), "{text}");

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(calendar.notice().has_class("notice-error"));
        assert!(calendar.notice().text().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn error_replaces_pending_success_clear() {
        let store = Arc::new(MemoryDocumentStore::new());
        let (_mount, calendar) = calendar(store);

        calendar.on_day_selected("2026-10-18").expect("created");
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(calendar.on_day_selected("not-a-date").is_err());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(calendar.notice().has_class("notice-error"));
        assert!(!calendar.notice().has_class("notice-success"));
    }
}
