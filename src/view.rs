use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    audio::{default_cue_player, CuePlayer},
    calendar::CalendarComponent,
    clock::{Clock, SystemClock},
    config::WidgetConfig,
    deferred::DeferredRegistry,
    host::DocumentStore,
    log_debug, log_info,
    tasks::{TaskComponent, TaskId},
    timer::TimerController,
    ui::Element,
};

const ENABLE_LOGS: bool = true;

/// Host services a view depends on.
#[derive(Clone)]
pub struct Collaborators {
    pub documents: Arc<dyn DocumentStore>,
    pub cue: Arc<dyn CuePlayer>,
    pub clock: Arc<dyn Clock>,
}

impl Collaborators {
    /// System clock and the default cue player.
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self {
            documents,
            cue: default_cue_player(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_cue(mut self, cue: Arc<dyn CuePlayer>) -> Self {
        self.cue = cue;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// A user interaction, named after the `data-action` attribute of the
/// element that produced it.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum WidgetAction {
    CalendarPrev,
    CalendarNext,
    CalendarToday,
    SelectDay {
        date: String,
    },
    TimerStart,
    TimerPause,
    TimerReset,
    #[serde(rename_all = "camelCase")]
    ApplySettings {
        work_minutes: u32,
        break_minutes: u32,
    },
    AddTask {
        text: String,
    },
    ToggleTask {
        id: TaskId,
    },
    DeleteTask {
        id: TaskId,
    },
}

struct Components {
    calendar: CalendarComponent,
    timer: TimerController,
    tasks: TaskComponent,
}

/// The panel the host opens. Owns all three components and everything they
/// schedule; closing it stops the timer and drops every pending action.
pub struct WidgetView {
    id: Uuid,
    mount: Element,
    config: WidgetConfig,
    collaborators: Collaborators,
    deferred: DeferredRegistry,
    components: Option<Components>,
}

impl WidgetView {
    pub fn new(mount: Element, config: WidgetConfig, collaborators: Collaborators) -> Self {
        Self {
            id: Uuid::new_v4(),
            mount,
            config,
            collaborators,
            deferred: DeferredRegistry::new(),
            components: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mount(&self) -> &Element {
        &self.mount
    }

    pub fn is_open(&self) -> bool {
        self.components.is_some()
    }

    /// Builds the components into the mount element. Reopening an open view
    /// closes it first, so state starts fresh.
    pub async fn on_open(&mut self) {
        if self.is_open() {
            self.on_close().await;
        }

        self.deferred = DeferredRegistry::new();
        self.mount.empty();
        self.mount.add_class("daypanel-view");

        let calendar = CalendarComponent::new(
            &self.mount,
            self.collaborators.documents.clone(),
            self.collaborators.clock.clone(),
            self.config.note_template,
            self.deferred.child(),
            self.config.notice_duration(),
        );
        let timer = TimerController::new(
            &self.mount,
            &self.config,
            self.collaborators.clock.clone(),
            self.collaborators.cue.clone(),
            self.deferred.child(),
        );
        let tasks = TaskComponent::new(&self.mount);

        self.components = Some(Components {
            calendar,
            timer,
            tasks,
        });
        log_info!("view {} opened", self.id);
    }

    /// Stops the timer, cancels every deferred action and clears the mount.
    pub async fn on_close(&mut self) {
        let Some(components) = self.components.take() else {
            return;
        };
        self.deferred.cancel_all();
        components.timer.shutdown().await;
        self.mount.empty();
        log_info!("view {} closed", self.id);
    }

    pub fn calendar(&self) -> Option<&CalendarComponent> {
        self.components.as_ref().map(|c| &c.calendar)
    }

    pub fn timer(&self) -> Option<&TimerController> {
        self.components.as_ref().map(|c| &c.timer)
    }

    pub fn tasks(&self) -> Option<&TaskComponent> {
        self.components.as_ref().map(|c| &c.tasks)
    }

    /// Routes a user interaction to its component.
    ///
    /// Failures a user should see (such as a daily note that cannot be
    /// created) end up in the component's notice, not in the returned error.
    pub async fn dispatch(&self, action: WidgetAction) -> Result<()> {
        let components = self
            .components
            .as_ref()
            .ok_or_else(|| anyhow!("view {} is not open", self.id))?;
        log_debug!("view {} handling {:?}", self.id, action);

        match action {
            WidgetAction::CalendarPrev => components.calendar.navigate(-1),
            WidgetAction::CalendarNext => components.calendar.navigate(1),
            WidgetAction::CalendarToday => components.calendar.go_to_today(),
            WidgetAction::SelectDay { date } => {
                if let Err(err) = components.calendar.on_day_selected(&date) {
                    log_debug!("day {date} reported to user: {err:#}");
                }
            }
            WidgetAction::TimerStart => {
                components.timer.start().await;
            }
            WidgetAction::TimerPause => {
                components.timer.pause().await;
            }
            WidgetAction::TimerReset => components.timer.reset().await,
            WidgetAction::ApplySettings {
                work_minutes,
                break_minutes,
            } => {
                components
                    .timer
                    .apply_settings(work_minutes, break_minutes)
                    .await;
            }
            WidgetAction::AddTask { text } => {
                components.tasks.add(&text);
            }
            WidgetAction::ToggleTask { id } => {
                components.tasks.toggle(id);
            }
            WidgetAction::DeleteTask { id } => {
                components.tasks.delete(id);
            }
        }
        Ok(())
    }

    /// [`dispatch`](Self::dispatch) for hosts that forward events as JSON,
    /// e.g. `{"action":"addTask","text":"buy milk"}`.
    pub async fn dispatch_json(&self, payload: &str) -> Result<()> {
        let action: WidgetAction =
            serde_json::from_str(payload).with_context(|| format!("unrecognised action {payload}"))?;
        self.dispatch(action).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        audio::SilentCuePlayer,
        clock::MonotonicClock,
        host::MemoryDocumentStore,
        timer::{Phase, TimerStatus},
    };
    use std::time::Duration;

    fn view(store: Arc<MemoryDocumentStore>, config: WidgetConfig) -> WidgetView {
        let collaborators = Collaborators::new(store)
            .with_cue(Arc::new(SilentCuePlayer))
            .with_clock(Arc::new(MonotonicClock::new()));
        WidgetView::new(Element::new("div"), config, collaborators)
    }

    #[test]
    fn actions_parse_from_json() {
        let action: WidgetAction =
            serde_json::from_str(r#"{"action":"applySettings","workMinutes":25,"breakMinutes":5}"#)
                .expect("parse");
        assert_eq!(
            action,
            WidgetAction::ApplySettings {
                work_minutes: 25,
                break_minutes: 5
            }
        );
        let action: WidgetAction =
            serde_json::from_str(r#"{"action":"toggleTask","id":3}"#).expect("parse");
        assert_eq!(action, WidgetAction::ToggleTask { id: TaskId(3) });
    }

    #[tokio::test(start_paused = true)]
    async fn open_builds_all_components() {
        let mut view = view(Arc::new(MemoryDocumentStore::new()), WidgetConfig::default());
        assert!(!view.is_open());

        view.on_open().await;
        assert!(view.is_open());
        let mount = view.mount();
        assert_eq!(mount.find_by_class("daypanel-calendar").len(), 1);
        assert_eq!(mount.find_by_class("daypanel-timer").len(), 1);
        assert_eq!(mount.find_by_class("daypanel-tasks").len(), 1);
        assert!(mount.to_html().contains("40:00"));

        view.on_close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_routes_to_components() {
        let store = Arc::new(MemoryDocumentStore::new());
        let mut view = view(store.clone(), WidgetConfig::default());
        view.on_open().await;

        view.dispatch_json(r#"{"action":"addTask","text":"buy milk"}"#)
            .await
            .expect("add");
        view.dispatch(WidgetAction::ToggleTask { id: TaskId(1) })
            .await
            .expect("toggle");
        let tasks = view.tasks().expect("open").snapshot();
        assert_eq!(tasks.total, 1);
        assert_eq!(tasks.completed, 1);

        view.dispatch(WidgetAction::SelectDay {
            date: "2026-10-18".into(),
        })
        .await
        .expect("select");
        assert!(store.exists("2026-10-18.md").expect("exists"));

        let before = view.calendar().expect("open").cursor();
        view.dispatch(WidgetAction::CalendarNext).await.expect("next");
        view.dispatch(WidgetAction::CalendarPrev).await.expect("prev");
        assert_eq!(view.calendar().expect("open").cursor(), before);

        view.dispatch(WidgetAction::ApplySettings {
            work_minutes: 25,
            break_minutes: 5,
        })
        .await
        .expect("settings");
        let snap = view.timer().expect("open").snapshot().await;
        assert_eq!(snap.remaining_secs, 1500);
        assert_eq!(snap.phase, Phase::Work);

        view.on_close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_note_is_reported_in_view_not_as_error() {
        let mut view = view(Arc::new(MemoryDocumentStore::new()), WidgetConfig::default());
        view.on_open().await;

        view.dispatch(WidgetAction::SelectDay {
            date: "yesterday".into(),
        })
        .await
        .expect("handled");
        assert!(view
            .calendar()
            .expect("open")
            .notice()
            .has_class("notice-error"));
        view.on_close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn close_stops_timer_and_pending_actions() {
        let config = WidgetConfig {
            work_minutes: 1,
            break_minutes: 1,
            ..WidgetConfig::default()
        };
        let mut view = view(Arc::new(MemoryDocumentStore::new()), config);
        view.on_open().await;
        let timer = view.timer().expect("open").clone();

        view.dispatch(WidgetAction::TimerStart).await.expect("start");
        tokio::time::sleep(Duration::from_millis(60_500)).await;
        assert_eq!(timer.snapshot().await.status, TimerStatus::Completed);

        view.on_close().await;
        assert!(!view.is_open());
        assert!(view.mount().children().is_empty());

        tokio::time::sleep(Duration::from_secs(10)).await;
        let snap = timer.snapshot().await;
        assert_eq!(snap.status, TimerStatus::Completed);
        assert_eq!(snap.remaining_secs, 60);
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_requires_open_view() {
        let view = view(Arc::new(MemoryDocumentStore::new()), WidgetConfig::default());
        assert!(view.dispatch(WidgetAction::TimerStart).await.is_err());
        assert!(view.dispatch_json(r#"{"action":"explode"}"#).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn reopening_starts_fresh_and_views_are_independent() {
        let store = Arc::new(MemoryDocumentStore::new());
        let mut first = view(store.clone(), WidgetConfig::default());
        let mut second = view(store, WidgetConfig::default());
        first.on_open().await;
        second.on_open().await;
        assert_ne!(first.id(), second.id());

        first.tasks().expect("open").add("only in first");
        assert_eq!(second.tasks().expect("open").snapshot().total, 0);

        first.on_open().await;
        assert_eq!(first.tasks().expect("open").snapshot().total, 0);
        assert!(first.timer().expect("open").start().await);

        first.on_close().await;
        second.on_close().await;
    }
}
