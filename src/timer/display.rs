use serde::Serialize;

use super::{format_clock, Phase, TimerState, TimerStatus};
use crate::{
    config::{BREAK_MINUTES_RANGE, WORK_MINUTES_RANGE},
    ui::Element,
};

/// Everything a host needs to draw the timer.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub status: TimerStatus,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub progress: f64,
    pub clock: String,
    pub status_text: String,
    pub work_minutes: u64,
    pub break_minutes: u64,
}

impl From<&TimerState> for TimerSnapshot {
    fn from(state: &TimerState) -> Self {
        Self {
            phase: state.phase,
            status: state.status,
            remaining_secs: state.remaining_secs,
            total_secs: state.phase_total_secs(),
            progress: state.progress(),
            clock: format_clock(state.remaining_secs),
            status_text: status_text(state).to_string(),
            work_minutes: state.work_secs / 60,
            break_minutes: state.break_secs / 60,
        }
    }
}

fn status_text(state: &TimerState) -> &'static str {
    match (state.status, state.phase) {
        (TimerStatus::Ready, _) => "Ready",
        (TimerStatus::Paused, _) => "Paused",
        (TimerStatus::Running, Phase::Work) => "Working…",
        (TimerStatus::Running, Phase::Break) => "On break…",
        // The phase has already flipped.
        (TimerStatus::Completed, Phase::Break) => "Work complete! Break starts soon.",
        (TimerStatus::Completed, Phase::Work) => "Break over! Back to work soon.",
    }
}

/// Handles to the timer's own elements.
#[derive(Clone)]
pub struct TimerDisplay {
    phase_label: Element,
    clock: Element,
    status: Element,
    progress_bar: Element,
    work_input: Element,
    break_input: Element,
}

impl TimerDisplay {
    pub fn build(parent: &Element) -> Self {
        let root = parent.create_child_with_class("div", "daypanel-timer");

        let phase_label = root.create_child_with_class("div", "timer-phase");
        let clock = root.create_child_with_class("div", "timer-clock");
        let status = root.create_child_with_class("div", "timer-status");

        let track = root.create_child_with_class("div", "timer-progress");
        let progress_bar = track.create_child_with_class("div", "timer-progress-bar");

        let controls = root.create_child_with_class("div", "timer-controls");
        for (action, label) in [
            ("timerStart", "Start"),
            ("timerPause", "Pause"),
            ("timerReset", "Reset"),
        ] {
            let button = controls.create_child_with_class("button", "timer-button");
            button.set_attr("data-action", action);
            button.set_text(label);
        }

        let settings = root.create_child_with_class("div", "timer-settings");
        let work_input = minutes_input(&settings, "Work (min)", "timer-work-minutes", WORK_MINUTES_RANGE);
        let break_input =
            minutes_input(&settings, "Break (min)", "timer-break-minutes", BREAK_MINUTES_RANGE);
        let save = settings.create_child_with_class("button", "timer-settings-save");
        save.set_attr("data-action", "applySettings");
        save.set_text("Save");

        Self {
            phase_label,
            clock,
            status,
            progress_bar,
            work_input,
            break_input,
        }
    }

    pub fn clock(&self) -> &Element {
        &self.clock
    }

    pub fn status(&self) -> &Element {
        &self.status
    }

    pub fn progress_bar(&self) -> &Element {
        &self.progress_bar
    }

    pub fn render(&self, snapshot: &TimerSnapshot) {
        self.phase_label.set_text(match snapshot.phase {
            Phase::Work => "Work",
            Phase::Break => "Break",
        });
        self.clock.set_text(snapshot.clock.clone());
        self.status.set_text(snapshot.status_text.clone());

        self.progress_bar
            .set_style("width", format!("{:.1}%", snapshot.progress * 100.0));
        self.progress_bar
            .toggle_class("phase-work", snapshot.phase == Phase::Work);
        self.progress_bar
            .toggle_class("phase-break", snapshot.phase == Phase::Break);

        self.work_input
            .set_attr("value", snapshot.work_minutes.to_string());
        self.break_input
            .set_attr("value", snapshot.break_minutes.to_string());
    }
}

fn minutes_input(parent: &Element, label: &str, class: &str, (min, max): (u32, u32)) -> Element {
    let wrapper = parent.create_child_with_class("label", "timer-setting");
    wrapper.create_child("span").set_text(label);
    let input = wrapper.create_child_with_class("input", class);
    input.set_attr("type", "number");
    input.set_attr("min", min.to_string());
    input.set_attr("max", max.to_string());
    input
}
