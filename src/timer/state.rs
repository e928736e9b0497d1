use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Work,
    Break,
}

impl Phase {
    pub fn flipped(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Break => "break",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    /// Stopped at the full phase duration.
    #[default]
    Ready,
    Running,
    /// Stopped part way through a phase.
    Paused,
    /// A phase just ended; the next one starts after the auto-resume delay.
    Completed,
}

/// What a recomputation found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Not running, or the displayed second has not changed.
    Unchanged,
    /// The displayed second moved to this value.
    Changed(u64),
    /// Remaining time reached zero.
    Finished,
}

/// Countdown state. Every method takes the wall-clock time it should use, so
/// the state itself never reads a clock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub work_secs: u64,
    pub break_secs: u64,
    pub remaining_secs: u64,
    pub phase: Phase,
    pub status: TimerStatus,
    /// Set only while running: run start + remaining at that moment.
    pub end_timestamp_ms: Option<i64>,
}

impl TimerState {
    pub fn new(work_secs: u64, break_secs: u64) -> Self {
        Self {
            work_secs,
            break_secs,
            remaining_secs: work_secs,
            phase: Phase::Work,
            status: TimerStatus::Ready,
            end_timestamp_ms: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn duration_of(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_secs,
            Phase::Break => self.break_secs,
        }
    }

    pub fn phase_total_secs(&self) -> u64 {
        self.duration_of(self.phase)
    }

    /// Share of the current phase already used, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        let total = self.phase_total_secs();
        if total == 0 {
            return 0.0;
        }
        let used = total.saturating_sub(self.remaining_secs);
        (used as f64 / total as f64).clamp(0.0, 1.0)
    }

    /// Starts counting down from `remaining_secs`. False if already running.
    pub fn begin_run(&mut self, now_ms: i64) -> bool {
        if self.is_running() {
            return false;
        }
        if self.remaining_secs == 0 {
            self.remaining_secs = self.phase_total_secs();
        }
        self.end_timestamp_ms = Some(now_ms + self.remaining_secs as i64 * 1000);
        self.status = TimerStatus::Running;
        true
    }

    /// Re-derives the remaining second from the end timestamp.
    pub fn recompute(&mut self, now_ms: i64) -> Tick {
        let (true, Some(end)) = (self.is_running(), self.end_timestamp_ms) else {
            return Tick::Unchanged;
        };

        let remaining = ((end - now_ms) as f64 / 1000.0).round().max(0.0) as u64;
        if remaining == 0 {
            self.remaining_secs = 0;
            return Tick::Finished;
        }
        if remaining == self.remaining_secs {
            return Tick::Unchanged;
        }
        self.remaining_secs = remaining;
        Tick::Changed(remaining)
    }

    /// Stops the countdown, keeping the last computed remaining second.
    pub fn halt(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.end_timestamp_ms = None;
        self.status = if self.remaining_secs >= self.phase_total_secs() {
            TimerStatus::Ready
        } else {
            TimerStatus::Paused
        };
        true
    }

    /// Back to a full work phase, not running.
    pub fn reset(&mut self) {
        self.end_timestamp_ms = None;
        self.phase = Phase::Work;
        self.remaining_secs = self.work_secs;
        self.status = TimerStatus::Ready;
    }

    /// Ends the current phase and loads the other one in full.
    pub fn advance_phase(&mut self) -> Phase {
        self.end_timestamp_ms = None;
        self.phase = self.phase.flipped();
        self.remaining_secs = self.phase_total_secs();
        self.status = TimerStatus::Completed;
        self.phase
    }

    /// Replaces both durations.
    ///
    /// Stopped: remaining is reloaded from the new duration. Running: the end
    /// timestamp is kept, so time already used stays used, unless the new
    /// duration is shorter than what is left, in which case the end is pulled
    /// in to `now + new duration`.
    pub fn apply_durations(&mut self, work_secs: u64, break_secs: u64, now_ms: i64) {
        self.work_secs = work_secs;
        self.break_secs = break_secs;
        let total = self.phase_total_secs();

        if self.is_running() {
            if self.remaining_secs > total {
                self.remaining_secs = total;
                self.end_timestamp_ms = Some(now_ms + total as i64 * 1000);
            }
        } else {
            self.remaining_secs = total;
            if self.status == TimerStatus::Paused {
                self.status = TimerStatus::Ready;
            }
        }
    }
}

/// `MM:SS`, with minutes allowed past 59.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
