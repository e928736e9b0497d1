use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use super::{
    display::{TimerDisplay, TimerSnapshot},
    Phase, Tick, TimerState, TimerStatus,
};
use crate::{
    audio::{CuePlayer, ToneCue},
    clock::Clock,
    config::{clamp_break_minutes, clamp_work_minutes, WidgetConfig},
    deferred::{Deferred, DeferredRegistry},
    log_debug, log_info, log_warn,
    ui::Element,
};

const ENABLE_LOGS: bool = true;

type ResumeFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Owns the countdown, its ticker task and the pending auto-resume.
///
/// At most one ticker runs per controller. `pause`, `reset` and `shutdown`
/// abort it; a finished phase lets it exit on its own.
#[derive(Clone)]
pub struct TimerController {
    state: Arc<Mutex<TimerState>>,
    display: TimerDisplay,
    clock: Arc<dyn Clock>,
    cue: Arc<dyn CuePlayer>,
    tone: Option<ToneCue>,
    deferred: DeferredRegistry,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    pending_resume: Arc<Mutex<Option<Deferred>>>,
    tick_interval: Duration,
    resume_delay: Duration,
}

impl TimerController {
    pub fn new(
        parent: &Element,
        config: &WidgetConfig,
        clock: Arc<dyn Clock>,
        cue: Arc<dyn CuePlayer>,
        deferred: DeferredRegistry,
    ) -> Self {
        let state = TimerState::new(config.work_secs(), config.break_secs());
        let display = TimerDisplay::build(parent);
        display.render(&TimerSnapshot::from(&state));

        Self {
            state: Arc::new(Mutex::new(state)),
            display,
            clock,
            cue,
            tone: config.cue.enabled.then(|| config.cue.tone()),
            deferred,
            ticker: Arc::new(Mutex::new(None)),
            pending_resume: Arc::new(Mutex::new(None)),
            tick_interval: config.tick_interval().max(Duration::from_millis(1)),
            resume_delay: config.auto_resume_delay(),
        }
    }

    pub fn display(&self) -> &TimerDisplay {
        &self.display
    }

    pub async fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::from(&*self.state.lock().await)
    }

    /// Starts or resumes the current phase. False if already running or the
    /// view has been closed.
    pub async fn start(&self) -> bool {
        self.begin(false).await
    }

    /// `resuming` runs only from the auto-resume, and only while the finished
    /// phase is still waiting to roll over.
    async fn begin(&self, resuming: bool) -> bool {
        let snapshot = {
            let mut state = self.state.lock().await;
            if self.deferred.is_cancelled() {
                log_debug!("ignoring start after view close");
                return false;
            }
            if resuming && state.status != TimerStatus::Completed {
                return false;
            }
            if !state.begin_run(self.clock.now_ms()) {
                return false;
            }
            self.cancel_pending_resume().await;
            TimerSnapshot::from(&*state)
        };

        if !self.spawn_ticker().await {
            self.state.lock().await.halt();
            return false;
        }
        self.display.render(&snapshot);

        log_info!(
            "{} phase running, {}s left",
            snapshot.phase.as_str(),
            snapshot.remaining_secs
        );
        true
    }

    /// Stops the countdown at the last displayed second. During the
    /// auto-resume delay it also cancels the pending restart.
    pub async fn pause(&self) -> bool {
        let snapshot = {
            let mut state = self.state.lock().await;
            self.cancel_pending_resume().await;
            if !state.halt() {
                if state.status != TimerStatus::Completed {
                    return false;
                }
                state.status = TimerStatus::Ready;
            }
            TimerSnapshot::from(&*state)
        };

        self.cancel_ticker().await;
        self.display.render(&snapshot);
        log_info!("timer paused at {}s", snapshot.remaining_secs);
        true
    }

    /// Stops and returns to a full work phase.
    pub async fn reset(&self) {
        let snapshot = {
            let mut state = self.state.lock().await;
            self.cancel_pending_resume().await;
            state.reset();
            TimerSnapshot::from(&*state)
        };

        self.cancel_ticker().await;
        self.display.render(&snapshot);
        log_info!("timer reset");
    }

    /// Updates phase durations from the settings form, clamped to the
    /// accepted ranges.
    pub async fn apply_settings(&self, work_minutes: u32, break_minutes: u32) -> TimerSnapshot {
        let work_minutes = clamp_work_minutes(work_minutes);
        let break_minutes = clamp_break_minutes(break_minutes);

        let snapshot = {
            let mut state = self.state.lock().await;
            state.apply_durations(
                u64::from(work_minutes) * 60,
                u64::from(break_minutes) * 60,
                self.clock.now_ms(),
            );
            TimerSnapshot::from(&*state)
        };

        self.display.render(&snapshot);
        log_info!("timer settings: {work_minutes}m work / {break_minutes}m break");
        snapshot
    }

    /// Stops everything this controller scheduled. Used on view close.
    pub async fn shutdown(&self) {
        {
            let mut state = self.state.lock().await;
            self.cancel_pending_resume().await;
            state.halt();
        }
        self.cancel_ticker().await;
    }

    /// False once the view is closed; no ticker is left behind.
    async fn spawn_ticker(&self) -> bool {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }
        if self.deferred.is_cancelled() {
            return false;
        }

        let this = self.clone();
        *ticker_guard = Some(tokio::spawn(this.run_ticker()));
        true
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    // Callers hold the state lock, so a restart is never scheduled between
    // a status check and this cancel.
    async fn cancel_pending_resume(&self) {
        if let Some(resume) = self.pending_resume.lock().await.take() {
            resume.cancel();
        }
    }

    async fn run_ticker(self) {
        let mut interval = time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;

            let outcome = {
                let mut guard = self.state.lock().await;
                if !guard.is_running() {
                    break;
                }
                match guard.recompute(self.clock.now_ms()) {
                    Tick::Unchanged => None,
                    Tick::Changed(_) => Some((TimerSnapshot::from(&*guard), false)),
                    Tick::Finished => {
                        guard.halt();
                        guard.advance_phase();
                        *self.pending_resume.lock().await = self
                            .deferred
                            .schedule_async(self.resume_delay, self.auto_resume());
                        Some((TimerSnapshot::from(&*guard), true))
                    }
                }
            };

            match outcome {
                None => continue,
                Some((snapshot, false)) => self.display.render(&snapshot),
                Some((snapshot, true)) => {
                    self.complete(&snapshot);
                    break;
                }
            }
        }
    }

    fn complete(&self, snapshot: &TimerSnapshot) {
        let finished = snapshot.phase.flipped();
        log_info!(
            "{} phase complete; {} starts in {:?}",
            finished.as_str(),
            snapshot.phase.as_str(),
            self.resume_delay
        );

        self.display.render(snapshot);
        self.play_cue();
    }

    fn auto_resume(&self) -> ResumeFuture {
        let this = self.clone();
        Box::pin(async move {
            let phase = this.state.lock().await.phase;
            if this.begin(true).await {
                log_debug!("auto-resumed into {} phase", phase.as_str());
            }
        })
    }

    fn play_cue(&self) {
        let Some(tone) = self.tone else {
            return;
        };
        if let Err(err) = self.cue.play(&tone) {
            log_warn!("Phase cue failed: {err:#}");
        }
    }

    pub async fn phase(&self) -> Phase {
        self.state.lock().await.phase
    }
}
