use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
    time::Duration,
};

use crate::{audio::ToneCue, notes::NoteTemplate};

pub const DEBUG_ENV: &str = "DAYPANEL_DEBUG";

pub const WORK_MINUTES_RANGE: (u32, u32) = (1, 180);
pub const BREAK_MINUTES_RANGE: (u32, u32) = (1, 60);

const MIN_TICK_INTERVAL_MS: u64 = 16;
const DEBUG_TICK_INTERVAL_MS: u64 = 100;

/// True when `DAYPANEL_DEBUG` is `1` or `true`.
pub fn debug_enabled() -> bool {
    std::env::var(DEBUG_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub fn clamp_work_minutes(minutes: u32) -> u32 {
    minutes.clamp(WORK_MINUTES_RANGE.0, WORK_MINUTES_RANGE.1)
}

pub fn clamp_break_minutes(minutes: u32) -> u32 {
    minutes.clamp(BREAK_MINUTES_RANGE.0, BREAK_MINUTES_RANGE.1)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CueSettings {
    pub enabled: bool,
    pub frequency_hz: f32,
    pub duration_ms: u64,
    pub start_gain: f32,
    pub end_gain: f32,
}

impl Default for CueSettings {
    fn default() -> Self {
        let tone = ToneCue::default();
        Self {
            enabled: true,
            frequency_hz: tone.frequency_hz,
            duration_ms: tone.duration_ms,
            start_gain: tone.start_gain,
            end_gain: tone.end_gain,
        }
    }
}

impl CueSettings {
    pub fn tone(&self) -> ToneCue {
        ToneCue {
            frequency_hz: self.frequency_hz,
            duration_ms: self.duration_ms,
            start_gain: self.start_gain,
            end_gain: self.end_gain,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub tick_interval_ms: u64,
    pub auto_resume_delay_ms: u64,
    pub notice_duration_ms: u64,
    pub note_template: NoteTemplate,
    pub cue: CueSettings,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            work_minutes: 40,
            break_minutes: 5,
            tick_interval_ms: 250,
            auto_resume_delay_ms: 2_000,
            notice_duration_ms: 3_000,
            note_template: NoteTemplate::default(),
            cue: CueSettings::default(),
        }
    }
}

impl WidgetConfig {
    pub fn from_json(contents: &str) -> Result<Self> {
        let mut config: WidgetConfig =
            serde_json::from_str(contents).context("invalid widget config JSON")?;
        config.sanitize();
        Ok(config)
    }

    /// Pulls out-of-range values back to something the widget can run with.
    pub fn sanitize(&mut self) {
        self.work_minutes = clamp_work_minutes(self.work_minutes);
        self.break_minutes = clamp_break_minutes(self.break_minutes);
        if self.tick_interval_ms < MIN_TICK_INTERVAL_MS {
            self.tick_interval_ms = MIN_TICK_INTERVAL_MS;
        }
        if self.cue.start_gain.is_nan() || self.cue.start_gain <= 0.0 {
            self.cue.start_gain = ToneCue::default().start_gain;
        }
        if self.cue.end_gain.is_nan() || self.cue.end_gain <= 0.0 {
            self.cue.end_gain = ToneCue::default().end_gain;
        }
    }

    /// Applies `DAYPANEL_DEBUG`: a faster tick for watching the timer.
    pub fn apply_env_overrides(&mut self) {
        if debug_enabled() {
            self.tick_interval_ms = self.tick_interval_ms.min(DEBUG_TICK_INTERVAL_MS);
        }
    }

    pub fn work_secs(&self) -> u64 {
        u64::from(self.work_minutes) * 60
    }

    pub fn break_secs(&self) -> u64 {
        u64::from(self.break_minutes) * 60
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn auto_resume_delay(&self) -> Duration {
        Duration::from_millis(self.auto_resume_delay_ms)
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }
}

/// Read-only view of a host-provided config file.
///
/// The widget never writes settings back; changes made through the timer's
/// settings form last for the lifetime of the view.
pub struct ConfigStore {
    path: PathBuf,
    data: RwLock<WidgetConfig>,
}

impl ConfigStore {
    /// Loads `path` if it exists, otherwise starts from defaults.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = read_config(&path)?;
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> WidgetConfig {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn reload(&self) -> Result<()> {
        let data = read_config(&self.path)?;
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = data;
        Ok(())
    }
}

fn read_config(path: &Path) -> Result<WidgetConfig> {
    let mut config = if path.exists() {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        WidgetConfig::from_json(&contents)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?
    } else {
        WidgetConfig::default()
    };
    config.apply_env_overrides();
    Ok(config)
}
