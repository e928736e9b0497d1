pub mod chime;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use chime::ChimeTone;

/// A short sine tone played when a timer phase ends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToneCue {
    pub frequency_hz: f32,
    pub duration_ms: u64,
    pub start_gain: f32,
    pub end_gain: f32,
}

impl Default for ToneCue {
    fn default() -> Self {
        Self {
            frequency_hz: 800.0,
            duration_ms: 500,
            start_gain: 0.3,
            end_gain: 0.01,
        }
    }
}

/// Audible-cue device. Errors are reported to the caller, which logs and
/// drops them; a missing sound never blocks the timer.
pub trait CuePlayer: Send + Sync {
    fn play(&self, cue: &ToneCue) -> Result<()>;
}

/// Player for hosts without an audio device.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCuePlayer;

impl CuePlayer for SilentCuePlayer {
    fn play(&self, _cue: &ToneCue) -> Result<()> {
        Ok(())
    }
}

/// Rodio-backed player when built with `sound`, silent otherwise.
#[cfg(feature = "sound")]
pub fn default_cue_player() -> Arc<dyn CuePlayer> {
    Arc::new(engine::RodioCuePlayer::new())
}

/// Rodio-backed player when built with `sound`, silent otherwise.
#[cfg(not(feature = "sound"))]
pub fn default_cue_player() -> Arc<dyn CuePlayer> {
    Arc::new(SilentCuePlayer)
}

#[cfg(feature = "sound")]
pub use engine::RodioCuePlayer;

#[cfg(feature = "sound")]
mod engine {
    use anyhow::{anyhow, Context, Result};
    use log::warn;
    use rodio::{OutputStream, Sink};
    use std::sync::{mpsc, Mutex};

    use super::{ChimeTone, CuePlayer, ToneCue};

    /// Output device opened on first use. The stream must outlive the sink.
    #[derive(Default)]
    struct CueOutput {
        device: Option<(OutputStream, Sink)>,
    }

    impl CueOutput {
        fn sink(&mut self) -> Result<&Sink> {
            if self.device.is_none() {
                let (stream, handle) =
                    OutputStream::try_default().context("no default audio output")?;
                let sink = Sink::try_new(&handle).context("audio sink unavailable")?;
                self.device = Some((stream, sink));
            }
            self.device
                .as_ref()
                .map(|(_, sink)| sink)
                .ok_or_else(|| anyhow!("audio output missing"))
        }

        fn play(&mut self, cue: &ToneCue) {
            let played = self.sink().map(|sink| {
                sink.append(ChimeTone::new(cue));
                sink.play();
            });
            if let Err(err) = played {
                warn!("Skipping phase cue: {err:#}");
                // Retry the device on the next cue.
                self.device = None;
            }
        }
    }

    /// Plays cues on a dedicated thread that owns the non-`Send` output stream.
    #[derive(Default)]
    pub struct RodioCuePlayer {
        queue: Mutex<Option<mpsc::Sender<ToneCue>>>,
    }

    impl RodioCuePlayer {
        pub fn new() -> Self {
            Self::default()
        }

        fn queue(&self) -> Result<mpsc::Sender<ToneCue>> {
            let mut slot = self
                .queue
                .lock()
                .map_err(|e| anyhow!("cue queue lock poisoned: {e}"))?;
            if let Some(queue) = slot.as_ref() {
                return Ok(queue.clone());
            }

            let (queue, cues) = mpsc::channel::<ToneCue>();
            std::thread::Builder::new()
                .name("daypanel-cue".to_string())
                .spawn(move || {
                    let mut output = CueOutput::default();
                    for cue in cues {
                        output.play(&cue);
                    }
                })
                .context("failed to spawn cue thread")?;

            *slot = Some(queue.clone());
            Ok(queue)
        }
    }

    impl CuePlayer for RodioCuePlayer {
        fn play(&self, cue: &ToneCue) -> Result<()> {
            self.queue()?
                .send(*cue)
                .map_err(|_| anyhow!("cue thread has exited"))
        }
    }
}
