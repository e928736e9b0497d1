use std::f32::consts::PI;
use std::time::Duration;

use super::ToneCue;

const SAMPLE_RATE: u32 = 44100;

/// Finite mono sine tone with an exponential gain ramp.
///
/// Gain at time `t` is `start * (end / start)^(t / duration)`, the same curve an
/// exponential ramp between two gain values produces.
pub struct ChimeTone {
    frequency_hz: f32,
    start_gain: f32,
    gain_ratio: f32,
    sample_rate: u32,
    total_samples: usize,
    num_sample: usize,
}

impl ChimeTone {
    pub fn new(cue: &ToneCue) -> Self {
        let total_samples =
            (u64::from(SAMPLE_RATE) * cue.duration_ms / 1000).max(1) as usize;
        Self {
            frequency_hz: cue.frequency_hz,
            start_gain: cue.start_gain,
            gain_ratio: cue.end_gain / cue.start_gain,
            sample_rate: SAMPLE_RATE,
            total_samples,
            num_sample: 0,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.total_samples as f64 / f64::from(self.sample_rate))
    }

    fn gain_at(&self, sample: usize) -> f32 {
        let progress = sample as f32 / self.total_samples as f32;
        self.start_gain * self.gain_ratio.powf(progress)
    }
}

impl Iterator for ChimeTone {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_sample >= self.total_samples {
            return None;
        }
        let t = self.num_sample as f32 / self.sample_rate as f32;
        let sample = (2.0 * PI * self.frequency_hz * t).sin() * self.gain_at(self.num_sample);
        self.num_sample += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total_samples - self.num_sample;
        (left, Some(left))
    }
}

impl ExactSizeIterator for ChimeTone {}

#[cfg(feature = "sound")]
impl rodio::Source for ChimeTone {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples - self.num_sample)
    }

    fn channels(&self) -> u16 {
        1 // Mono
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(self.duration())
    }
}
