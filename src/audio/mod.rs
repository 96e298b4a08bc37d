//! Audio seam for the game core
//!
//! The core never touches an audio device. It hands decoded speech buffers to
//! an [`AudioOutput`] at precise start times and reads back that output's
//! clock; short effect clips are requested as [`SoundEffect`] cues.

pub mod scheduler;

pub use scheduler::{AudioScheduler, SchedulerTiming};

/// Sample rate of streamed commentary speech
pub const SPEECH_SAMPLE_RATE: u32 = 24_000;

/// Sound effect clips played by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball struck by the bat
    BatHit,
    /// Stumps broken
    Wicket,
}

/// A decoded chunk of speech
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl SpeechBuffer {
    /// Decode interleaved signed 16-bit little-endian PCM
    ///
    /// A trailing odd byte is ignored.
    pub fn from_pcm16_le(bytes: &[u8], sample_rate: u32, channels: u16) -> Self {
        let samples = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
            .collect();
        Self {
            samples,
            sample_rate: sample_rate.max(1),
            channels: channels.max(1),
        }
    }

    /// Mono silence of the given length
    pub fn silence(duration: f64, sample_rate: u32) -> Self {
        let frames = (duration.max(0.0) * sample_rate as f64).round() as usize;
        Self {
            samples: vec![0.0; frames],
            sample_rate: sample_rate.max(1),
            channels: 1,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Playback length in seconds
    pub fn duration(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }
}

/// Playback device as seen by the core
pub trait AudioOutput {
    /// Audio clock, seconds
    fn current_time(&self) -> f64;
    /// Clock is advancing and buffers will be heard
    fn is_running(&self) -> bool;
    /// Queue `buffer` to start at `when` on the audio clock
    fn start_at(&mut self, buffer: &SpeechBuffer, when: f64);
    /// Advance a host-driven clock; real devices ignore this
    fn advance(&mut self, _dt: f64) {}
}

/// A queued playback on [`VirtualOutput`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    pub start: f64,
    pub duration: f64,
}

impl Playback {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Output whose clock is driven by the engine tick
///
/// Used headless and in tests; it records what would have been played.
#[derive(Debug, Clone, Default)]
pub struct VirtualOutput {
    clock: f64,
    suspended: bool,
    queued: Vec<Playback>,
    played: usize,
}

impl VirtualOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// An output that never starts (as with a blocked audio context)
    pub fn suspended() -> Self {
        Self {
            suspended: true,
            ..Self::default()
        }
    }

    pub fn set_suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
    }

    /// Playbacks not yet finished
    pub fn queued(&self) -> &[Playback] {
        &self.queued
    }

    /// Number of playbacks that ran to completion
    pub fn played(&self) -> usize {
        self.played
    }

    /// Some buffer is audible at the current clock
    pub fn is_audible(&self) -> bool {
        self.queued
            .iter()
            .any(|p| p.start <= self.clock && self.clock < p.end())
    }
}

impl AudioOutput for VirtualOutput {
    fn current_time(&self) -> f64 {
        self.clock
    }

    fn is_running(&self) -> bool {
        !self.suspended
    }

    fn start_at(&mut self, buffer: &SpeechBuffer, when: f64) {
        self.queued.push(Playback {
            start: when,
            duration: buffer.duration(),
        });
    }

    fn advance(&mut self, dt: f64) {
        if self.suspended {
            return;
        }
        self.clock += dt;
        let clock = self.clock;
        let before = self.queued.len();
        self.queued.retain(|p| p.end() > clock);
        self.played += before - self.queued.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcm16_decode() {
        let bytes = [0x00, 0x80, 0xff, 0x7f, 0x00, 0x00, 0x01];
        let buffer = SpeechBuffer::from_pcm16_le(&bytes, SPEECH_SAMPLE_RATE, 1);
        assert_eq!(buffer.samples(), &[-1.0, 32767.0 / 32768.0, 0.0]);
        assert_eq!(buffer.frames(), 3);
    }

    #[test]
    fn test_duration_accounts_for_channels() {
        let bytes = vec![0u8; 2 * 2 * 24_000];
        let stereo = SpeechBuffer::from_pcm16_le(&bytes, 24_000, 2);
        assert!((stereo.duration() - 1.0).abs() < 1e-9);
        let mono = SpeechBuffer::from_pcm16_le(&bytes, 24_000, 1);
        assert!((mono.duration() - 2.0).abs() < 1e-9);
        assert!((SpeechBuffer::silence(0.5, 24_000).duration() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_virtual_output_tracks_playbacks() {
        let mut out = VirtualOutput::new();
        let chunk = SpeechBuffer::silence(0.25, SPEECH_SAMPLE_RATE);
        out.start_at(&chunk, 0.0);
        out.start_at(&chunk, 0.25);
        out.advance(0.1);
        assert!(out.is_audible());
        out.advance(0.2);
        assert_eq!(out.queued().len(), 1);
        assert_eq!(out.played(), 1);
        out.advance(0.3);
        assert!(!out.is_audible());
        assert_eq!(out.played(), 2);
    }

    #[test]
    fn test_suspended_output_clock_stands_still() {
        let mut out = VirtualOutput::suspended();
        assert!(!out.is_running());
        out.advance(1.0);
        assert_eq!(out.current_time(), 0.0);

        out.set_suspended(false);
        assert!(out.is_running());
        out.advance(0.5);
        assert_eq!(out.current_time(), 0.5);
    }
}
