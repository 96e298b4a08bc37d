//! Live commentary
//!
//! Gameplay emits [`CommentaryEvent`]s. The session turns each one into a
//! prompt, streams the spoken reply into the audio output back to back, and
//! tells gameplay through the [`AudioScheduler`] when the reply has been
//! heard. A failing or missing voice service only ever degrades commentary:
//! the scheduler is forced idle and gameplay moves on.

mod event;
pub mod channel;
pub mod prompt;

pub use channel::{ScriptedVoice, VoiceChannel, VoiceMessage, VoiceScript};
pub use event::{CommentaryEvent, CommentaryKind};
pub use prompt::{SYSTEM_PROMPT, build_prompt};

use thiserror::Error;

use crate::audio::{AudioOutput, AudioScheduler, SchedulerTiming, VirtualOutput};

/// Voice session failure
#[derive(Debug, Error)]
pub enum CommentaryError {
    #[error("commentary is disabled")]
    Disabled,
    #[error("audio output is not running")]
    AudioUnavailable,
    #[error("failed to connect to the voice service: {0}")]
    Connect(String),
    #[error("failed to send prompt: {0}")]
    Send(String),
    #[error("voice session is closed")]
    Closed,
}

/// What the commentary box is doing, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentaryStatus {
    #[default]
    Offline,
    Connecting,
    Ready,
    Prompting,
    Speaking,
    Closed,
    Error,
}

/// Voice session plus its playback scheduler
///
/// `C` is the continuation type gameplay parks until speech is done.
pub struct Commentary<C> {
    channel: Option<Box<dyn VoiceChannel>>,
    output: Box<dyn AudioOutput>,
    scheduler: AudioScheduler<C>,
    session_ready: bool,
    status: CommentaryStatus,
}

impl<C> Commentary<C> {
    pub fn new(
        channel: Option<Box<dyn VoiceChannel>>,
        output: Box<dyn AudioOutput>,
        timing: SchedulerTiming,
    ) -> Self {
        Self {
            channel,
            output,
            scheduler: AudioScheduler::new(timing),
            session_ready: false,
            status: CommentaryStatus::Offline,
        }
    }

    /// No voice service; continuations always run immediately
    pub fn offline(timing: SchedulerTiming) -> Self {
        Self::new(None, Box::new(VirtualOutput::new()), timing)
    }

    pub fn status(&self) -> CommentaryStatus {
        self.status
    }

    pub fn is_ready(&self) -> bool {
        self.session_ready
    }

    pub fn is_playing(&self) -> bool {
        self.scheduler.is_playing()
    }

    pub fn scheduler(&self) -> &AudioScheduler<C> {
        &self.scheduler
    }

    fn set_status(&mut self, status: CommentaryStatus) {
        if self.status != status {
            log::debug!("Commentary status {:?} -> {:?}", self.status, status);
            self.status = status;
        }
    }

    /// Open a fresh session, closing any previous one
    pub fn open_session(&mut self, now: f64) -> Result<(), CommentaryError> {
        self.close_session();
        self.scheduler.reset(self.output.current_time());

        if self.channel.is_none() {
            self.set_status(CommentaryStatus::Offline);
            return Err(CommentaryError::Disabled);
        }
        if !self.output.is_running() {
            self.set_status(CommentaryStatus::Error);
            return Err(CommentaryError::AudioUnavailable);
        }

        self.set_status(CommentaryStatus::Connecting);
        let result = match self.channel.as_mut() {
            Some(channel) => channel.connect(SYSTEM_PROMPT, now),
            None => Err(CommentaryError::Disabled),
        };
        match result {
            Ok(()) => {
                self.session_ready = true;
                self.set_status(CommentaryStatus::Ready);
                log::info!("Commentary session open");
                Ok(())
            }
            Err(e) => {
                self.set_status(CommentaryStatus::Error);
                self.scheduler.force_idle(now);
                Err(e)
            }
        }
    }

    pub fn close_session(&mut self) {
        if let Some(channel) = self.channel.as_mut() {
            if channel.is_open() {
                channel.close();
                log::info!("Commentary session closed");
            }
        }
        if self.session_ready {
            self.set_status(CommentaryStatus::Closed);
        }
        self.session_ready = false;
    }

    /// Send the prompt for `event`; false when nothing was sent
    pub fn trigger(&mut self, event: &CommentaryEvent, now: f64) -> bool {
        if !self.session_ready {
            return false;
        }
        let Some(channel) = self.channel.as_mut() else {
            return false;
        };

        let text = build_prompt(event);
        log::debug!("Commentary prompt for {}: {text}", event.kind);
        match channel.send_text(&text) {
            Ok(()) => {
                self.set_status(CommentaryStatus::Prompting);
                true
            }
            Err(e) => {
                log::warn!("Commentary send failed: {e}");
                self.set_status(CommentaryStatus::Error);
                self.scheduler.force_idle(now);
                false
            }
        }
    }

    /// Drain voice messages into the output and scheduler
    pub fn pump(&mut self, now: f64) {
        if !self.session_ready {
            return;
        }
        let Some(channel) = self.channel.as_mut() else {
            return;
        };

        for message in channel.poll(now) {
            match message {
                VoiceMessage::Audio(buffer) => {
                    if !self.output.is_running() {
                        log::warn!("Audio output stopped, dropping speech chunk");
                        continue;
                    }
                    let start = self
                        .scheduler
                        .enqueue(buffer.duration(), self.output.current_time());
                    self.output.start_at(&buffer, start);
                    self.set_status(CommentaryStatus::Speaking);
                }
                VoiceMessage::TurnComplete => {
                    self.scheduler.request_completion_check(now);
                    if self.status == CommentaryStatus::Prompting {
                        self.set_status(CommentaryStatus::Ready);
                    }
                }
                VoiceMessage::Error(reason) => {
                    log::warn!("Commentary stream error: {reason}");
                    self.session_ready = false;
                    self.set_status(CommentaryStatus::Error);
                    self.scheduler.force_idle(now);
                }
                VoiceMessage::Closed => {
                    log::info!("Commentary session closed by the service");
                    self.session_ready = false;
                    self.set_status(CommentaryStatus::Closed);
                    self.scheduler.force_idle(now);
                }
            }
        }
    }

    /// Advance a host-driven audio clock
    pub fn advance(&mut self, dt: f64) {
        self.output.advance(dt);
    }

    /// Park `continuation` until speech is done, see [`AudioScheduler`]
    pub fn schedule_continuation(&mut self, continuation: C, timeout: f64, now: f64) -> Option<C> {
        self.scheduler.schedule_continuation(continuation, timeout, now)
    }

    pub fn cancel(&mut self) {
        self.scheduler.cancel();
    }

    /// Run the completion poll and safety net; returns a released continuation
    pub fn tick(&mut self, now: f64) -> Option<C> {
        let audio_now = self
            .output
            .is_running()
            .then(|| self.output.current_time());
        let released = self.scheduler.tick(now, audio_now);

        if self.status == CommentaryStatus::Speaking && !self.scheduler.is_playing() {
            let status = if self.session_ready {
                CommentaryStatus::Ready
            } else {
                CommentaryStatus::Closed
            };
            self.set_status(status);
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Counters;

    const DT: f64 = 1.0 / 60.0;

    fn session(script: VoiceScript) -> Commentary<u32> {
        Commentary::new(
            Some(Box::new(ScriptedVoice::new(script))),
            Box::new(VirtualOutput::new()),
            SchedulerTiming::default(),
        )
    }

    fn event() -> CommentaryEvent {
        let mut counters = Counters::new(12, 1);
        counters.reset(20);
        CommentaryEvent::new(CommentaryKind::HitFour, counters).with_runs(4)
    }

    /// Step until a continuation is released, returning its time
    fn run_until_released(c: &mut Commentary<u32>, mut now: f64, limit: f64) -> Option<(u32, f64)> {
        while now < limit {
            now += DT;
            c.advance(DT);
            c.pump(now);
            if let Some(value) = c.tick(now) {
                return Some((value, now));
            }
        }
        None
    }

    #[test]
    fn test_continuation_waits_for_speech() {
        let mut c = session(VoiceScript::default());
        c.open_session(0.0).unwrap();
        assert_eq!(c.status(), CommentaryStatus::Ready);
        assert!(c.trigger(&event(), 0.0));

        // Let the first chunk arrive, then park the continuation.
        let mut now = 0.0;
        while now < 0.5 {
            now += DT;
            c.advance(DT);
            c.pump(now);
            assert_eq!(c.tick(now), None);
        }
        assert_eq!(c.status(), CommentaryStatus::Speaking);
        assert_eq!(c.schedule_continuation(7, 7.0, now), None);

        // Three 0.6 s chunks starting at 0.4 end at 2.2.
        let (value, at) = run_until_released(&mut c, now, 10.0).unwrap();
        assert_eq!(value, 7);
        assert!(at > 2.0 && at < 2.3, "released at {at}");
        assert_eq!(c.status(), CommentaryStatus::Ready);
    }

    #[test]
    fn test_silent_service_does_not_block() {
        let mut c = session(VoiceScript {
            silent: true,
            ..VoiceScript::default()
        });
        c.open_session(0.0).unwrap();
        assert!(c.trigger(&event(), 0.0));
        // Nothing arrives so nothing plays: the continuation runs at once.
        assert_eq!(c.schedule_continuation(1, 7.0, 0.0), Some(1));
    }

    #[test]
    fn test_send_failure_never_blocks() {
        let mut c = session(VoiceScript {
            fail_send_after: Some(0),
            ..VoiceScript::default()
        });
        c.open_session(0.0).unwrap();
        assert!(!c.trigger(&event(), 0.0));
        assert_eq!(c.status(), CommentaryStatus::Error);
        assert_eq!(c.schedule_continuation(3, 7.0, 0.0), Some(3));
    }

    #[test]
    fn test_stream_drop_releases_pending() {
        let mut c = session(VoiceScript {
            drop_after: Some(1),
            ..VoiceScript::default()
        });
        c.open_session(0.0).unwrap();
        assert!(c.trigger(&event(), 0.0));
        let _ = run_until_released(&mut c, 0.0, 0.5);
        assert!(c.is_playing());
        assert_eq!(c.schedule_continuation(5, 7.0, 0.5), None);

        // Second prompt makes the stream fail; the parked continuation must
        // not wait for the safety net.
        assert!(c.trigger(&event(), 0.5));
        let (value, at) = run_until_released(&mut c, 0.5, 10.0).unwrap();
        assert_eq!(value, 5);
        assert!(at < 1.0, "released at {at}");
        assert!(!c.is_ready());
        assert_eq!(c.status(), CommentaryStatus::Closed);
    }

    #[test]
    fn test_open_session_errors() {
        let mut offline: Commentary<u32> = Commentary::offline(SchedulerTiming::default());
        assert!(matches!(offline.open_session(0.0), Err(CommentaryError::Disabled)));
        assert!(!offline.trigger(&event(), 0.0));

        let mut refused = session(VoiceScript {
            fail_connect: true,
            ..VoiceScript::default()
        });
        assert!(matches!(refused.open_session(0.0), Err(CommentaryError::Connect(_))));
        assert_eq!(refused.status(), CommentaryStatus::Error);

        let mut muted: Commentary<u32> = Commentary::new(
            Some(Box::new(ScriptedVoice::new(VoiceScript::default()))),
            Box::new(VirtualOutput::suspended()),
            SchedulerTiming::default(),
        );
        assert!(matches!(muted.open_session(0.0), Err(CommentaryError::AudioUnavailable)));
    }
}
