//! Commentary playback scheduler
//!
//! Speech arrives as a burst of buffers of unknown count. Each buffer starts
//! where the previous one ends on the audio clock (`cursor`), never earlier
//! than "now". Gameplay hands in a continuation to run once the burst has
//! been heard; it sits in a single slot raced by two paths:
//!
//! - the completion poll, which reschedules itself until the audio clock has
//!   caught up with the cursor
//! - the safety net, a deadline after which the continuation runs anyway
//!
//! Whichever path fires first takes the slot. The slot carries a generation
//! id; cancelling bumps the generation so a late safety net for an older
//! continuation finds nothing to run.
//!
//! Two clocks are involved: `now` is the engine clock (timers) and
//! `audio_now` is the output's clock (cursor). The scheduler never runs a
//! continuation itself, it hands it back to the caller.

use crate::settings::AudioTiming;

/// Poll cadence and completion margin, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerTiming {
    pub poll_interval: f64,
    pub margin: f64,
}

impl Default for SchedulerTiming {
    fn default() -> Self {
        Self::from(&AudioTiming::default())
    }
}

impl From<&AudioTiming> for SchedulerTiming {
    fn from(timing: &AudioTiming) -> Self {
        Self {
            poll_interval: timing.poll_interval_ms as f64 / 1000.0,
            margin: timing.margin_ms as f64 / 1000.0,
        }
    }
}

#[derive(Debug)]
struct Pending<C> {
    continuation: C,
    generation: u64,
    /// Safety-net deadline, engine clock
    deadline: f64,
}

/// Back-to-back speech scheduling plus the pending continuation slot
#[derive(Debug)]
pub struct AudioScheduler<C> {
    timing: SchedulerTiming,
    /// Where the next buffer starts, audio clock
    cursor: f64,
    playing: bool,
    pending: Option<Pending<C>>,
    generation: u64,
    /// Next completion check, engine clock
    poll_at: Option<f64>,
}

impl<C> AudioScheduler<C> {
    pub fn new(timing: SchedulerTiming) -> Self {
        Self {
            timing,
            cursor: 0.0,
            playing: false,
            pending: None,
            generation: 0,
            poll_at: None,
        }
    }

    /// Forget any burst and pending continuation, e.g. for a new session
    pub fn reset(&mut self, audio_now: f64) {
        self.cancel();
        self.cursor = audio_now;
        self.playing = false;
        self.poll_at = None;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_generation(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.generation)
    }

    pub fn pending_deadline(&self) -> Option<f64> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn next_poll(&self) -> Option<f64> {
        self.poll_at
    }

    /// Schedule a buffer of `duration` seconds, returning its start time
    ///
    /// The cursor never moves backwards; after a gap it jumps forward to
    /// `audio_now`.
    pub fn enqueue(&mut self, duration: f64, audio_now: f64) -> f64 {
        let start = self.cursor.max(audio_now);
        self.cursor = start + duration.max(0.0);
        if !self.playing {
            log::debug!("Speech burst started at {start:.3}");
        }
        self.playing = true;
        log::debug!("Speech buffer at {start:.3}, cursor now {:.3}", self.cursor);
        start
    }

    /// Run a completion check no later than `now`
    pub fn request_completion_check(&mut self, now: f64) {
        self.poll_at = Some(self.poll_at.map_or(now, |at| at.min(now)));
    }

    /// Treat playback as finished (channel failure) and check immediately
    pub fn force_idle(&mut self, now: f64) {
        if self.playing {
            log::debug!("Speech playback forced idle");
        }
        self.playing = false;
        self.request_completion_check(now);
    }

    /// Run `continuation` once speech is done, or after `timeout` seconds
    ///
    /// Any earlier pending continuation is dropped. When nothing is playing
    /// the continuation is handed straight back.
    pub fn schedule_continuation(&mut self, continuation: C, timeout: f64, now: f64) -> Option<C> {
        self.cancel();
        if !self.playing {
            return Some(continuation);
        }

        self.pending = Some(Pending {
            continuation,
            generation: self.generation,
            deadline: now + timeout.max(0.0),
        });
        if self.poll_at.is_none() {
            self.poll_at = Some(now + self.timing.poll_interval);
        }
        log::debug!(
            "Continuation {} waiting on speech (cursor {:.3})",
            self.generation,
            self.cursor
        );
        None
    }

    /// Drop the pending continuation; its safety net becomes a no-op
    pub fn cancel(&mut self) {
        self.generation += 1;
        if self.pending.take().is_some() {
            log::debug!("Pending continuation cancelled");
        }
    }

    /// Completion check. `audio_now` is `None` when the output is not running.
    pub fn on_poll(&mut self, now: f64, audio_now: Option<f64>) -> Option<C> {
        self.poll_at = None;

        let Some(audio_now) = audio_now else {
            self.playing = false;
            return self.take_pending();
        };

        if !self.playing {
            return self.take_pending();
        }

        let remaining = self.cursor - audio_now;
        if remaining <= self.timing.margin {
            log::debug!("Speech burst finished at {audio_now:.3}");
            self.playing = false;
            return self.take_pending();
        }

        let wait = self.timing.poll_interval.max(remaining - self.timing.margin);
        self.poll_at = Some(now + wait);
        None
    }

    /// Safety-net timer for the continuation scheduled as `generation`
    pub fn on_safety_net(&mut self, generation: u64, now: f64) -> Option<C> {
        if self.pending_generation() != Some(generation) {
            return None;
        }
        log::warn!("Commentary did not finish in time, continuing without it");
        // A burst that never reports completion would otherwise stay "playing".
        self.request_completion_check(now);
        self.take_pending()
    }

    /// Fire whichever timers are due
    pub fn tick(&mut self, now: f64, audio_now: Option<f64>) -> Option<C> {
        if self.poll_at.is_some_and(|at| at <= now) {
            if let Some(continuation) = self.on_poll(now, audio_now) {
                return Some(continuation);
            }
        }

        match self.pending.as_ref() {
            Some(pending) if pending.deadline <= now => {
                let generation = pending.generation;
                self.on_safety_net(generation, now)
            }
            _ => None,
        }
    }

    fn take_pending(&mut self) -> Option<C> {
        self.pending.take().map(|p| p.continuation)
    }
}
