//! Voice channel seam
//!
//! A voice channel takes prompt text and streams back speech. The real
//! service lives outside this crate; [`ScriptedVoice`] stands in for it with
//! configurable latency, burst size and failures.

use serde::{Deserialize, Serialize};

use super::CommentaryError;
use crate::audio::{SPEECH_SAMPLE_RATE, SpeechBuffer};

/// Something the voice service sent back
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceMessage {
    /// One chunk of the current spoken reply
    Audio(SpeechBuffer),
    /// Reply finished; no more audio for this prompt
    TurnComplete,
    /// Stream failed mid-session
    Error(String),
    /// Service closed the session
    Closed,
}

/// Streaming voice service
pub trait VoiceChannel {
    /// Open a session with the commentator persona at engine time `now`
    fn connect(&mut self, system_prompt: &str, now: f64) -> Result<(), CommentaryError>;

    /// Send one prompt; the reply streams back through `poll`
    fn send_text(&mut self, text: &str) -> Result<(), CommentaryError>;

    /// Messages that arrived by engine time `now`, oldest first
    fn poll(&mut self, now: f64) -> Vec<VoiceMessage>;

    fn close(&mut self);

    fn is_open(&self) -> bool;
}

/// Behaviour of a [`ScriptedVoice`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceScript {
    /// Delay between a prompt and its first chunk, seconds
    pub latency: f64,
    pub chunks_per_turn: u32,
    /// Playback length of each chunk, seconds
    pub chunk_duration: f64,
    /// Arrival gap between chunks, seconds
    pub chunk_spacing: f64,
    pub fail_connect: bool,
    /// Sends fail once this many prompts went through
    pub fail_send_after: Option<u32>,
    /// Stream errors and closes after this many prompts
    pub drop_after: Option<u32>,
    /// Accept prompts but never answer
    pub silent: bool,
    /// Undelivered messages kept at most; extra ones are dropped
    pub inbox_capacity: usize,
}

impl Default for VoiceScript {
    fn default() -> Self {
        Self {
            latency: 0.4,
            chunks_per_turn: 3,
            chunk_duration: 0.6,
            chunk_spacing: 0.2,
            fail_connect: false,
            fail_send_after: None,
            drop_after: None,
            silent: false,
            inbox_capacity: 64,
        }
    }
}

#[derive(Debug)]
struct Timed {
    at: f64,
    message: VoiceMessage,
}

/// Deterministic stand-in for the voice service
#[derive(Debug, Default)]
pub struct ScriptedVoice {
    script: VoiceScript,
    open: bool,
    clock: f64,
    inbox: Vec<Timed>,
    system_prompt: Option<String>,
    prompts: Vec<String>,
}

impl ScriptedVoice {
    pub fn new(script: VoiceScript) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }

    /// Prompts sent so far
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    fn chunk(&self) -> SpeechBuffer {
        let frames = (self.script.chunk_duration.max(0.0) * SPEECH_SAMPLE_RATE as f64).round();
        let bytes = vec![0u8; frames as usize * 2];
        SpeechBuffer::from_pcm16_le(&bytes, SPEECH_SAMPLE_RATE, 1)
    }

    fn push(&mut self, at: f64, message: VoiceMessage) {
        if self.inbox.len() >= self.script.inbox_capacity {
            log::warn!("Voice inbox full, dropping {message:?}");
            return;
        }
        self.inbox.push(Timed { at, message });
    }
}

impl VoiceChannel for ScriptedVoice {
    fn connect(&mut self, system_prompt: &str, now: f64) -> Result<(), CommentaryError> {
        if self.script.fail_connect {
            return Err(CommentaryError::Connect("scripted connect failure".into()));
        }
        self.open = true;
        self.clock = now;
        self.inbox.clear();
        self.system_prompt = Some(system_prompt.to_string());
        Ok(())
    }

    fn send_text(&mut self, text: &str) -> Result<(), CommentaryError> {
        if !self.open {
            return Err(CommentaryError::Closed);
        }
        let sent = self.prompts.len() as u32;
        if self.script.fail_send_after.is_some_and(|n| sent >= n) {
            return Err(CommentaryError::Send("scripted send failure".into()));
        }
        self.prompts.push(text.to_string());

        let first = self.clock + self.script.latency;
        if self.script.drop_after.is_some_and(|n| sent >= n) {
            self.push(first, VoiceMessage::Error("stream reset".into()));
            self.push(first, VoiceMessage::Closed);
            return Ok(());
        }
        if self.script.silent {
            return Ok(());
        }

        let mut at = first;
        for _ in 0..self.script.chunks_per_turn {
            let chunk = self.chunk();
            self.push(at, VoiceMessage::Audio(chunk));
            at += self.script.chunk_spacing;
        }
        self.push(at, VoiceMessage::TurnComplete);
        Ok(())
    }

    fn poll(&mut self, now: f64) -> Vec<VoiceMessage> {
        self.clock = now;
        if self.inbox.is_empty() {
            return Vec::new();
        }

        let (mut due, later): (Vec<Timed>, Vec<Timed>) =
            self.inbox.drain(..).partition(|t| t.at <= now);
        self.inbox = later;
        due.sort_by(|a, b| a.at.total_cmp(&b.at));

        let messages: Vec<VoiceMessage> = due.into_iter().map(|t| t.message).collect();
        if messages.iter().any(|m| matches!(m, VoiceMessage::Closed)) {
            self.open = false;
            self.inbox.clear();
        }
        messages
    }

    fn close(&mut self) {
        self.open = false;
        self.inbox.clear();
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_streams_after_latency() {
        let mut voice = ScriptedVoice::new(VoiceScript::default());
        voice.connect("persona", 0.0).unwrap();
        voice.poll(1.0);
        voice.send_text("Event: SIX runs scored.").unwrap();

        assert!(voice.poll(1.3).is_empty());
        let first = voice.poll(1.45);
        assert_eq!(first.len(), 1);
        assert!(matches!(&first[0], VoiceMessage::Audio(b) if (b.duration() - 0.6).abs() < 1e-9));

        let rest = voice.poll(5.0);
        assert_eq!(rest.len(), 3);
        assert_eq!(rest[2], VoiceMessage::TurnComplete);
        assert_eq!(voice.prompts(), &["Event: SIX runs scored.".to_string()]);
    }

    #[test]
    fn test_first_reply_after_late_connect_keeps_latency() {
        let mut voice = ScriptedVoice::new(VoiceScript::default());
        voice.connect("persona", 10.0).unwrap();
        voice.send_text("The game is starting.").unwrap();

        assert!(voice.poll(10.3).is_empty());
        assert_eq!(voice.poll(10.45).len(), 1);
        assert_eq!(voice.poll(10.65).len(), 1);
        assert_eq!(voice.poll(10.85).len(), 1);
        assert_eq!(voice.poll(11.05), vec![VoiceMessage::TurnComplete]);
    }

    #[test]
    fn test_connect_failure() {
        let mut voice = ScriptedVoice::new(VoiceScript {
            fail_connect: true,
            ..VoiceScript::default()
        });
        assert!(matches!(voice.connect("persona", 0.0), Err(CommentaryError::Connect(_))));
        assert!(!voice.is_open());
        assert!(matches!(voice.send_text("x"), Err(CommentaryError::Closed)));
    }

    #[test]
    fn test_send_failure_after_n() {
        let mut voice = ScriptedVoice::new(VoiceScript {
            fail_send_after: Some(1),
            ..VoiceScript::default()
        });
        voice.connect("persona", 0.0).unwrap();
        assert!(voice.send_text("one").is_ok());
        assert!(matches!(voice.send_text("two"), Err(CommentaryError::Send(_))));
    }

    #[test]
    fn test_drop_closes_session() {
        let mut voice = ScriptedVoice::new(VoiceScript {
            drop_after: Some(0),
            ..VoiceScript::default()
        });
        voice.connect("persona", 0.0).unwrap();
        voice.send_text("one").unwrap();
        let messages = voice.poll(1.0);
        assert!(matches!(messages[0], VoiceMessage::Error(_)));
        assert_eq!(messages[1], VoiceMessage::Closed);
        assert!(!voice.is_open());
    }

    #[test]
    fn test_inbox_is_bounded() {
        let mut voice = ScriptedVoice::new(VoiceScript {
            chunks_per_turn: 10,
            inbox_capacity: 4,
            ..VoiceScript::default()
        });
        voice.connect("persona", 0.0).unwrap();
        voice.send_text("one").unwrap();
        assert_eq!(voice.poll(100.0).len(), 4);
    }
}
