//! On-screen banner and impact text
//!
//! Both are plain data the renderer reads; expiry runs on the engine clock.

/// Impact text stays up this long (seconds)
pub const IMPACT_DURATION: f64 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct TimedText {
    pub text: String,
    /// Engine clock; `None` stays until replaced
    pub expires_at: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hud {
    message: Option<TimedText>,
    impact: Option<TimedText>,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Banner text. `duration_ms == 0` keeps it until replaced.
    pub fn show_message(&mut self, text: impl Into<String>, duration_ms: u64, now: f64) {
        let text = text.into();
        log::debug!("Message: {text}");
        let expires_at = (duration_ms > 0).then(|| now + duration_ms as f64 / 1000.0);
        self.message = Some(TimedText { text, expires_at });
    }

    /// Big effect text, e.g. "SIX!"
    pub fn show_impact(&mut self, text: impl Into<String>, now: f64) {
        self.impact = Some(TimedText {
            text: text.into(),
            expires_at: Some(now + IMPACT_DURATION),
        });
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.text.as_str())
    }

    pub fn impact(&self) -> Option<&str> {
        self.impact.as_ref().map(|m| m.text.as_str())
    }

    /// Drop texts whose time is up
    ///
    /// A message replaced before expiring carries its own deadline, so an
    /// older deadline never clears a newer text.
    pub fn expire(&mut self, now: f64) {
        let expired = |t: &Option<TimedText>| {
            t.as_ref()
                .and_then(|t| t.expires_at)
                .is_some_and(|at| at <= now)
        };
        if expired(&self.message) {
            self.message = None;
        }
        if expired(&self.impact) {
            self.impact = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_expires() {
        let mut hud = Hud::new();
        hud.show_message("Bowler running in...", 2000, 1.0);
        hud.expire(2.9);
        assert_eq!(hud.message(), Some("Bowler running in..."));
        hud.expire(3.0);
        assert_eq!(hud.message(), None);
    }

    #[test]
    fn test_replacement_outlives_old_deadline() {
        let mut hud = Hud::new();
        hud.show_message("SWING AND A MISS!", 1500, 0.0);
        hud.show_message("Through to the keeper.", 2000, 1.0);
        hud.expire(1.6);
        assert_eq!(hud.message(), Some("Through to the keeper."));
    }

    #[test]
    fn test_persistent_message_and_impact() {
        let mut hud = Hud::new();
        hud.show_message("Bowler is ready...", 0, 0.0);
        hud.show_impact("SIX!", 0.0);
        hud.expire(100.0);
        assert_eq!(hud.message(), Some("Bowler is ready..."));
        assert_eq!(hud.impact(), None);
    }
}
