//! Game settings and tuning
//!
//! Loaded from a JSON file; every field falls back to its default when
//! missing so partial files are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings load/validation failure
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read or write settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Inclusive bowling speed range (px/s)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedRange {
    pub min: f32,
    pub max: f32,
}

/// Inclusive target score range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRange {
    pub min: u32,
    pub max: u32,
}

/// Delays driving the game flow, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowTiming {
    pub first_bowl_delay_ms: u64,
    pub bowl_delay_min_ms: u64,
    pub bowl_delay_max_ms: u64,
    pub after_wicket_ms: u64,
    pub after_dead_ball_ms: u64,
    pub after_ball_in_play_ms: u64,
    /// How long a swing protects the stumps and counts as swinging
    pub swing_window_ms: u64,
    /// Safety net: longest wait for commentary before moving on
    pub commentary_timeout_ms: u64,
    pub tutorial_step_ms: u64,
    pub tutorial_bowl_ms: u64,
    pub tutorial_rebowl_ms: u64,
    pub tutorial_complete_ms: u64,
}

impl Default for FlowTiming {
    fn default() -> Self {
        Self {
            first_bowl_delay_ms: 2000,
            bowl_delay_min_ms: 1000,
            bowl_delay_max_ms: 1900,
            after_wicket_ms: 3000,
            after_dead_ball_ms: 2500,
            after_ball_in_play_ms: 2000,
            swing_window_ms: 200,
            commentary_timeout_ms: 7000,
            tutorial_step_ms: 2500,
            tutorial_bowl_ms: 500,
            tutorial_rebowl_ms: 1500,
            tutorial_complete_ms: 3000,
        }
    }
}

/// Commentary playback polling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioTiming {
    /// Shortest gap between completion checks
    pub poll_interval_ms: u64,
    /// Playback counts as finished this close to the cursor
    pub margin_ms: u64,
}

impl Default for AudioTiming {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            margin_ms: 150,
        }
    }
}

/// Launch profile for one timing zone (px/s)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneProfile {
    pub strength_min: f32,
    pub strength_max: f32,
    /// Vertical launch speed
    pub lift: f32,
}

/// Timing zones and their launch profiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotTuning {
    /// Sweet spot: timing distance below this fraction of bat height
    pub sweet_fraction: f32,
    /// Good: timing distance below this fraction of bat height
    pub good_fraction: f32,
    pub sweet: ZoneProfile,
    pub good: ZoneProfile,
    pub mistimed: ZoneProfile,
}

impl Default for ShotTuning {
    fn default() -> Self {
        Self {
            sweet_fraction: 0.25,
            good_fraction: 0.45,
            sweet: ZoneProfile {
                strength_min: 1020.0,
                strength_max: 1200.0,
                lift: 1080.0,
            },
            good: ZoneProfile {
                strength_min: 840.0,
                strength_max: 960.0,
                lift: 720.0,
            },
            mistimed: ZoneProfile {
                strength_min: 600.0,
                strength_max: 660.0,
                lift: 300.0,
            },
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ball budget per innings
    pub total_balls: u32,
    /// Wicket budget per innings
    pub max_wickets: u32,
    pub bowl_speed: SpeedRange,
    pub tutorial_bowl_speed: f32,
    pub target: TargetRange,
    pub timing: FlowTiming,
    pub audio: AudioTiming,
    pub shots: ShotTuning,
    /// Open a voice session on game start
    pub commentary_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            total_balls: 12,
            max_wickets: 1,
            bowl_speed: SpeedRange {
                min: 210.0,
                max: 450.0,
            },
            tutorial_bowl_speed: 210.0,
            target: TargetRange { min: 15, max: 34 },
            timing: FlowTiming::default(),
            audio: AudioTiming::default(),
            shots: ShotTuning::default(),
            commentary_enabled: true,
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Check ranges and budgets
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: &str| Err(SettingsError::Invalid(msg.to_string()));

        if self.total_balls == 0 {
            return invalid("total_balls must be at least 1");
        }
        if self.max_wickets == 0 {
            return invalid("max_wickets must be at least 1");
        }
        if !(self.bowl_speed.min > 0.0 && self.bowl_speed.min <= self.bowl_speed.max) {
            return invalid("bowl_speed must satisfy 0 < min <= max");
        }
        if self.tutorial_bowl_speed <= 0.0 {
            return invalid("tutorial_bowl_speed must be positive");
        }
        if self.target.min > self.target.max {
            return invalid("target.min must not exceed target.max");
        }
        if self.timing.bowl_delay_min_ms > self.timing.bowl_delay_max_ms {
            return invalid("bowl_delay_min_ms must not exceed bowl_delay_max_ms");
        }
        let shots = &self.shots;
        if !(shots.sweet_fraction > 0.0
            && shots.sweet_fraction <= shots.good_fraction
            && shots.good_fraction <= 1.0)
        {
            return invalid("shot fractions must satisfy 0 < sweet <= good <= 1");
        }
        for (name, zone) in [
            ("sweet", &shots.sweet),
            ("good", &shots.good),
            ("mistimed", &shots.mistimed),
        ] {
            if zone.strength_min > zone.strength_max {
                return Err(SettingsError::Invalid(format!(
                    "{name} zone strength_min exceeds strength_max"
                )));
            }
        }
        Ok(())
    }

    /// Swing window in seconds
    pub fn swing_window(&self) -> f32 {
        self.timing.swing_window_ms as f32 / 1000.0
    }
}
