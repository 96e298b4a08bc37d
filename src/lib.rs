//! Crease Cricket - a batting arcade game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world state, physics, delivery resolution, game flow)
//! - `audio`: Speech buffers, audio output seam and the commentary playback scheduler
//! - `commentary`: Commentary events, prompt formatting and the voice session
//! - `engine`: Fixed-tick orchestration of simulation, timers and commentary
//! - `settings`: Data-driven game configuration

pub mod assets;
pub mod audio;
pub mod commentary;
pub mod engine;
pub mod hud;
pub mod settings;
pub mod sim;

pub use assets::{Asset, AssetStatus};
pub use engine::{Engine, TickInput};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
///
/// Velocities and accelerations are in field pixels per second, positions in
/// field pixels. The field is viewed from above with the batsman near the top
/// edge and the bowler releasing from the bottom.
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Field dimensions
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Release point distance from the far edge
    pub const BALL_RELEASE_Y: f32 = FIELD_HEIGHT - 38.0;
    /// Total width of the random sideways release offset
    pub const BALL_RELEASE_SPREAD: f32 = 40.0;
    /// Trail samples kept for rendering
    pub const TRAIL_LENGTH: usize = 15;

    /// Batsman anchor
    pub const BATSMAN_X: f32 = FIELD_WIDTH / 2.0;
    pub const BATSMAN_Y: f32 = 80.0;
    pub const BATSMAN_SPRITE_HEIGHT: f32 = 90.0;

    /// Stumps (three stumps with gaps between them)
    pub const NUM_STUMPS: u32 = 3;
    pub const STUMP_WIDTH: f32 = 5.0;
    pub const STUMP_GAP: f32 = 8.0;
    pub const STUMPS_HEIGHT: f32 = 50.0;
    pub const STUMPS_TOTAL_WIDTH: f32 =
        NUM_STUMPS as f32 * STUMP_WIDTH + (NUM_STUMPS - 1) as f32 * STUMP_GAP;

    /// Bat hitbox, horizontal offset from batsman center
    pub const BAT_OFFSET_X: f32 = -5.0;
    /// Extra sideways hitbox shift toward the aimed side
    pub const BAT_DIRECTION_SHIFT: f32 = 10.0;
    /// Hitbox when the bat sprite loaded (width, height)
    pub const BAT_SPRITE_HITBOX: (f32, f32) = (35.0 * 2.8, 100.0 * 2.0);
    /// Hitbox when drawing fallback primitives (width, height)
    pub const BAT_FALLBACK_HITBOX: (f32, f32) = (20.0 * 4.0, 150.0);
    /// Maximum bat swing angle (radians)
    pub const MAX_SWING_ANGLE: f32 = std::f32::consts::PI / 3.5;

    /// Flight physics
    pub const GRAVITY: f32 = 2880.0;
    pub const BOUNCE_FACTOR: f32 = 0.6;
    /// Horizontal velocity kept on each bounce
    pub const GROUND_FRICTION: f32 = 0.95;
    /// Below this ground speed a grounded ball is considered stopped
    pub const STOP_SPEED: f32 = 6.0;
    /// Play area extends this many field sizes in every direction
    pub const BOUNDS_SCALE: f32 = 3.0;
}
