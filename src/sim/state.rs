//! World state and core simulation types
//!
//! Plain data only. The game flow in [`crate::engine`] is the single writer of
//! the control fields (`state`, `tutorial_step`, counters); physics only moves
//! the ball and winds down the bat swing.

use std::collections::VecDeque;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Character choice after assets are ready
    PlayerSelect,
    /// Waiting for the player to start a game
    Idle,
    /// Waiting on the asset gate
    Loading,
    /// Bowler is about to release
    Ready,
    /// Ball travelling toward the batsman
    Bowling,
    /// Swing taken, contact resolved this tick (stays here after a miss)
    Hitting,
    /// Ball struck and in flight
    BallInPlay,
    /// Bowled
    Out,
    /// Delivery over without a wicket
    BallDead,
    /// Innings finished, only left through a new game
    GameOver,
    /// Guided tutorial super-state
    Tutorial,
}

impl GameState {
    /// States in which the physics stepper runs
    pub fn is_simulated(self) -> bool {
        matches!(self, GameState::Bowling | GameState::Hitting | GameState::BallInPlay)
    }
}

/// Aimed side for the next shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShotDirection {
    Off,
    #[default]
    Straight,
    Leg,
}

impl ShotDirection {
    /// Sideways sign: Off is positive x, Leg negative, Straight zero
    pub fn sign(self) -> f32 {
        match self {
            ShotDirection::Off => 1.0,
            ShotDirection::Straight => 0.0,
            ShotDirection::Leg => -1.0,
        }
    }
}

/// Tutorial progression, only meaningful while the tutorial runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TutorialStep {
    #[default]
    None,
    Intro,
    AimOff,
    AimStraight,
    AimLeg,
    AimDone,
    SwingIntro,
    SwingPractice,
    Complete,
}

impl TutorialStep {
    /// Step reached by aiming in `dir`, if this step is waiting for it
    pub fn after_aim(self, dir: ShotDirection) -> Option<TutorialStep> {
        match (self, dir) {
            (TutorialStep::AimOff, ShotDirection::Off) => Some(TutorialStep::AimStraight),
            (TutorialStep::AimStraight, ShotDirection::Straight) => Some(TutorialStep::AimLeg),
            (TutorialStep::AimLeg, ShotDirection::Leg) => Some(TutorialStep::AimDone),
            _ => None,
        }
    }
}

/// Selectable batsman
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerCharacter {
    Opener,
    Finisher,
}

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec3,
    /// Apparent radius (grows with height)
    pub radius: f32,
}

/// The ball. `pos.z` is height above the pitch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec3,
    pub vel: Vec3,
    pub radius: f32,
    /// Trail history for rendering (oldest first)
    pub trail: VecDeque<TrailPoint>,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: Vec3::new(FIELD_WIDTH / 2.0, BALL_RELEASE_Y, 0.0),
            vel: Vec3::ZERO,
            radius: BALL_RADIUS,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
        }
    }
}

impl Ball {
    /// Record current position to trail (call each flight tick)
    pub fn record_trail(&mut self) {
        self.trail.push_back(TrailPoint {
            pos: self.pos,
            radius: BALL_RADIUS + self.pos.z * 0.5,
        });
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }

    /// Clear trail (on release/reset)
    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Release from the bowler's end toward the batsman
    pub fn release(&mut self, x: f32, speed: f32) {
        self.pos = Vec3::new(x, BALL_RELEASE_Y, 0.0);
        self.vel = Vec3::new(0.0, -speed, 0.0);
        self.clear_trail();
    }

    /// Ground-plane position
    pub fn ground_pos(&self) -> Vec2 {
        self.pos.truncate()
    }

    /// Horizontal plus forward speed
    pub fn ground_speed(&self) -> f32 {
        self.vel.truncate().length()
    }
}

/// Batsman anchor, fixed for the duration of a delivery
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Batsman {
    pub pos: Vec2,
}

impl Default for Batsman {
    fn default() -> Self {
        Self {
            pos: Vec2::new(BATSMAN_X, BATSMAN_Y),
        }
    }
}

/// The bat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bat {
    pub swinging: bool,
    pub swing_angle: f32,
    pub max_swing_angle: f32,
    /// Seconds left in the current swing window
    pub swing_remaining: f32,
}

impl Default for Bat {
    fn default() -> Self {
        Self {
            swinging: false,
            swing_angle: 0.0,
            max_swing_angle: MAX_SWING_ANGLE,
            swing_remaining: 0.0,
        }
    }
}

impl Bat {
    /// Begin a swing toward `dir` lasting `window` seconds
    pub fn start_swing(&mut self, dir: ShotDirection, window: f32) {
        self.swinging = true;
        self.swing_angle = dir.sign() * self.max_swing_angle;
        self.swing_remaining = window;
    }

    /// Wind down the swing window
    pub fn update(&mut self, dt: f32) {
        if self.swinging {
            self.swing_remaining -= dt;
            if self.swing_remaining <= 0.0 {
                self.swing_remaining = 0.0;
                self.swinging = false;
            }
        }
    }
}

/// The wicket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stumps {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Bowled this delivery
    pub hit: bool,
}

impl Default for Stumps {
    fn default() -> Self {
        Self {
            pos: Vec2::new(
                BATSMAN_X - STUMPS_TOTAL_WIDTH / 2.0,
                BATSMAN_Y + BATSMAN_SPRITE_HEIGHT / 2.0 - STUMPS_HEIGHT - 10.0,
            ),
            width: STUMPS_TOTAL_WIDTH,
            height: STUMPS_HEIGHT,
            hit: false,
        }
    }
}

/// Innings counters and limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub score: u32,
    pub wickets: u32,
    pub balls_bowled: u32,
    /// 0 means no target chosen yet
    pub target_score: u32,
    pub total_balls: u32,
    pub max_wickets: u32,
}

impl Counters {
    pub fn new(total_balls: u32, max_wickets: u32) -> Self {
        Self {
            score: 0,
            wickets: 0,
            balls_bowled: 0,
            target_score: 0,
            total_balls,
            max_wickets,
        }
    }

    /// Zero the innings and set a fresh target
    pub fn reset(&mut self, target_score: u32) {
        self.score = 0;
        self.wickets = 0;
        self.balls_bowled = 0;
        self.target_score = target_score;
    }

    pub fn runs_needed(&self) -> u32 {
        self.target_score.saturating_sub(self.score)
    }

    pub fn balls_remaining(&self) -> u32 {
        self.total_balls.saturating_sub(self.balls_bowled)
    }
}

/// Per-delivery flags used to pick the outcome narrative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeliveryContext {
    /// A swing was taken and missed
    pub was_miss: bool,
}

/// Complete world state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub state: GameState,
    pub shot_direction: ShotDirection,
    pub tutorial_step: TutorialStep,
    pub character: Option<PlayerCharacter>,
    pub ball: Ball,
    pub batsman: Batsman,
    pub bat: Bat,
    pub stumps: Stumps,
    pub counters: Counters,
    pub delivery: DeliveryContext,
}

impl World {
    pub fn new(total_balls: u32, max_wickets: u32) -> Self {
        Self {
            state: GameState::Loading,
            shot_direction: ShotDirection::default(),
            tutorial_step: TutorialStep::None,
            character: None,
            ball: Ball::default(),
            batsman: Batsman::default(),
            bat: Bat::default(),
            stumps: Stumps::default(),
            counters: Counters::new(total_balls, max_wickets),
            delivery: DeliveryContext::default(),
        }
    }

    /// Re-place every delivery-scoped element
    pub fn reset_elements(&mut self) {
        self.delivery = DeliveryContext::default();
        self.ball = Ball::default();
        self.batsman = Batsman::default();
        self.bat = Bat::default();
        self.stumps = Stumps::default();
    }

    /// Swing practice during the tutorial (no counters, no wickets)
    pub fn in_swing_practice(&self) -> bool {
        self.tutorial_step == TutorialStep::SwingPractice
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            ball: self.ball.clone(),
            batsman: self.batsman,
            bat: self.bat,
            stumps: self.stumps,
            game_state: self.state,
            shot_direction: self.shot_direction,
        }
    }
}

/// Renderer boundary: everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub ball: Ball,
    pub batsman: Batsman,
    pub bat: Bat,
    pub stumps: Stumps,
    pub game_state: GameState,
    pub shot_direction: ShotDirection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_is_capped_fifo() {
        let mut ball = Ball::default();
        for i in 0..(TRAIL_LENGTH + 5) {
            ball.pos.y = i as f32;
            ball.record_trail();
        }
        assert_eq!(ball.trail.len(), TRAIL_LENGTH);
        assert_eq!(ball.trail.front().map(|p| p.pos.y), Some(5.0));
        assert_eq!(
            ball.trail.back().map(|p| p.pos.y),
            Some((TRAIL_LENGTH + 4) as f32)
        );
    }

    #[test]
    fn test_bat_swing_auto_clears() {
        let mut bat = Bat::default();
        bat.start_swing(ShotDirection::Leg, 0.2);
        assert!(bat.swinging);
        assert!(bat.swing_angle < 0.0);

        for _ in 0..11 {
            bat.update(SIM_DT);
        }
        assert!(bat.swinging, "still inside the 200ms window");
        bat.update(SIM_DT);
        bat.update(SIM_DT);
        assert!(!bat.swinging);
        assert_eq!(bat.swing_remaining, 0.0);
    }

    #[test]
    fn test_stumps_centered_on_batsman() {
        let stumps = Stumps::default();
        let center = stumps.pos.x + stumps.width / 2.0;
        assert!((center - BATSMAN_X).abs() < 1e-4);
        assert_eq!(stumps.pos.y, 65.0);
        assert!(!stumps.hit);
    }

    #[test]
    fn test_tutorial_aim_progression() {
        use ShotDirection::*;
        assert_eq!(TutorialStep::AimOff.after_aim(Off), Some(TutorialStep::AimStraight));
        assert_eq!(TutorialStep::AimOff.after_aim(Leg), None);
        assert_eq!(
            TutorialStep::AimStraight.after_aim(Straight),
            Some(TutorialStep::AimLeg)
        );
        assert_eq!(TutorialStep::AimLeg.after_aim(Leg), Some(TutorialStep::AimDone));
        assert_eq!(TutorialStep::Intro.after_aim(Off), None);
    }

    #[test]
    fn test_reset_elements_clears_delivery_scope() {
        let mut world = World::new(12, 1);
        world.stumps.hit = true;
        world.bat.start_swing(ShotDirection::Off, 0.2);
        world.delivery.was_miss = true;
        world.counters.score = 7;

        world.reset_elements();
        assert!(!world.stumps.hit);
        assert!(!world.bat.swinging);
        assert!(!world.delivery.was_miss);
        assert_eq!(world.counters.score, 7, "counters survive element reset");
    }
}
