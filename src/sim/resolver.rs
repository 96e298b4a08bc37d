//! Delivery and outcome resolution
//!
//! Contact is judged once, at the instant of the swing, against a static bat
//! hitbox. A connected shot is graded by timing into one of three zones, each
//! with its own run table and launch profile. Every resolved delivery adds
//! exactly one ball to the counters.

use glam::{Vec2, Vec3};
use rand::Rng;

use super::collision::Aabb;
use super::state::{Batsman, Counters, ShotDirection, World};
use crate::commentary::{CommentaryEvent, CommentaryKind};
use crate::consts::*;
use crate::settings::{ShotTuning, ZoneProfile};

/// Sideways launch divisor for aimed shots
const DIRECTION_DIVISOR: f32 = 1.7;
/// Half-width of the sideways spread for straight shots (px/s)
const STRAIGHT_SPREAD: f32 = 180.0;
/// Half-width of the jitter added to every shot (px/s)
const LAUNCH_JITTER: f32 = 60.0;

/// How well the swing was timed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingZone {
    SweetSpot,
    Good,
    Mistimed,
}

/// A connected shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub zone: TimingZone,
    pub runs: u8,
    /// Post-hit ball velocity
    pub launch: Vec3,
}

/// How a delivery ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Contact made, runs scored (possibly zero)
    Runs(u8),
    Bowled,
    /// Swung, missed, ball went through
    MissedHit,
    /// No swing, ball went through
    DotBallKeeper,
}

/// Why the innings ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InningsResult {
    Won,
    AllOut,
    BallsExhausted,
}

impl InningsResult {
    pub fn commentary_kind(self) -> CommentaryKind {
        match self {
            InningsResult::Won => CommentaryKind::GameWon,
            InningsResult::AllOut => CommentaryKind::GameOverWickets,
            InningsResult::BallsExhausted => CommentaryKind::GameOverBalls,
        }
    }
}

/// Bat hitbox for the aimed direction
///
/// The box is larger when the bat sprite loaded, matching what is drawn.
pub fn bat_hitbox(batsman: &Batsman, dir: ShotDirection, sprite_ready: bool) -> Aabb {
    let (width, height) = if sprite_ready {
        BAT_SPRITE_HITBOX
    } else {
        BAT_FALLBACK_HITBOX
    };
    let center = Vec2::new(
        batsman.pos.x + BAT_OFFSET_X + dir.sign() * BAT_DIRECTION_SHIFT,
        batsman.pos.y,
    );
    Aabb::from_center(center, Vec2::new(width, height))
}

/// Whether the ball overlaps the bat right now
pub fn is_contact(world: &World, sprite_ready: bool) -> bool {
    let bat = bat_hitbox(&world.batsman, world.shot_direction, sprite_ready);
    let ball = Aabb::around_circle(world.ball.ground_pos(), world.ball.radius);
    bat.overlaps(&ball)
}

/// Grade the swing by distance between ball and bat center
pub fn classify_timing(ball_y: f32, bat_y: f32, bat_height: f32, tuning: &ShotTuning) -> TimingZone {
    let timing = (ball_y - bat_y).abs();
    if timing < bat_height * tuning.sweet_fraction {
        TimingZone::SweetSpot
    } else if timing < bat_height * tuning.good_fraction {
        TimingZone::Good
    } else {
        TimingZone::Mistimed
    }
}

/// Weighted run table per zone
pub fn roll_runs(zone: TimingZone, rng: &mut impl Rng) -> u8 {
    match zone {
        TimingZone::SweetSpot => {
            if rng.random_bool(0.6) {
                6
            } else {
                4
            }
        }
        TimingZone::Good => {
            if rng.random_bool(0.8) {
                4
            } else if rng.random_bool(0.7) {
                2
            } else {
                3
            }
        }
        TimingZone::Mistimed => {
            if rng.random_bool(0.8) {
                1
            } else if rng.random_bool(0.6) {
                0
            } else {
                2
            }
        }
    }
}

fn profile(zone: TimingZone, tuning: &ShotTuning) -> &ZoneProfile {
    match zone {
        TimingZone::SweetSpot => &tuning.sweet,
        TimingZone::Good => &tuning.good,
        TimingZone::Mistimed => &tuning.mistimed,
    }
}

/// Post-hit velocity: strength along the pitch, lift, and a sideways component
/// biased by the aimed direction
pub fn launch_velocity(
    zone: TimingZone,
    dir: ShotDirection,
    tuning: &ShotTuning,
    rng: &mut impl Rng,
) -> Vec3 {
    let profile = profile(zone, tuning);
    let strength = rng.random_range(profile.strength_min..=profile.strength_max);

    let sideways = match dir {
        ShotDirection::Straight => rng.random_range(-STRAIGHT_SPREAD..=STRAIGHT_SPREAD),
        ShotDirection::Off | ShotDirection::Leg => dir.sign() * strength / DIRECTION_DIVISOR,
    };
    let jitter = rng.random_range(-LAUNCH_JITTER..=LAUNCH_JITTER);

    Vec3::new(sideways + jitter, strength, profile.lift)
}

/// Grade and launch a shot that made contact
pub fn play_shot(
    world: &World,
    sprite_ready: bool,
    tuning: &ShotTuning,
    rng: &mut impl Rng,
) -> Shot {
    let bat = bat_hitbox(&world.batsman, world.shot_direction, sprite_ready);
    let zone = classify_timing(world.ball.pos.y, world.batsman.pos.y, bat.size().y, tuning);
    let runs = roll_runs(zone, rng);
    let launch = launch_velocity(zone, world.shot_direction, tuning, rng);
    Shot { zone, runs, launch }
}

/// Gentle lofted drive for tutorial swing practice
pub fn tutorial_launch(rng: &mut impl Rng) -> Vec3 {
    Vec3::new(rng.random_range(-120.0..=120.0), 600.0, 480.0)
}

/// Apply a delivery outcome to the counters
///
/// Adds exactly one ball. Returns the commentary event with the updated
/// counters.
pub fn record_delivery(counters: &mut Counters, outcome: DeliveryOutcome) -> CommentaryEvent {
    counters.balls_bowled += 1;
    match outcome {
        DeliveryOutcome::Runs(runs) => {
            counters.score += u32::from(runs);
            CommentaryEvent::new(CommentaryKind::for_runs(runs), *counters).with_runs(runs)
        }
        DeliveryOutcome::Bowled => {
            counters.wickets += 1;
            CommentaryEvent::new(CommentaryKind::WicketBowled, *counters)
        }
        DeliveryOutcome::MissedHit => CommentaryEvent::new(CommentaryKind::MissedHit, *counters),
        DeliveryOutcome::DotBallKeeper => {
            CommentaryEvent::new(CommentaryKind::DotBallKeeper, *counters)
        }
    }
}

/// Innings-end check; reaching the target takes priority
pub fn innings_result(counters: &Counters) -> Option<InningsResult> {
    if counters.target_score > 0 && counters.score >= counters.target_score {
        Some(InningsResult::Won)
    } else if counters.wickets >= counters.max_wickets {
        Some(InningsResult::AllOut)
    } else if counters.balls_bowled >= counters.total_balls {
        Some(InningsResult::BallsExhausted)
    } else {
        None
    }
}
