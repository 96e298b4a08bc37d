//! Autoplay batsman
//!
//! Answers the tutorial aiming prompts, rotates aim between deliveries and
//! swings on the last tick before the ball would reach the stumps.

use super::state::{GameState, ShotDirection, TutorialStep, World};
use crate::engine::TickInput;

/// Aim used for each delivery, by balls bowled so far
const AIM_ROTATION: [ShotDirection; 3] = [
    ShotDirection::Off,
    ShotDirection::Straight,
    ShotDirection::Leg,
];

/// Inputs the bot would give this tick
pub fn decide(world: &World, dt: f32) -> TickInput {
    let mut input = TickInput::default();

    match world.state {
        GameState::Tutorial => {
            input.aim = match world.tutorial_step {
                TutorialStep::AimOff => Some(ShotDirection::Off),
                TutorialStep::AimStraight => Some(ShotDirection::Straight),
                TutorialStep::AimLeg => Some(ShotDirection::Leg),
                _ => None,
            };
        }
        GameState::Ready => {
            let idx = world.counters.balls_bowled as usize % AIM_ROTATION.len();
            input.aim = Some(AIM_ROTATION[idx]);
        }
        GameState::Bowling => {
            let ball = &world.ball;
            // Where the leading edge will be after this tick's physics
            let next_edge = ball.pos.y + ball.vel.y * dt - ball.radius;
            let stumps_bottom = world.stumps.pos.y + world.stumps.height;
            input.swing = ball.vel.y < 0.0 && next_edge < stumps_bottom;
        }
        _ => {}
    }

    input
}
