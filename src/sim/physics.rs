//! Fixed-step ball physics
//!
//! Two regimes:
//! - Pre-flight (`Bowling`/`Hitting`): the ball only travels along y toward
//!   the batsman. It can hit the stumps or pass through to the keeper.
//! - Flight (`BallInPlay`): gravity, bounce with ground friction, free
//!   movement on the ground plane, until it leaves the play area or stops.
//!
//! The stepper never changes `GameState`; it reports what happened and the
//! game flow decides.

use glam::Vec2;

use super::collision::Aabb;
use super::state::{GameState, World};
use crate::consts::*;

/// Something the game flow has to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsEvent {
    /// Ball struck the stumps before being hit
    Bowled,
    /// Ball crossed the keeper boundary untouched
    PassedKeeper,
    /// Ball in play left the field or came to rest
    BallSettled,
}

/// Advance the world by one fixed timestep
pub fn advance(world: &mut World, dt: f32) -> Option<PhysicsEvent> {
    world.bat.update(dt);

    if !world.state.is_simulated() {
        return None;
    }
    if world.state == GameState::BallInPlay {
        flight(world, dt)
    } else {
        pre_flight(world, dt)
    }
}

/// Stumps hitbox for the current delivery
pub fn stumps_box(world: &World) -> Aabb {
    let stumps = &world.stumps;
    Aabb::new(
        stumps.pos,
        stumps.pos + Vec2::new(stumps.width, stumps.height),
    )
}

fn pre_flight(world: &mut World, dt: f32) -> Option<PhysicsEvent> {
    // Mid-swing the bat covers the stumps, unless the swing came from a
    // state that never left Bowling.
    let can_be_bowled = (!world.bat.swinging || world.state == GameState::Bowling)
        && !world.in_swing_practice()
        && !world.stumps.hit;

    let prev_y = world.ball.pos.y;
    world.ball.pos.y += world.ball.vel.y * dt;

    if can_be_bowled {
        let ball = &world.ball;
        let swept = Aabb::swept_circle_y(ball.pos.x, prev_y, ball.pos.y, ball.radius);
        if swept.overlaps(&stumps_box(world)) {
            return Some(PhysicsEvent::Bowled);
        }
    }

    if world.ball.pos.y + world.ball.radius < 0.0 {
        return Some(PhysicsEvent::PassedKeeper);
    }

    None
}

fn flight(world: &mut World, dt: f32) -> Option<PhysicsEvent> {
    let ball = &mut world.ball;

    ball.vel.z -= GRAVITY * dt;
    ball.pos.z += ball.vel.z * dt;
    if ball.pos.z < 0.0 {
        ball.pos.z = 0.0;
        ball.vel.z = -ball.vel.z * BOUNCE_FACTOR;
        ball.vel.x *= GROUND_FRICTION;
        ball.vel.y *= GROUND_FRICTION;
    }

    ball.pos.x += ball.vel.x * dt;
    ball.pos.y += ball.vel.y * dt;
    ball.record_trail();

    let stopped = ball.pos.z <= 0.0 && ball.ground_speed() < STOP_SPEED;
    if stopped || !in_play_area(ball.ground_pos()) {
        return Some(PhysicsEvent::BallSettled);
    }

    None
}

/// Bounded rectangle the ball may roam while in play
pub fn in_play_area(pos: Vec2) -> bool {
    let half_w = FIELD_WIDTH * BOUNDS_SCALE;
    let half_h = FIELD_HEIGHT * BOUNDS_SCALE;
    pos.x >= -half_w && pos.x <= half_w && pos.y >= -half_h && pos.y <= half_h
}
