//! Deterministic simulation module
//!
//! All gameplay rules live here. This module must stay deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (passed in by the caller)
//! - No rendering, audio or platform dependencies

pub mod autoplay;
pub mod collision;
pub mod flow;
pub mod physics;
pub mod resolver;
pub mod state;

pub use collision::Aabb;
pub use flow::{FlowAction, FlowEvent, ScheduledAction, transition};
pub use physics::PhysicsEvent;
pub use resolver::{DeliveryOutcome, InningsResult, Shot, TimingZone};
pub use state::{
    Ball, Bat, Batsman, Counters, GameState, PlayerCharacter, ShotDirection, Snapshot, Stumps,
    TutorialStep, World,
};
