//! Commentary events produced by gameplay
//!
//! One event per resolved delivery plus one per game start and per innings
//! end. Events flow out to the commentary session only; gameplay never reads
//! them back.

use serde::{Deserialize, Serialize};

use crate::sim::state::Counters;

/// What just happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommentaryKind {
    GameStart,
    HitSix,
    HitFour,
    HitThree,
    HitTwo,
    HitOne,
    HitDotContact,
    WicketBowled,
    MissedHit,
    DotBallKeeper,
    GameWon,
    GameOverWickets,
    GameOverBalls,
}

impl CommentaryKind {
    /// Kind for a shot that made contact and scored `runs`
    pub fn for_runs(runs: u8) -> Self {
        match runs {
            6.. => CommentaryKind::HitSix,
            4 | 5 => CommentaryKind::HitFour,
            3 => CommentaryKind::HitThree,
            2 => CommentaryKind::HitTwo,
            1 => CommentaryKind::HitOne,
            0 => CommentaryKind::HitDotContact,
        }
    }

    /// Innings-ending event
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CommentaryKind::GameWon | CommentaryKind::GameOverWickets | CommentaryKind::GameOverBalls
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CommentaryKind::GameStart => "gameStart",
            CommentaryKind::HitSix => "hitSix",
            CommentaryKind::HitFour => "hitFour",
            CommentaryKind::HitThree => "hitThree",
            CommentaryKind::HitTwo => "hitTwo",
            CommentaryKind::HitOne => "hitOne",
            CommentaryKind::HitDotContact => "hitDotContact",
            CommentaryKind::WicketBowled => "wicketBowled",
            CommentaryKind::MissedHit => "missedHit",
            CommentaryKind::DotBallKeeper => "dotBallKeeper",
            CommentaryKind::GameWon => "gameWon",
            CommentaryKind::GameOverWickets => "gameOverWickets",
            CommentaryKind::GameOverBalls => "gameOverBalls",
        }
    }
}

impl std::fmt::Display for CommentaryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event plus the counters at that instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryEvent {
    pub kind: CommentaryKind,
    pub counters: Counters,
    /// Runs off this ball, for scoring shots
    pub runs_this_ball: Option<u8>,
}

impl CommentaryEvent {
    pub fn new(kind: CommentaryKind, counters: Counters) -> Self {
        Self {
            kind,
            counters,
            runs_this_ball: None,
        }
    }

    pub fn with_runs(mut self, runs: u8) -> Self {
        self.runs_this_ball = Some(runs);
        self
    }
}
