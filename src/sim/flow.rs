//! Game flow transition table
//!
//! Every `GameState` change goes through [`transition`]. A `(state, event)`
//! pair missing from the table is not a legal transition and yields `None`;
//! the engine ignores it.

use super::state::{GameState, TutorialStep};

/// Inputs to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    /// Asset gate opened
    AssetsReady,
    CharacterSelected,
    /// New game requested
    Start,
    /// Bowler released the ball
    Bowl,
    Swing,
    /// Swing made contact
    Connect,
    Bowled,
    PassedKeeper,
    /// Ball in play came to rest or left the field
    BallSettled,
    InningsOver,
    /// Per-delivery fields re-initialised, next ball coming
    NextDelivery,
    /// Tutorial practice ball finished, back to the tutorial script
    TutorialReset,
    TutorialFinished,
}

/// Deferred work, fired from the single scheduled-action slot or from the
/// commentary scheduler once speech is done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowAction {
    Bowl,
    SetupNextDelivery,
    /// Move the tutorial on to this step
    AdvanceTutorial(TutorialStep),
    /// Reset elements and begin swing practice
    StartSwingPractice,
    BowlPracticeBall,
    FinishTutorial,
}

/// A flow action waiting for its time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledAction {
    pub action: FlowAction,
    /// Engine clock, seconds
    pub due: f64,
    /// Only the action matching the engine's current generation may run
    pub generation: u64,
}

/// State reached from `state` on `event`, if legal
pub fn transition(state: GameState, event: FlowEvent) -> Option<GameState> {
    use FlowEvent as E;
    use GameState as S;

    let next = match (state, event) {
        (S::Loading, E::AssetsReady) => S::PlayerSelect,
        (S::PlayerSelect, E::CharacterSelected) => S::Tutorial,

        (
            S::Idle
            | S::GameOver
            | S::Ready
            | S::Bowling
            | S::Hitting
            | S::BallInPlay
            | S::Out
            | S::BallDead,
            E::Start,
        ) => S::Ready,

        (S::Ready | S::Tutorial, E::Bowl) => S::Bowling,
        (S::Bowling, E::Swing) => S::Hitting,
        (S::Hitting, E::Connect) => S::BallInPlay,
        (S::Bowling | S::Hitting, E::Bowled) => S::Out,
        (S::Bowling | S::Hitting, E::PassedKeeper) => S::BallDead,
        (S::BallInPlay, E::BallSettled) => S::BallDead,

        (S::Out | S::BallDead | S::BallInPlay, E::InningsOver) => S::GameOver,
        (S::Out | S::BallDead, E::NextDelivery) => S::Ready,

        (S::Bowling | S::Hitting | S::BallInPlay, E::TutorialReset) => S::Tutorial,
        (S::Tutorial, E::TutorialFinished) => S::Idle,

        _ => return None,
    };
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [GameState; 11] = [
        GameState::PlayerSelect,
        GameState::Idle,
        GameState::Loading,
        GameState::Ready,
        GameState::Bowling,
        GameState::Hitting,
        GameState::BallInPlay,
        GameState::Out,
        GameState::BallDead,
        GameState::GameOver,
        GameState::Tutorial,
    ];

    #[test]
    fn test_delivery_path() {
        let mut state = GameState::Idle;
        for (event, expected) in [
            (FlowEvent::Start, GameState::Ready),
            (FlowEvent::Bowl, GameState::Bowling),
            (FlowEvent::Swing, GameState::Hitting),
            (FlowEvent::Connect, GameState::BallInPlay),
            (FlowEvent::BallSettled, GameState::BallDead),
            (FlowEvent::NextDelivery, GameState::Ready),
        ] {
            state = transition(state, event).expect("legal transition");
            assert_eq!(state, expected);
        }
    }

    #[test]
    fn test_swing_only_while_bowling() {
        for state in ALL_STATES {
            let next = transition(state, FlowEvent::Swing);
            if state == GameState::Bowling {
                assert_eq!(next, Some(GameState::Hitting));
            } else {
                assert_eq!(next, None, "swing accepted in {state:?}");
            }
        }
    }

    #[test]
    fn test_game_over_is_terminal_except_start() {
        for event in [
            FlowEvent::AssetsReady,
            FlowEvent::CharacterSelected,
            FlowEvent::Bowl,
            FlowEvent::Swing,
            FlowEvent::Connect,
            FlowEvent::Bowled,
            FlowEvent::PassedKeeper,
            FlowEvent::BallSettled,
            FlowEvent::InningsOver,
            FlowEvent::NextDelivery,
            FlowEvent::TutorialReset,
            FlowEvent::TutorialFinished,
        ] {
            assert_eq!(transition(GameState::GameOver, event), None);
        }
        assert_eq!(
            transition(GameState::GameOver, FlowEvent::Start),
            Some(GameState::Ready)
        );
    }

    #[test]
    fn test_start_not_accepted_before_selection() {
        assert_eq!(transition(GameState::Loading, FlowEvent::Start), None);
        assert_eq!(transition(GameState::PlayerSelect, FlowEvent::Start), None);
        assert_eq!(transition(GameState::Tutorial, FlowEvent::Start), None);
    }

    #[test]
    fn test_unswung_outcomes() {
        assert_eq!(transition(GameState::Bowling, FlowEvent::Bowled), Some(GameState::Out));
        assert_eq!(
            transition(GameState::Bowling, FlowEvent::PassedKeeper),
            Some(GameState::BallDead)
        );
        assert_eq!(transition(GameState::Hitting, FlowEvent::Bowled), Some(GameState::Out));
        assert_eq!(transition(GameState::Ready, FlowEvent::Bowled), None);
    }
}
