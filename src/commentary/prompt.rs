//! Prompt text sent to the voice channel

use super::event::{CommentaryEvent, CommentaryKind};

/// Persona given to the voice service when a session opens
pub const SYSTEM_PROMPT: &str = "\
You are the live commentator for a fast arcade cricket game. Each message you \
receive is a short match report with an \"Event\" line describing what just \
happened and, usually, an \"Overall Situation\" line with the state of the \
chase.

Rules:
1. Do not read the report back. Turn it into a lively spoken reaction.
2. Let the situation colour your tone: a single in a tight finish matters \
more than one at the start, a wicket hurts more when the target is close.
3. Keep every reaction very short, a punchy soundbite rather than a sentence.
4. Sound like an upbeat, professional British broadcaster. You may \
occasionally drop in a well known Urdu or Hindi cricket exclamation such as \
\"Chakka!\" or \"Shabash!\" on big moments.
5. Never ask questions, never summarise, never talk about yourself.
6. Vary your phrasing from ball to ball.
7. Respond with speech only.";

/// Factual line for the event itself
fn describe(event: &CommentaryEvent) -> String {
    let c = &event.counters;
    match event.kind {
        CommentaryKind::GameStart => format!(
            "The game is starting. Target: {} runs from {} balls.",
            c.target_score, c.total_balls
        ),
        CommentaryKind::HitSix => "Event: SIX runs scored.".into(),
        CommentaryKind::HitFour => "Event: FOUR runs scored.".into(),
        CommentaryKind::HitThree => "Event: THREE runs scored.".into(),
        CommentaryKind::HitTwo => "Event: TWO runs scored.".into(),
        CommentaryKind::HitOne => "Event: ONE run scored.".into(),
        CommentaryKind::HitDotContact => {
            "Event: Dot ball. Batsman made contact, but no run.".into()
        }
        CommentaryKind::WicketBowled => "Event: WICKET! The batsman is bowled.".into(),
        CommentaryKind::MissedHit => "Event: Dot ball. Batsman swung and missed.".into(),
        CommentaryKind::DotBallKeeper => {
            "Event: Dot ball. Ball went to the keeper, no hit.".into()
        }
        CommentaryKind::GameWon => "Event: VICTORY! The batting team has won the game.".into(),
        CommentaryKind::GameOverWickets => {
            "Event: GAME OVER. The batting team is all out.".into()
        }
        CommentaryKind::GameOverBalls => {
            "Event: GAME OVER. The batting team ran out of balls.".into()
        }
    }
}

/// State of the chase, for in-play events only
fn situation(event: &CommentaryEvent) -> String {
    if event.kind == CommentaryKind::GameStart || event.kind.is_terminal() {
        return String::new();
    }

    let c = &event.counters;
    let mut text = String::new();
    let runs_needed = c.runs_needed();
    if runs_needed > 0 {
        let balls = c.balls_remaining();
        let plural = if balls == 1 { "" } else { "s" };
        text = format!(
            "Overall Situation: They now need {runs_needed} runs from {balls} ball{plural} to win."
        );
    } else if c.target_score > 0 {
        text = "Overall Situation: The target has been reached!".into();
    }

    let wickets_left = c.max_wickets.saturating_sub(c.wickets);
    if wickets_left <= 1 && c.wickets < c.max_wickets {
        text.push_str(" This is the last wicket.");
    }
    text
}

/// Full prompt for one event
pub fn build_prompt(event: &CommentaryEvent) -> String {
    let prompt = format!("{} {}", describe(event), situation(event));
    prompt.trim().to_string()
}
