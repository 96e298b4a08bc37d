//! Game engine
//!
//! Owns the world and drives it one fixed tick at a time. Each tick:
//! 1. advance the clock
//! 2. apply inputs (aim, start, swing)
//! 3. fire the scheduled action if due
//! 4. pump commentary and run any continuation it releases
//! 5. step physics and react to what it reports
//! 6. expire HUD text
//!
//! Deferred work lives in one slot, either the timer slot here or the
//! commentary scheduler's continuation slot, never both. Scheduling anything
//! new cancels whatever was outstanding.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::assets::AssetStatus;
use crate::audio::{SchedulerTiming, SoundEffect};
use crate::commentary::{Commentary, CommentaryError, CommentaryEvent, CommentaryKind};
use crate::consts::*;
use crate::hud::Hud;
use crate::settings::Settings;
use crate::sim::autoplay;
use crate::sim::flow::{FlowAction, FlowEvent, ScheduledAction, transition};
use crate::sim::physics::{self, PhysicsEvent};
use crate::sim::resolver::{
    DeliveryOutcome, InningsResult, Shot, TimingZone, innings_result, is_contact, play_shot,
    record_delivery, tutorial_launch,
};
use crate::sim::state::{
    Counters, DeliveryContext, GameState, PlayerCharacter, ShotDirection, Snapshot, TutorialStep,
    World,
};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Aim change
    pub aim: Option<ShotDirection>,
    /// Swing the bat
    pub swing: bool,
    /// Start a new game
    pub start: bool,
    /// Bot answers tutorial prompts, aims and swings
    pub autoplay: bool,
}

pub struct Engine {
    world: World,
    settings: Settings,
    assets: AssetStatus,
    rng: Pcg32,
    commentary: Commentary<FlowAction>,
    pending: Option<ScheduledAction>,
    generation: u64,
    /// Engine clock, seconds
    now: f64,
    hud: Hud,
    events: Vec<CommentaryEvent>,
    sounds: Vec<SoundEffect>,
}

impl Engine {
    pub fn new(settings: Settings, seed: u64, commentary: Commentary<FlowAction>) -> Self {
        let mut hud = Hud::new();
        hud.show_message("Loading Assets...", 0, 0.0);
        Self {
            world: World::new(settings.total_balls, settings.max_wickets),
            settings,
            assets: AssetStatus::new(),
            rng: Pcg32::seed_from_u64(seed),
            commentary,
            pending: None,
            generation: 0,
            now: 0.0,
            hud,
            events: Vec::new(),
            sounds: Vec::new(),
        }
    }

    /// Engine without a voice service
    pub fn offline(settings: Settings, seed: u64) -> Self {
        let timing = SchedulerTiming::from(&settings.audio);
        Self::new(settings, seed, Commentary::offline(timing))
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn state(&self) -> GameState {
        self.world.state
    }

    pub fn counters(&self) -> &Counters {
        &self.world.counters
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn commentary(&self) -> &Commentary<FlowAction> {
        &self.commentary
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Renderer boundary
    pub fn snapshot(&self) -> Snapshot {
        self.world.snapshot()
    }

    /// Events emitted since the last call
    pub fn take_commentary_events(&mut self) -> Vec<CommentaryEvent> {
        std::mem::take(&mut self.events)
    }

    /// Sound cues emitted since the last call
    pub fn take_sound_effects(&mut self) -> Vec<SoundEffect> {
        std::mem::take(&mut self.sounds)
    }

    /// The outstanding timer, for hosts that drive timers themselves
    pub fn pending_action(&self) -> Option<ScheduledAction> {
        self.pending
    }

    fn apply(&mut self, event: FlowEvent) -> bool {
        let from = self.world.state;
        match transition(from, event) {
            Some(to) => {
                log::debug!("{from:?} -> {to:?} on {event:?}");
                self.world.state = to;
                true
            }
            None => {
                log::debug!("Ignored {event:?} in {from:?}");
                false
            }
        }
    }

    /// Record asset load results; leaves `Loading` once all have reported
    pub fn set_assets(&mut self, assets: AssetStatus) {
        self.assets = assets;
        if assets.is_settled() && self.apply(FlowEvent::AssetsReady) {
            self.world.reset_elements();
            self.hud.show_message("Choose Your Player", 0, self.now);
        }
    }

    /// Pick a batsman; starts the tutorial
    pub fn select_character(&mut self, character: PlayerCharacter) -> bool {
        if !self.apply(FlowEvent::CharacterSelected) {
            return false;
        }
        self.world.character = Some(character);
        self.enter_tutorial_step(TutorialStep::Intro);
        true
    }

    /// Leave the tutorial straight away
    pub fn skip_tutorial(&mut self) -> bool {
        if self.world.state != GameState::Tutorial {
            return false;
        }
        self.cancel_pending();
        self.finish_tutorial();
        true
    }

    /// Start a new game from `Idle`, `GameOver` or mid-game
    pub fn start_game(&mut self) -> bool {
        if transition(self.world.state, FlowEvent::Start).is_none() {
            log::debug!("Start ignored in {:?}", self.world.state);
            return false;
        }

        // Nothing from the previous game may fire into this one.
        self.cancel_pending();

        let target = self
            .rng
            .random_range(self.settings.target.min..=self.settings.target.max);
        self.world.counters.reset(target);
        self.world.reset_elements();
        self.world.tutorial_step = TutorialStep::None;

        if self.settings.commentary_enabled {
            match self.commentary.open_session(self.now) {
                Ok(()) => {}
                Err(CommentaryError::Disabled) => log::debug!("No voice service configured"),
                Err(e) => {
                    log::warn!("Failed to initialize commentary: {e}");
                    self.hud
                        .show_message("Commentary failed to connect.", 3000, self.now);
                }
            }
        }

        self.apply(FlowEvent::Start);
        log::info!(
            "Game started: target {target} from {} balls",
            self.world.counters.total_balls
        );
        self.emit(CommentaryEvent::new(
            CommentaryKind::GameStart,
            self.world.counters,
        ));
        self.schedule(FlowAction::Bowl, self.settings.timing.first_bowl_delay_ms);
        true
    }

    /// Aim; also advances the tutorial aiming steps
    pub fn set_shot_direction(&mut self, dir: ShotDirection) {
        self.world.shot_direction = dir;
        if self.world.state == GameState::Tutorial {
            if let Some(next) = self.world.tutorial_step.after_aim(dir) {
                self.enter_tutorial_step(next);
            }
        }
    }

    /// Swing the bat; only honoured while the ball is being bowled
    pub fn request_swing(&mut self) -> bool {
        if !self.apply(FlowEvent::Swing) {
            return false;
        }

        let window = self.settings.swing_window();
        self.world.bat.start_swing(self.world.shot_direction, window);
        self.world.delivery = DeliveryContext::default();

        let sprite_ready = self.assets.bat_sprite_ready();
        let practice = self.world.in_swing_practice();

        if is_contact(&self.world, sprite_ready) {
            self.apply(FlowEvent::Connect);
            self.sounds.push(SoundEffect::BatHit);
            if practice {
                self.hud.show_message("Great Shot!", 2000, self.now);
                self.hud.show_impact("NICE!", self.now);
                self.world.ball.vel = tutorial_launch(&mut self.rng);
            } else {
                let shot = play_shot(&self.world, sprite_ready, &self.settings.shots, &mut self.rng);
                self.connect_shot(shot);
            }
        } else if practice {
            self.hud.show_message("Missed! Let's try again.", 1500, self.now);
            self.hud.show_impact("TRY AGAIN", self.now);
        } else {
            self.hud.show_message("SWING AND A MISS!", 1500, self.now);
            self.hud.show_impact("MISS!", self.now);
            self.world.delivery.was_miss = true;
        }
        true
    }

    fn connect_shot(&mut self, shot: Shot) {
        self.world.ball.vel = shot.launch;

        let (message, impact) = shot_texts(&shot);
        self.hud.show_message(message, 2000, self.now);
        self.hud.show_impact(impact, self.now);
        log::debug!("{:?} shot for {} runs", shot.zone, shot.runs);

        let event = record_delivery(&mut self.world.counters, DeliveryOutcome::Runs(shot.runs));
        self.emit(event);
        if let Some(result) = innings_result(&self.world.counters) {
            self.game_over(result);
        }
    }

    /// Advance one fixed timestep
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        self.now += f64::from(dt);

        let mut input = input.clone();
        if input.autoplay {
            let bot = autoplay::decide(&self.world, dt);
            input.aim = input.aim.or(bot.aim);
            input.swing |= bot.swing;
        }

        if let Some(dir) = input.aim {
            self.set_shot_direction(dir);
        }
        if input.start {
            self.start_game();
        }
        if input.swing {
            self.request_swing();
        }

        if let Some(scheduled) = self.pending.filter(|p| p.due <= self.now) {
            self.pending = None;
            self.fire(scheduled.action);
        }

        self.commentary.advance(f64::from(dt));
        self.commentary.pump(self.now);
        if let Some(action) = self.commentary.tick(self.now) {
            log::debug!("Speech done, running {action:?}");
            self.run(action);
        }

        if let Some(event) = physics::advance(&mut self.world, dt) {
            self.on_physics(event);
        }

        self.hud.expire(self.now);
    }

    /// Fire a timer handed out by [`Engine::pending_action`]
    ///
    /// Anything but the current outstanding timer is ignored.
    pub fn fire_scheduled(&mut self, scheduled: ScheduledAction) -> bool {
        match self.pending {
            Some(current) if current.generation == scheduled.generation => {
                self.pending = None;
                self.fire(current.action);
                true
            }
            _ => {
                log::debug!(
                    "Stale timer {:?} (generation {}) ignored",
                    scheduled.action,
                    scheduled.generation
                );
                false
            }
        }
    }

    fn cancel_pending(&mut self) {
        self.generation += 1;
        if let Some(old) = self.pending.take() {
            log::debug!("Cancelled {:?}", old.action);
        }
        self.commentary.cancel();
    }

    fn schedule(&mut self, action: FlowAction, delay_ms: u64) {
        self.cancel_pending();
        let scheduled = ScheduledAction {
            action,
            due: self.now + delay_ms as f64 / 1000.0,
            generation: self.generation,
        };
        log::debug!("Scheduled {action:?} at {:.3}", scheduled.due);
        self.pending = Some(scheduled);
    }

    /// A timer came due. Moving on to the next ball also waits for speech.
    fn fire(&mut self, action: FlowAction) {
        if action == FlowAction::SetupNextDelivery {
            let timeout = self.settings.timing.commentary_timeout_ms as f64 / 1000.0;
            match self.commentary.schedule_continuation(action, timeout, self.now) {
                Some(action) => self.run(action),
                None => log::debug!("Next delivery waits for commentary"),
            }
        } else {
            self.run(action);
        }
    }

    fn run(&mut self, action: FlowAction) {
        match action {
            FlowAction::Bowl => self.bowl(),
            FlowAction::SetupNextDelivery => self.setup_next_delivery(),
            FlowAction::AdvanceTutorial(step) => {
                if self.world.state == GameState::Tutorial {
                    self.enter_tutorial_step(step);
                }
            }
            FlowAction::StartSwingPractice => {
                if self.world.state == GameState::Tutorial {
                    self.world.reset_elements();
                    self.world.tutorial_step = TutorialStep::SwingPractice;
                    self.schedule(
                        FlowAction::BowlPracticeBall,
                        self.settings.timing.tutorial_bowl_ms,
                    );
                }
            }
            FlowAction::BowlPracticeBall => self.bowl_practice_ball(),
            FlowAction::FinishTutorial => {
                if self.world.state == GameState::Tutorial {
                    self.finish_tutorial();
                }
            }
        }
    }

    fn bowl(&mut self) {
        if self.world.state != GameState::Ready || !self.apply(FlowEvent::Bowl) {
            return;
        }
        let half = BALL_RELEASE_SPREAD / 2.0;
        let x = BATSMAN_X + self.rng.random_range(-half..half);
        let speed = self
            .rng
            .random_range(self.settings.bowl_speed.min..=self.settings.bowl_speed.max);
        self.world.delivery = DeliveryContext::default();
        self.world.ball.release(x, speed);
        self.hud.show_message("Bowler running in...", 2000, self.now);
    }

    fn bowl_practice_ball(&mut self) {
        if !self.world.in_swing_practice() || !self.apply(FlowEvent::Bowl) {
            return;
        }
        self.world.delivery = DeliveryContext::default();
        self.world
            .ball
            .release(BATSMAN_X, self.settings.tutorial_bowl_speed);
        self.hud.show_message("Get ready to swing!", 2000, self.now);
    }

    fn setup_next_delivery(&mut self) {
        if self.world.state == GameState::GameOver {
            return;
        }
        if let Some(result) = innings_result(&self.world.counters) {
            self.game_over(result);
            return;
        }
        if !self.apply(FlowEvent::NextDelivery) {
            return;
        }
        self.world.reset_elements();
        self.hud.show_message("Bowler is ready...", 0, self.now);
        let timing = &self.settings.timing;
        let delay = self
            .rng
            .random_range(timing.bowl_delay_min_ms..=timing.bowl_delay_max_ms);
        self.schedule(FlowAction::Bowl, delay);
    }

    fn on_physics(&mut self, event: PhysicsEvent) {
        let practice = self.world.in_swing_practice();
        match event {
            PhysicsEvent::Bowled => {
                if !self.apply(FlowEvent::Bowled) {
                    return;
                }
                self.world.stumps.hit = true;
                self.sounds.push(SoundEffect::Wicket);
                self.hud.show_message("CLEAN BOWLED!", 3000, self.now);
                self.hud.show_impact("BOWLED!", self.now);
                self.resolve(DeliveryOutcome::Bowled, self.settings.timing.after_wicket_ms);
            }
            PhysicsEvent::PassedKeeper if practice => {
                if self.apply(FlowEvent::TutorialReset) {
                    self.world.reset_elements();
                    self.schedule(
                        FlowAction::BowlPracticeBall,
                        self.settings.timing.tutorial_rebowl_ms,
                    );
                }
            }
            PhysicsEvent::PassedKeeper => {
                if !self.apply(FlowEvent::PassedKeeper) {
                    return;
                }
                self.hud.show_message("Through to the keeper.", 2000, self.now);
                let outcome = if self.world.delivery.was_miss {
                    self.hud.show_impact("MISS!", self.now);
                    DeliveryOutcome::MissedHit
                } else {
                    self.hud.show_impact("DOT BALL!", self.now);
                    DeliveryOutcome::DotBallKeeper
                };
                self.resolve(outcome, self.settings.timing.after_dead_ball_ms);
            }
            PhysicsEvent::BallSettled if practice => {
                if self.apply(FlowEvent::TutorialReset) {
                    self.enter_tutorial_step(TutorialStep::Complete);
                }
            }
            PhysicsEvent::BallSettled => {
                if self.apply(FlowEvent::BallSettled) {
                    self.schedule(
                        FlowAction::SetupNextDelivery,
                        self.settings.timing.after_ball_in_play_ms,
                    );
                }
            }
        }
    }

    /// Count an unhit delivery, then end the innings or queue the next ball
    fn resolve(&mut self, outcome: DeliveryOutcome, delay_ms: u64) {
        let event = record_delivery(&mut self.world.counters, outcome);
        self.world.delivery = DeliveryContext::default();
        self.emit(event);
        match innings_result(&self.world.counters) {
            Some(result) => self.game_over(result),
            None => self.schedule(FlowAction::SetupNextDelivery, delay_ms),
        }
    }

    fn game_over(&mut self, result: InningsResult) {
        if !self.apply(FlowEvent::InningsOver) {
            return;
        }
        self.cancel_pending();
        self.world.delivery = DeliveryContext::default();

        let c = self.world.counters;
        let (message, impact) = match result {
            InningsResult::Won => (
                format!("YOU WON! Target: {} Score: {}", c.target_score, c.score),
                "YOU WON!",
            ),
            InningsResult::AllOut => (
                format!("Game Over! BOWLED! Target: {} Score: {}", c.target_score, c.score),
                "GAME OVER!",
            ),
            InningsResult::BallsExhausted => (
                format!("Game Over! Overs Up! Target: {} Score: {}", c.target_score, c.score),
                "GAME OVER!",
            ),
        };
        self.hud.show_message(message, 0, self.now);
        self.hud.show_impact(impact, self.now);
        log::info!(
            "Innings over ({result:?}): {}/{} from {} balls, target {}",
            c.score,
            c.wickets,
            c.balls_bowled,
            c.target_score
        );
        self.emit(CommentaryEvent::new(result.commentary_kind(), c));
    }

    fn emit(&mut self, event: CommentaryEvent) {
        self.commentary.trigger(&event, self.now);
        self.events.push(event);
    }

    fn enter_tutorial_step(&mut self, step: TutorialStep) {
        self.world.tutorial_step = step;
        let timing = self.settings.timing;
        let now = self.now;
        match step {
            TutorialStep::None | TutorialStep::SwingPractice => {}
            TutorialStep::Intro => {
                self.hud
                    .show_message("Welcome! Let's learn the controls.", 0, now);
                self.schedule(
                    FlowAction::AdvanceTutorial(TutorialStep::AimOff),
                    timing.tutorial_step_ms,
                );
            }
            TutorialStep::AimOff => self.hud.show_message("Aim to the OFF side.", 0, now),
            TutorialStep::AimStraight => {
                self.hud.show_message("Good! Now aim STRAIGHT.", 0, now)
            }
            TutorialStep::AimLeg => {
                self.hud
                    .show_message("Perfect! And aim to the LEG side.", 0, now)
            }
            TutorialStep::AimDone => {
                self.hud.show_message("Aiming is set! Great job.", 0, now);
                self.schedule(
                    FlowAction::AdvanceTutorial(TutorialStep::SwingIntro),
                    timing.tutorial_step_ms,
                );
            }
            TutorialStep::SwingIntro => {
                self.hud
                    .show_message("Now, let's hit! SWING as the ball arrives.", 0, now);
                self.schedule(FlowAction::StartSwingPractice, timing.tutorial_step_ms);
            }
            TutorialStep::Complete => {
                self.hud
                    .show_message("Tutorial Complete! You're ready to play.", 0, now);
                self.schedule(FlowAction::FinishTutorial, timing.tutorial_complete_ms);
            }
        }
    }

    fn finish_tutorial(&mut self) {
        self.world.reset_elements();
        self.world.tutorial_step = TutorialStep::None;
        if self.apply(FlowEvent::TutorialFinished) {
            log::info!("Tutorial complete");
            self.hud.show_message("Press Start Game to begin!", 0, self.now);
        }
    }
}

/// Banner and impact text for a connected shot
fn shot_texts(shot: &Shot) -> (String, &'static str) {
    match (shot.zone, shot.runs) {
        (TimingZone::SweetSpot, 6) => ("PERFECT! SIXER!".into(), "SIX!"),
        (TimingZone::SweetSpot, _) => ("SWEET! FOUR!".into(), "FOUR!"),
        (TimingZone::Good, 4) => ("Well Hit! FOUR!".into(), "FOUR!"),
        (TimingZone::Good, 3) => ("3 Runs!".into(), "THREE RUNS!"),
        (TimingZone::Good, runs) => (format!("{runs} Runs!"), "TWO RUNS!"),
        (TimingZone::Mistimed, 0) => ("POOR TIMING!".into(), "DOT BALL!"),
        (TimingZone::Mistimed, 1) => ("1 Run(s).".into(), "ONE RUN!"),
        (TimingZone::Mistimed, runs) => (format!("{runs} Run(s)."), "TWO RUNS!"),
    }
}
